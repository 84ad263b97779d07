//! Truth or Dare - a terminal client for multiplayer party games
//!
//! Create a room, share the code, take turns. The backend owns the
//! rules; this client mirrors its state and drives turn transitions.

mod api;
mod app;
mod config;
mod tui;

use api::ApiClient;
use app::AppCoordinator;
use config::Config;
use crossterm::event::{self, Event, KeyEventKind};
use std::io;
use std::time::{Duration, Instant};
use tui::Tui;

/// How long to wait for input before running a poll tick
const TICK_RATE: Duration = Duration::from_millis(200);

fn main() -> io::Result<()> {
    let config = Config::from_env();
    let client = ApiClient::new(&config.server_url).map_err(io::Error::other)?;
    let mut coordinator = AppCoordinator::new(client);

    // Initialize terminal
    let mut terminal = Tui::new()?;
    terminal.enter()?;

    // Main event loop
    loop {
        let now = Instant::now();
        terminal.draw(|frame| tui::render(frame, &coordinator, now))?;

        // Poll for events with timeout
        if event::poll(TICK_RATE)? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (not release)
                if key.kind == KeyEventKind::Press {
                    coordinator.on_key(key.code, Instant::now());
                }
            }
        }

        // Drain worker events and fire due roster polls
        coordinator.poll(Instant::now());

        if coordinator.should_quit {
            break;
        }
    }

    // Terminal cleanup happens automatically via Tui::drop
    Ok(())
}
