//! UI rendering using ratatui
//!
//! Three screens:
//! - Home: name entry plus create/join actions
//! - Lobby: room code, roster, start control
//! - Game: current turn, category choice or challenge, leaderboard

use crate::app::state::{GameState, HomeAction, HomeFocus, HomeState, LobbyState, MIN_PLAYERS};
use crate::app::{AppCoordinator, Screen};
use crate::api::Category;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};
use std::time::Instant;

/// Render the appropriate screen based on app state
pub fn render(frame: &mut Frame, coordinator: &AppCoordinator, now: Instant) {
    match &coordinator.screen {
        Screen::Home(home) => render_home(frame, home),
        Screen::Lobby(lobby) => render_lobby(frame, lobby, now),
        Screen::Game(game) => render_game(frame, game),
    }
}

/// Render the landing screen
fn render_home(frame: &mut Frame, home: &HomeState) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Logo
            Constraint::Length(3), // Name input
            Constraint::Length(3), // Create action
            Constraint::Length(1), // Divider
            Constraint::Length(3), // Room code input
            Constraint::Length(3), // Join action
            Constraint::Length(2), // Error line
            Constraint::Min(0),    // Spacer
            Constraint::Length(2), // Footer
        ])
        .margin(2)
        .split(area);

    let logo = r#"
 _____ ___  ____
|_   _/ _ \|  _ \   Truth
  | || (_) | |_) |  or
  |_| \___/|____/   Dare
"#;
    let logo_widget = Paragraph::new(logo)
        .style(Style::default().fg(Color::Magenta).bold())
        .alignment(Alignment::Center);
    frame.render_widget(logo_widget, layout[0]);

    render_input(
        frame,
        layout[1],
        "Your Name",
        &home.name_input,
        home.focus == HomeFocus::Name,
    );

    let create_label = if home.loading && home.pending == Some(HomeAction::Create) {
        "Creating..."
    } else {
        "Create Room"
    };
    render_button(
        frame,
        layout[2],
        create_label,
        home.focus == HomeFocus::Create,
        !home.loading,
    );

    let divider = Paragraph::new("── or join an existing room ──")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(divider, layout[3]);

    render_input(
        frame,
        layout[4],
        "Room Code",
        &home.code_input,
        home.focus == HomeFocus::RoomCode,
    );

    let join_label = if home.loading && home.pending == Some(HomeAction::Join) {
        "Joining..."
    } else {
        "Join Room"
    };
    render_button(
        frame,
        layout[5],
        join_label,
        home.focus == HomeFocus::Join,
        !home.loading,
    );

    if let Some(error) = &home.error {
        let error_widget = Paragraph::new(error.as_str())
            .style(Style::default().fg(Color::Red))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(error_widget, layout[6]);
    }

    let footer = Paragraph::new("Tab/↑↓ Move  Enter Select  Esc Quit")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(footer, layout[8]);
}

/// Render a labelled text input with a cursor when focused
fn render_input(frame: &mut Frame, area: Rect, label: &str, value: &str, focused: bool) {
    let display = if focused {
        format!("{}_", value)
    } else {
        value.to_string()
    };
    let style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::White)
    };
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let input = Paragraph::new(display).style(style).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(format!(" {} ", label)),
    );
    frame.render_widget(input, area);
}

/// Render an action button
fn render_button(frame: &mut Frame, area: Rect, label: &str, focused: bool, enabled: bool) {
    let style = if !enabled {
        Style::default().fg(Color::DarkGray)
    } else if focused {
        Style::default().fg(Color::Yellow).bold()
    } else {
        Style::default().fg(Color::White)
    };
    let text = if focused {
        format!("> {} <", label)
    } else {
        label.to_string()
    };
    let button = Paragraph::new(text).style(style).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(style),
    );
    frame.render_widget(button, area);
}

/// Render the lobby screen
fn render_lobby(frame: &mut Frame, lobby: &LobbyState, now: Instant) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Room code + copy state
            Constraint::Min(6),    // Player list
            Constraint::Length(3), // Start control
            Constraint::Length(2), // Notice / error line
            Constraint::Length(2), // Footer
        ])
        .margin(1)
        .split(area);

    let header = Paragraph::new("Waiting for players...")
        .style(Style::default().fg(Color::Magenta).bold())
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, layout[0]);

    let copy_hint = if lobby.copied.is_active(now) {
        "✓ Copied!"
    } else {
        "[C] Copy"
    };
    let code = Paragraph::new(format!("Room Code: {}   {}", lobby.room_id, copy_hint))
        .style(Style::default().fg(Color::Cyan).bold())
        .alignment(Alignment::Center);
    frame.render_widget(code, layout[1]);

    let items: Vec<ListItem> = lobby
        .players()
        .iter()
        .map(|player| {
            let style = if player.player_name == lobby.player_name {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(format!("  ● {}", player.player_name)).style(style)
        })
        .collect();
    let title = format!(" Players ({}) ", lobby.player_count());
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(list, layout[2]);

    let (start_text, start_style) = if lobby.can_start() {
        (
            "[ Press ENTER to START ]".to_string(),
            Style::default().fg(Color::Green).bold(),
        )
    } else {
        let missing = MIN_PLAYERS.saturating_sub(lobby.player_count());
        (
            format!("Waiting for {} more player(s)...", missing),
            Style::default().fg(Color::DarkGray),
        )
    };
    let start = Paragraph::new(start_text)
        .style(start_style)
        .alignment(Alignment::Center);
    frame.render_widget(start, layout[3]);

    let status = lobby
        .roster
        .error()
        .map(|e| (e.to_string(), Color::Red))
        .or_else(|| lobby.notice.clone().map(|n| (n, Color::Yellow)));
    if let Some((message, color)) = status {
        let line = Paragraph::new(message)
            .style(Style::default().fg(color))
            .alignment(Alignment::Center);
        frame.render_widget(line, layout[4]);
    }

    let footer = Paragraph::new("C Copy Code  Enter Start  Esc Leave")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(footer, layout[5]);
}

/// Render the game screen
fn render_game(frame: &mut Frame, game: &GameState) {
    let area = frame.area();

    if game.room.data().is_none() {
        let loading = Paragraph::new("Loading game...")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        frame.render_widget(loading, area);
        return;
    }

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(8),    // Challenge / choice panel
            Constraint::Length(8), // Leaderboard
            Constraint::Length(2), // Error line
            Constraint::Length(2), // Footer
        ])
        .margin(1)
        .split(area);

    render_game_header(frame, layout[0], game);

    if let Some(prompt) = &game.prompt {
        render_challenge(frame, layout[1], prompt, game.busy);
    } else {
        render_choice(frame, layout[1], game.busy);
    }

    render_leaderboard(frame, layout[2], game);

    if let Some(error) = game.error.as_deref().or(game.room.error()) {
        let line = Paragraph::new(error)
            .style(Style::default().fg(Color::Red))
            .alignment(Alignment::Center);
        frame.render_widget(line, layout[3]);
    }

    let footer = if game.prompt.is_some() {
        "T/D New Prompt  Enter Complete  P Pass  Esc Leave"
    } else {
        "T Truth  D Dare  Esc Leave"
    };
    let footer = Paragraph::new(footer)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(footer, layout[4]);
}

/// Render the game header: whose turn it is, plus the room code
fn render_game_header(frame: &mut Frame, area: Rect, game: &GameState) {
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let header_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(20),    // Turn banner
            Constraint::Length(20), // Room code
        ])
        .split(inner);

    let turn_text = match game.current_player() {
        Some(player) if player.player_name == game.player_name => "It's your turn!".to_string(),
        Some(player) => format!("It's {}'s turn!", player.player_name),
        None => "Waiting for players...".to_string(),
    };
    let turn = Paragraph::new(turn_text)
        .style(Style::default().fg(Color::Magenta).bold())
        .alignment(Alignment::Left);
    frame.render_widget(turn, header_layout[0]);

    let code = Paragraph::new(format!("Room: {}", game.room_id))
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Right);
    frame.render_widget(code, header_layout[1]);
}

/// Render the truth-or-dare choice panel
fn render_choice(frame: &mut Frame, area: Rect, busy: bool) {
    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .margin(1)
        .split(area);

    let truth_style = if busy {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::Cyan).bold()
    };
    let truth = Paragraph::new(format!("\n[T]\n\n{}", Category::Truth.label()))
        .style(truth_style)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(truth_style));
    frame.render_widget(truth, layout[0]);

    let dare_style = if busy {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::Red).bold()
    };
    let dare = Paragraph::new(format!("\n[D]\n\n{}", Category::Dare.label()))
        .style(dare_style)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(dare_style));
    frame.render_widget(dare, layout[1]);
}

/// Render the active challenge
fn render_challenge(frame: &mut Frame, area: Rect, prompt: &str, busy: bool) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(4),    // Prompt text
            Constraint::Length(1), // Actions
        ])
        .margin(1)
        .split(area);

    let challenge = Paragraph::new(prompt)
        .style(Style::default().fg(Color::White).bold())
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(" Challenge "));
    frame.render_widget(challenge, layout[0]);

    let actions_text = if busy {
        "Finishing turn..."
    } else {
        "[Enter] Complete (+1)   [P] Pass"
    };
    let actions = Paragraph::new(actions_text)
        .style(Style::default().fg(Color::Green))
        .alignment(Alignment::Center);
    frame.render_widget(actions, layout[1]);
}

/// Render the leaderboard, highlighting the turn holder
fn render_leaderboard(frame: &mut Frame, area: Rect, game: &GameState) {
    let Some(room) = game.room.data() else {
        return;
    };
    let current = game.current_player().map(|p| p.player_id.clone());

    let items: Vec<ListItem> = room
        .players
        .iter()
        .map(|player| {
            let is_current = current.as_deref() == Some(player.player_id.as_str());
            let prefix = if is_current { "> " } else { "  " };
            let style = if is_current {
                Style::default().fg(Color::Yellow).bold()
            } else if player.player_name == game.player_name {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default().fg(Color::White)
            };
            let score = room.score_for(&player.player_id);
            ListItem::new(format!("{}{} - {}", prefix, player.player_name, score)).style(style)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Scores "),
    );
    frame.render_widget(list, area);
}
