//! Screen state management
//!
//! Handles transitions between the three application screens:
//! - Home: enter a name, create or join a room
//! - Lobby: share the room code, wait for players
//! - Game: pick a category, face the challenge, advance turns
//!
//! Navigation carries the room code and player name in the destination
//! screen's state; there is no shared store. Every navigation bumps the
//! coordinator's generation so that worker responses dispatched for a
//! screen that is gone are discarded on arrival.

use crossterm::event::KeyCode;
use std::sync::mpsc::Receiver;
use std::time::Instant;

use crate::api::{ApiClient, ApiEvent, Category, Dispatcher, Envelope, RoomId};
use crate::tui::clipboard;

use super::state::{
    GameState, HomeAction, HomeFocus, HomeState, LobbyState, COPY_CONFIRMATION, MIN_PLAYERS,
};

/// The current application screen
pub enum Screen {
    Home(HomeState),
    Lobby(LobbyState),
    Game(GameState),
}

/// Main application coordinator
pub struct AppCoordinator {
    /// Current screen
    pub screen: Screen,
    /// Whether the application should quit
    pub should_quit: bool,
    dispatcher: Dispatcher,
    events: Receiver<Envelope>,
    generation: u64,
}

impl AppCoordinator {
    /// Create a coordinator starting at the home screen
    pub fn new(client: ApiClient) -> Self {
        let (dispatcher, events) = Dispatcher::new(client);
        Self {
            screen: Screen::Home(HomeState::new()),
            should_quit: false,
            dispatcher,
            events,
            generation: 0,
        }
    }

    /// Quit the application
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    fn navigate(&mut self, screen: Screen) {
        self.generation = self.generation.wrapping_add(1);
        self.screen = screen;
    }

    /// Go back to the home screen, cancelling any lobby poll
    pub fn go_home(&mut self) {
        if let Screen::Lobby(lobby) = &mut self.screen {
            lobby.poll.cancel();
        }
        self.navigate(Screen::Home(HomeState::new()));
    }

    fn go_lobby(&mut self, now: Instant, room_id: RoomId, player_name: String) {
        self.navigate(Screen::Lobby(LobbyState::new(room_id, player_name)));
        if let Screen::Lobby(lobby) = &mut self.screen {
            // First roster fetch fires on the next tick.
            lobby.poll.start(now);
        }
    }

    fn go_game(&mut self, room_id: RoomId, player_name: String) {
        self.navigate(Screen::Game(GameState::new(room_id.clone(), player_name)));
        if let Screen::Game(game) = &mut self.screen {
            game.room.begin();
        }
        self.dispatcher.fetch_snapshot(self.generation, room_id);
    }

    /// Handle a key press
    pub fn on_key(&mut self, code: KeyCode, now: Instant) {
        match &self.screen {
            Screen::Home(_) => self.on_home_key(code),
            Screen::Lobby(_) => self.on_lobby_key(code, now),
            Screen::Game(_) => self.on_game_key(code),
        }
    }

    fn on_home_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => self.quit(),
            KeyCode::Tab | KeyCode::Down => {
                if let Screen::Home(home) = &mut self.screen {
                    home.focus_next();
                }
            }
            KeyCode::BackTab | KeyCode::Up => {
                if let Screen::Home(home) = &mut self.screen {
                    home.focus_prev();
                }
            }
            KeyCode::Backspace => {
                if let Screen::Home(home) = &mut self.screen {
                    home.on_backspace();
                }
            }
            KeyCode::Enter => self.home_submit(),
            KeyCode::Char(c) => {
                if let Screen::Home(home) = &mut self.screen {
                    home.on_char(c);
                }
            }
            _ => {}
        }
    }

    fn on_lobby_key(&mut self, code: KeyCode, now: Instant) {
        match code {
            KeyCode::Esc => self.go_home(),
            KeyCode::Char('c') | KeyCode::Char('C') => self.lobby_copy(now),
            KeyCode::Enter | KeyCode::Char('s') | KeyCode::Char('S') => self.lobby_start(),
            _ => {}
        }
    }

    fn on_game_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => self.go_home(),
            KeyCode::Char('t') | KeyCode::Char('T') => self.game_select(Category::Truth),
            KeyCode::Char('d') | KeyCode::Char('D') => self.game_select(Category::Dare),
            KeyCode::Enter | KeyCode::Char('c') | KeyCode::Char('C') => self.game_complete(),
            KeyCode::Char('p') | KeyCode::Char('P') => self.game_pass(),
            _ => {}
        }
    }

    /// Activate the focused home action: the name and create slots run
    /// room creation, the code and join slots run a join by code.
    fn home_submit(&mut self) {
        let Screen::Home(home) = &mut self.screen else {
            return;
        };
        if home.loading {
            return;
        }
        match home.focus {
            HomeFocus::Name | HomeFocus::Create => match home.validate_create() {
                Ok(name) => {
                    home.error = None;
                    home.loading = true;
                    home.pending = Some(HomeAction::Create);
                    self.dispatcher.create_and_join(self.generation, name);
                }
                Err(message) => home.error = Some(message),
            },
            HomeFocus::RoomCode | HomeFocus::Join => match home.validate_join() {
                Ok((room_id, name)) => {
                    home.error = None;
                    home.loading = true;
                    home.pending = Some(HomeAction::Join);
                    self.dispatcher.join(self.generation, room_id, name);
                }
                Err(message) => home.error = Some(message),
            },
        }
    }

    fn lobby_copy(&mut self, now: Instant) {
        let Screen::Lobby(lobby) = &mut self.screen else {
            return;
        };
        match clipboard::copy(&lobby.room_id) {
            Ok(()) => {
                lobby.copied.set(now, COPY_CONFIRMATION);
                lobby.notice = None;
            }
            Err(_) => {
                lobby.notice = Some(format!("Room code: {}", lobby.room_id));
            }
        }
    }

    fn lobby_start(&mut self) {
        let Screen::Lobby(lobby) = &mut self.screen else {
            return;
        };
        if !lobby.can_start() {
            lobby.notice = Some(format!(
                "Need at least {} players to start the game",
                MIN_PLAYERS
            ));
            return;
        }
        let room_id = lobby.room_id.clone();
        let player_name = lobby.player_name.clone();
        lobby.poll.cancel();
        self.go_game(room_id, player_name);
    }

    fn game_select(&mut self, category: Category) {
        let Screen::Game(game) = &mut self.screen else {
            return;
        };
        if game.busy || game.room.data().is_none() {
            return;
        }
        // Picking again before finishing just replaces the prompt;
        // no turn state is touched.
        game.error = None;
        self.dispatcher.fetch_prompt(self.generation, category);
    }

    fn game_complete(&mut self) {
        let Screen::Game(game) = &mut self.screen else {
            return;
        };
        if game.busy || !game.has_prompt() {
            return;
        }
        let award_to = game.current_player().map(|p| p.player_id.clone());
        game.prompt = None;
        game.busy = true;
        game.error = None;
        self.dispatcher
            .finish_turn(self.generation, game.room_id.clone(), award_to);
    }

    fn game_pass(&mut self) {
        let Screen::Game(game) = &mut self.screen else {
            return;
        };
        if game.busy || !game.has_prompt() {
            return;
        }
        game.prompt = None;
        game.busy = true;
        game.error = None;
        self.dispatcher
            .finish_turn(self.generation, game.room_id.clone(), None);
    }

    /// Drain worker events and fire due schedules; called every tick
    pub fn poll(&mut self, now: Instant) {
        while let Ok(envelope) = self.events.try_recv() {
            if envelope.generation == self.generation {
                self.apply(envelope.event, now);
            }
        }

        if let Screen::Lobby(lobby) = &mut self.screen {
            if lobby.poll.due(now) && !lobby.roster.is_loading() {
                lobby.roster.begin();
                self.dispatcher
                    .fetch_roster(self.generation, lobby.room_id.clone());
            }
        }
    }

    fn apply(&mut self, event: ApiEvent, now: Instant) {
        match event {
            ApiEvent::JoinCompleted {
                player_name,
                result,
            } => {
                let Screen::Home(home) = &mut self.screen else {
                    return;
                };
                home.loading = false;
                match result {
                    Ok(room_id) => {
                        home.pending = None;
                        self.go_lobby(now, room_id, player_name);
                    }
                    Err(err) => {
                        let fallback = home
                            .pending
                            .take()
                            .map(|action| action.failure_message())
                            .unwrap_or("Request failed");
                        home.error = Some(err.message_or(fallback));
                    }
                }
            }
            ApiEvent::Roster(result) => {
                if let Screen::Lobby(lobby) = &mut self.screen {
                    lobby.roster.resolve(now, result, "Failed to fetch players");
                    if lobby.can_start() {
                        // The "need more players" notice is moot now.
                        lobby.notice = None;
                    }
                }
            }
            ApiEvent::Snapshot(result) => {
                if let Screen::Game(game) = &mut self.screen {
                    game.room.resolve(now, result, "Failed to load the game");
                }
            }
            ApiEvent::Prompt(result) => {
                if let Screen::Game(game) = &mut self.screen {
                    match result {
                        Ok(prompt) => {
                            game.prompt = Some(prompt);
                            game.error = None;
                        }
                        Err(err) => {
                            game.error = Some(err.message_or("Failed to fetch a prompt"));
                        }
                    }
                }
            }
            ApiEvent::TurnFinished(result) => {
                if let Screen::Game(game) = &mut self.screen {
                    game.busy = false;
                    game.room.resolve(now, result, "Failed to finish the turn");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testserver::StubServer;
    use std::thread;
    use std::time::Duration;

    const EMPTY_ROSTER: &str = r#"{"players":[]}"#;
    const TWO_ROSTER: &str =
        r#"{"players":[{"playerId":"a","playerName":"Ada"},{"playerId":"b","playerName":"Grace"}]}"#;
    const ROOM_TURN_0: &str = r#"{"players":[{"playerId":"a","playerName":"Ada"},{"playerId":"b","playerName":"Grace"}],"currentTurn":0,"scores":{}}"#;
    const ROOM_TURN_1: &str = r#"{"players":[{"playerId":"a","playerName":"Ada"},{"playerId":"b","playerName":"Grace"}],"currentTurn":1,"scores":{"a":1}}"#;

    fn coordinator(server: &StubServer) -> AppCoordinator {
        AppCoordinator::new(ApiClient::new(server.base_url()).unwrap())
    }

    fn pump_until<F>(coordinator: &mut AppCoordinator, what: &str, done: F)
    where
        F: Fn(&AppCoordinator) -> bool,
    {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            coordinator.poll(Instant::now());
            if done(coordinator) {
                return;
            }
            thread::sleep(Duration::from_millis(10));
        }
        panic!("timed out waiting for: {}", what);
    }

    fn type_name(coordinator: &mut AppCoordinator, name: &str) {
        let now = Instant::now();
        for c in name.chars() {
            coordinator.on_key(KeyCode::Char(c), now);
        }
    }

    /// Drive a coordinator from home into the lobby via create+join
    fn enter_lobby(server: &StubServer) -> AppCoordinator {
        server.stub("POST /room", 200, r#"{"roomId":"ABC123"}"#);
        server.stub("POST /room/ABC123/join", 200, r#"{"ok":true}"#);

        let mut coordinator = coordinator(server);
        type_name(&mut coordinator, "Ada");
        coordinator.on_key(KeyCode::Enter, Instant::now());
        pump_until(&mut coordinator, "lobby screen", |c| {
            matches!(c.screen, Screen::Lobby(_))
        });
        coordinator
    }

    /// Drive a coordinator into the game screen with a loaded snapshot
    fn enter_game(server: &StubServer) -> AppCoordinator {
        server.stub("GET /room/ABC123/players", 200, TWO_ROSTER);
        server.stub("GET /room/ABC123", 200, ROOM_TURN_0);

        let mut coordinator = enter_lobby(server);
        pump_until(&mut coordinator, "full roster", |c| match &c.screen {
            Screen::Lobby(lobby) => lobby.can_start(),
            _ => false,
        });
        coordinator.on_key(KeyCode::Enter, Instant::now());
        pump_until(&mut coordinator, "loaded snapshot", |c| match &c.screen {
            Screen::Game(game) => game.room.data().is_some(),
            _ => false,
        });
        coordinator
    }

    #[test]
    fn test_create_and_join_lands_in_lobby_with_code_and_name() {
        let server = StubServer::start();
        let coordinator = enter_lobby(&server);

        match &coordinator.screen {
            Screen::Lobby(lobby) => {
                assert_eq!(lobby.room_id, "ABC123");
                assert_eq!(lobby.player_name, "Ada");
                assert!(lobby.poll.is_active(), "roster poll runs in the lobby");
            }
            _ => panic!("expected lobby screen"),
        }
        assert_eq!(server.requests()[..2], ["POST /room", "POST /room/ABC123/join"]);
    }

    #[test]
    fn test_empty_name_issues_no_request() {
        let server = StubServer::start();
        let mut coordinator = coordinator(&server);

        type_name(&mut coordinator, "   ");
        coordinator.on_key(KeyCode::Enter, Instant::now());
        thread::sleep(Duration::from_millis(50));
        coordinator.poll(Instant::now());

        match &coordinator.screen {
            Screen::Home(home) => {
                assert!(home.error.is_some());
                assert!(!home.loading);
            }
            _ => panic!("expected home screen"),
        }
        assert_eq!(server.request_count(), 0);
    }

    #[test]
    fn test_join_failure_shows_backend_message_and_stays_home() {
        let server = StubServer::start();
        server.stub("POST /room/NOPE/join", 404, r#"{"error":"Room not found"}"#);

        let mut coordinator = coordinator(&server);
        type_name(&mut coordinator, "Ada");
        // Move focus to the room code field and type the code.
        coordinator.on_key(KeyCode::Tab, Instant::now());
        coordinator.on_key(KeyCode::Tab, Instant::now());
        type_name(&mut coordinator, "NOPE");
        coordinator.on_key(KeyCode::Enter, Instant::now());

        pump_until(&mut coordinator, "join error", |c| match &c.screen {
            Screen::Home(home) => home.error.is_some(),
            _ => false,
        });
        match &coordinator.screen {
            Screen::Home(home) => {
                assert_eq!(home.error.as_deref(), Some("Room not found"));
                assert!(!home.loading, "actions re-enabled after failure");
            }
            _ => panic!("join failure must not navigate"),
        }
    }

    #[test]
    fn test_lobby_roster_updates_across_polls() {
        let server = StubServer::start();
        server.enqueue("GET /room/ABC123/players", 200, EMPTY_ROSTER);
        server.stub("GET /room/ABC123/players", 200, TWO_ROSTER);

        let mut coordinator = enter_lobby(&server);
        pump_until(&mut coordinator, "first roster", |c| match &c.screen {
            Screen::Lobby(lobby) => lobby.roster.data().is_some(),
            _ => false,
        });
        match &coordinator.screen {
            Screen::Lobby(lobby) => {
                assert_eq!(lobby.player_count(), 0);
                assert!(!lobby.can_start());
            }
            _ => panic!("expected lobby screen"),
        }

        // Fire the next scheduled tick without waiting out the interval.
        if let Screen::Lobby(lobby) = &mut coordinator.screen {
            lobby.poll.start(Instant::now());
        }
        pump_until(&mut coordinator, "second roster", |c| match &c.screen {
            Screen::Lobby(lobby) => lobby.player_count() == 2,
            _ => false,
        });
        match &coordinator.screen {
            Screen::Lobby(lobby) => assert!(lobby.can_start()),
            _ => panic!("expected lobby screen"),
        }
    }

    #[test]
    fn test_start_below_threshold_notices_instead_of_navigating() {
        let server = StubServer::start();
        server.stub("GET /room/ABC123/players", 200, EMPTY_ROSTER);

        let mut coordinator = enter_lobby(&server);
        coordinator.on_key(KeyCode::Enter, Instant::now());

        match &coordinator.screen {
            Screen::Lobby(lobby) => assert!(lobby.notice.is_some()),
            _ => panic!("start below threshold must not navigate"),
        }
    }

    #[test]
    fn test_leaving_lobby_cancels_poll_and_discards_responses() {
        let server = StubServer::start();
        server.stub("GET /room/ABC123/players", 200, TWO_ROSTER);

        let mut coordinator = enter_lobby(&server);
        coordinator.poll(Instant::now()); // dispatch the first roster fetch
        coordinator.on_key(KeyCode::Esc, Instant::now());

        // The in-flight roster response lands after navigation and is dropped.
        thread::sleep(Duration::from_millis(100));
        coordinator.poll(Instant::now());
        match &coordinator.screen {
            Screen::Home(home) => assert!(home.error.is_none()),
            _ => panic!("expected home screen"),
        }

        // No further polls fire after teardown.
        let before = server.request_count();
        coordinator.poll(Instant::now() + Duration::from_secs(30));
        thread::sleep(Duration::from_millis(100));
        assert_eq!(server.request_count(), before);
    }

    #[test]
    fn test_game_derives_current_player_and_follows_turns() {
        let server = StubServer::start();
        server.stub("GET /prompts?type=truth", 200, r#"{"prompt":"Spill it"}"#);
        server.stub("POST /room/ABC123/score", 200, r#"{"ok":true}"#);
        server.stub("POST /room/ABC123/next", 200, r#"{"ok":true}"#);

        let mut coordinator = enter_game(&server);
        match &coordinator.screen {
            Screen::Game(game) => {
                assert_eq!(game.current_player().unwrap().player_name, "Ada");
            }
            _ => panic!("expected game screen"),
        }

        // After the refresh reports currentTurn 1, Grace holds the turn.
        server.stub("GET /room/ABC123", 200, ROOM_TURN_1);
        coordinator.on_key(KeyCode::Char('t'), Instant::now());
        pump_until(&mut coordinator, "prompt", |c| match &c.screen {
            Screen::Game(game) => game.has_prompt(),
            _ => false,
        });
        coordinator.on_key(KeyCode::Enter, Instant::now());
        pump_until(&mut coordinator, "turn advanced", |c| match &c.screen {
            Screen::Game(game) => !game.busy && game.current_player().is_some_and(|p| p.player_name == "Grace"),
            _ => false,
        });
        match &coordinator.screen {
            Screen::Game(game) => {
                assert!(game.prompt.is_none(), "prompt cleared after completing");
                assert_eq!(game.room.data().unwrap().score_for("a"), 1);
            }
            _ => panic!("expected game screen"),
        }
    }

    #[test]
    fn test_complete_scores_before_advancing() {
        let server = StubServer::start();
        server.stub("GET /prompts?type=dare", 200, r#"{"prompt":"Sing"}"#);
        server.stub("POST /room/ABC123/score", 200, r#"{"ok":true}"#);
        server.stub("POST /room/ABC123/next", 200, r#"{"ok":true}"#);

        let mut coordinator = enter_game(&server);
        let mark = server.request_count();

        coordinator.on_key(KeyCode::Char('d'), Instant::now());
        pump_until(&mut coordinator, "prompt", |c| match &c.screen {
            Screen::Game(game) => game.has_prompt(),
            _ => false,
        });
        coordinator.on_key(KeyCode::Char('c'), Instant::now());
        pump_until(&mut coordinator, "turn finished", |c| match &c.screen {
            Screen::Game(game) => !game.busy,
            _ => false,
        });

        let tail = &server.requests()[mark..];
        assert_eq!(
            tail,
            [
                "GET /prompts?type=dare",
                "POST /room/ABC123/score",
                "POST /room/ABC123/next",
                "GET /room/ABC123"
            ]
        );
    }

    #[test]
    fn test_pass_advances_without_scoring() {
        let server = StubServer::start();
        server.stub("GET /prompts?type=truth", 200, r#"{"prompt":"Spill it"}"#);
        server.stub("POST /room/ABC123/next", 200, r#"{"ok":true}"#);

        let mut coordinator = enter_game(&server);
        let mark = server.request_count();

        coordinator.on_key(KeyCode::Char('t'), Instant::now());
        pump_until(&mut coordinator, "prompt", |c| match &c.screen {
            Screen::Game(game) => game.has_prompt(),
            _ => false,
        });
        coordinator.on_key(KeyCode::Char('p'), Instant::now());
        pump_until(&mut coordinator, "turn finished", |c| match &c.screen {
            Screen::Game(game) => !game.busy && game.prompt.is_none(),
            _ => false,
        });

        let tail = &server.requests()[mark..];
        assert_eq!(
            tail,
            [
                "GET /prompts?type=truth",
                "POST /room/ABC123/next",
                "GET /room/ABC123"
            ]
        );
    }

    #[test]
    fn test_reselecting_category_replaces_prompt_without_advancing() {
        let server = StubServer::start();
        server.stub("GET /prompts?type=truth", 200, r#"{"prompt":"First"}"#);
        server.stub("GET /prompts?type=dare", 200, r#"{"prompt":"Second"}"#);

        let mut coordinator = enter_game(&server);

        coordinator.on_key(KeyCode::Char('t'), Instant::now());
        pump_until(&mut coordinator, "first prompt", |c| match &c.screen {
            Screen::Game(game) => game.prompt.as_deref() == Some("First"),
            _ => false,
        });
        coordinator.on_key(KeyCode::Char('d'), Instant::now());
        pump_until(&mut coordinator, "second prompt", |c| match &c.screen {
            Screen::Game(game) => game.prompt.as_deref() == Some("Second"),
            _ => false,
        });

        let advances = server
            .requests()
            .iter()
            .filter(|r| r.contains("/next"))
            .count();
        assert_eq!(advances, 0, "reselecting never advances the turn");
    }

    #[test]
    fn test_complete_requires_a_prompt() {
        let server = StubServer::start();
        let mut coordinator = enter_game(&server);
        let mark = server.request_count();

        coordinator.on_key(KeyCode::Char('c'), Instant::now());
        thread::sleep(Duration::from_millis(50));
        coordinator.poll(Instant::now());

        assert_eq!(server.request_count(), mark, "no prompt, no turn actions");
    }

    #[test]
    fn test_copy_sets_confirmation_without_backend_calls() {
        let server = StubServer::start();
        let mut coordinator = enter_lobby(&server);
        let mark = server.request_count();

        let now = Instant::now();
        coordinator.on_key(KeyCode::Char('c'), now);
        match &coordinator.screen {
            Screen::Lobby(lobby) => {
                assert!(
                    lobby.copied.is_active(now) || lobby.notice.is_some(),
                    "either the confirmation or the fallback notice shows"
                );
            }
            _ => panic!("expected lobby screen"),
        }
        assert_eq!(server.request_count(), mark);
    }
}
