//! Per-screen view state
//!
//! Each screen owns its own local copy of fetched state exclusively;
//! there is no shared store across screens. Navigation passes the room
//! code and player name forward explicitly.

use std::time::Duration;

use crate::api::{Player, RoomId, RoomSnapshot};

use super::remote::{PollTask, Remote, Transient};

/// Minimum number of players to start a game
pub const MIN_PLAYERS: usize = 2;

/// How often the lobby refreshes its roster
pub const LOBBY_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// How long the "Copied!" confirmation stays up
pub const COPY_CONFIRMATION: Duration = Duration::from_secs(2);

/// Longest accepted display name
pub const MAX_NAME_LEN: usize = 24;

/// Longest accepted room code
pub const MAX_CODE_LEN: usize = 16;

/// Focus order on the landing screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeFocus {
    Name,
    Create,
    RoomCode,
    Join,
}

impl HomeFocus {
    pub fn next(self) -> Self {
        match self {
            HomeFocus::Name => HomeFocus::Create,
            HomeFocus::Create => HomeFocus::RoomCode,
            HomeFocus::RoomCode => HomeFocus::Join,
            HomeFocus::Join => HomeFocus::Name,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            HomeFocus::Name => HomeFocus::Join,
            HomeFocus::Create => HomeFocus::Name,
            HomeFocus::RoomCode => HomeFocus::Create,
            HomeFocus::Join => HomeFocus::RoomCode,
        }
    }
}

/// Which landing action a worker is running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeAction {
    Create,
    Join,
}

impl HomeAction {
    /// Generic failure text when the backend sent no message of its own
    pub fn failure_message(&self) -> &'static str {
        match self {
            HomeAction::Create => "Failed to create room. Please try again.",
            HomeAction::Join => "Failed to join room. Please check the room code.",
        }
    }
}

/// Landing screen: collect a name, create or join a room
pub struct HomeState {
    pub name_input: String,
    pub code_input: String,
    pub focus: HomeFocus,
    pub error: Option<String>,
    /// True while a create/join chain is in flight; both actions are
    /// disabled to prevent duplicate submissions.
    pub loading: bool,
    pub pending: Option<HomeAction>,
}

impl Default for HomeState {
    fn default() -> Self {
        Self::new()
    }
}

impl HomeState {
    pub fn new() -> Self {
        Self {
            name_input: String::new(),
            code_input: String::new(),
            focus: HomeFocus::Name,
            error: None,
            loading: false,
            pending: None,
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    /// Route a typed character to the focused input
    pub fn on_char(&mut self, c: char) {
        if c.is_control() {
            return;
        }
        match self.focus {
            HomeFocus::Name if self.name_input.len() < MAX_NAME_LEN => {
                self.name_input.push(c);
            }
            HomeFocus::RoomCode if self.code_input.len() < MAX_CODE_LEN => {
                self.code_input.push(c);
            }
            _ => {}
        }
    }

    pub fn on_backspace(&mut self) {
        match self.focus {
            HomeFocus::Name => {
                self.name_input.pop();
            }
            HomeFocus::RoomCode => {
                self.code_input.pop();
            }
            _ => {}
        }
    }

    /// Validate inputs for room creation; returns the trimmed name
    pub fn validate_create(&self) -> Result<String, String> {
        let name = self.name_input.trim();
        if name.is_empty() {
            return Err("Please enter your name to continue".to_string());
        }
        Ok(name.to_string())
    }

    /// Validate inputs for joining; returns (room code, trimmed name)
    pub fn validate_join(&self) -> Result<(String, String), String> {
        let name = self.validate_create()?;
        let code = self.code_input.trim();
        if code.is_empty() {
            return Err("Please enter a room code to join".to_string());
        }
        Ok((code.to_string(), name))
    }
}

/// Lobby screen: poll the roster, share the code, start when ready
pub struct LobbyState {
    pub room_id: RoomId,
    pub player_name: String,
    pub roster: Remote<Vec<Player>>,
    pub poll: PollTask,
    pub copied: Transient,
    pub notice: Option<String>,
}

impl LobbyState {
    pub fn new(room_id: RoomId, player_name: String) -> Self {
        Self {
            room_id,
            player_name,
            roster: Remote::new(),
            poll: PollTask::new(LOBBY_POLL_INTERVAL),
            copied: Transient::new(),
            notice: None,
        }
    }

    pub fn players(&self) -> &[Player] {
        self.roster.data().map(Vec::as_slice).unwrap_or_default()
    }

    pub fn player_count(&self) -> usize {
        self.players().len()
    }

    pub fn can_start(&self) -> bool {
        self.player_count() >= MIN_PLAYERS
    }
}

/// Game screen: mirror the room snapshot, show prompts, drive turns
pub struct GameState {
    pub room_id: RoomId,
    pub player_name: String,
    pub room: Remote<RoomSnapshot>,
    /// The displayed challenge, if one has been picked this turn
    pub prompt: Option<String>,
    /// True while a finish-turn chain is in flight
    pub busy: bool,
    /// Error from the last prompt fetch or turn action
    pub error: Option<String>,
}

impl GameState {
    pub fn new(room_id: RoomId, player_name: String) -> Self {
        Self {
            room_id,
            player_name,
            room: Remote::new(),
            prompt: None,
            busy: false,
            error: None,
        }
    }

    /// The player whose turn it is, re-derived from the latest snapshot
    pub fn current_player(&self) -> Option<&Player> {
        self.room.data().and_then(RoomSnapshot::current_player)
    }

    pub fn has_prompt(&self) -> bool {
        self.prompt.is_some()
    }
}
