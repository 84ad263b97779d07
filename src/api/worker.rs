//! Background request workers
//!
//! Each user action spawns one worker thread that runs its request chain
//! sequentially and reports a single completion event back over an mpsc
//! channel. The UI thread drains the channel on every tick.
//!
//! Envelopes carry the generation they were dispatched under; the
//! coordinator bumps its generation on navigation, so a response that
//! lands after the screen is gone is simply dropped.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;

use super::client::ApiClient;
use super::error::ApiError;
use super::types::{
    Category, Player, PlayerId, RoomId, RoomSnapshot, COMPLETION_POINTS, TURN_ADVANCE_CATEGORY,
};

/// Completion of a dispatched request chain
#[derive(Debug)]
pub enum ApiEvent {
    /// Room joined (created first when needed); carries the room code
    /// and the name joined under, so navigation can take both forward
    JoinCompleted {
        player_name: String,
        result: Result<RoomId, ApiError>,
    },
    /// Lobby roster fetch finished
    Roster(Result<Vec<Player>, ApiError>),
    /// Room snapshot fetch finished
    Snapshot(Result<RoomSnapshot, ApiError>),
    /// Prompt fetch finished
    Prompt(Result<String, ApiError>),
    /// Score/advance/refresh chain finished; carries the fresh snapshot
    TurnFinished(Result<RoomSnapshot, ApiError>),
}

/// An event tagged with the screen generation that requested it
#[derive(Debug)]
pub struct Envelope {
    pub generation: u64,
    pub event: ApiEvent,
}

/// Dispatches request chains onto worker threads
pub struct Dispatcher {
    client: Arc<ApiClient>,
    tx: Sender<Envelope>,
}

impl Dispatcher {
    /// Create a dispatcher and the receiver the UI thread drains
    pub fn new(client: ApiClient) -> (Self, Receiver<Envelope>) {
        let (tx, rx) = mpsc::channel();
        (
            Self {
                client: Arc::new(client),
                tx,
            },
            rx,
        )
    }

    fn spawn<F>(&self, generation: u64, job: F)
    where
        F: FnOnce(&ApiClient) -> ApiEvent + Send + 'static,
    {
        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        thread::spawn(move || {
            let event = job(&client);
            // The receiver may be gone if the app quit; nothing to do.
            let _ = tx.send(Envelope { generation, event });
        });
    }

    /// Create a room, then join it under the given name
    pub fn create_and_join(&self, generation: u64, player_name: String) {
        self.spawn(generation, move |client| {
            let result = client.create_room().and_then(|room_id| {
                client.join_room(&room_id, &player_name)?;
                Ok(room_id)
            });
            ApiEvent::JoinCompleted {
                player_name,
                result,
            }
        });
    }

    /// Join an existing room by code
    pub fn join(&self, generation: u64, room_id: RoomId, player_name: String) {
        self.spawn(generation, move |client| {
            let result = client.join_room(&room_id, &player_name).map(|_| room_id);
            ApiEvent::JoinCompleted {
                player_name,
                result,
            }
        });
    }

    /// Fetch the lobby roster
    pub fn fetch_roster(&self, generation: u64, room_id: RoomId) {
        self.spawn(generation, move |client| {
            ApiEvent::Roster(client.players(&room_id))
        });
    }

    /// Fetch the room snapshot
    pub fn fetch_snapshot(&self, generation: u64, room_id: RoomId) {
        self.spawn(generation, move |client| {
            ApiEvent::Snapshot(client.room_state(&room_id))
        });
    }

    /// Fetch a prompt for the chosen category
    pub fn fetch_prompt(&self, generation: u64, category: Category) {
        self.spawn(generation, move |client| {
            ApiEvent::Prompt(client.prompt(category))
        });
    }

    /// Finish the current turn: award a point when completing, then
    /// advance the turn, then refresh the snapshot. Each step waits for
    /// the previous one; the score request always precedes the advance.
    pub fn finish_turn(&self, generation: u64, room_id: RoomId, award_to: Option<PlayerId>) {
        self.spawn(generation, move |client| {
            let result = (|| {
                if let Some(player_id) = &award_to {
                    client.award_points(&room_id, player_id, COMPLETION_POINTS)?;
                }
                client.advance_turn(&room_id, TURN_ADVANCE_CATEGORY)?;
                client.room_state(&room_id)
            })();
            ApiEvent::TurnFinished(result)
        });
    }
}
