//! Wire types for the room backend
//!
//! The backend speaks camelCase JSON; everything here is a transient,
//! non-authoritative copy of server-owned state.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Opaque ID types for clarity at call sites
pub type RoomId = String;
pub type PlayerId = String;

/// A player as reported by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub player_id: PlayerId,
    pub player_name: String,
}

/// Shared room state: roster, whose turn it is, and the score table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSnapshot {
    pub players: Vec<Player>,
    pub current_turn: usize,
    #[serde(default)]
    pub scores: HashMap<PlayerId, u32>,
}

impl RoomSnapshot {
    /// The player whose turn it is, derived from the turn index.
    ///
    /// Returns `None` when the index does not point into the roster
    /// (empty room, or a stale index from the backend).
    pub fn current_player(&self) -> Option<&Player> {
        self.players.get(self.current_turn)
    }

    /// Score for a player, zero when the backend has no entry yet
    pub fn score_for(&self, player_id: &str) -> u32 {
        self.scores.get(player_id).copied().unwrap_or(0)
    }
}

/// Challenge category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Truth,
    Dare,
}

impl Category {
    /// Value used in the `?type=` query and the turn-advance body
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Truth => "truth",
            Category::Dare => "dare",
        }
    }

    /// Display label for the UI
    pub fn label(&self) -> &'static str {
        match self {
            Category::Truth => "TRUTH",
            Category::Dare => "DARE",
        }
    }
}

/// Category sent with every turn advance
pub const TURN_ADVANCE_CATEGORY: Category = Category::Truth;

/// Points awarded for a completed challenge
pub const COMPLETION_POINTS: u32 = 1;

/// Response body of `POST /room`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomResponse {
    pub room_id: RoomId,
}

/// Response body of `GET /room/{roomId}/players`
#[derive(Debug, Clone, Deserialize)]
pub struct PlayersResponse {
    pub players: Vec<Player>,
}

/// Response body of `GET /prompts?type=`
#[derive(Debug, Clone, Deserialize)]
pub struct PromptResponse {
    pub prompt: String,
}

/// Error payload the backend attaches to non-success statuses
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Request body of `POST /room/{roomId}/join`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRequest {
    pub player_name: String,
}

/// Request body of `POST /room/{roomId}/next`
#[derive(Debug, Clone, Serialize)]
pub struct AdvanceRequest {
    #[serde(rename = "type")]
    pub category: Category,
}

/// Request body of `POST /room/{roomId}/score`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRequest {
    pub player_id: PlayerId,
    pub points: u32,
}
