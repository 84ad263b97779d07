//! Blocking HTTP client for the room backend
//!
//! One method per endpoint. Runs on worker threads, never on the UI
//! thread, so blocking I/O here never freezes rendering.

use reqwest::blocking::{Client, Response};
use std::time::Duration;

use super::error::ApiError;
use super::types::{
    AdvanceRequest, Category, CreateRoomResponse, ErrorResponse, JoinRequest, Player,
    PlayersResponse, PromptResponse, RoomId, RoomSnapshot, ScoreRequest,
};

/// Per-request timeout; a hung backend should fail the action, not the UI
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the room backend REST surface
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the given backend origin
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ApiError::Transport(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Map a non-success status into `Backend` (when the server sent an
    /// error payload) or `Status` (when it did not).
    fn check(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        match response.text().ok().and_then(|body| {
            serde_json::from_str::<ErrorResponse>(&body).ok()
        }) {
            Some(payload) => Err(ApiError::Backend(payload.error)),
            None => Err(ApiError::Status(status.as_u16())),
        }
    }

    /// `POST /room`: create a new room, returning its code
    pub fn create_room(&self) -> Result<RoomId, ApiError> {
        let response = Self::check(self.http.post(self.url("/room")).send()?)?;
        let body: CreateRoomResponse = response
            .json()
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        Ok(body.room_id)
    }

    /// `POST /room/{roomId}/join`: join a room under a display name
    pub fn join_room(&self, room_id: &str, player_name: &str) -> Result<(), ApiError> {
        let body = JoinRequest {
            player_name: player_name.to_string(),
        };
        Self::check(
            self.http
                .post(self.url(&format!("/room/{}/join", room_id)))
                .json(&body)
                .send()?,
        )?;
        Ok(())
    }

    /// `GET /room/{roomId}/players`: the current roster
    pub fn players(&self, room_id: &str) -> Result<Vec<Player>, ApiError> {
        let response = Self::check(
            self.http
                .get(self.url(&format!("/room/{}/players", room_id)))
                .send()?,
        )?;
        let body: PlayersResponse = response
            .json()
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        Ok(body.players)
    }

    /// `GET /room/{roomId}`: roster, turn index, and score table
    pub fn room_state(&self, room_id: &str) -> Result<RoomSnapshot, ApiError> {
        let response = Self::check(
            self.http
                .get(self.url(&format!("/room/{}", room_id)))
                .send()?,
        )?;
        response.json().map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// `GET /prompts?type=`: fetch a challenge for the category
    pub fn prompt(&self, category: Category) -> Result<String, ApiError> {
        let response = Self::check(
            self.http
                .get(self.url("/prompts"))
                .query(&[("type", category.as_str())])
                .send()?,
        )?;
        let body: PromptResponse = response
            .json()
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        Ok(body.prompt)
    }

    /// `POST /room/{roomId}/next`: advance the turn
    pub fn advance_turn(&self, room_id: &str, category: Category) -> Result<(), ApiError> {
        let body = AdvanceRequest { category };
        Self::check(
            self.http
                .post(self.url(&format!("/room/{}/next", room_id)))
                .json(&body)
                .send()?,
        )?;
        Ok(())
    }

    /// `POST /room/{roomId}/score`: award points to a player
    pub fn award_points(
        &self,
        room_id: &str,
        player_id: &str,
        points: u32,
    ) -> Result<(), ApiError> {
        let body = ScoreRequest {
            player_id: player_id.to_string(),
            points,
        };
        Self::check(
            self.http
                .post(self.url(&format!("/room/{}/score", room_id)))
                .json(&body)
                .send()?,
        )?;
        Ok(())
    }
}
