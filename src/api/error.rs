//! API error taxonomy
//!
//! Every failure is terminal for the user action that triggered it; the
//! client never retries on its own.

use thiserror::Error;

/// Errors from talking to the room backend
#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-success status with an `{ "error": … }` payload
    #[error("{0}")]
    Backend(String),

    /// Non-success status without a usable error payload
    #[error("server returned status {0}")]
    Status(u16),

    /// Connection, DNS, or timeout failure
    #[error("request failed: {0}")]
    Transport(String),

    /// Success status but the body did not parse
    #[error("invalid response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Message to show the user: the backend's own message when it sent
    /// one, otherwise the caller's generic text for this action.
    pub fn message_or(&self, fallback: &str) -> String {
        match self {
            ApiError::Backend(message) => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Transport(e.to_string())
        }
    }
}
