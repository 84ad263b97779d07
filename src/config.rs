//! Client configuration
//!
//! The backend origin comes from a single environment variable so that
//! every screen talks to the same server.

use std::env;

/// Environment variable naming the backend origin
pub const SERVER_URL_VAR: &str = "DARE_SERVER_URL";

/// Backend origin used when the environment does not name one
pub const DEFAULT_SERVER_URL: &str = "http://localhost:3000";

/// Runtime configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the room backend, without a trailing slash
    pub server_url: String,
}

impl Config {
    /// Load configuration from the environment
    pub fn from_env() -> Self {
        let raw = env::var(SERVER_URL_VAR).unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string());
        Self::with_server_url(raw)
    }

    /// Build a configuration for the given backend origin
    pub fn with_server_url(url: impl Into<String>) -> Self {
        let mut server_url = url.into();
        while server_url.ends_with('/') {
            server_url.pop();
        }
        Self { server_url }
    }
}
