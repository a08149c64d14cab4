//! Error types for pkb-core

use thiserror::Error;

/// Result type alias using pkb-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in pkb-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Local precondition failure; no network call was made
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Credentials rejected by the server, or no session token present
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Any other non-2xx response
    #[error("Request failed: {message}")]
    Request {
        /// HTTP status code returned by the server
        status: u16,
        /// Server-provided or synthesized message
        message: String,
    },

    /// Transport failure (connection refused, timeout, TLS)
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Token persistence error
    #[error("Secure storage error: {0}")]
    Storage(String),

    /// Invalid client configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Whether this failure came from a local check rather than the network.
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Whether a failed authenticated call should start session recovery.
    pub const fn is_session_failure(&self) -> bool {
        matches!(
            self,
            Self::Auth(_) | Self::Request { .. } | Self::Transport(_)
        )
    }

    /// HTTP status attached to the failure, when the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Request { status, .. } => Some(*status),
            Self::Transport(error) => error.status().map(|status| status.as_u16()),
            _ => None,
        }
    }
}
