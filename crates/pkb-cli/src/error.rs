use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] pkb_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Authentication error: {0}")]
    Auth(String),
    #[error("{0}")]
    Rejected(String),
    #[error("Not signed in. Run `pkb login` first.")]
    NotSignedIn,
    #[error("Session expired. Run `pkb login` to sign in again.")]
    SessionExpired,
}
