//! pkb-core - Core library for pkb
//!
//! This crate contains the session lifecycle and view-state coordinator for the
//! notes service client: the session store, the REST API client, the view
//! router, the notes freshness flag, the tag editor, and the session recovery
//! flow. Interfaces (the CLI, an interactive shell) render the [`ViewModel`]
//! produced by [`App`] and feed it [`UiAction`]s.

pub mod api;
pub mod app;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod recovery;
pub mod router;
pub mod session;
pub mod tags;

pub use app::{App, Modal, UiAction, ViewModel};
pub use error::{Error, Result};
pub use models::{Note, NoteId};
