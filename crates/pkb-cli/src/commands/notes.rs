use pkb_core::api::Transport;
use pkb_core::config::ClientConfig;
use pkb_core::router::Screen;
use pkb_core::session::TokenPersistence;
use pkb_core::{App, Modal, Note, UiAction};

use crate::auth::open_app;
use crate::commands::common::{
    confirm, dispatch, drive_recovery, format_note_lines, note_to_list_item, read_piped_stdin,
    NoteListItem, RecoveryOutcome,
};
use crate::error::CliError;

pub async fn run_create(
    config: &ClientConfig,
    title: String,
    content: Option<String>,
    tags: String,
) -> Result<(), CliError> {
    let content = match content {
        Some(content) => content,
        None => read_piped_stdin()?.unwrap_or_default(),
    };

    let mut app = open_app(config)?;
    let note = create_with(&mut app, title, content, tags).await?;
    println!("Created note #{} ({})", note.id, note.tags.join(", "));
    Ok(())
}

/// Fill the create form and submit it. Tags go through the composite tag
/// field, so one call can carry several of them.
pub async fn create_with<T: Transport, P: TokenPersistence>(
    app: &mut App<T, P>,
    title: String,
    content: String,
    tags: String,
) -> Result<Note, CliError> {
    ensure_signed_in(app)?;

    app.dispatch(UiAction::SetTitle(title)).await;
    app.dispatch(UiAction::SetContent(content)).await;
    app.dispatch(UiAction::SetTags(tags)).await;
    dispatch(app, UiAction::NoteSubmit).await;

    let view = app.view();
    if let Some(message) = view.note_error {
        return Err(CliError::Rejected(message));
    }
    view.last_created
        .ok_or_else(|| CliError::Rejected("Note was not created".to_string()))
}

pub async fn run_list(config: &ClientConfig, json: bool) -> Result<(), CliError> {
    let mut app = open_app(config)?;
    let notes = fetch_notes(&mut app, confirm).await?;

    if json {
        let items: Vec<NoteListItem> = notes.iter().map(note_to_list_item).collect();
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else if notes.is_empty() {
        println!("No notes found");
    } else {
        for line in format_note_lines(&notes) {
            println!("{line}");
        }
    }
    Ok(())
}

/// Open the list tab and return its notes, offering one session retry if
/// the fetch fails.
pub async fn fetch_notes<T: Transport, P: TokenPersistence>(
    app: &mut App<T, P>,
    confirm: impl FnMut(&str) -> Result<bool, CliError>,
) -> Result<Vec<Note>, CliError> {
    ensure_signed_in(app)?;
    dispatch(app, UiAction::NavList).await;

    match drive_recovery(app, confirm).await? {
        RecoveryOutcome::NotNeeded => {}
        RecoveryOutcome::Restored => {
            dispatch(app, UiAction::NavList).await;
        }
        RecoveryOutcome::Expired => return Err(CliError::SessionExpired),
        RecoveryOutcome::Declined(message) | RecoveryOutcome::Unresolved(message) => {
            return Err(CliError::Rejected(message));
        }
    }

    let view = app.view();
    if let Some(Modal::SessionError { message }) = view.modal {
        return Err(CliError::Rejected(message));
    }
    if let Some(message) = view.list_error {
        return Err(CliError::Rejected(message));
    }
    Ok(view.notes.unwrap_or_default())
}

fn ensure_signed_in<T: Transport, P: TokenPersistence>(app: &App<T, P>) -> Result<(), CliError> {
    if app.view().screen == Screen::Notes {
        Ok(())
    } else {
        Err(CliError::NotSignedIn)
    }
}
