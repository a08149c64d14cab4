use std::io::{self, BufRead, IsTerminal, Read, Write};

use pkb_core::api::Transport;
use pkb_core::app::Control;
use pkb_core::router::{NotesTab, Screen};
use pkb_core::session::TokenPersistence;
use pkb_core::{App, Modal, Note, UiAction, ViewModel};
use serde::Serialize;

use crate::error::CliError;

#[derive(Debug, Serialize)]
pub struct NoteListItem {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub created_at: Option<String>,
}

/// How a session error was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoveryOutcome {
    /// No session error was showing.
    NotNeeded,
    /// Refresh succeeded and the client reloaded.
    Restored,
    /// Refresh failed; the stored session was cleared.
    Expired,
    /// The user chose not to retry.
    Declined(String),
    /// The retry could not reach a verdict; the session was kept.
    Unresolved(String),
}

pub const fn busy_label(control: Control) -> &'static str {
    match control {
        Control::Login => "Signing in...",
        Control::Register => "Creating account...",
        Control::CreateNote => "Saving note...",
        Control::ListNotes => "Loading notes...",
        Control::Retry => "Refreshing session...",
    }
}

/// Dispatch an action, showing the loading label of its control on stderr
/// while the call runs.
pub async fn dispatch<T: Transport, P: TokenPersistence>(
    app: &mut App<T, P>,
    action: UiAction,
) -> bool {
    if let Some(control) = action.control() {
        if io::stderr().is_terminal() {
            eprintln!("{}", busy_label(control));
        }
    }
    app.dispatch(action).await
}

/// Walk the session error and expiry modals.
pub async fn drive_recovery<T: Transport, P: TokenPersistence>(
    app: &mut App<T, P>,
    mut confirm: impl FnMut(&str) -> Result<bool, CliError>,
) -> Result<RecoveryOutcome, CliError> {
    let Some(Modal::SessionError { message }) = app.view().modal else {
        return Ok(RecoveryOutcome::NotNeeded);
    };

    if !confirm(&format!("Session error: {message}. Retry? [Y/n] "))? {
        return Ok(RecoveryOutcome::Declined(message));
    }
    dispatch(app, UiAction::ReloadRetry).await;

    match app.view().modal {
        Some(Modal::SessionExpired) => {
            app.dispatch(UiAction::ExpiredAcknowledge).await;
            Ok(RecoveryOutcome::Expired)
        }
        Some(Modal::SessionError { message }) => Ok(RecoveryOutcome::Unresolved(message)),
        _ => Ok(RecoveryOutcome::Restored),
    }
}

/// Ask a yes/no question on the terminal. Non-interactive input answers no.
pub fn confirm(question: &str) -> Result<bool, CliError> {
    let stdin = io::stdin();
    if !stdin.is_terminal() {
        return Ok(false);
    }

    eprint!("{question}");
    io::stderr().flush()?;
    let mut answer = String::new();
    stdin.lock().read_line(&mut answer)?;
    Ok(parse_confirmation(&answer))
}

/// Empty input accepts the default (yes).
pub fn parse_confirmation(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "" | "y" | "yes")
}

pub fn read_piped_stdin() -> Result<Option<String>, CliError> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }

    let mut buffer = String::new();
    stdin.lock().read_to_string(&mut buffer)?;
    Ok(normalize_content(&buffer))
}

pub fn normalize_content(content: &str) -> Option<String> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn note_to_list_item(note: &Note) -> NoteListItem {
    NoteListItem {
        id: note.id.0,
        title: note.title.clone(),
        content: note.content.clone(),
        tags: note.tags.clone(),
        created_at: note.created_at.clone(),
    }
}

pub fn format_note_lines(notes: &[Note]) -> Vec<String> {
    notes
        .iter()
        .map(|note| {
            let title = note_preview(&note.title, 30);
            let preview = note_preview(&note.content, 40);
            let tags = render_tags(note);
            let created = note.created_at_label();
            format!(
                "{:>5}  {title:<30}  {preview:<40}  {created:<16}  {tags}",
                note.id.to_string()
            )
            .trim_end()
            .to_string()
        })
        .collect()
}

pub fn note_preview(text: &str, max_chars: usize) -> String {
    let first_line = text.lines().next().unwrap_or("").trim();
    let collapsed = first_line.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.chars().count() <= max_chars {
        collapsed
    } else {
        let take_len = max_chars.saturating_sub(3);
        let mut truncated = collapsed.chars().take(take_len).collect::<String>();
        truncated.push_str("...");
        truncated
    }
}

fn render_tags(note: &Note) -> String {
    note.tags
        .iter()
        .map(|tag| format!("#{tag}"))
        .collect::<Vec<String>>()
        .join(" ")
}

/// Text rendering of the whole view, used by the interactive shell.
pub fn render_view(view: &ViewModel) -> Vec<String> {
    let mut lines = Vec::new();

    let header = match (view.screen, view.tab) {
        (Screen::Login, _) => "== Sign in ==",
        (Screen::Register, _) => "== Register ==",
        (Screen::Notes, NotesTab::Create) => "== Notes: new note ==",
        (Screen::Notes, NotesTab::List) => "== Notes: all notes ==",
    };
    lines.push(header.to_string());

    if let Some(notice) = &view.notice {
        lines.push(format!("* {notice}"));
    }
    for error in [
        &view.login_error,
        &view.register_error,
        &view.note_error,
        &view.list_error,
    ]
    .into_iter()
    .flatten()
    {
        lines.push(format!("! {error}"));
    }

    match view.screen {
        Screen::Login => lines.push("login <email> <password> | goto register".to_string()),
        Screen::Register => lines.push(
            "register <username> <email> <password> <confirm> | goto login".to_string(),
        ),
        Screen::Notes => render_notes_screen(view, &mut lines),
    }

    match &view.modal {
        Some(Modal::ConfirmLogout) => lines.push("? Sign out? (yes | no)".to_string()),
        Some(Modal::SessionError { message }) => {
            lines.push(format!("? Session error: {message} (retry)"));
        }
        Some(Modal::SessionExpired) => {
            lines.push("? Your session expired. Sign in again. (ok)".to_string());
        }
        None => {}
    }

    lines
}

fn render_notes_screen(view: &ViewModel, lines: &mut Vec<String>) {
    let nav = |label: &str, enabled: bool| {
        if enabled {
            format!("[{label}]")
        } else {
            format!("({label})")
        }
    };
    lines.push(format!(
        "{} {} logout",
        nav("create", view.nav.create_enabled),
        nav("list", view.nav.list_enabled)
    ));

    match view.tab {
        NotesTab::Create => {
            lines.push(format!("Title:   {}", view.title));
            lines.push(format!("Content: {}", view.content));
            let tag_state = if view.tag_add_enabled { "" } else { " (wait)" };
            lines.push(format!("Tags:    {}{tag_state}", view.tags));
            if let Some(note) = &view.last_created {
                lines.push(format!("Last created: #{} {}", note.id, note.title));
            }
            lines.push(
                "title <text> | content <text> | tag <tag> | tags <a, b> | submit".to_string(),
            );
        }
        NotesTab::List => match &view.notes {
            Some(notes) if notes.is_empty() => lines.push("No notes found".to_string()),
            Some(notes) => lines.extend(format_note_lines(notes)),
            None => {}
        },
    }
}
