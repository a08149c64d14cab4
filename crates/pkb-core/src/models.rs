//! Wire and domain models shared by the API client and the coordinator.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Server-assigned note identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(pub i64);

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A note as returned by the service.
///
/// The client never edits a note after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Unique identifier
    pub id: NoteId,
    /// Note title
    pub title: String,
    /// Plain text content
    pub content: String,
    /// Tags in server order
    #[serde(default)]
    pub tags: Vec<String>,
    /// Server-formatted creation timestamp, kept opaque
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Note {
    /// Render `created_at` as `YYYY-MM-DD HH:MM` when it parses as an ISO
    /// local date-time, otherwise return it unchanged.
    #[must_use]
    pub fn created_at_label(&self) -> String {
        let Some(raw) = self.created_at.as_deref() else {
            return String::new();
        };
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .map_or_else(|_| raw.to_string(), |parsed| {
                parsed.format("%Y-%m-%d %H:%M").to_string()
            })
    }
}

/// Body of `POST /notes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewNote {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
}

/// Body of `POST /auth/login`.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Registration form as entered by the user.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

impl fmt::Debug for Registration {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Registration")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("password_confirm", &"[REDACTED]")
            .finish()
    }
}

/// Body of `POST /auth/register`. The service reads the password from
/// `passwordHash` and hashes it server-side.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RegisterRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
}

/// Opaque bearer credential.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("AccessToken([REDACTED])")
    }
}

/// Result of a login or refresh call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthGrant {
    pub access_token: AccessToken,
    /// Rotated `refreshToken` cookie value, when the server sent one.
    pub refresh_cookie: Option<AccessToken>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AuthResponse {
    pub access_token: String,
}

/// Error body produced by the service's exception handler.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn note_deserializes_from_service_payload() {
        let raw = r#"{
            "id": 7,
            "title": "Groceries",
            "content": "milk",
            "tags": ["home", "errands"],
            "createdAt": "2025-03-04T10:20:30.123456"
        }"#;
        let note: Note = serde_json::from_str(raw).unwrap();
        assert_eq!(
            note,
            Note {
                id: NoteId(7),
                title: "Groceries".to_string(),
                content: "milk".to_string(),
                tags: vec!["home".to_string(), "errands".to_string()],
                created_at: Some("2025-03-04T10:20:30.123456".to_string()),
            }
        );
        assert_eq!(note.created_at_label(), "2025-03-04 10:20");
    }

    #[test]
    fn created_at_label_keeps_unparseable_value() {
        let note = Note {
            id: NoteId(1),
            title: String::new(),
            content: String::new(),
            tags: Vec::new(),
            created_at: Some("yesterday".to_string()),
        };
        assert_eq!(note.created_at_label(), "yesterday");
    }

    #[test]
    fn register_request_uses_password_hash_key() {
        let body = RegisterRequest {
            username: "ana",
            email: "ana@example.com",
            password_hash: "secret",
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "username": "ana",
                "email": "ana@example.com",
                "passwordHash": "secret"
            })
        );
    }

    #[test]
    fn secrets_are_redacted_in_debug_output() {
        let token = AccessToken::new("secret-access-token");
        let credentials = Credentials::new("a@b.com", "hunter2");
        assert!(!format!("{token:?}").contains("secret-access-token"));
        assert!(!format!("{credentials:?}").contains("hunter2"));
    }
}
