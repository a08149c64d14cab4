//! Session lifecycle and view-state coordinator.
//!
//! `App` owns every piece of client state and is the only place that mutates
//! it. Frontends send [`UiAction`]s through [`App::dispatch`] and draw the
//! [`ViewModel`] returned by [`App::view`]. Because handlers take `&mut self`,
//! a second action cannot start while a network call is in flight.

use std::time::Instant;

use crate::api::{ApiClient, Transport};
use crate::cache::NotesFreshness;
use crate::error::{Error, Result};
use crate::models::{AuthGrant, Credentials, Note, Registration};
use crate::recovery::{RecoveryState, SessionRecovery};
use crate::router::{NavControls, NotesTab, Screen, ViewRouter};
use crate::session::{SessionStore, TokenPersistence};
use crate::tags::{TagAddOutcome, TagEditor};

const LOGIN_FAILED: &str = "Something went wrong, reload and try again.";
const REGISTERED_NOTICE: &str = "Enter your credentials";
const NOTE_CREATED_NOTICE: &str = "Note created";

/// Named user actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    GoToRegister,
    GoToLogin,
    LoginSubmit(Credentials),
    RegisterSubmit(Registration),
    SetTitle(String),
    SetContent(String),
    /// Type directly into the composite tag field.
    SetTags(String),
    /// Add one tag through the tag editor.
    TagAdd(String),
    NoteSubmit,
    NavCreate,
    NavList,
    LogoutRequest,
    LogoutCancel,
    LogoutConfirm,
    ReloadRetry,
    ExpiredAcknowledge,
}

/// Control disabled while an action's network call is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Login,
    Register,
    CreateNote,
    ListNotes,
    Retry,
}

impl UiAction {
    /// The control a frontend should show as loading while this action runs,
    /// if the action performs a network call.
    pub const fn control(&self) -> Option<Control> {
        match self {
            Self::LoginSubmit(_) => Some(Control::Login),
            Self::RegisterSubmit(_) => Some(Control::Register),
            Self::NoteSubmit => Some(Control::CreateNote),
            Self::NavList => Some(Control::ListNotes),
            Self::ReloadRetry => Some(Control::Retry),
            _ => None,
        }
    }

    const fn screen(&self) -> Option<Screen> {
        match self {
            Self::GoToRegister | Self::LoginSubmit(_) => Some(Screen::Login),
            Self::GoToLogin | Self::RegisterSubmit(_) => Some(Screen::Register),
            Self::SetTitle(_)
            | Self::SetContent(_)
            | Self::SetTags(_)
            | Self::TagAdd(_)
            | Self::NoteSubmit
            | Self::NavCreate
            | Self::NavList
            | Self::LogoutRequest
            | Self::LogoutCancel
            | Self::LogoutConfirm
            | Self::ReloadRetry
            | Self::ExpiredAcknowledge => Some(Screen::Notes),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal {
    ConfirmLogout,
    /// Fetch failed; offers a manual retry.
    SessionError { message: String },
    /// Refresh failed; acknowledging returns to login.
    SessionExpired,
}

impl Modal {
    const fn allows(&self, action: &UiAction) -> bool {
        match self {
            Self::ConfirmLogout => {
                matches!(action, UiAction::LogoutConfirm | UiAction::LogoutCancel)
            }
            Self::SessionError { .. } => matches!(action, UiAction::ReloadRetry),
            Self::SessionExpired => matches!(action, UiAction::ExpiredAcknowledge),
        }
    }
}

/// Snapshot of everything a frontend needs to draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewModel {
    pub screen: Screen,
    pub tab: NotesTab,
    pub nav: NavControls,
    pub modal: Option<Modal>,
    pub recovery: RecoveryState,
    pub login_error: Option<String>,
    pub register_error: Option<String>,
    pub note_error: Option<String>,
    pub list_error: Option<String>,
    pub notice: Option<String>,
    pub title: String,
    pub content: String,
    pub tags: String,
    pub tag_input: String,
    pub tag_add_enabled: bool,
    pub last_created: Option<Note>,
    /// Rendered note list; `None` until a fetch has succeeded.
    pub notes: Option<Vec<Note>>,
}

impl ViewModel {
    /// A fetch succeeded and returned nothing.
    pub fn notes_not_found(&self) -> bool {
        self.notes.as_ref().is_some_and(Vec::is_empty)
    }
}

#[derive(Debug, Default)]
struct Messages {
    login_error: Option<String>,
    register_error: Option<String>,
    note_error: Option<String>,
    list_error: Option<String>,
    notice: Option<String>,
}

#[derive(Debug, Default)]
struct NoteForm {
    title: String,
    content: String,
}

pub struct App<T: Transport, P: TokenPersistence> {
    api: ApiClient<T>,
    session: SessionStore<P>,
    router: ViewRouter,
    freshness: NotesFreshness,
    tags: TagEditor,
    recovery: SessionRecovery,
    form: NoteForm,
    notes: Option<Vec<Note>>,
    last_created: Option<Note>,
    messages: Messages,
    modal: Option<Modal>,
    reloads: u64,
}

impl<T: Transport, P: TokenPersistence> App<T, P> {
    /// Build the client and run the initial-load screen decision.
    pub fn new(api: ApiClient<T>, session: SessionStore<P>) -> Result<Self> {
        let has_token = session.has_token()?;
        Ok(Self {
            api,
            session,
            router: ViewRouter::initial(has_token),
            freshness: NotesFreshness::new(),
            tags: TagEditor::new(),
            recovery: SessionRecovery::new(),
            form: NoteForm::default(),
            notes: None,
            last_created: None,
            messages: Messages::default(),
            modal: None,
            reloads: 0,
        })
    }

    pub const fn session(&self) -> &SessionStore<P> {
        &self.session
    }

    pub const fn api(&self) -> &ApiClient<T> {
        &self.api
    }

    /// Number of full reloads since construction.
    pub const fn reloads(&self) -> u64 {
        self.reloads
    }

    pub fn view(&self) -> ViewModel {
        ViewModel {
            screen: self.router.screen(),
            tab: self.router.tab(),
            nav: self.router.nav_controls(),
            modal: self.modal.clone(),
            recovery: self.recovery.state().clone(),
            login_error: self.messages.login_error.clone(),
            register_error: self.messages.register_error.clone(),
            note_error: self.messages.note_error.clone(),
            list_error: self.messages.list_error.clone(),
            notice: self.messages.notice.clone(),
            title: self.form.title.clone(),
            content: self.form.content.clone(),
            tags: self.tags.buffer().to_string(),
            tag_input: self.tags.input().to_string(),
            tag_add_enabled: !self.tags.is_locked(Instant::now()),
            last_created: self.last_created.clone(),
            notes: self.notes.clone(),
        }
    }

    /// Reinitialize all client state from the session store, as a page
    /// reload would.
    pub fn reload(&mut self) {
        let has_token = self.session.has_token().unwrap_or_else(|error| {
            tracing::warn!("Failed to read stored session on reload: {}", error);
            false
        });
        self.router = ViewRouter::initial(has_token);
        self.freshness = NotesFreshness::new();
        self.tags = TagEditor::new();
        self.recovery = SessionRecovery::new();
        self.form = NoteForm::default();
        self.notes = None;
        self.last_created = None;
        self.messages = Messages::default();
        self.modal = None;
        self.reloads += 1;
        tracing::debug!(has_token, "Client state reloaded");
    }

    /// Handle one action. Returns `false` when the action does not apply to
    /// the current screen or is blocked by an open modal.
    pub async fn dispatch(&mut self, action: UiAction) -> bool {
        if !self.accepts(&action) {
            tracing::debug!(?action, "Ignoring action for current view");
            return false;
        }

        match action {
            UiAction::GoToRegister => self.router.go_to_register(),
            UiAction::GoToLogin => self.router.go_to_login(),
            UiAction::LoginSubmit(credentials) => self.login(&credentials).await,
            UiAction::RegisterSubmit(registration) => self.register(&registration).await,
            UiAction::SetTitle(title) => self.form.title = title,
            UiAction::SetContent(content) => self.form.content = content,
            UiAction::SetTags(tags) => self.tags.set_buffer(tags),
            UiAction::TagAdd(raw) => self.add_tag(raw),
            UiAction::NoteSubmit => self.submit_note().await,
            UiAction::NavCreate => {
                self.router.select_tab(NotesTab::Create);
            }
            UiAction::NavList => self.show_list().await,
            UiAction::LogoutRequest => self.modal = Some(Modal::ConfirmLogout),
            UiAction::LogoutCancel => self.modal = None,
            UiAction::LogoutConfirm => self.logout(),
            UiAction::ReloadRetry => self.retry().await,
            UiAction::ExpiredAcknowledge => self.reload(),
        }
        true
    }

    fn accepts(&self, action: &UiAction) -> bool {
        if let Some(modal) = &self.modal {
            return modal.allows(action);
        }
        match action {
            UiAction::LogoutCancel | UiAction::LogoutConfirm => false,
            UiAction::ReloadRetry => self.recovery.is_recovering(),
            UiAction::ExpiredAcknowledge => {
                matches!(self.recovery.state(), RecoveryState::Expired)
            }
            _ => action.screen() == Some(self.router.screen()),
        }
    }

    async fn login(&mut self, credentials: &Credentials) {
        self.messages.login_error = None;
        let result = self.api.login(credentials).await;
        match result.and_then(|grant| self.store_grant(&grant)) {
            Ok(()) => {
                tracing::info!("Signed in as {}", credentials.email);
                self.freshness.invalidate();
                self.notes = None;
                self.messages.notice = None;
                self.router.authenticated();
            }
            Err(error) => {
                tracing::warn!("Sign-in failed: {}", error);
                self.messages.login_error = Some(format!("{LOGIN_FAILED} ({error})"));
            }
        }
    }

    async fn register(&mut self, registration: &Registration) {
        self.messages.register_error = None;
        match self.api.register(registration).await {
            Ok(()) => {
                tracing::info!("Registered {}", registration.email);
                self.router.go_to_login();
                self.messages.notice = Some(REGISTERED_NOTICE.to_string());
            }
            Err(error) => {
                tracing::warn!("Registration failed: {}", error);
                self.messages.register_error = Some(error.to_string());
            }
        }
    }

    fn add_tag(&mut self, raw: String) {
        self.tags.set_input(raw);
        match self.tags.add_tag() {
            TagAddOutcome::Added(buffer) => tracing::debug!(%buffer, "Tag added"),
            TagAddOutcome::Rejected => tracing::debug!("Empty or duplicate tag ignored"),
            TagAddOutcome::Debounced => tracing::debug!("Tag add ignored during debounce"),
        }
    }

    async fn submit_note(&mut self) {
        self.messages.note_error = None;
        let result = match self.session.get_token() {
            Ok(token) => {
                self.api
                    .create_note(
                        token.as_ref(),
                        &self.form.title,
                        &self.form.content,
                        self.tags.buffer(),
                    )
                    .await
            }
            Err(error) => Err(error),
        };

        match result {
            Ok(note) => {
                tracing::info!(id = %note.id, "Note created");
                self.form = NoteForm::default();
                self.tags.clear();
                self.freshness.invalidate();
                self.last_created = Some(note);
                self.messages.notice = Some(NOTE_CREATED_NOTICE.to_string());
            }
            Err(error) => {
                tracing::warn!("Note creation failed: {}", error);
                self.messages.note_error = Some(error.to_string());
            }
        }
    }

    async fn show_list(&mut self) {
        if !self.router.select_tab(NotesTab::List) {
            return;
        }
        if self.freshness.is_fresh() {
            tracing::debug!("Note list is fresh; skipping fetch");
            return;
        }

        self.messages.list_error = None;
        let result = match self.session.get_token() {
            Ok(token) => self.api.list_notes(token.as_ref()).await,
            Err(error) => Err(error),
        };

        match result {
            Ok(notes) => {
                tracing::debug!(count = notes.len(), "Notes fetched");
                self.notes = Some(notes);
                self.freshness.mark_fresh();
            }
            Err(error) if error.is_session_failure() => {
                let message = error.to_string();
                self.recovery.fail(message.clone());
                self.modal = Some(Modal::SessionError { message });
            }
            Err(error) => {
                tracing::warn!("Failed to load notes: {}", error);
                self.messages.list_error = Some(error.to_string());
            }
        }
    }

    fn logout(&mut self) {
        if let Err(error) = self.session.end_session() {
            tracing::warn!("Failed to clear stored session: {}", error);
        }
        tracing::info!("Signed out");
        self.reload();
    }

    async fn retry(&mut self) {
        let result = match self.session.refresh_cookie() {
            Ok(cookie) => self.api.refresh(cookie.as_ref()).await,
            Err(error) => Err(error),
        };

        match result.and_then(|grant| self.store_grant(&grant)) {
            Ok(()) => {
                self.recovery.refreshed(true);
                self.reload();
            }
            Err(error @ Error::Auth(_)) => {
                tracing::debug!("Refresh rejected: {}", error);
                self.recovery.refreshed(false);
                if let Err(error) = self.session.end_session() {
                    tracing::warn!("Failed to clear expired session: {}", error);
                }
                self.modal = Some(Modal::SessionExpired);
            }
            // The server never judged the session; keep it and offer another retry.
            Err(error) => {
                let message = error.to_string();
                self.recovery.retry_failed(message.clone());
                self.modal = Some(Modal::SessionError { message });
            }
        }
    }

    fn store_grant(&self, grant: &AuthGrant) -> Result<()> {
        self.session.set_token(&grant.access_token)?;
        if let Some(cookie) = &grant.refresh_cookie {
            self.session.set_refresh_cookie(cookie)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::api::testing::FakeTransport;
    use crate::api::{Method, NOTES_PATH, REFRESH_PATH};
    use crate::models::AccessToken;
    use crate::session::MemoryPersistence;

    type TestApp = App<FakeTransport, MemoryPersistence>;

    const NOTE_JSON: &str =
        r#"{"id":1,"title":"t","content":"c","tags":["a","a","b"],"createdAt":"2025-01-01T09:30:00"}"#;

    fn app_with_token(token: Option<&str>) -> (TestApp, FakeTransport) {
        let transport = FakeTransport::new();
        let session = SessionStore::new(MemoryPersistence::new());
        if let Some(token) = token {
            session.set_token(&AccessToken::new(token)).unwrap();
        }
        let app = App::new(ApiClient::new(transport.clone()), session).unwrap();
        (app, transport)
    }

    fn token_of(app: &TestApp) -> Option<AccessToken> {
        app.session().get_token().unwrap()
    }

    #[test]
    fn initial_screen_depends_on_stored_token() {
        assert_eq!(app_with_token(None).0.view().screen, Screen::Login);
        assert_eq!(app_with_token(Some("t")).0.view().screen, Screen::Notes);
    }

    #[tokio::test]
    async fn rejected_login_stays_on_login_with_inline_error() {
        let (mut app, transport) = app_with_token(None);
        transport.respond(401, r#"{"message":"Credenciales inválidas"}"#);

        let handled = app
            .dispatch(UiAction::LoginSubmit(Credentials::new("a@b.com", "x")))
            .await;

        assert!(handled);
        let view = app.view();
        assert_eq!(view.screen, Screen::Login);
        let error = view.login_error.unwrap();
        assert!(error.starts_with(LOGIN_FAILED));
        assert!(error.contains("Credenciales inválidas"));
        assert_eq!(token_of(&app), None);
    }

    #[tokio::test]
    async fn successful_login_stores_token_and_shows_notes() {
        let (mut app, transport) = app_with_token(None);
        transport.respond_with_cookie(200, r#"{"accessToken":"abc"}"#, Some("r1"));

        app.dispatch(UiAction::LoginSubmit(Credentials::new("a@b.com", "x")))
            .await;

        let view = app.view();
        assert_eq!(view.screen, Screen::Notes);
        assert_eq!(view.tab, NotesTab::Create);
        assert_eq!(view.login_error, None);
        assert_eq!(token_of(&app), Some(AccessToken::new("abc")));
        assert_eq!(
            app.session().refresh_cookie().unwrap(),
            Some(AccessToken::new("r1"))
        );
    }

    #[tokio::test]
    async fn mismatched_registration_fails_locally() {
        let (mut app, transport) = app_with_token(None);
        app.dispatch(UiAction::GoToRegister).await;

        app.dispatch(UiAction::RegisterSubmit(Registration {
            username: "ana".to_string(),
            email: "ana@example.com".to_string(),
            password: "p1".to_string(),
            password_confirm: "p2".to_string(),
        }))
        .await;

        let view = app.view();
        assert_eq!(view.screen, Screen::Register);
        assert!(view.register_error.is_some());
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn successful_registration_returns_to_login() {
        let (mut app, transport) = app_with_token(None);
        transport.respond(201, "");
        app.dispatch(UiAction::GoToRegister).await;

        app.dispatch(UiAction::RegisterSubmit(Registration {
            username: "ana".to_string(),
            email: "ana@example.com".to_string(),
            password: "p".to_string(),
            password_confirm: "p".to_string(),
        }))
        .await;

        let view = app.view();
        assert_eq!(view.screen, Screen::Login);
        assert_eq!(view.notice.as_deref(), Some(REGISTERED_NOTICE));
        assert_eq!(token_of(&app), None);
    }

    #[tokio::test]
    async fn login_form_is_unreachable_once_signed_in() {
        let (mut app, transport) = app_with_token(Some("t"));
        let handled = app
            .dispatch(UiAction::LoginSubmit(Credentials::new("a@b.com", "x")))
            .await;
        assert!(!handled);
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn raw_tag_field_is_submitted_without_dedup() {
        let (mut app, transport) = app_with_token(Some("t"));
        transport.respond(201, NOTE_JSON);

        app.dispatch(UiAction::SetTitle(" t ".to_string())).await;
        app.dispatch(UiAction::SetContent("c".to_string())).await;
        app.dispatch(UiAction::SetTags("a, a, b".to_string())).await;
        app.dispatch(UiAction::NoteSubmit).await;

        let sent = transport.requests();
        assert_eq!(sent[0].path, NOTES_PATH);
        assert_eq!(
            sent[0].body,
            Some(json!({"title": "t", "content": "c", "tags": ["a", "a", "b"]}))
        );

        let view = app.view();
        assert_eq!(view.title, "");
        assert_eq!(view.content, "");
        assert_eq!(view.tags, "");
        assert_eq!(view.notice.as_deref(), Some(NOTE_CREATED_NOTICE));
        assert_eq!(view.last_created.unwrap().id.0, 1);
    }

    #[tokio::test]
    async fn failed_creation_keeps_form_fields() {
        let (mut app, transport) = app_with_token(Some("t"));
        transport.respond(400, r#"{"message":"La nota debe de tener título"}"#);

        app.dispatch(UiAction::SetContent("body".to_string())).await;
        app.dispatch(UiAction::SetTags("a".to_string())).await;
        app.dispatch(UiAction::NoteSubmit).await;

        let view = app.view();
        assert_eq!(view.content, "body");
        assert_eq!(view.tags, "a");
        assert!(view.note_error.unwrap().contains("La nota debe de tener título"));
    }

    #[tokio::test]
    async fn note_without_tags_is_rejected_locally() {
        let (mut app, transport) = app_with_token(Some("t"));
        app.dispatch(UiAction::NoteSubmit).await;

        assert!(app.view().note_error.is_some());
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn rapid_tag_adds_are_debounced() {
        let (mut app, _) = app_with_token(Some("t"));
        app.dispatch(UiAction::TagAdd("a".to_string())).await;
        app.dispatch(UiAction::TagAdd("b".to_string())).await;

        let view = app.view();
        assert_eq!(view.tags, "a");
        assert!(!view.tag_add_enabled);
    }

    #[tokio::test]
    async fn empty_list_marks_fresh_without_error() {
        let (mut app, transport) = app_with_token(Some("t"));
        transport.respond(200, "[]");

        app.dispatch(UiAction::NavList).await;

        let view = app.view();
        assert_eq!(view.tab, NotesTab::List);
        assert!(view.notes_not_found());
        assert_eq!(view.modal, None);
        assert_eq!(view.list_error, None);

        // Fresh: coming back to the list does not refetch.
        app.dispatch(UiAction::NavCreate).await;
        app.dispatch(UiAction::NavList).await;
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn creating_a_note_forces_a_refetch() {
        let (mut app, transport) = app_with_token(Some("t"));
        transport.respond(200, "[]");
        transport.respond(201, NOTE_JSON);
        transport.respond(200, &format!("[{NOTE_JSON}]"));

        app.dispatch(UiAction::NavList).await;
        app.dispatch(UiAction::NavCreate).await;
        app.dispatch(UiAction::SetTags("a".to_string())).await;
        app.dispatch(UiAction::NoteSubmit).await;
        app.dispatch(UiAction::NavList).await;

        let methods: Vec<Method> = transport
            .requests()
            .iter()
            .map(|request| request.method)
            .collect();
        assert_eq!(methods, vec![Method::Get, Method::Post, Method::Get]);
        assert_eq!(app.view().notes.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn expired_token_recovers_through_refresh() {
        let (mut app, transport) = app_with_token(Some("old"));
        transport.respond(401, "");
        transport.respond(200, r#"{"accessToken":"new"}"#);

        app.dispatch(UiAction::NavList).await;
        let view = app.view();
        assert!(matches!(view.modal, Some(Modal::SessionError { .. })));
        assert!(matches!(view.recovery, RecoveryState::Recovering { .. }));

        // Other actions are blocked while the error is shown.
        assert!(!app.dispatch(UiAction::NavCreate).await);

        assert!(app.dispatch(UiAction::ReloadRetry).await);

        assert_eq!(token_of(&app), Some(AccessToken::new("new")));
        let view = app.view();
        assert_eq!(view.screen, Screen::Notes);
        assert_eq!(view.modal, None);
        assert_eq!(view.recovery, RecoveryState::Normal);
        assert_eq!(app.reloads(), 1);
        assert_eq!(transport.requests()[1].path, REFRESH_PATH);
    }

    #[tokio::test]
    async fn failed_refresh_forces_logout() {
        let (mut app, transport) = app_with_token(Some("old"));
        transport.respond(401, "");
        transport.respond(401, "");

        app.dispatch(UiAction::NavList).await;
        app.dispatch(UiAction::ReloadRetry).await;

        assert_eq!(token_of(&app), None);
        let view = app.view();
        assert_eq!(view.modal, Some(Modal::SessionExpired));
        assert_eq!(view.recovery, RecoveryState::Expired);

        app.dispatch(UiAction::ExpiredAcknowledge).await;
        let view = app.view();
        assert_eq!(view.screen, Screen::Login);
        assert_eq!(view.modal, None);
        assert_eq!(view.recovery, RecoveryState::Normal);
    }

    #[tokio::test]
    async fn unreachable_refresh_keeps_session_and_retry() {
        let (mut app, transport) = app_with_token(Some("old"));
        transport.respond(503, "");
        transport.fail(Error::Storage("connection refused".to_string()));
        transport.respond(200, r#"{"accessToken":"new"}"#);

        app.dispatch(UiAction::NavList).await;
        assert!(app.dispatch(UiAction::ReloadRetry).await);

        assert_eq!(token_of(&app), Some(AccessToken::new("old")));
        let view = app.view();
        assert!(matches!(
            view.modal,
            Some(Modal::SessionError { ref message }) if message.contains("connection refused")
        ));
        assert!(matches!(view.recovery, RecoveryState::Recovering { .. }));

        assert!(app.dispatch(UiAction::ReloadRetry).await);
        assert_eq!(token_of(&app), Some(AccessToken::new("new")));
        assert_eq!(app.view().modal, None);
        assert_eq!(app.reloads(), 1);
    }

    #[tokio::test]
    async fn offline_server_does_not_end_session() {
        let config = crate::config::ClientConfig::new("http://127.0.0.1:9")
            .unwrap()
            .with_timeout_secs(5);
        let transport = crate::api::HttpTransport::new(config).unwrap();
        let session = SessionStore::new(MemoryPersistence::new());
        session.set_token(&AccessToken::new("still-valid")).unwrap();
        let mut app = App::new(ApiClient::new(transport), session).unwrap();

        app.dispatch(UiAction::NavList).await;
        assert!(matches!(app.view().modal, Some(Modal::SessionError { .. })));

        app.dispatch(UiAction::ReloadRetry).await;
        let view = app.view();
        assert!(matches!(view.modal, Some(Modal::SessionError { .. })));
        assert!(matches!(view.recovery, RecoveryState::Recovering { .. }));
        assert_eq!(
            app.session().get_token().unwrap(),
            Some(AccessToken::new("still-valid"))
        );
    }

    #[tokio::test]
    async fn login_can_be_resubmitted_after_rejection() {
        let (mut app, transport) = app_with_token(None);
        transport.respond(401, "");
        transport.respond(200, r#"{"accessToken":"abc"}"#);

        let login = UiAction::LoginSubmit(Credentials::new("a@b.com", "x"));
        assert!(app.dispatch(login.clone()).await);
        assert!(app.view().login_error.is_some());

        assert!(app.dispatch(login).await);
        assert_eq!(transport.requests().len(), 2);
        assert_eq!(app.view().login_error, None);
        assert_eq!(app.view().screen, Screen::Notes);
    }

    #[tokio::test]
    async fn logout_requires_confirmation() {
        let (mut app, _) = app_with_token(Some("t"));

        app.dispatch(UiAction::LogoutRequest).await;
        assert_eq!(app.view().modal, Some(Modal::ConfirmLogout));
        app.dispatch(UiAction::LogoutCancel).await;
        assert_eq!(app.view().modal, None);
        assert!(token_of(&app).is_some());

        app.dispatch(UiAction::LogoutRequest).await;
        app.dispatch(UiAction::LogoutConfirm).await;
        assert_eq!(token_of(&app), None);
        assert_eq!(app.view().screen, Screen::Login);
    }

    #[tokio::test]
    async fn retry_is_ignored_outside_recovery() {
        let (mut app, transport) = app_with_token(Some("t"));
        assert!(!app.dispatch(UiAction::ReloadRetry).await);
        assert!(!app.dispatch(UiAction::ExpiredAcknowledge).await);
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn network_actions_name_their_control() {
        assert_eq!(UiAction::NoteSubmit.control(), Some(Control::CreateNote));
        assert_eq!(UiAction::NavCreate.control(), None);
    }
}
