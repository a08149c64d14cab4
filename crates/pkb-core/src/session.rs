//! Session token storage.
//!
//! The stored access token is the single source of truth for "is a user
//! logged in". The refresh cookie stands in for the browser cookie jar and is
//! only read by the refresh call.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::{Error, Result};
use crate::models::AccessToken;

/// Fixed key of the persisted access token.
pub const ACCESS_TOKEN_KEY: &str = "accessToken";
/// Fixed key of the persisted refresh cookie.
pub const REFRESH_COOKIE_KEY: &str = "refreshToken";

/// Key/value backend for persisted session state.
pub trait TokenPersistence: Clone + Send + Sync + 'static {
    fn load(&self, key: &str) -> Result<Option<String>>;
    fn save(&self, key: &str, value: &str) -> Result<()>;
    fn clear(&self, key: &str) -> Result<()>;
}

/// In-process persistence. Survives [`crate::App::reload`] but not a restart.
#[derive(Debug, Clone, Default)]
pub struct MemoryPersistence {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenPersistence for MemoryPersistence {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let guard = self
            .values
            .lock()
            .map_err(|error| Error::Storage(error.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        let mut guard = self
            .values
            .lock()
            .map_err(|error| Error::Storage(error.to_string()))?;
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&self, key: &str) -> Result<()> {
        let mut guard = self
            .values
            .lock()
            .map_err(|error| Error::Storage(error.to_string()))?;
        guard.remove(key);
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct SessionStore<P: TokenPersistence> {
    persistence: P,
}

impl<P: TokenPersistence> SessionStore<P> {
    pub const fn new(persistence: P) -> Self {
        Self { persistence }
    }

    pub fn get_token(&self) -> Result<Option<AccessToken>> {
        Ok(self
            .persistence
            .load(ACCESS_TOKEN_KEY)?
            .filter(|raw| !raw.is_empty())
            .map(AccessToken::new))
    }

    /// Persist `token`, replacing any previous value.
    pub fn set_token(&self, token: &AccessToken) -> Result<()> {
        self.persistence.save(ACCESS_TOKEN_KEY, token.as_str())
    }

    pub fn clear_token(&self) -> Result<()> {
        self.persistence.clear(ACCESS_TOKEN_KEY)
    }

    pub fn has_token(&self) -> Result<bool> {
        Ok(self.get_token()?.is_some())
    }

    pub fn refresh_cookie(&self) -> Result<Option<AccessToken>> {
        Ok(self
            .persistence
            .load(REFRESH_COOKIE_KEY)?
            .filter(|raw| !raw.is_empty())
            .map(AccessToken::new))
    }

    /// Store a rotated refresh cookie; an empty value means the server
    /// expired it.
    pub fn set_refresh_cookie(&self, cookie: &AccessToken) -> Result<()> {
        if cookie.as_str().is_empty() {
            self.persistence.clear(REFRESH_COOKIE_KEY)
        } else {
            self.persistence.save(REFRESH_COOKIE_KEY, cookie.as_str())
        }
    }

    /// Drop both the access token and the refresh cookie.
    pub fn end_session(&self) -> Result<()> {
        self.clear_token()?;
        self.persistence.clear(REFRESH_COOKIE_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_token_overwrites_previous_value() {
        let store = SessionStore::new(MemoryPersistence::new());
        assert_eq!(store.get_token().unwrap(), None);

        store.set_token(&AccessToken::new("first")).unwrap();
        store.set_token(&AccessToken::new("second")).unwrap();

        assert_eq!(store.get_token().unwrap(), Some(AccessToken::new("second")));
    }

    #[test]
    fn clear_token_removes_value() {
        let store = SessionStore::new(MemoryPersistence::new());
        store.set_token(&AccessToken::new("token")).unwrap();
        store.clear_token().unwrap();
        assert!(!store.has_token().unwrap());
    }

    #[test]
    fn stores_sharing_persistence_see_the_same_token() {
        let persistence = MemoryPersistence::new();
        let writer = SessionStore::new(persistence.clone());
        let reader = SessionStore::new(persistence);

        writer.set_token(&AccessToken::new("shared")).unwrap();
        assert_eq!(reader.get_token().unwrap(), Some(AccessToken::new("shared")));
    }

    #[test]
    fn empty_refresh_cookie_clears_stored_cookie() {
        let store = SessionStore::new(MemoryPersistence::new());
        store.set_refresh_cookie(&AccessToken::new("cookie")).unwrap();
        assert!(store.refresh_cookie().unwrap().is_some());

        store.set_refresh_cookie(&AccessToken::new("")).unwrap();
        assert_eq!(store.refresh_cookie().unwrap(), None);
    }

    #[test]
    fn end_session_clears_token_and_cookie() {
        let store = SessionStore::new(MemoryPersistence::new());
        store.set_token(&AccessToken::new("token")).unwrap();
        store.set_refresh_cookie(&AccessToken::new("cookie")).unwrap();

        store.end_session().unwrap();

        assert_eq!(store.get_token().unwrap(), None);
        assert_eq!(store.refresh_cookie().unwrap(), None);
    }
}
