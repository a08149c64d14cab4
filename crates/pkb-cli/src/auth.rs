//! Session persistence in the OS keychain.

#[cfg(test)]
use std::collections::HashMap;
#[cfg(test)]
use std::sync::{Mutex, OnceLock};

#[cfg(not(test))]
use keyring::Entry;

use pkb_core::api::{ApiClient, HttpTransport};
use pkb_core::config::ClientConfig;
use pkb_core::session::{SessionStore, TokenPersistence};
use pkb_core::{App, Error, Result};

#[cfg(not(test))]
const KEYRING_SERVICE_NAME: &str = "pkb-cli";

pub type CliApp = App<HttpTransport, KeyringPersistence>;

/// Stores each session key as its own keychain entry.
#[derive(Debug, Clone, Default)]
pub struct KeyringPersistence;

impl KeyringPersistence {
    #[cfg(test)]
    fn test_store() -> &'static Mutex<HashMap<String, String>> {
        static STORE: OnceLock<Mutex<HashMap<String, String>>> = OnceLock::new();
        STORE.get_or_init(|| Mutex::new(HashMap::new()))
    }

    #[cfg(not(test))]
    fn entry(key: &str) -> Result<Entry> {
        Entry::new(KEYRING_SERVICE_NAME, key).map_err(|error| Error::Storage(error.to_string()))
    }
}

impl TokenPersistence for KeyringPersistence {
    #[cfg(not(test))]
    fn load(&self, key: &str) -> Result<Option<String>> {
        match Self::entry(key)?.get_password() {
            Ok(raw) => Ok(Some(raw)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(error) => Err(Error::Storage(error.to_string())),
        }
    }

    #[cfg(test)]
    fn load(&self, key: &str) -> Result<Option<String>> {
        let guard = Self::test_store()
            .lock()
            .map_err(|error| Error::Storage(error.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    #[cfg(not(test))]
    fn save(&self, key: &str, value: &str) -> Result<()> {
        Self::entry(key)?
            .set_password(value)
            .map_err(|error| Error::Storage(error.to_string()))
    }

    #[cfg(test)]
    fn save(&self, key: &str, value: &str) -> Result<()> {
        let mut guard = Self::test_store()
            .lock()
            .map_err(|error| Error::Storage(error.to_string()))?;
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }

    #[cfg(not(test))]
    fn clear(&self, key: &str) -> Result<()> {
        match Self::entry(key)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(error) => Err(Error::Storage(error.to_string())),
        }
    }

    #[cfg(test)]
    fn clear(&self, key: &str) -> Result<()> {
        let mut guard = Self::test_store()
            .lock()
            .map_err(|error| Error::Storage(error.to_string()))?;
        guard.remove(key);
        Ok(())
    }
}

pub fn session_store() -> SessionStore<KeyringPersistence> {
    SessionStore::new(KeyringPersistence)
}

/// Build the coordinator against the configured service and the keychain
/// session.
pub fn open_app(config: &ClientConfig) -> Result<CliApp> {
    let transport = HttpTransport::new(config.clone())?;
    App::new(ApiClient::new(transport), session_store())
}

#[cfg(test)]
mod tests {
    use pkb_core::models::AccessToken;

    use super::*;

    #[test]
    fn keyring_store_round_trips_token() {
        let store = session_store();
        store.set_token(&AccessToken::new("keychain-token")).unwrap();
        assert_eq!(
            store.get_token().unwrap(),
            Some(AccessToken::new("keychain-token"))
        );

        store.end_session().unwrap();
        assert_eq!(store.get_token().unwrap(), None);
    }
}
