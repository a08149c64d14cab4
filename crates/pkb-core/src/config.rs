//! Client configuration.
//!
//! Provides `ClientConfig`, the API base URL and transport timeout used to
//! build the HTTP client. Frontends layer flags, environment, and config files
//! on top of [`ClientConfig::default`].

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Build a config for `api_base_url`, validating and normalizing it.
    pub fn new(api_base_url: impl Into<String>) -> Result<Self> {
        let config = Self {
            api_base_url: api_base_url.into(),
            ..Self::default()
        };
        config.validated()
    }

    #[must_use]
    pub const fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    /// Trim the base URL, strip trailing slashes, and reject non-HTTP URLs or
    /// a zero timeout.
    pub fn validated(self) -> Result<Self> {
        let url = self.api_base_url.trim().trim_end_matches('/');
        if url.is_empty() {
            return Err(Error::Config("API base URL must not be empty".to_string()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(Error::Config(format!(
                "API base URL must include http:// or https:// (got `{url}`)"
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(Error::Config(
                "Request timeout must be at least one second".to_string(),
            ));
        }

        Ok(Self {
            api_base_url: url.to_string(),
            request_timeout_secs: self.request_timeout_secs,
        })
    }

    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Join an absolute endpoint path onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

const fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn new_trims_trailing_slash() {
        let config = ClientConfig::new(" https://notes.example.com/ ").unwrap();
        assert_eq!(config.api_base_url, "https://notes.example.com");
        assert_eq!(config.endpoint("/auth/login"), "https://notes.example.com/auth/login");
    }

    #[test]
    fn new_rejects_missing_scheme() {
        assert!(matches!(
            ClientConfig::new("notes.example.com"),
            Err(Error::Config(_))
        ));
        assert!(matches!(ClientConfig::new("   "), Err(Error::Config(_))));
        assert!(matches!(
            ClientConfig::new("ftp://notes.example.com"),
            Err(Error::Config(_))
        ));
        assert!(matches!(ClientConfig::new("https:///"), Err(Error::Config(_))));
    }

    #[test]
    fn local_dev_server_with_port_is_accepted() {
        let config = ClientConfig::new("http://localhost:8080//").unwrap();
        assert_eq!(config.api_base_url, "http://localhost:8080");
        assert_eq!(config.endpoint("notes"), "http://localhost:8080/notes");
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let result = ClientConfig::default().with_timeout_secs(0).validated();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: ClientConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }
}
