//! Persistent CLI configuration.

use std::path::{Path, PathBuf};

use pkb_core::config::ClientConfig;
use serde::{Deserialize, Serialize};

use crate::error::CliError;

const CONFIG_FILE_NAME: &str = "cli-config.json";
pub const ENV_API_URL: &str = "PKB_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "PKB_TIMEOUT_SECS";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CliConfig {
    #[serde(default = "default_config_version")]
    pub version: u32,
    #[serde(default)]
    pub api_base_url: Option<String>,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

const fn default_config_version() -> u32 {
    1
}

pub fn default_config_path() -> Result<PathBuf, CliError> {
    dirs::config_dir()
        .map(|dir| dir.join("pkb").join(CONFIG_FILE_NAME))
        .ok_or_else(|| CliError::Config("Failed to resolve CLI config directory".to_string()))
}

impl CliConfig {
    pub fn load() -> Result<Self, CliError> {
        Self::load_from_path(&default_config_path()?)
    }

    pub fn load_from_path(path: &Path) -> Result<Self, CliError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path).map_err(|error| {
            CliError::Config(format!("Failed to read config at {}: {}", path.display(), error))
        })?;
        let mut config = serde_json::from_str::<Self>(&raw).map_err(|error| {
            CliError::Config(format!("Failed to parse config at {}: {}", path.display(), error))
        })?;
        config.normalize();
        Ok(config)
    }

    pub fn save(&self) -> Result<PathBuf, CliError> {
        let path = default_config_path()?;
        self.save_to_path(&path)?;
        Ok(path)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<(), CliError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|error| {
                CliError::Config(format!(
                    "Failed to create config directory {}: {}",
                    parent.display(),
                    error
                ))
            })?;
        }

        let mut normalized = self.clone();
        normalized.normalize();
        let serialized = serde_json::to_string_pretty(&normalized)?;
        std::fs::write(path, serialized).map_err(|error| {
            CliError::Config(format!("Failed to write config at {}: {}", path.display(), error))
        })
    }

    fn normalize(&mut self) {
        self.version = default_config_version();
        self.api_base_url = non_blank(self.api_base_url.take());
    }
}

/// Trimmed value, or `None` when unset or blank.
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Resolve the effective client config from the CLI flag, the environment,
/// and the config file, in that order of precedence.
pub fn resolve_client_config(flag_api_url: Option<String>) -> Result<ClientConfig, CliError> {
    let file = CliConfig::load()?;
    merge_client_config(
        flag_api_url,
        std::env::var(ENV_API_URL).ok(),
        std::env::var(ENV_TIMEOUT_SECS).ok(),
        &file,
    )
}

pub fn merge_client_config(
    flag_api_url: Option<String>,
    env_api_url: Option<String>,
    env_timeout_secs: Option<String>,
    file: &CliConfig,
) -> Result<ClientConfig, CliError> {
    let mut config = ClientConfig::default();

    if let Some(url) = non_blank(flag_api_url)
        .or_else(|| non_blank(env_api_url))
        .or_else(|| file.api_base_url.clone())
    {
        config.api_base_url = url;
    }

    if let Some(raw) = non_blank(env_timeout_secs) {
        config.request_timeout_secs = raw.parse().map_err(|_| {
            CliError::Config(format!("{ENV_TIMEOUT_SECS} must be a whole number of seconds"))
        })?;
    } else if let Some(secs) = file.request_timeout_secs {
        config.request_timeout_secs = secs;
    }

    Ok(config.validated()?)
}
