use pkb_core::config::ClientConfig;

use crate::cli::ConfigCommands;
use crate::config::{resolve_client_config, CliConfig};
use crate::error::CliError;

pub fn run_config(command: ConfigCommands, flag_api_url: Option<String>) -> Result<(), CliError> {
    match command {
        ConfigCommands::Init {
            api_base_url,
            timeout_secs,
        } => run_config_init(api_base_url.or(flag_api_url), timeout_secs),
        ConfigCommands::Show => {
            let effective = resolve_client_config(flag_api_url)?;
            for line in format_config_lines(&effective) {
                println!("{line}");
            }
            Ok(())
        }
    }
}

fn run_config_init(
    api_base_url: Option<String>,
    timeout_secs: Option<u64>,
) -> Result<(), CliError> {
    let mut config = CliConfig::load()?;
    let updated = apply_config_init(&mut config, api_base_url, timeout_secs)?;
    let path = config.save()?;
    if updated {
        println!("Saved config to {}", path.display());
    } else {
        println!("Config unchanged at {}", path.display());
    }
    Ok(())
}

/// Apply `config init` arguments, validated the same way the client validates
/// them at startup. Returns whether anything changed.
pub fn apply_config_init(
    config: &mut CliConfig,
    api_base_url: Option<String>,
    timeout_secs: Option<u64>,
) -> Result<bool, CliError> {
    let api_base_url = api_base_url.filter(|url| !url.trim().is_empty());
    let mut candidate = ClientConfig::default();
    if let Some(url) = &api_base_url {
        candidate.api_base_url.clone_from(url);
    }
    if let Some(secs) = timeout_secs {
        candidate.request_timeout_secs = secs;
    }
    let candidate = candidate.validated()?;

    let before = config.clone();
    if api_base_url.is_some() {
        config.api_base_url = Some(candidate.api_base_url);
    }
    if timeout_secs.is_some() {
        config.request_timeout_secs = Some(candidate.request_timeout_secs);
    }
    Ok(*config != before)
}

pub fn format_config_lines(config: &ClientConfig) -> Vec<String> {
    vec![
        format!("api_base_url = {}", config.api_base_url),
        format!("request_timeout_secs = {}", config.request_timeout_secs),
    ]
}
