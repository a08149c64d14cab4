//! pkb CLI - Command-line client for the notes service
//!
//! Sign in, capture notes with tags, and browse them from the terminal.

mod auth;
mod cli;
mod commands;
mod config;
mod error;

use clap::{CommandFactory, Parser};

use crate::cli::{Cli, Commands, NotesCommands};
use crate::commands::auth_cmd::{run_login, run_logout, run_register, run_status};
use crate::commands::completions::run_completions;
use crate::commands::config::run_config;
use crate::commands::notes::{run_create, run_list};
use crate::commands::shell::run_shell;
use crate::config::resolve_client_config;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    let default_directive = "pkb=info"
        .parse()
        .map_err(|error| CliError::Config(format!("invalid log directive: {error}")))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_directive),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let api_url = cli.api_url;

    match cli.command {
        Some(Commands::Login { email, password }) => {
            run_login(&resolve_client_config(api_url)?, email, password).await?;
        }
        Some(Commands::Register {
            username,
            email,
            password,
            password_confirm,
        }) => {
            let client_config = resolve_client_config(api_url)?;
            run_register(&client_config, username, email, password, password_confirm).await?;
        }
        Some(Commands::Logout { yes }) => {
            run_logout(&resolve_client_config(api_url)?, yes).await?;
        }
        Some(Commands::Status) => run_status(&resolve_client_config(api_url)?)?,
        Some(Commands::Notes { command }) => {
            let client_config = resolve_client_config(api_url)?;
            match command {
                NotesCommands::Create {
                    title,
                    content,
                    tags,
                } => run_create(&client_config, title, content, tags).await?,
                NotesCommands::List { json } => run_list(&client_config, json).await?,
            }
        }
        Some(Commands::Shell) => run_shell(&resolve_client_config(api_url)?).await?,
        Some(Commands::Config { command }) => run_config(command, api_url)?,
        Some(Commands::Completions { shell, output }) => {
            run_completions(shell, output.as_deref())?;
        }
        None => {
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
