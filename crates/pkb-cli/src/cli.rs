use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "pkb")]
#[command(about = "Take notes against a pkb notes service from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Notes service base URL (overrides PKB_API_URL and the config file)
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and store the session token in the keychain
    Login {
        /// Account email
        #[arg(long, value_name = "EMAIL")]
        email: String,
        /// Account password
        #[arg(long, value_name = "PASSWORD")]
        password: String,
    },
    /// Create an account
    Register {
        /// Display name
        #[arg(long, value_name = "NAME")]
        username: String,
        /// Account email
        #[arg(long, value_name = "EMAIL")]
        email: String,
        /// Account password
        #[arg(long, value_name = "PASSWORD")]
        password: String,
        /// Repeat the password
        #[arg(long, value_name = "PASSWORD")]
        password_confirm: String,
    },
    /// Sign out and clear the stored session
    Logout {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Show whether a session is stored
    Status,
    /// Create and list notes
    Notes {
        #[command(subcommand)]
        command: NotesCommands,
    },
    /// Interactive session with the full login, tag, and recovery flow
    Shell,
    /// Manage CLI configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum NotesCommands {
    /// Create a note
    #[command(alias = "new")]
    Create {
        /// Note title
        #[arg(long, default_value = "")]
        title: String,
        /// Note content (read from piped stdin when omitted)
        #[arg(long)]
        content: Option<String>,
        /// Comma-separated tags, e.g. "work, ideas"
        #[arg(long, default_value = "")]
        tags: String,
    },
    /// List notes
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Write the config file
    Init {
        /// Notes service base URL
        #[arg(long, value_name = "URL")]
        api_base_url: Option<String>,
        /// Request timeout in seconds
        #[arg(long, value_name = "SECS")]
        timeout_secs: Option<u64>,
    },
    /// Print the effective configuration
    Show,
}
