//! Interactive session driving the full client flow.

use std::io::{self, BufRead, Write};

use pkb_core::api::Transport;
use pkb_core::config::ClientConfig;
use pkb_core::models::{Credentials, Registration};
use pkb_core::session::TokenPersistence;
use pkb_core::{App, UiAction};

use crate::auth::open_app;
use crate::commands::common::{dispatch, render_view};
use crate::error::CliError;

const PROMPT: &str = "pkb> ";

const HELP: &[&str] = &[
    "login <email> <password>        sign in",
    "register <user> <email> <pw> <confirm>",
    "goto login | goto register      switch auth screen",
    "title <text> / content <text>   fill the note form",
    "tags <a, b>                     replace the tag field",
    "tag <tag>                       add one tag",
    "submit                          create the note",
    "create | list                   switch notes tab",
    "logout, yes, no                 sign out with confirmation",
    "retry                           refresh after a session error",
    "ok                              acknowledge an expired session",
    "view, help, quit",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Action(UiAction),
    View,
    Help,
    Quit,
}

/// Parse one input line. Blank lines yield `None`.
pub fn parse_shell_command(line: &str) -> Result<Option<ShellCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (verb, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(verb, rest)| (verb, rest.trim()));
    let args: Vec<&str> = rest.split_whitespace().collect();

    let command = match verb.to_lowercase().as_str() {
        "login" => match args.as_slice() {
            [email, password] => {
                ShellCommand::Action(UiAction::LoginSubmit(Credentials::new(*email, *password)))
            }
            _ => return Err("usage: login <email> <password>".to_string()),
        },
        "register" => match args.as_slice() {
            [username, email, password, password_confirm] => {
                ShellCommand::Action(UiAction::RegisterSubmit(Registration {
                    username: (*username).to_string(),
                    email: (*email).to_string(),
                    password: (*password).to_string(),
                    password_confirm: (*password_confirm).to_string(),
                }))
            }
            _ => return Err("usage: register <username> <email> <password> <confirm>".to_string()),
        },
        "goto" => match args.as_slice() {
            ["login"] => ShellCommand::Action(UiAction::GoToLogin),
            ["register"] => ShellCommand::Action(UiAction::GoToRegister),
            _ => return Err("usage: goto login|register".to_string()),
        },
        "title" => ShellCommand::Action(UiAction::SetTitle(rest.to_string())),
        "content" => ShellCommand::Action(UiAction::SetContent(rest.to_string())),
        "tags" => ShellCommand::Action(UiAction::SetTags(rest.to_string())),
        "tag" => ShellCommand::Action(UiAction::TagAdd(rest.to_string())),
        "submit" => ShellCommand::Action(UiAction::NoteSubmit),
        "create" => ShellCommand::Action(UiAction::NavCreate),
        "list" => ShellCommand::Action(UiAction::NavList),
        "logout" => ShellCommand::Action(UiAction::LogoutRequest),
        "yes" | "y" => ShellCommand::Action(UiAction::LogoutConfirm),
        "no" | "n" => ShellCommand::Action(UiAction::LogoutCancel),
        "retry" => ShellCommand::Action(UiAction::ReloadRetry),
        "ok" => ShellCommand::Action(UiAction::ExpiredAcknowledge),
        "view" => ShellCommand::View,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        other => return Err(format!("unknown command '{other}' (try `help`)")),
    };
    Ok(Some(command))
}

/// Result of one shell step: lines to print, or the end of the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellStep {
    Output(Vec<String>),
    Quit,
}

pub async fn apply_shell_command<T: Transport, P: TokenPersistence>(
    app: &mut App<T, P>,
    command: ShellCommand,
) -> ShellStep {
    match command {
        ShellCommand::Quit => ShellStep::Quit,
        ShellCommand::Help => ShellStep::Output(HELP.iter().map(ToString::to_string).collect()),
        ShellCommand::View => ShellStep::Output(render_view(&app.view())),
        ShellCommand::Action(action) => {
            if dispatch(app, action).await {
                ShellStep::Output(render_view(&app.view()))
            } else {
                ShellStep::Output(vec!["Not available here.".to_string()])
            }
        }
    }
}

pub async fn run_shell(config: &ClientConfig) -> Result<(), CliError> {
    let mut app = open_app(config)?;
    print_lines(&render_view(&app.view()));

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("{PROMPT}");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            println!();
            break;
        };
        let command = match parse_shell_command(&line?) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                eprintln!("{message}");
                continue;
            }
        };

        match apply_shell_command(&mut app, command).await {
            ShellStep::Output(output) => print_lines(&output),
            ShellStep::Quit => break,
        }
    }
    Ok(())
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}
