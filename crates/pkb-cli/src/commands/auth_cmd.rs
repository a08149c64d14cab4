use pkb_core::api::Transport;
use pkb_core::config::ClientConfig;
use pkb_core::models::{Credentials, Registration};
use pkb_core::router::Screen;
use pkb_core::session::TokenPersistence;
use pkb_core::{App, UiAction};

use crate::auth::{open_app, session_store};
use crate::commands::common::{confirm, dispatch};
use crate::error::CliError;

const ALREADY_SIGNED_IN: &str = "Already signed in. Run `pkb logout` first.";

pub async fn run_login(
    config: &ClientConfig,
    email: String,
    password: String,
) -> Result<(), CliError> {
    let mut app = open_app(config)?;
    login_with(&mut app, Credentials::new(email.clone(), password)).await?;
    println!("Signed in as {email}");
    Ok(())
}

pub async fn login_with<T: Transport, P: TokenPersistence>(
    app: &mut App<T, P>,
    credentials: Credentials,
) -> Result<(), CliError> {
    if app.view().screen == Screen::Notes {
        return Err(CliError::Rejected(ALREADY_SIGNED_IN.to_string()));
    }

    dispatch(app, UiAction::LoginSubmit(credentials)).await;
    let view = app.view();
    match view.login_error {
        Some(message) => Err(CliError::Auth(message)),
        None => Ok(()),
    }
}

pub async fn run_register(
    config: &ClientConfig,
    username: String,
    email: String,
    password: String,
    password_confirm: String,
) -> Result<(), CliError> {
    let mut app = open_app(config)?;
    let notice = register_with(
        &mut app,
        Registration {
            username,
            email,
            password,
            password_confirm,
        },
    )
    .await?;
    println!("Account created. {notice}: run `pkb login`.");
    Ok(())
}

/// Submit a registration and return the notice shown on the login screen.
pub async fn register_with<T: Transport, P: TokenPersistence>(
    app: &mut App<T, P>,
    registration: Registration,
) -> Result<String, CliError> {
    if !app.dispatch(UiAction::GoToRegister).await {
        return Err(CliError::Rejected(ALREADY_SIGNED_IN.to_string()));
    }

    dispatch(app, UiAction::RegisterSubmit(registration)).await;
    let view = app.view();
    if let Some(message) = view.register_error {
        return Err(CliError::Rejected(message));
    }
    Ok(view.notice.unwrap_or_default())
}

pub async fn run_logout(config: &ClientConfig, yes: bool) -> Result<(), CliError> {
    let mut app = open_app(config)?;
    if !app.session().has_token()? {
        println!("Not signed in.");
        return Ok(());
    }

    let confirmed = logout_with(&mut app, |question| {
        if yes {
            Ok(true)
        } else {
            confirm(question)
        }
    })
    .await?;

    if confirmed {
        println!("Signed out");
    } else {
        println!("Sign-out cancelled (pass --yes to skip the prompt)");
    }
    Ok(())
}

/// Open the confirmation modal and resolve it with `confirm`. Returns whether
/// the session was ended.
pub async fn logout_with<T: Transport, P: TokenPersistence>(
    app: &mut App<T, P>,
    confirm: impl FnOnce(&str) -> Result<bool, CliError>,
) -> Result<bool, CliError> {
    if !app.dispatch(UiAction::LogoutRequest).await {
        return Err(CliError::NotSignedIn);
    }

    if confirm("Sign out? [Y/n] ")? {
        app.dispatch(UiAction::LogoutConfirm).await;
        Ok(true)
    } else {
        app.dispatch(UiAction::LogoutCancel).await;
        Ok(false)
    }
}

pub fn run_status(config: &ClientConfig) -> Result<(), CliError> {
    if session_store().has_token()? {
        println!("Signed in to {}", config.api_base_url);
    } else {
        println!("Not signed in.");
    }
    Ok(())
}
