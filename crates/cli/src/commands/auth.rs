//! Account commands: login, logout, register.

use std::path::Path;

use pasar_core::{BearerToken, Email};
use pasar_storefront::backend::{Credentials, Registration};
use secrecy::SecretString;

use crate::context::{CliError, Context, read_upload};

/// Log in and persist the issued token.
#[allow(clippy::print_stdout)]
pub async fn login(ctx: &Context, email: &str, password: String) -> Result<(), CliError> {
    let credentials = Credentials {
        email: Email::parse(email)?,
        password: SecretString::from(password),
    };

    let envelope = ctx.backend()?.login(&credentials).await?;
    let token = envelope
        .data
        .as_ref()
        .filter(|_| envelope.success)
        .and_then(|data| data.bearer_token())
        .ok_or_else(|| CliError::Rejected(rejection_message(&envelope.message, "Login failed")))?;

    ctx.store()?.set_token(&token)?;
    tracing::info!(email = %credentials.email, "Token stored");

    let name = envelope
        .data
        .as_ref()
        .and_then(|data| data.user.as_ref())
        .map_or(email, |user| user.name.as_str());
    println!("Logged in as {name}");
    Ok(())
}

/// Forget the stored token.
#[allow(clippy::print_stdout)]
pub fn logout(ctx: &Context) -> Result<(), CliError> {
    ctx.store()?.clear_token()?;
    println!("Logged out");
    Ok(())
}

/// Create an account, optionally uploading an avatar.
#[allow(clippy::print_stdout)]
pub async fn register(
    ctx: &Context,
    name: String,
    email: &str,
    password: String,
    avatar: Option<&Path>,
    avatar_url: Option<String>,
) -> Result<(), CliError> {
    let avatar = match avatar {
        Some(path) => Some(read_upload(path).await?),
        None => None,
    };

    let registration = Registration {
        name,
        email: Email::parse(email)?,
        password: SecretString::from(password),
        avatar_url,
        avatar,
    };

    let envelope = ctx.backend()?.register_user(&registration).await?;
    if !envelope.success {
        return Err(CliError::Rejected(rejection_message(
            &envelope.message,
            "Registration failed",
        )));
    }

    match envelope.data {
        Some(user) => println!("Registered {} <{}>", user.name, user.email),
        None => println!("Registered {}", registration.email),
    }
    println!("Run `pasar login` to start shopping.");
    Ok(())
}

/// The backend's message, or `fallback` when it sent none.
pub(crate) fn rejection_message(message: &str, fallback: &str) -> String {
    if message.trim().is_empty() {
        fallback.to_string()
    } else {
        message.to_string()
    }
}

/// The stored token, or `NotLoggedIn`.
pub(crate) fn require_token(ctx: &Context) -> Result<BearerToken, CliError> {
    ctx.store()?.token()?.ok_or(CliError::NotLoggedIn)
}
