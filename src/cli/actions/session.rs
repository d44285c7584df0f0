use crate::{
    cli::actions::{Console, print_json},
    config::AppConfig,
    features::auth::AuthController,
};
use anyhow::{Context, Result, bail};
use secrecy::SecretString;
use serde_json::json;
use std::io::{self, BufRead, Write};

#[derive(Debug)]
pub enum Command {
    Login {
        username: String,
        password: Option<SecretString>,
        next: Option<String>,
    },
    Logout {
        remote: bool,
    },
    Whoami,
}

#[derive(Debug)]
pub struct Args {
    pub config: AppConfig,
    pub command: Command,
}

/// # Errors
/// Returns an error if the session operation fails.
pub async fn execute(args: Args) -> Result<()> {
    let console = Console::open(args.config)?;

    match args.command {
        Command::Login {
            username,
            password,
            next,
        } => login(&console, &username, password, next.as_deref()).await,
        Command::Logout { remote } => {
            console.auth.logout(remote).await?;
            print_json(&json!({"message": "Logged out"}))
        }
        Command::Whoami => whoami(&console).await,
    }
}

async fn login(
    console: &Console,
    username: &str,
    password: Option<SecretString>,
    next: Option<&str>,
) -> Result<()> {
    if console.auth.take_expired_notice()? {
        eprintln!("Your session has expired. Please log in again.");
    }

    let password = match password {
        Some(password) => password,
        None => prompt_password()?,
    };

    if let Err(err) = console.auth.login(username, &password).await {
        bail!("Login failed: {err}");
    }

    let session = console.auth.session();
    if !session.is_authenticated() {
        // The profile request right after login was rejected; the operator is
        // told now, so the expired flag must not greet the next run too.
        console.auth.take_expired_notice()?;
        let reason = session
            .error
            .unwrap_or_else(|| "session ended right after login".to_string());
        return Err(console.failure(format!("Login failed: {reason}")));
    }

    print_json(&json!({
        "user": session.user,
        "phase": session.phase.as_str(),
        "profile_error": session.error,
        "next": AuthController::post_login_destination(next),
    }))
}

async fn whoami(console: &Console) -> Result<()> {
    if !console.auth.session().is_authenticated() {
        bail!("Not logged in; run `garagedesk login`");
    }

    console
        .auth
        .fetch_profile()
        .await
        .map_err(|err| console.failure(err))?;

    print_json(&console.auth.session().user)
}

fn prompt_password() -> Result<SecretString> {
    eprint!("Password: ");
    io::stderr().flush().context("failed to write prompt")?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read password from stdin")?;

    Ok(SecretString::from(
        line.trim_end_matches(['\r', '\n']).to_string(),
    ))
}
