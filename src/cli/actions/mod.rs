pub mod navigate;
pub mod resources;
pub mod session;

// Internal "interpreter" for `Action`.
// We keep the match in a separate module so `mod.rs` stays small as more actions are added.
mod run;

use crate::{
    config::AppConfig,
    features::auth::{
        AuthController, FileTokenStore, GuardDecision, RouteGuard,
    },
    navigation::{MemoryNavigator, Redirect},
};
use anyhow::{Context, Result, anyhow, bail};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug)]
pub enum Action {
    Session(session::Args),
    Navigate(navigate::Args),
    Resource(resources::Args),
}

impl Action {
    // Convenience wrapper so call sites can do `action.execute().await`.
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self) -> anyhow::Result<()> {
        run::execute(self).await
    }
}

/// Per-invocation wiring: file token store, recording navigator and the auth
/// controller, hydrated from disk.
pub(crate) struct Console {
    pub(crate) auth: AuthController,
    navigator: Arc<MemoryNavigator>,
}

impl Console {
    pub(crate) fn open(config: AppConfig) -> Result<Self> {
        let store = Arc::new(FileTokenStore::new(&config.state_dir));
        let navigator = Arc::new(MemoryNavigator::new());
        let auth = AuthController::build(config, store, navigator.clone())
            .context("failed to build HTTP client")?;
        auth.hydrate().context("failed to read stored session")?;
        Ok(Self { auth, navigator })
    }

    /// Loads the profile when a token is stored; failures leave the session as
    /// the controller set it.
    pub(crate) async fn load_profile(&self) {
        if !self.auth.session().is_authenticated() {
            return;
        }
        if let Err(err) = self.auth.fetch_profile().await {
            debug!("profile unavailable: {err}");
        }
    }

    /// Fails with a readable message unless the guard admits `path`.
    pub(crate) fn require(&self, path: &str) -> Result<()> {
        if let Some(redirect) = self.navigator.last() {
            bail!(session_ended(&redirect));
        }
        match RouteGuard::check(&self.auth.session(), path) {
            GuardDecision::Allow => Ok(()),
            GuardDecision::Redirect(Redirect::Landing) => bail!(
                "{path} is not available for your role (redirected to {})",
                Redirect::Landing.location()
            ),
            GuardDecision::Redirect(redirect) => bail!(
                "not logged in; run `garagedesk login` (redirected to {})",
                redirect.location()
            ),
        }
    }

    /// Turns a failed call into an error, naming the login redirect when the
    /// failure ended the session.
    pub(crate) fn failure(&self, err: impl std::fmt::Display) -> anyhow::Error {
        match self.navigator.last() {
            Some(redirect) => anyhow!("{err}. {}", session_ended(&redirect)),
            None => anyhow!("{err}"),
        }
    }
}

fn session_ended(redirect: &Redirect) -> String {
    format!(
        "Your session has expired; run `garagedesk login` (redirected to {})",
        redirect.location()
    )
}

/// Pretty JSON on stdout.
pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to render output")?;
    println!("{rendered}");
    Ok(())
}
