use crate::{
    cli::actions::{Console, print_json},
    config::AppConfig,
    features::auth::{GuardDecision, RouteGuard},
    navigation,
};
use anyhow::Result;
use serde_json::json;

#[derive(Debug)]
pub enum Command {
    /// Evaluate the route guard for one screen.
    Open { path: String },
    /// Role-filtered menu.
    Menu,
}

#[derive(Debug)]
pub struct Args {
    pub config: AppConfig,
    pub command: Command,
}

/// # Errors
/// Returns an error if the session cannot be loaded or output fails.
pub async fn execute(args: Args) -> Result<()> {
    let console = Console::open(args.config)?;
    console.load_profile().await;
    let session = console.auth.session();

    match args.command {
        Command::Open { path } => {
            let output = match RouteGuard::check(&session, &path) {
                GuardDecision::Allow => json!({"path": path, "allowed": true}),
                GuardDecision::Redirect(redirect) => json!({
                    "path": path,
                    "allowed": false,
                    "redirect": redirect.location(),
                }),
            };
            print_json(&output)
        }
        Command::Menu => {
            let entries: Vec<_> = navigation::menu(&session)
                .into_iter()
                .map(|entry| {
                    json!({
                        "section": entry.section,
                        "label": entry.label,
                        "path": entry.path,
                    })
                })
                .collect();
            print_json(&entries)
        }
    }
}
