use crate::cli::actions::{Action, navigate, resources, session};
use anyhow::Result;

/// Execute the provided action.
// This is the single dispatch point for all CLI actions.
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action) -> Result<()> {
    match action {
        Action::Session(args) => session::execute(args).await,
        Action::Navigate(args) => navigate::execute(args).await,
        Action::Resource(args) => resources::execute(args).await,
    }
}
