//! Console configuration: API base URL, state directory and transport timeouts.
//!
//! Defaults come from build-time environment variables so packaged builds can
//! point at a site-specific backend; the CLI then applies flag/env overrides.
//! Configuration values are public; do not store secrets here.

use std::{
    env::var,
    path::{Path, PathBuf},
    time::Duration,
};

/// Backend used when nothing else is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000/api";
/// Default per-request timeout applied by the transport.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
/// Default connect timeout applied by the transport.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

const STATE_DIR_NAME: &str = "garagedesk";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub api_base_url: String,
    pub state_dir: PathBuf,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
}

impl AppConfig {
    /// Loads build-time defaults for every field.
    #[must_use]
    pub fn load() -> Self {
        let api_base_url = option_env!("GARAGEDESK_API_BASE").unwrap_or(DEFAULT_API_BASE_URL);

        Self {
            api_base_url: normalize_base_url(api_base_url),
            state_dir: default_state_dir(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    /// Overrides the API base URL; blank values keep the current one.
    #[must_use]
    pub fn with_api_base_url(mut self, value: &str) -> Self {
        if let Some(value) = normalize_value(value) {
            self.api_base_url = normalize_base_url(&value);
        }
        self
    }

    #[must_use]
    pub fn with_state_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.state_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Overrides the request timeout; zero keeps the current one.
    #[must_use]
    pub fn with_request_timeout_secs(mut self, seconds: u64) -> Self {
        if seconds > 0 {
            self.request_timeout = Duration::from_secs(seconds);
        }
        self
    }

    /// Joins the base URL and an API path with exactly one slash between them.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        build_url_with_base(&self.api_base_url, path)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::load()
    }
}

/// Resolves `$XDG_STATE_HOME/garagedesk`, falling back to
/// `$HOME/.local/state/garagedesk` and finally a relative `.garagedesk`.
#[must_use]
pub fn default_state_dir() -> PathBuf {
    if let Some(state_home) = var("XDG_STATE_HOME").ok().as_deref().and_then(normalize_value) {
        return PathBuf::from(state_home).join(STATE_DIR_NAME);
    }
    if let Some(home) = var("HOME").ok().as_deref().and_then(normalize_value) {
        return PathBuf::from(home)
            .join(".local")
            .join("state")
            .join(STATE_DIR_NAME);
    }
    PathBuf::from(format!(".{STATE_DIR_NAME}"))
}

/// Builds a URL from an explicit base URL and the provided path.
#[must_use]
pub fn build_url_with_base(base_url: &str, path: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let path = path.trim();

    if base.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", base, path.trim_start_matches('/'))
    }
}

fn normalize_base_url(value: &str) -> String {
    value.trim().trim_end_matches('/').to_string()
}

fn normalize_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
