//! Redirect targets and the navigation sink.
//!
//! The auth core decides *that* the operator must move; a [`Navigator`] decides
//! what moving means for the embedding view (a browser history push, a CLI
//! message, a test recorder).

use crate::{
    features::auth::{guards::RouteGuard, state::Session},
    routes::{LANDING_PATH, LOGIN_PATH, MenuItem, ROUTES},
};
use std::sync::{Mutex, PoisonError};
use url::form_urlencoded;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Redirect {
    Login {
        /// Screen to return to after a successful login.
        return_to: Option<String>,
        /// Set when a `401` ended the session.
        expired: bool,
    },
    Landing,
}

impl Redirect {
    #[must_use]
    pub fn login(return_to: impl Into<String>) -> Self {
        Self::Login {
            return_to: Some(return_to.into()),
            expired: false,
        }
    }

    #[must_use]
    pub const fn expired() -> Self {
        Self::Login {
            return_to: None,
            expired: true,
        }
    }

    /// Location string, e.g. `/login?expired=1` or `/login?next=%2Fusers`.
    #[must_use]
    pub fn location(&self) -> String {
        match self {
            Self::Landing => LANDING_PATH.to_string(),
            Self::Login { return_to, expired } => {
                let mut query = form_urlencoded::Serializer::new(String::new());
                if *expired {
                    query.append_pair("expired", "1");
                }
                if let Some(path) = return_to {
                    query.append_pair("next", path);
                }
                let query = query.finish();
                if query.is_empty() {
                    LOGIN_PATH.to_string()
                } else {
                    format!("{LOGIN_PATH}?{query}")
                }
            }
        }
    }
}

pub trait Navigator: Send + Sync {
    fn navigate(&self, redirect: &Redirect);
}

/// Records redirects in order. The CLI reads the last one to tell the operator
/// where to go; tests assert on the full list.
#[derive(Debug, Default)]
pub struct MemoryNavigator {
    redirects: Mutex<Vec<Redirect>>,
}

impl MemoryNavigator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn redirects(&self) -> Vec<Redirect> {
        self.redirects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn last(&self) -> Option<Redirect> {
        self.redirects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

impl Navigator for MemoryNavigator {
    fn navigate(&self, redirect: &Redirect) {
        self.redirects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(redirect.clone());
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuEntry {
    pub section: &'static str,
    pub label: &'static str,
    pub path: &'static str,
}

/// Menu entries the session may open, in route-table order.
#[must_use]
pub fn menu(session: &Session) -> Vec<MenuEntry> {
    ROUTES
        .iter()
        .filter_map(|route| {
            let MenuItem { section, label } = route.menu?;
            RouteGuard::admits(session, route).then_some(MenuEntry {
                section,
                label,
                path: route.pattern,
            })
        })
        .collect()
}
