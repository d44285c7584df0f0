//! Session state and the application-state container shared by the controller,
//! the transport listener and the route guard. Only the controller mutates the
//! session; everything else reads snapshots.

use crate::features::auth::{
    token::TokenStore,
    types::{Role, User},
};
use secrecy::{ExposeSecret, SecretString};
use std::{
    fmt,
    sync::{
        Arc, PoisonError, RwLock,
        atomic::{AtomicU64, Ordering},
    },
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionPhase {
    #[default]
    Anonymous,
    Authenticating,
    AuthenticatedNoProfile,
    AuthenticatedWithProfile,
    Failed,
}

impl SessionPhase {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Anonymous => "anonymous",
            Self::Authenticating => "authenticating",
            Self::AuthenticatedNoProfile => "authenticated_no_profile",
            Self::AuthenticatedWithProfile => "authenticated_with_profile",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// In-memory view of the operator session.
///
/// `user == None` with a token present is the transient "profile pending" state,
/// not an error.
#[derive(Clone, Debug, Default)]
pub struct Session {
    pub access_token: Option<SecretString>,
    pub refresh_token: Option<SecretString>,
    pub user: Option<User>,
    pub loading: bool,
    pub error: Option<String>,
    pub phase: SessionPhase,
}

impl Session {
    /// Session restored from persisted tokens; the profile is fetched later.
    #[must_use]
    pub fn from_tokens(access: Option<SecretString>, refresh: Option<SecretString>) -> Self {
        let phase = if access.is_some() {
            SessionPhase::AuthenticatedNoProfile
        } else {
            SessionPhase::Anonymous
        };
        Self {
            access_token: access,
            refresh_token: refresh,
            phase,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().and_then(|user| user.role)
    }

    /// True when the session currently holds exactly this access token.
    #[must_use]
    pub fn holds_token(&self, token: &str) -> bool {
        self.access_token
            .as_ref()
            .is_some_and(|current| current.expose_secret() == token)
    }

    /// Drops tokens and profile; `error` is kept so the caller decides whether
    /// to surface it.
    pub fn reset(&mut self) {
        self.access_token = None;
        self.refresh_token = None;
        self.user = None;
        self.loading = false;
        self.phase = SessionPhase::Anonymous;
    }

    /// Structural invariants between tokens, profile and phase.
    ///
    /// # Errors
    /// Returns a description of the first violated invariant.
    pub fn check_invariants(&self) -> Result<(), &'static str> {
        if self.user.is_some() && self.access_token.is_none() {
            return Err("profile present without an access token");
        }
        match self.phase {
            SessionPhase::AuthenticatedWithProfile if self.user.is_none() => {
                Err("authenticated_with_profile without a profile")
            }
            SessionPhase::AuthenticatedNoProfile if self.access_token.is_none() => {
                Err("authenticated_no_profile without an access token")
            }
            SessionPhase::Anonymous if self.access_token.is_some() => {
                Err("anonymous session still holds an access token")
            }
            _ => Ok(()),
        }
    }
}

/// Shared application state: the session, the token store and the session epoch.
///
/// The epoch increases whenever the session is torn down (logout or `401`), so
/// in-flight work started under an older epoch can detect that it is stale.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Inner>,
}

struct Inner {
    session: RwLock<Session>,
    store: Arc<dyn TokenStore>,
    epoch: AtomicU64,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self {
            inner: Arc::new(Inner {
                session: RwLock::new(Session::default()),
                store,
                epoch: AtomicU64::new(0),
            }),
        }
    }

    #[must_use]
    pub fn store(&self) -> &Arc<dyn TokenStore> {
        &self.inner.store
    }

    /// Cloned copy of the current session.
    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.read(Clone::clone)
    }

    pub fn read<R>(&self, f: impl FnOnce(&Session) -> R) -> R {
        let session = self
            .inner
            .session
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        f(&session)
    }

    /// Applies a transition under the write lock. Never call this across an await.
    pub fn update<R>(&self, f: impl FnOnce(&mut Session) -> R) -> R {
        let mut session = self
            .inner
            .session
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let result = f(&mut session);
        debug_assert!(
            session.check_invariants().is_ok(),
            "session invariant violated: {:?}",
            session.check_invariants()
        );
        result
    }

    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.inner.epoch.load(Ordering::SeqCst)
    }

    /// Marks every in-flight operation as stale; returns the new epoch.
    pub fn advance_epoch(&self) -> u64 {
        self.inner.epoch.fetch_add(1, Ordering::SeqCst) + 1
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("session", &self.snapshot())
            .field("epoch", &self.epoch())
            .finish_non_exhaustive()
    }
}
