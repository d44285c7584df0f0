//! Auth controller: the only component that moves the session between phases.
//!
//! ```text
//! Anonymous/Failed --login--> Authenticating --tokens--> AuthenticatedNoProfile
//!        ^                          |                          |
//!        |                       failure                  fetch_profile
//!        |                          v                          v
//!        +------ logout / 401 ---- Failed     AuthenticatedWithProfile
//! ```
//!
//! Stale results are dropped: logout and session invalidation advance the
//! session epoch, so a login that resolves afterwards is discarded, and a
//! profile that arrives for a token the session no longer holds is ignored.

use crate::{
    config::AppConfig,
    errors::HttpError,
    features::auth::{
        client,
        expiry::looks_like_expired_token,
        state::{AppState, Session, SessionPhase},
        token::{StoreError, TokenKey, TokenStore},
        types::{LoginRequest, LoginResponse, User},
    },
    navigation::{Navigator, Redirect},
    routes::{self, LANDING_PATH, LOGIN_PATH},
    transport::{HttpClient, SessionInvalidated, SessionListener},
};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

const MISSING_CREDENTIALS: &str = "Username and password are required";
const LOGIN_FAILED: &str = "Login failed";
const MISSING_ACCESS_TOKEN: &str = "No access token returned from server";

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),
    /// Credentials rejected or token no longer valid.
    #[error("{0}")]
    Authentication(String),
    /// Profile could not be loaded; the session keeps its token.
    #[error("{0}")]
    ProfileFetch(String),
    #[error("{0}")]
    Network(String),
    #[error("{message}")]
    Server { status: u16, message: String },
    #[error("{0}")]
    MalformedResponse(String),
    #[error("Not authenticated")]
    NotAuthenticated,
    #[error("Superseded by a newer session change")]
    Superseded,
    #[error("{0}")]
    Storage(String),
}

impl From<HttpError> for AuthError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::Http {
                status: 401,
                message,
            } => Self::Authentication(message),
            HttpError::Http { status, message } => Self::Server { status, message },
            HttpError::Network(message)
            | HttpError::Timeout(message)
            | HttpError::Config(message) => Self::Network(message),
            HttpError::Parse(message) | HttpError::Serialization(message) => {
                Self::MalformedResponse(message)
            }
        }
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        Self::Storage(err.to_string())
    }
}

/// Reacts to `401`s seen by the transport: resets the session and sends the
/// operator to the login page once, however many requests failed together.
pub struct InvalidationHandler {
    state: AppState,
    navigator: Arc<dyn Navigator>,
}

impl InvalidationHandler {
    #[must_use]
    pub fn new(state: AppState, navigator: Arc<dyn Navigator>) -> Self {
        Self { state, navigator }
    }
}

impl SessionListener for InvalidationHandler {
    fn session_invalidated(&self, event: &SessionInvalidated) {
        let was_authenticated = self.state.update(|session| {
            if session.is_authenticated() {
                session.reset();
                session.error = None;
                true
            } else {
                false
            }
        });

        if !was_authenticated {
            debug!(method = %event.method, path = %event.path, "session already cleared");
            return;
        }

        self.state.advance_epoch();

        let store = self.state.store();
        if let Err(err) = store.clear_credentials() {
            warn!("failed to clear credentials after 401: {err}");
        }
        if let Err(err) = store.set(TokenKey::SessionExpired, "1") {
            warn!("failed to persist session-expired flag: {err}");
        }

        info!(method = %event.method, path = %event.path, "session expired; redirecting to login");
        self.navigator.navigate(&Redirect::expired());
    }
}

#[derive(Clone, Debug)]
pub struct AuthController {
    state: AppState,
    http: HttpClient,
}

impl AuthController {
    #[must_use]
    pub fn new(state: AppState, http: HttpClient) -> Self {
        Self { state, http }
    }

    /// Wires state, invalidation handler and transport around one token store.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn build(
        config: AppConfig,
        store: Arc<dyn TokenStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, HttpError> {
        let state = AppState::new(store.clone());
        let handler = Arc::new(InvalidationHandler::new(state.clone(), navigator));
        let http = HttpClient::new(config, store, Some(handler))?;
        Ok(Self::new(state, http))
    }

    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    #[must_use]
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    #[must_use]
    pub fn session(&self) -> Session {
        self.state.snapshot()
    }

    /// Restores the session from persisted tokens. The profile is not fetched.
    ///
    /// # Errors
    /// Returns [`AuthError::Storage`] if the token store cannot be read.
    pub fn hydrate(&self) -> Result<(), AuthError> {
        let store = self.state.store();
        let access = store.get(TokenKey::Access)?;
        let refresh = store.get(TokenKey::Refresh)?;
        let restored = access.is_some();

        self.state
            .update(|session| *session = Session::from_tokens(access, refresh));
        debug!(restored, "session hydrated");
        Ok(())
    }

    /// Logs in, persists the token pair and then loads the profile.
    ///
    /// A failing profile fetch does not fail the login; the session stays
    /// authenticated with the profile pending.
    ///
    /// # Errors
    /// Returns validation, authentication, transport or storage errors. The
    /// message is also recorded on the session. On failure the token store is
    /// left as it was.
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<(), AuthError> {
        let username = username.trim();
        let password = password.expose_secret();
        if username.is_empty() || password.trim().is_empty() {
            let err = AuthError::Validation(MISSING_CREDENTIALS.to_string());
            self.state
                .update(|session| session.error = Some(err.to_string()));
            return Err(err);
        }

        let epoch = self.state.epoch();
        self.state.update(|session| {
            session.loading = true;
            session.error = None;
            session.phase = SessionPhase::Authenticating;
        });
        debug!(username, "login started");

        let response = client::login(&self.http, &LoginRequest { username, password }).await;

        if self.state.epoch() != epoch {
            debug!(username, "login result discarded; session changed meanwhile");
            return Err(AuthError::Superseded);
        }

        let (access, refresh) = match response.map_err(AuthError::from).and_then(login_tokens) {
            Ok(tokens) => tokens,
            Err(err) => {
                self.fail_login(&err);
                return Err(err);
            }
        };

        if let Err(err) = self.persist_tokens(&access, refresh.as_deref()) {
            self.fail_login(&err);
            return Err(err);
        }

        self.state.update(|session| {
            session.access_token = Some(SecretString::from(access));
            session.refresh_token = refresh.map(SecretString::from);
            session.user = None;
            session.loading = false;
            session.error = None;
            session.phase = SessionPhase::AuthenticatedNoProfile;
        });
        info!(username, "login succeeded");

        if let Err(err) = self.fetch_profile().await {
            warn!("profile fetch after login failed: {err}");
        }
        Ok(())
    }

    fn persist_tokens(&self, access: &str, refresh: Option<&str>) -> Result<(), AuthError> {
        let store = self.state.store();
        store.set(TokenKey::Access, access)?;
        match refresh {
            Some(refresh) => store.set(TokenKey::Refresh, refresh)?,
            None => store.clear(TokenKey::Refresh)?,
        }
        store.clear(TokenKey::SessionExpired)?;
        Ok(())
    }

    fn fail_login(&self, err: &AuthError) {
        warn!("login failed: {err}");
        self.state.update(|session| {
            session.loading = false;
            session.error = Some(err.to_string());
            session.phase = SessionPhase::Failed;
        });
    }

    /// Loads the current user for the stored token.
    ///
    /// # Errors
    /// [`AuthError::NotAuthenticated`] without a token. An expired token (a
    /// `401`, or a message that reads like one) clears both tokens and returns
    /// [`AuthError::Authentication`]; any other failure keeps the token and
    /// returns [`AuthError::ProfileFetch`]. A result for a token the session no
    /// longer holds returns [`AuthError::Superseded`].
    pub async fn fetch_profile(&self) -> Result<(), AuthError> {
        let Some(token) = self.state.read(|session| {
            session
                .access_token
                .as_ref()
                .map(|token| token.expose_secret().to_string())
        }) else {
            return Err(AuthError::NotAuthenticated);
        };

        self.state.update(|session| {
            session.loading = true;
            session.error = None;
        });

        let response = client::current_user(&self.http).await;
        match response {
            Ok(body) => match User::from_profile(&body) {
                Ok(user) => self.apply_profile(&token, user),
                Err(message) => Err(self.profile_failed(&token, message)),
            },
            Err(err) if err.is_unauthorized() || looks_like_expired_token(err.message()) => {
                Err(self.profile_rejected(&token, err.message().to_string()))
            }
            Err(err) => Err(self.profile_failed(&token, err.message().to_string())),
        }
    }

    fn apply_profile(&self, token: &str, user: User) -> Result<(), AuthError> {
        let username = user.username.clone();
        let role = user.role;
        let applied = self.state.update(|session| {
            if !session.holds_token(token) {
                return false;
            }
            session.user = Some(user);
            session.loading = false;
            session.phase = SessionPhase::AuthenticatedWithProfile;
            true
        });

        if applied {
            info!(username, role = ?role, "profile loaded");
            Ok(())
        } else {
            debug!("profile discarded; session token changed meanwhile");
            Err(AuthError::Superseded)
        }
    }

    fn profile_rejected(&self, token: &str, message: String) -> AuthError {
        let cleared = self.state.update(|session| {
            let cleared = session.holds_token(token);
            if cleared {
                session.reset();
            }
            if cleared || session.phase == SessionPhase::Anonymous {
                session.error = Some(message.clone());
            }
            cleared
        });

        if cleared {
            self.state.advance_epoch();
            if let Err(err) = self.state.store().clear_credentials() {
                warn!("failed to clear credentials: {err}");
            }
        }
        warn!("profile fetch rejected the token: {message}");
        AuthError::Authentication(message)
    }

    fn profile_failed(&self, token: &str, message: String) -> AuthError {
        let current = self.state.update(|session| {
            if !session.holds_token(token) {
                return false;
            }
            session.loading = false;
            session.error = Some(message.clone());
            session.phase = if session.user.is_some() {
                SessionPhase::AuthenticatedWithProfile
            } else {
                SessionPhase::AuthenticatedNoProfile
            };
            true
        });

        if current {
            warn!("profile fetch failed: {message}");
            AuthError::ProfileFetch(message)
        } else {
            AuthError::Superseded
        }
    }

    /// Ends the session locally; with `remote` it first asks the backend to
    /// log out too, ignoring failures. Calling it again is harmless.
    ///
    /// # Errors
    /// Returns [`AuthError::Storage`] if the token files cannot be removed.
    pub async fn logout(&self, remote: bool) -> Result<(), AuthError> {
        let store = self.state.store();
        let had_token = store.get(TokenKey::Access)?.is_some();

        self.state.advance_epoch();
        self.state.update(|session| {
            session.reset();
            session.error = None;
        });

        if remote && had_token {
            match client::logout(&self.http).await {
                Ok(()) => debug!("remote logout acknowledged"),
                Err(err) => warn!("remote logout failed: {err}"),
            }
        }

        store.clear_credentials()?;
        store.clear(TokenKey::SessionExpired)?;
        info!(had_token, "logged out");
        Ok(())
    }

    /// Reads and clears the persisted session-expired flag.
    ///
    /// # Errors
    /// Returns [`AuthError::Storage`] on token store failures.
    pub fn take_expired_notice(&self) -> Result<bool, AuthError> {
        let store = self.state.store();
        let expired = store.get(TokenKey::SessionExpired)?.is_some();
        if expired {
            store.clear(TokenKey::SessionExpired)?;
        }
        Ok(expired)
    }

    /// Where to go after a successful login: the requested screen when it is a
    /// known route other than the login page, else the landing page.
    #[must_use]
    pub fn post_login_destination(return_to: Option<&str>) -> String {
        return_to
            .map(str::trim)
            .filter(|path| {
                let screen = routes::normalize_path(path);
                screen != LOGIN_PATH && routes::resolve(screen).is_some()
            })
            .unwrap_or(LANDING_PATH)
            .to_string()
    }
}

fn login_tokens(response: LoginResponse) -> Result<(String, Option<String>), AuthError> {
    if response.success == Some(false) {
        let message = response
            .message
            .map(|message| message.trim().to_string())
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| LOGIN_FAILED.to_string());
        return Err(AuthError::Authentication(message));
    }

    let tokens = response.data.and_then(|data| data.tokens);
    let (access, refresh) = tokens
        .map(|pair| (pair.access_token, pair.refresh_token))
        .unwrap_or_default();

    let non_blank = |value: Option<String>| {
        value
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    };

    let access = non_blank(access)
        .ok_or_else(|| AuthError::MalformedResponse(MISSING_ACCESS_TOKEN.to_string()))?;
    Ok((access, non_blank(refresh)))
}
