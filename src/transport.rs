//! HTTP transport shared by every API module.
//!
//! Flow Overview:
//! - `request` reads the access token from the token store on every call and
//!   attaches `Authorization: Bearer <token>` when one exists.
//! - `request_anonymous` is reserved for login: it never sends a token, so a
//!   stale credential cannot make the backend reject a fresh login, and its
//!   failures are never treated as session loss.
//! - Any `401` on the authenticated path clears the credential slots and emits a
//!   [`SessionInvalidated`] event to the registered [`SessionListener`] before the
//!   error is returned. The transport never decides where the operator goes next.
//!
//! Timeouts are transport configuration (`AppConfig::request_timeout`); callers do
//! not add their own.

use crate::{
    APP_USER_AGENT,
    config::AppConfig,
    errors::{HttpError, extract_error_message},
    features::auth::token::{TokenKey, TokenStore},
};
use reqwest::{Client, Method, StatusCode, header};
use secrecy::ExposeSecret;
use serde_json::Value;
use std::{fmt, sync::Arc};
use tracing::{Instrument, debug, info_span, warn};
use ulid::Ulid;

/// Emitted when an authenticated call comes back `401`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionInvalidated {
    pub method: Method,
    pub path: String,
}

/// Subscriber for session invalidation; called synchronously on the failing call.
pub trait SessionListener: Send + Sync {
    fn session_invalidated(&self, event: &SessionInvalidated);
}

#[derive(Clone)]
pub struct HttpClient {
    inner: Arc<Inner>,
}

struct Inner {
    client: Client,
    config: AppConfig,
    store: Arc<dyn TokenStore>,
    listener: Option<Arc<dyn SessionListener>>,
}

impl HttpClient {
    /// Builds a client bound to the configured API base URL.
    ///
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(
        config: AppConfig,
        store: Arc<dyn TokenStore>,
        listener: Option<Arc<dyn SessionListener>>,
    ) -> Result<Self, HttpError> {
        let client = Client::builder()
            .user_agent(APP_USER_AGENT)
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|err| HttpError::Config(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            inner: Arc::new(Inner {
                client,
                config,
                store,
                listener,
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Sends an authenticated request and returns the decoded JSON body.
    ///
    /// # Errors
    /// Returns [`HttpError`] for network failures, timeouts, non-2xx statuses and
    /// undecodable bodies. A `401` additionally clears the stored credentials and
    /// notifies the session listener.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, HttpError> {
        let token = self
            .inner
            .store
            .get(TokenKey::Access)
            .map_err(|err| HttpError::Config(err.to_string()))?;

        let result = self
            .send(
                method.clone(),
                path,
                body,
                token.as_ref().map(|token| token.expose_secret()),
            )
            .await;

        if let Err(err) = &result
            && err.is_unauthorized()
        {
            self.invalidate(method, path);
        }

        result
    }

    /// Sends a request without any credentials and without `401` interception.
    /// Only the login call uses this path.
    ///
    /// # Errors
    /// Returns [`HttpError`] for network failures, timeouts, non-2xx statuses and
    /// undecodable bodies.
    pub async fn request_anonymous(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, HttpError> {
        self.send(method, path, body, None).await
    }

    /// # Errors
    /// See [`HttpClient::request`].
    pub async fn get(&self, path: &str) -> Result<Value, HttpError> {
        self.request(Method::GET, path, None).await
    }

    /// # Errors
    /// See [`HttpClient::request`].
    pub async fn post(&self, path: &str, body: &Value) -> Result<Value, HttpError> {
        self.request(Method::POST, path, Some(body)).await
    }

    /// # Errors
    /// See [`HttpClient::request`].
    pub async fn patch(&self, path: &str, body: &Value) -> Result<Value, HttpError> {
        self.request(Method::PATCH, path, Some(body)).await
    }

    /// # Errors
    /// See [`HttpClient::request`].
    pub async fn delete(&self, path: &str) -> Result<Value, HttpError> {
        self.request(Method::DELETE, path, None).await
    }

    fn invalidate(&self, method: Method, path: &str) {
        warn!(%method, path, "authenticated request rejected with 401; clearing session");

        if let Err(err) = self.inner.store.clear_credentials() {
            warn!("failed to clear stored credentials: {err}");
        }

        if let Some(listener) = &self.inner.listener {
            listener.session_invalidated(&SessionInvalidated {
                method,
                path: path.to_string(),
            });
        }
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        token: Option<&str>,
    ) -> Result<Value, HttpError> {
        let url = self.inner.config.endpoint(path);
        let request_id = Ulid::new().to_string();

        let span = info_span!(
            "garagedesk.http",
            http.method = %method,
            url = %url,
            request_id = %request_id,
            authenticated = token.is_some()
        );

        let mut request = self
            .inner
            .client
            .request(method, &url)
            .header(header::ACCEPT, "application/json")
            .header("X-Request-Id", &request_id);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        async move {
            let response = request.send().await?;
            handle_json_response(response).await
        }
        .instrument(span)
        .await
    }
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("api_base_url", &self.inner.config.api_base_url)
            .field("listener", &self.inner.listener.is_some())
            .finish_non_exhaustive()
    }
}

/// Decodes 2xx bodies (empty → `Null`) and maps everything else to
/// [`HttpError::Http`] with the extracted backend message.
async fn handle_json_response(response: reqwest::Response) -> Result<Value, HttpError> {
    let status = response.status();
    let text = response.text().await?;
    debug!(status = status.as_u16(), "response received");

    if status.is_success() {
        if status == StatusCode::NO_CONTENT || text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text)
            .map_err(|err| HttpError::Parse(format!("Failed to decode response: {err}")))
    } else {
        Err(HttpError::Http {
            status: status.as_u16(),
            message: extract_error_message(&text),
        })
    }
}
