//! Client wrappers for the backend auth endpoints. Login goes through the
//! anonymous transport path; the payload carries credentials and must never be
//! logged.

use crate::{
    errors::HttpError,
    features::auth::types::{LoginRequest, LoginResponse},
    transport::HttpClient,
};
use reqwest::Method;
use serde_json::Value;

pub const LOGIN_PATH: &str = "/auth/login/";
pub const CURRENT_USER_PATH: &str = "/auth/current-user-details/";
pub const LOGOUT_PATH: &str = "/auth/logout/";

/// Exchanges credentials for a token pair.
///
/// # Errors
/// Returns transport errors, or [`HttpError::Parse`] when the body is not a
/// login response.
pub async fn login(http: &HttpClient, request: &LoginRequest<'_>) -> Result<LoginResponse, HttpError> {
    let body = serde_json::to_value(request)
        .map_err(|err| HttpError::Serialization(format!("Failed to encode login: {err}")))?;
    let response = http
        .request_anonymous(Method::POST, LOGIN_PATH, Some(&body))
        .await?;
    serde_json::from_value(response)
        .map_err(|err| HttpError::Parse(format!("Unexpected login response: {err}")))
}

/// Fetches the raw current-user payload with the stored bearer token.
///
/// # Errors
/// Returns transport errors; a `401` also triggers session invalidation.
pub async fn current_user(http: &HttpClient) -> Result<Value, HttpError> {
    http.get(CURRENT_USER_PATH).await
}

/// Best-effort server-side logout.
///
/// # Errors
/// Returns transport errors.
pub async fn logout(http: &HttpClient) -> Result<(), HttpError> {
    http.post(LOGOUT_PATH, &Value::Object(serde_json::Map::new()))
        .await
        .map(|_| ())
}
