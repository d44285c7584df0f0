//! Transport-level errors and the backend error-message extraction rules.
//!
//! The backend is inconsistent about where it puts a human-readable failure
//! reason, so every non-2xx body goes through [`extract_error_message`] before it
//! reaches a caller. Messages are trimmed and truncated; they must never contain
//! token material.

use serde_json::Value;
use thiserror::Error;

/// Maximum number of error body characters surfaced to the operator.
const MAX_ERROR_CHARS: usize = 200;
/// Message used when the backend gives nothing usable.
pub const FALLBACK_ERROR_MESSAGE: &str = "Request failed.";

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum HttpError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Timeout: {0}")]
    Timeout(String),
    #[error("Request failed ({status}): {message}")]
    Http { status: u16, message: String },
    #[error("Response error: {0}")]
    Parse(String),
    #[error("Request error: {0}")]
    Serialization(String),
}

impl HttpError {
    /// Status code for HTTP failures, `None` for transport-level errors.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Http { status: 401, .. })
    }

    /// The operator-facing reason without the variant prefix.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Config(message)
            | Self::Network(message)
            | Self::Timeout(message)
            | Self::Parse(message)
            | Self::Serialization(message)
            | Self::Http { message, .. } => message,
        }
    }
}

impl From<reqwest::Error> for HttpError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout("Request timed out. Please try again.".to_string())
        } else if err.is_builder() {
            Self::Config(format!("Failed to build request: {err}"))
        } else if err.is_decode() {
            Self::Parse(format!("Failed to decode response: {err}"))
        } else {
            Self::Network(format!("Unable to reach the server: {err}"))
        }
    }
}

/// Picks the most useful message out of an error body.
///
/// Priority: `message`, `detail`, `error` string fields of a JSON object, then the
/// raw body itself, then [`FALLBACK_ERROR_MESSAGE`].
#[must_use]
pub fn extract_error_message(body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<Value>(body)
        && let Some(message) = message_from_json(&json)
    {
        return message;
    }

    sanitize_body(body).unwrap_or_else(|| FALLBACK_ERROR_MESSAGE.to_string())
}

/// Reads `message`, `detail` or `error` (in that order) from a JSON object.
#[must_use]
pub fn message_from_json(json: &Value) -> Option<String> {
    ["message", "detail", "error"]
        .iter()
        .filter_map(|key| json.get(key))
        .find_map(field_text)
}

fn field_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => sanitize_body(text),
        // DRF-style validation errors: {"detail": ["..."]}
        Value::Array(items) => items.iter().find_map(field_text),
        _ => None,
    }
}

/// Trims and truncates a body for display; `None` when nothing is left.
fn sanitize_body(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.chars().take(MAX_ERROR_CHARS).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_field_wins_over_detail_and_error() {
        let body = r#"{"error":"e","detail":"d","message":"Invalid credentials"}"#;
        assert_eq!(extract_error_message(body), "Invalid credentials");
    }

    #[test]
    fn detail_used_when_message_missing() {
        let body = r#"{"detail":"Given token not valid for any token type"}"#;
        assert_eq!(
            extract_error_message(body),
            "Given token not valid for any token type"
        );
    }

    #[test]
    fn error_used_last() {
        assert_eq!(extract_error_message(r#"{"error":"boom"}"#), "boom");
    }

    #[test]
    fn blank_fields_fall_through() {
        let body = r#"{"message":"  ","detail":"second"}"#;
        assert_eq!(extract_error_message(body), "second");
    }

    #[test]
    fn raw_body_when_no_known_field() {
        let body = r#"{"username":["This field is required."]}"#;
        assert_eq!(extract_error_message(body), body);
    }

    #[test]
    fn plain_text_body_is_truncated() {
        let body = "x".repeat(500);
        assert_eq!(extract_error_message(&body).len(), MAX_ERROR_CHARS);
    }

    #[test]
    fn empty_body_uses_fallback() {
        assert_eq!(extract_error_message("   "), FALLBACK_ERROR_MESSAGE);
    }

    #[test]
    fn http_error_status_helpers() {
        let err = HttpError::Http {
            status: 401,
            message: "expired".to_string(),
        };
        assert!(err.is_unauthorized());
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.message(), "expired");
        assert_eq!(err.to_string(), "Request failed (401): expired");
        assert_eq!(HttpError::Network("down".to_string()).status(), None);
    }
}
