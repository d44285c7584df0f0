//! Response normalization for the domain endpoints.
//!
//! Depending on the endpoint the backend answers with a `{success, message, data}`
//! envelope, a paginated `{results: [...]}` object, a bare array or a bare object.
//! API modules call these helpers so every screen sees plain typed values and an
//! explicit error when the backend reports `success: false`.

use crate::errors::{HttpError, message_from_json};
use regex::Regex;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::{fmt, str::FromStr};
use thiserror::Error;

/// Keys that may hold a list payload, in lookup order.
const LIST_KEYS: [&str; 3] = ["data", "results", "users"];

/// Identifiers arrive as numbers from most endpoints and as strings from a few.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

/// Rejected id text: it would not stay a single URL path segment.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("invalid record id: {0:?}")]
pub struct InvalidRecordId(pub String);

/// Text ids must start with a letter or digit and use URL-safe characters only,
/// so `/`, `?`, `#`, `%` and dot segments can never reach a request path.
fn valid_text_id(value: &str) -> bool {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._~-]*$").is_ok_and(|re| re.is_match(value))
}

impl RecordId {
    /// The id as one request path segment.
    ///
    /// # Errors
    /// Returns [`ApiError::Validation`] for text ids that could change the path.
    pub fn path_segment(&self) -> Result<String, ApiError> {
        match self {
            Self::Number(value) => Ok(value.to_string()),
            Self::Text(value) if valid_text_id(value) => Ok(value.clone()),
            Self::Text(value) => Err(ApiError::Validation(
                InvalidRecordId(value.clone()).to_string(),
            )),
        }
    }
}

/// Numeric ids stay numeric on the wire; anything else is sent as text.
impl FromStr for RecordId {
    type Err = InvalidRecordId;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        if let Ok(number) = value.parse::<i64>() {
            return Ok(Self::Number(number));
        }
        if valid_text_id(value) {
            Ok(Self::Text(value.to_string()))
        } else {
            Err(InvalidRecordId(value.to_string()))
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Http(#[from] HttpError),
    #[error("{0}")]
    Rejected(String),
    #[error("Unexpected response shape: {0}")]
    Decode(String),
    #[error("Invalid input: {0}")]
    Validation(String),
}

impl ApiError {
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Http(err) if err.is_unauthorized())
    }
}

/// Returns the `data` member of an envelope, or the value itself.
#[must_use]
pub fn unwrap_data(value: &Value) -> &Value {
    match value.get("data") {
        Some(data) if is_envelope(value) && !data.is_null() => data,
        _ => value,
    }
}

fn is_envelope(value: &Value) -> bool {
    value.get("success").is_some() || value.get("message").is_some()
}

/// Fails with the backend message when the envelope says `success: false`.
///
/// # Errors
/// Returns [`ApiError::Rejected`] for unsuccessful envelopes.
pub fn ensure_success(value: &Value) -> Result<(), ApiError> {
    if value.get("success").and_then(Value::as_bool) == Some(false) {
        let message = message_from_json(value).unwrap_or_else(|| "Request failed.".to_string());
        return Err(ApiError::Rejected(message));
    }
    Ok(())
}

/// Extracts a list from a bare array or from `data`/`results`/`users`.
///
/// # Errors
/// Returns an error for unsuccessful envelopes, for objects without a list member
/// and for list items that do not match `T`.
pub fn into_list<T: DeserializeOwned>(value: Value) -> Result<Vec<T>, ApiError> {
    ensure_success(&value)?;

    let items = match value {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        Value::Object(mut map) => LIST_KEYS
            .iter()
            .find_map(|key| match map.remove(*key) {
                Some(Value::Array(items)) => Some(items),
                _ => None,
            })
            .ok_or_else(|| ApiError::Decode("expected a list of records".to_string()))?,
        other => {
            return Err(ApiError::Decode(format!(
                "expected a list of records, got {other}"
            )));
        }
    };

    items
        .into_iter()
        .map(|item| serde_json::from_value(item).map_err(|err| ApiError::Decode(err.to_string())))
        .collect()
}

/// Extracts a single record from a bare object or an envelope's `data`.
///
/// # Errors
/// Returns an error for unsuccessful envelopes or records that do not match `T`.
pub fn into_item<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    ensure_success(&value)?;
    serde_json::from_value(unwrap_data(&value).clone())
        .map_err(|err| ApiError::Decode(err.to_string()))
}

/// First non-blank string among `keys`, looked up on the unwrapped record.
///
/// # Errors
/// Returns an error for unsuccessful envelopes or when none of the keys holds
/// a string.
pub fn into_field(value: &Value, keys: &[&str]) -> Result<String, ApiError> {
    ensure_success(value)?;
    let record = unwrap_data(value);
    keys.iter()
        .filter_map(|key| record.get(key).and_then(Value::as_str))
        .map(str::trim)
        .find(|text| !text.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ApiError::Decode(format!("expected one of {}", keys.join(", "))))
}

/// JSON body for a form payload.
///
/// # Errors
/// Returns [`ApiError::Decode`] if the payload cannot be represented as JSON.
pub fn to_body<T: Serialize>(payload: &T) -> Result<Value, ApiError> {
    serde_json::to_value(payload)
        .map_err(|err| ApiError::Decode(format!("Failed to encode request: {err}")))
}

/// Message for a mutation reply: `message`, then `detail`, then `default`.
///
/// # Errors
/// Returns an error for unsuccessful envelopes.
pub fn into_message(value: &Value, default: &str) -> Result<String, ApiError> {
    ensure_success(value)?;
    Ok(["message", "detail"]
        .iter()
        .filter_map(|key| value.get(key).and_then(Value::as_str))
        .map(str::trim)
        .find(|text| !text.is_empty())
        .unwrap_or(default)
        .to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        id: RecordId,
    }

    #[test]
    fn list_from_every_supported_shape() {
        for payload in [
            json!([{"id": 1}]),
            json!({"success": true, "data": [{"id": 1}]}),
            json!({"count": 1, "results": [{"id": 1}]}),
            json!({"users": [{"id": 1}]}),
        ] {
            let items: Vec<Item> = into_list(payload).unwrap();
            assert_eq!(items, vec![Item { id: RecordId::Number(1) }]);
        }
    }

    #[test]
    fn list_from_null_is_empty() {
        let items: Vec<Item> = into_list(Value::Null).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn list_rejects_unsuccessful_envelope() {
        let result: Result<Vec<Item>, _> =
            into_list(json!({"success": false, "message": "Garage not linked"}));
        assert!(matches!(result, Err(ApiError::Rejected(message)) if message == "Garage not linked"));
    }

    #[test]
    fn list_rejects_object_without_list() {
        let result: Result<Vec<Item>, _> = into_list(json!({"success": true, "data": {"id": 1}}));
        assert!(matches!(result, Err(ApiError::Decode(_))));
    }

    #[test]
    fn item_from_envelope_or_bare() {
        let bare: Item = into_item(json!({"id": "abc"})).unwrap();
        assert_eq!(bare.id, RecordId::Text("abc".to_string()));

        let wrapped: Item = into_item(json!({"success": true, "data": {"id": 9}})).unwrap();
        assert_eq!(wrapped.id, RecordId::Number(9));
    }

    #[test]
    fn bare_record_with_data_field_is_not_unwrapped() {
        let value = json!({"id": 3, "data": "payload"});
        assert_eq!(unwrap_data(&value), &value);
    }

    #[test]
    fn message_prefers_message_then_detail_then_default() {
        assert_eq!(
            into_message(&json!({"message": "Vehicle created"}), "ok").unwrap(),
            "Vehicle created"
        );
        assert_eq!(
            into_message(&json!({"detail": "Deleted"}), "ok").unwrap(),
            "Deleted"
        );
        assert_eq!(into_message(&Value::Null, "ok").unwrap(), "ok");
    }

    #[test]
    fn field_lookup_follows_key_order() {
        let keys = ["name", "customer_name"];
        assert_eq!(
            into_field(&json!({"customer_name": "Ravi"}), &keys).unwrap(),
            "Ravi"
        );
        assert_eq!(
            into_field(&json!({"success": true, "data": {"name": " Asha "}}), &keys).unwrap(),
            "Asha"
        );
        assert!(matches!(
            into_field(&json!({"name": ""}), &keys),
            Err(ApiError::Decode(_))
        ));
    }

    #[test]
    fn record_id_from_cli_text() {
        assert_eq!("42".parse::<RecordId>(), Ok(RecordId::Number(42)));
        assert_eq!(
            " v-1 ".parse::<RecordId>(),
            Ok(RecordId::Text("v-1".to_string()))
        );
        for raw in ["../users", "..", ".", "a/b", "7?x=1", "7#top", "%2e%2e", ""] {
            assert_eq!(
                raw.parse::<RecordId>(),
                Err(InvalidRecordId(raw.to_string())),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn path_segment_refuses_unsafe_text() {
        assert_eq!(RecordId::Number(7).path_segment().unwrap(), "7");
        assert_eq!(
            RecordId::Text("v-1.2".to_string()).path_segment().unwrap(),
            "v-1.2"
        );
        assert!(matches!(
            RecordId::Text("../users".to_string()).path_segment(),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn record_id_display() {
        assert_eq!(RecordId::Number(12).to_string(), "12");
        assert_eq!(RecordId::Text("v-1".to_string()).to_string(), "v-1");
    }
}
