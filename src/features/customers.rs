//! Garage customers: list, create and name lookup.

use crate::{
    envelope::{ApiError, RecordId, into_field, into_list, into_message, to_body},
    features::{mobile, required},
    transport::HttpClient,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::instrument;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: RecordId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub mobile: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Customer {
    /// Display name; some endpoints only return the linked account's username.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or_else(|| self.extra.get("username").and_then(Value::as_str))
            .unwrap_or("-")
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NewCustomer {
    pub name: String,
    pub mobile: String,
    pub address: String,
}

impl NewCustomer {
    /// # Errors
    /// Returns [`ApiError::Validation`] for a blank name or a mobile number that
    /// is not 10 digits.
    pub fn validated(self) -> Result<Self, ApiError> {
        Ok(Self {
            name: required("Name", &self.name)?,
            mobile: mobile("Mobile", &self.mobile)?,
            address: self.address.trim().to_string(),
        })
    }
}

/// # Errors
/// Returns transport, envelope or decode errors.
#[instrument(skip(http))]
pub async fn list(http: &HttpClient) -> Result<Vec<Customer>, ApiError> {
    into_list(http.get("/garages/customers").await?)
}

/// # Errors
/// Returns validation errors before any request, then transport or envelope
/// errors.
#[instrument(skip(http, customer))]
pub async fn create(http: &HttpClient, customer: NewCustomer) -> Result<String, ApiError> {
    let customer = customer.validated()?;
    let reply = http
        .post("/garages/customers/create/", &to_body(&customer)?)
        .await?;
    into_message(&reply, "Customer created successfully!")
}

/// # Errors
/// Returns transport or envelope errors, or a decode error when the reply
/// carries no name.
#[instrument(skip(http))]
pub async fn name(http: &HttpClient, id: &RecordId) -> Result<String, ApiError> {
    let id = id.path_segment()?;
    let reply = http.get(&format!("/garages/customer-name/{id}/")).await?;
    into_field(&reply, &["name", "customer_name"])
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_customer_validation() {
        let customer = NewCustomer {
            name: " Ravi ".to_string(),
            mobile: "9876543210".to_string(),
            address: " Pune ".to_string(),
        }
        .validated()
        .unwrap();
        assert_eq!(customer.name, "Ravi");
        assert_eq!(customer.address, "Pune");

        let err = NewCustomer {
            name: "Ravi".to_string(),
            mobile: "98765".to_string(),
            address: String::new(),
        }
        .validated()
        .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn display_name_falls_back_to_username() {
        let customer: Customer =
            serde_json::from_value(json!({"id": 1, "username": "ravi01"})).unwrap();
        assert_eq!(customer.display_name(), "ravi01");

        let anonymous: Customer = serde_json::from_value(json!({"id": 2})).unwrap();
        assert_eq!(anonymous.display_name(), "-");
    }
}
