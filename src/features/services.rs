//! Service records. The backend derives `next_service_date` and the reminder
//! status from the service date and interval.

use crate::{
    envelope::{ApiError, RecordId, into_list, into_message, to_body},
    features::{required, valid_date},
    transport::HttpClient,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::instrument;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ServiceRecord {
    pub id: RecordId,
    #[serde(default)]
    pub service_type: Option<String>,
    #[serde(default)]
    pub service_date: Option<String>,
    #[serde(default)]
    pub service_interval_months: Option<i64>,
    #[serde(default)]
    pub next_service_date: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub reminder_status: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NewServiceRecord {
    pub vehicle_id: i64,
    pub customer_id: i64,
    pub service_date: String,
    pub service_interval_months: u32,
    pub notes: String,
}

impl NewServiceRecord {
    /// # Errors
    /// Returns [`ApiError::Validation`] for missing ids, a date that is not
    /// `YYYY-MM-DD` or a zero interval.
    pub fn validated(self) -> Result<Self, ApiError> {
        if self.vehicle_id <= 0 {
            return Err(ApiError::Validation("Vehicle is required".to_string()));
        }
        if self.customer_id <= 0 {
            return Err(ApiError::Validation("Customer is required".to_string()));
        }
        let service_date = required("Service Date", &self.service_date)?;
        if !valid_date(&service_date) {
            return Err(ApiError::Validation(
                "Service Date must be YYYY-MM-DD".to_string(),
            ));
        }
        if self.service_interval_months == 0 {
            return Err(ApiError::Validation(
                "Service interval must be at least one month".to_string(),
            ));
        }
        Ok(Self {
            service_date,
            notes: self.notes.trim().to_string(),
            ..self
        })
    }
}

/// # Errors
/// Returns transport, envelope or decode errors.
#[instrument(skip(http))]
pub async fn list(http: &HttpClient) -> Result<Vec<ServiceRecord>, ApiError> {
    into_list(http.get("/services/list").await?)
}

/// # Errors
/// Returns validation errors before any request, then transport or envelope
/// errors.
#[instrument(skip(http, record))]
pub async fn create(http: &HttpClient, record: NewServiceRecord) -> Result<String, ApiError> {
    let record = record.validated()?;
    let reply = http.post("/services/create/", &to_body(&record)?).await?;
    into_message(&reply, "Service record created successfully!")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> NewServiceRecord {
        NewServiceRecord {
            vehicle_id: 3,
            customer_id: 7,
            service_date: "2025-03-01".to_string(),
            service_interval_months: 6,
            notes: " oil change ".to_string(),
        }
    }

    #[test]
    fn valid_record_is_trimmed() {
        let record = record().validated().ok();
        assert_eq!(record.map(|r| r.notes), Some("oil change".to_string()));
    }

    #[test]
    fn invalid_records_are_rejected() {
        for record in [
            NewServiceRecord {
                vehicle_id: 0,
                ..record()
            },
            NewServiceRecord {
                customer_id: -1,
                ..record()
            },
            NewServiceRecord {
                service_date: "01/03/2025".to_string(),
                ..record()
            },
            NewServiceRecord {
                service_interval_months: 0,
                ..record()
            },
        ] {
            assert!(matches!(record.validated(), Err(ApiError::Validation(_))));
        }
    }
}
