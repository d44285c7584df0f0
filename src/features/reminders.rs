//! Reminder view: service records whose reminder has not been sent yet, soonest
//! first.

use crate::{
    envelope::ApiError,
    features::services::{self, ServiceRecord},
    transport::HttpClient,
};

pub const PENDING: &str = "PENDING";

/// Pending records ordered by `next_service_date`; records without a date go
/// last. ISO dates sort correctly as strings.
#[must_use]
pub fn pending(records: Vec<ServiceRecord>) -> Vec<ServiceRecord> {
    let mut pending: Vec<_> = records
        .into_iter()
        .filter(|record| record.reminder_status.as_deref() == Some(PENDING))
        .collect();
    pending.sort_by(|a, b| {
        match (a.next_service_date.as_deref(), b.next_service_date.as_deref()) {
            (Some(a), Some(b)) => a.cmp(b),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        }
    });
    pending
}

/// # Errors
/// Returns the errors of [`services::list`].
pub async fn list(http: &HttpClient) -> Result<Vec<ServiceRecord>, ApiError> {
    services::list(http).await.map(pending)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keeps_pending_sorted_by_next_date() {
        let records: Vec<ServiceRecord> = serde_json::from_value(json!([
            {"id": 1, "reminder_status": "SENT", "next_service_date": "2025-01-01"},
            {"id": 2, "reminder_status": "PENDING", "next_service_date": "2025-06-01"},
            {"id": 3, "reminder_status": "PENDING"},
            {"id": 4, "reminder_status": "PENDING", "next_service_date": "2025-02-15"},
            {"id": 5, "reminder_status": "pending", "next_service_date": "2024-01-01"}
        ]))
        .unwrap();

        let ids: Vec<String> = pending(records)
            .into_iter()
            .map(|record| record.id.to_string())
            .collect();
        assert_eq!(ids, ["4", "2", "3"]);
    }
}
