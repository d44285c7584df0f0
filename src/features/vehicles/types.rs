//! Vehicle records and form payloads.

use crate::{envelope::{ApiError, RecordId}, features::required};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Registration numbers: a leading letter, then letters/digits, ending in 1-4
/// digits (e.g. `MH05DU6253`). Checked after upper-casing.
pub fn valid_vehicle_number(number: &str) -> bool {
    Regex::new(r"^[A-Z][A-Z0-9]*[0-9]{1,4}$").is_ok_and(|re| re.is_match(number))
}

fn vehicle_number(value: &str) -> Result<String, ApiError> {
    let number = required("Vehicle Number", value)?.to_uppercase();
    if valid_vehicle_number(&number) {
        Ok(number)
    } else {
        Err(ApiError::Validation(
            "Vehicle Number must start with a letter and end with 1-4 digits (e.g. MH05DU6253)"
                .to_string(),
        ))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: RecordId,
    #[serde(default)]
    pub vehicle_number: Option<String>,
    /// Either a type id or `{id, name}`, depending on the endpoint.
    #[serde(default)]
    pub vehicle_type: Option<Value>,
    #[serde(default)]
    pub vehicle_model: Option<String>,
    #[serde(default)]
    pub vehicle_description: Option<String>,
    #[serde(default)]
    pub customer_id: Option<RecordId>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NewVehicle {
    pub vehicle_number: String,
    pub vehicle_type: i64,
    pub vehicle_model: String,
    pub vehicle_description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<i64>,
}

impl NewVehicle {
    /// Normalizes and checks the form.
    ///
    /// # Errors
    /// Returns [`ApiError::Validation`] for a missing or malformed vehicle
    /// number, a missing model or a non-positive type id.
    pub fn validated(self) -> Result<Self, ApiError> {
        if self.vehicle_type <= 0 {
            return Err(ApiError::Validation("Vehicle Type is required".to_string()));
        }
        Ok(Self {
            vehicle_number: vehicle_number(&self.vehicle_number)?,
            vehicle_model: required("Vehicle Model", &self.vehicle_model)?,
            vehicle_description: self.vehicle_description.trim().to_string(),
            ..self
        })
    }
}

/// Partial update; only the fields that are set are sent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct VehicleUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_type: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_description: Option<String>,
}

impl VehicleUpdate {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.vehicle_number.is_none()
            && self.vehicle_type.is_none()
            && self.vehicle_model.is_none()
            && self.vehicle_description.is_none()
    }

    /// # Errors
    /// Returns [`ApiError::Validation`] for an empty update or invalid fields.
    pub fn validated(self) -> Result<Self, ApiError> {
        if self.is_empty() {
            return Err(ApiError::Validation("Nothing to update".to_string()));
        }
        if self.vehicle_type.is_some_and(|id| id <= 0) {
            return Err(ApiError::Validation("Vehicle Type is required".to_string()));
        }
        Ok(Self {
            vehicle_number: self.vehicle_number.as_deref().map(vehicle_number).transpose()?,
            vehicle_model: self
                .vehicle_model
                .as_deref()
                .map(|model| required("Vehicle Model", model))
                .transpose()?,
            vehicle_description: self
                .vehicle_description
                .map(|description| description.trim().to_string()),
            ..self
        })
    }
}
