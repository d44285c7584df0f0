//! Client wrappers for the vehicle endpoints.

use crate::{
    envelope::{ApiError, RecordId, into_item, into_list, into_message, to_body},
    features::vehicles::types::{NewVehicle, Vehicle, VehicleUpdate},
    transport::HttpClient,
};
use tracing::instrument;

/// # Errors
/// Returns transport, envelope or decode errors.
#[instrument(skip(http))]
pub async fn list(http: &HttpClient) -> Result<Vec<Vehicle>, ApiError> {
    into_list(http.get("/vehicles/").await?)
}

/// # Errors
/// Returns transport, envelope or decode errors.
#[instrument(skip(http))]
pub async fn get(http: &HttpClient, id: &RecordId) -> Result<Vehicle, ApiError> {
    let id = id.path_segment()?;
    into_item(http.get(&format!("/vehicles/{id}/")).await?)
}

/// Returns the backend confirmation message.
///
/// # Errors
/// Returns validation errors before any request, then transport or envelope
/// errors.
#[instrument(skip(http, vehicle))]
pub async fn create(http: &HttpClient, vehicle: NewVehicle) -> Result<String, ApiError> {
    let vehicle = vehicle.validated()?;
    let reply = http.post("/vehicles/create/", &to_body(&vehicle)?).await?;
    into_message(&reply, "Vehicle created successfully!")
}

/// # Errors
/// Returns validation errors before any request, then transport or envelope
/// errors.
#[instrument(skip(http, update))]
pub async fn update(
    http: &HttpClient,
    id: &RecordId,
    update: VehicleUpdate,
) -> Result<String, ApiError> {
    let update = update.validated()?;
    let id = id.path_segment()?;
    let reply = http
        .patch(&format!("/vehicles/{id}/update/"), &to_body(&update)?)
        .await?;
    into_message(&reply, "Vehicle updated successfully!")
}

/// # Errors
/// Returns transport or envelope errors.
#[instrument(skip(http))]
pub async fn delete(http: &HttpClient, id: &RecordId) -> Result<String, ApiError> {
    let id = id.path_segment()?;
    let reply = http.delete(&format!("/vehicles/{id}/delete/")).await?;
    into_message(&reply, "Vehicle deleted successfully!")
}
