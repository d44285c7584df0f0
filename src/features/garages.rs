//! Garage onboarding (SUPER_ADMIN) and owner lookup.

use crate::{
    envelope::{ApiError, RecordId, into_field, into_message, to_body},
    features::{mobile, required},
    transport::HttpClient,
};
use serde::Serialize;
use tracing::instrument;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NewGarage {
    pub garage_name: String,
    pub mobile: String,
    pub address: String,
    /// Owner account.
    pub user_id: i64,
    pub whatsapp_number: String,
}

impl NewGarage {
    /// # Errors
    /// Returns [`ApiError::Validation`] for a blank name, an invalid mobile or
    /// WhatsApp number, or a missing owner.
    pub fn validated(self) -> Result<Self, ApiError> {
        if self.user_id <= 0 {
            return Err(ApiError::Validation("Owner is required".to_string()));
        }
        let whatsapp_number = match self.whatsapp_number.trim() {
            "" => String::new(),
            number => mobile("WhatsApp Number", number)?,
        };
        Ok(Self {
            garage_name: required("Garage Name", &self.garage_name)?,
            mobile: mobile("Mobile", &self.mobile)?,
            address: self.address.trim().to_string(),
            user_id: self.user_id,
            whatsapp_number,
        })
    }
}

/// # Errors
/// Returns validation errors before any request, then transport or envelope
/// errors.
#[instrument(skip(http, garage))]
pub async fn create(http: &HttpClient, garage: NewGarage) -> Result<String, ApiError> {
    let garage = garage.validated()?;
    let reply = http.post("/garages/create/", &to_body(&garage)?).await?;
    into_message(&reply, "Garage created successfully!")
}

/// Username of the account with `user_id`.
///
/// # Errors
/// Returns transport or envelope errors, or a decode error when the reply
/// carries no name.
#[instrument(skip(http))]
pub async fn owner_name(http: &HttpClient, user_id: &RecordId) -> Result<String, ApiError> {
    let user_id = user_id.path_segment()?;
    let reply = http.get(&format!("/garages/user-name/{user_id}/")).await?;
    into_field(&reply, &["username", "name", "user_name"])
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn garage() -> NewGarage {
        NewGarage {
            garage_name: " Speed Motors ".to_string(),
            mobile: "9876543210".to_string(),
            address: "MG Road".to_string(),
            user_id: 5,
            whatsapp_number: String::new(),
        }
    }

    #[test]
    fn whatsapp_is_optional() {
        let garage = garage().validated().unwrap();
        assert_eq!(garage.garage_name, "Speed Motors");
        assert_eq!(garage.whatsapp_number, "");
    }

    #[test]
    fn rejects_invalid_numbers_and_owner() {
        assert!(
            NewGarage {
                whatsapp_number: "123".to_string(),
                ..garage()
            }
            .validated()
            .is_err()
        );
        assert!(NewGarage { user_id: 0, ..garage() }.validated().is_err());
        assert!(
            NewGarage {
                mobile: String::new(),
                ..garage()
            }
            .validated()
            .is_err()
        );
    }
}
