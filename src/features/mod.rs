//! Feature modules. `auth` owns the session lifecycle; the remaining modules
//! are thin wrappers over the garage backend's REST endpoints and never touch
//! session state directly.
//!
//! Form checks shared by the domain modules live here. They run before any
//! request is sent so obviously bad input never reaches the backend.

pub mod auth;
pub mod customers;
pub mod garages;
pub mod reminders;
pub mod services;
pub mod users;
pub mod vehicles;

use crate::envelope::ApiError;
use regex::Regex;

/// Ten-digit phone numbers, as the backend stores them.
pub fn valid_mobile(mobile: &str) -> bool {
    Regex::new(r"^\d{10}$").is_ok_and(|re| re.is_match(mobile))
}

/// Lightweight email sanity check.
pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|re| re.is_match(email))
}

/// `YYYY-MM-DD`; calendar validity is left to the backend.
pub fn valid_date(date: &str) -> bool {
    Regex::new(r"^\d{4}-\d{2}-\d{2}$").is_ok_and(|re| re.is_match(date))
}

/// Trimmed value, or a validation error naming the field.
pub(crate) fn required(field: &str, value: &str) -> Result<String, ApiError> {
    let value = value.trim();
    if value.is_empty() {
        Err(ApiError::Validation(format!("{field} is required")))
    } else {
        Ok(value.to_string())
    }
}

pub(crate) fn mobile(field: &str, value: &str) -> Result<String, ApiError> {
    let value = required(field, value)?;
    if valid_mobile(&value) {
        Ok(value)
    } else {
        Err(ApiError::Validation(format!(
            "{field} must be a 10 digit number"
        )))
    }
}
