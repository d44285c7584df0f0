//! Operator accounts (SUPER_ADMIN screens).

use crate::{
    envelope::{ApiError, RecordId, into_list, into_message},
    features::{auth::types::Role, required, valid_email},
    transport::HttpClient,
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tracing::instrument;

/// Account as listed by `GET /users/`. The role is kept verbatim; only the
/// session profile is normalized to [`Role`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: RecordId,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: SecretString,
    pub role: Role,
}

impl NewUser {
    /// # Errors
    /// Returns [`ApiError::Validation`] for a blank username or password, or a
    /// malformed email.
    pub fn validated(self) -> Result<Self, ApiError> {
        let username = required("Username", &self.username)?;
        if self.password.expose_secret().trim().is_empty() {
            return Err(ApiError::Validation("Password is required".to_string()));
        }
        let email = self.email.trim().to_string();
        if !email.is_empty() && !valid_email(&email) {
            return Err(ApiError::Validation("Email is not valid".to_string()));
        }
        Ok(Self {
            username,
            email,
            ..self
        })
    }

    fn body(&self) -> Value {
        json!({
            "username": self.username,
            "email": self.email,
            "password": self.password.expose_secret(),
            "role": self.role.as_str(),
        })
    }
}

/// # Errors
/// Returns transport, envelope or decode errors.
#[instrument(skip(http))]
pub async fn list(http: &HttpClient) -> Result<Vec<UserAccount>, ApiError> {
    into_list(http.get("/users/").await?)
}

/// The request body carries the password and must not be logged.
///
/// # Errors
/// Returns validation errors before any request, then transport or envelope
/// errors.
#[instrument(skip(http, user))]
pub async fn create(http: &HttpClient, user: NewUser) -> Result<String, ApiError> {
    let user = user.validated()?;
    let reply = http.post("/auth/users/create/", &user.body()).await?;
    into_message(&reply, "User created successfully!")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn user() -> NewUser {
        NewUser {
            username: " mechanic1 ".to_string(),
            email: String::new(),
            password: SecretString::from("s3cret".to_string()),
            role: Role::User,
        }
    }

    #[test]
    fn body_uses_canonical_role() {
        let body = user().validated().unwrap().body();
        assert_eq!(
            body,
            json!({"username": "mechanic1", "email": "", "password": "s3cret", "role": "USER"})
        );
    }

    #[test]
    fn rejects_bad_input() {
        assert!(
            NewUser {
                password: SecretString::from(" ".to_string()),
                ..user()
            }
            .validated()
            .is_err()
        );
        assert!(
            NewUser {
                email: "nope".to_string(),
                ..user()
            }
            .validated()
            .is_err()
        );
    }

    #[test]
    fn debug_hides_password() {
        assert!(!format!("{:?}", user()).contains("s3cret"));
    }
}
