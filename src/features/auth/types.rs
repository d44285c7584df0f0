//! Request and response types for the auth endpoints, plus the normalized user
//! profile. Login payloads carry credentials and tokens, so they must never be
//! logged.

use crate::envelope::{RecordId, unwrap_data};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::warn;

#[derive(Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Token pair returned by `POST /auth/login/`.
#[derive(Clone, Deserialize)]
pub struct TokenPair {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[derive(Clone, Deserialize)]
pub struct LoginData {
    pub tokens: Option<TokenPair>,
}

/// `{success, message, data: {tokens: {access_token, refresh_token}}}`
#[derive(Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<LoginData>,
}

impl fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginResponse")
            .field("success", &self.success)
            .field("message", &self.message)
            .field("data", &self.data.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Roles known to the console. Anything else is treated as "no role".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Role {
    #[serde(rename = "SUPER_ADMIN")]
    SuperAdmin,
    #[serde(rename = "ADMIN")]
    Admin,
    #[serde(rename = "USER")]
    User,
}

impl Role {
    pub const ALL: [Self; 3] = [Self::SuperAdmin, Self::Admin, Self::User];

    /// Canonical backend spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SuperAdmin => "SUPER_ADMIN",
            Self::Admin => "ADMIN",
            Self::User => "USER",
        }
    }

    /// Exact, case-sensitive match against the canonical spelling.
    #[must_use]
    pub fn from_wire(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.as_str() == value)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authenticated operator profile.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: Option<RecordId>,
    pub username: String,
    pub email: Option<String>,
    pub role: Option<Role>,
}

#[derive(Deserialize)]
struct RawUser {
    #[serde(default)]
    id: Option<RecordId>,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    roles: Option<Vec<String>>,
}

impl User {
    /// Builds a user from the current-user payload, bare or wrapped in a
    /// `{success, data}` envelope. The role is resolved once here: `role` wins,
    /// then the first recognised entry of `roles[]`.
    ///
    /// # Errors
    /// Returns a message when the payload is not a user object or lacks a username.
    pub fn from_profile(payload: &Value) -> Result<Self, String> {
        let body = unwrap_data(payload);
        let raw: RawUser = serde_json::from_value(body.clone())
            .map_err(|err| format!("Failed to decode current user: {err}"))?;

        let username = raw
            .username
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .ok_or_else(|| "Current user response has no username".to_string())?;

        let role = resolve_role(raw.role.as_deref(), raw.roles.as_deref());

        Ok(Self {
            id: raw.id,
            username,
            email: raw.email.filter(|email| !email.trim().is_empty()),
            role,
        })
    }
}

fn resolve_role(role: Option<&str>, roles: Option<&[String]>) -> Option<Role> {
    let candidates = role
        .into_iter()
        .chain(roles.unwrap_or_default().iter().map(String::as_str));

    let mut unknown = None;
    for candidate in candidates {
        if let Some(role) = Role::from_wire(candidate) {
            return Some(role);
        }
        unknown.get_or_insert(candidate);
    }

    if let Some(value) = unknown {
        warn!(role = value, "unrecognised role from backend; treating as no role");
    }
    None
}
