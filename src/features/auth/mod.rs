//! Auth feature module covering login, profile hydration, logout and the
//! reaction to server-side session loss. It keeps authentication logic out of
//! the view layer. This module touches security boundaries and must avoid
//! logging secrets or token material.
//!
//! Flow Overview: Login posts credentials through the anonymous transport path,
//! persists the token pair and then fetches the current user. Every other call
//! goes through the authenticated path; a `401` there clears the tokens and
//! raises a `SessionInvalidated` event, which the controller turns into a reset
//! session and a single redirect to the login page.
//!
//! Role checks and route guards are UX only; the backend remains the authority
//! for access control.

pub mod client;
pub mod controller;
pub mod expiry;
pub mod guards;
pub mod roles;
pub mod state;
pub mod token;
pub mod types;

pub use controller::{AuthController, AuthError, InvalidationHandler};
pub use guards::{GuardDecision, RouteGuard};
pub use state::{AppState, Session, SessionPhase};
pub use token::{FileTokenStore, MemoryTokenStore, TokenKey, TokenStore};
pub use types::{Role, User};
