//! # garagedesk (Garage Service Admin Console)
//!
//! `garagedesk` is the operator console for the garage service management API.
//! It owns the client side of authentication and exposes the vehicle, customer,
//! service record, garage and user screens as CLI commands.
//!
//! ## Session Core
//!
//! - **Token Store:** durable slots for the access token, the refresh token and a
//!   one-shot "session expired" flag ([`features::auth::token`]).
//! - **HTTP Client:** attaches `Authorization: Bearer <token>` to every call except
//!   login and reports any `401` as a typed [`transport::SessionInvalidated`] event
//!   ([`transport`]).
//! - **Auth Controller:** login, profile fetch, logout and the reaction to session
//!   invalidation ([`features::auth::controller`]).
//! - **Role Gate / Route Guard:** pure role checks and allow/redirect decisions for
//!   every screen ([`features::auth::roles`], [`features::auth::guards`]).
//!
//! ## Shared State
//!
//! Session data lives in a single [`features::auth::state::AppState`] container
//! created at startup and handed to the controller, the transport listener and the
//! route guard. Nothing session-related is global.
//!
//! ## Domain APIs
//!
//! The backend replies with `{success, message, data}` envelopes, bare arrays or
//! bare objects depending on the endpoint. [`envelope`] normalizes all of them at
//! the API-module boundary so the auth core never sees domain payloads.

pub mod cli;
pub mod config;
pub mod envelope;
pub mod errors;
pub mod features;
pub mod navigation;
pub mod routes;
pub mod transport;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
