//! Heuristic for backend messages that mean "your token is no longer valid".
//!
//! Used only where no structured status is available; a `401` status is always
//! authoritative on its own.

use once_cell::sync::Lazy;
use regex::Regex;

static EXPIRED_TOKEN: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"(?i)not valid|expired|invalid token").ok());

#[must_use]
pub fn looks_like_expired_token(message: &str) -> bool {
    EXPIRED_TOKEN
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_backend_expiry_messages() {
        assert!(looks_like_expired_token(
            "Given token not valid for any token type"
        ));
        assert!(looks_like_expired_token("Token is EXPIRED"));
        assert!(looks_like_expired_token("Invalid token."));
    }

    #[test]
    fn ignores_unrelated_failures() {
        assert!(!looks_like_expired_token("Internal server error"));
        assert!(!looks_like_expired_token("Invalid credentials"));
        assert!(!looks_like_expired_token(""));
    }
}
