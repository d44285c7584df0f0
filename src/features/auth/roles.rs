//! Role checks for UI gating. Comparisons are exact and case-sensitive against
//! the canonical backend spelling; a missing user or role never passes.

use crate::features::auth::types::{Role, User};

#[must_use]
pub fn is_role(user: Option<&User>, name: &str) -> bool {
    user.and_then(|user| user.role)
        .is_some_and(|role| role.as_str() == name)
}

#[must_use]
pub fn has_any_role(user: Option<&User>, names: &[&str]) -> bool {
    names.iter().any(|name| is_role(user, name))
}

/// Typed variant used by the route table.
#[must_use]
pub fn has_any(user: Option<&User>, roles: &[Role]) -> bool {
    user.and_then(|user| user.role)
        .is_some_and(|role| roles.contains(&role))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Option<Role>) -> User {
        User {
            id: None,
            username: "operator".to_string(),
            email: None,
            role,
        }
    }

    #[test]
    fn no_user_or_no_role_never_passes() {
        assert!(!is_role(None, "ADMIN"));
        assert!(!has_any_role(None, &["ADMIN"]));
        assert!(!has_any_role(Some(&user(None)), &["ADMIN"]));
        assert!(!has_any(Some(&user(None)), &Role::ALL));
    }

    #[test]
    fn exact_match_only() {
        let admin = user(Some(Role::Admin));
        assert!(is_role(Some(&admin), "ADMIN"));
        assert!(!is_role(Some(&admin), "admin"));
        assert!(!is_role(Some(&admin), "SUPER_ADMIN"));
        assert!(has_any_role(Some(&admin), &["USER", "ADMIN"]));
        assert!(!has_any_role(Some(&admin), &[]));
    }

    #[test]
    fn typed_check() {
        let root = user(Some(Role::SuperAdmin));
        assert!(has_any(Some(&root), &[Role::SuperAdmin]));
        assert!(!has_any(Some(&user(Some(Role::User))), &[Role::SuperAdmin]));
    }
}
