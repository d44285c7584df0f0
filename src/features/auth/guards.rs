//! Route guard. UX-only; real access control must live on the API.

use crate::{
    features::auth::{roles, state::Session},
    navigation::Redirect,
    routes::{self, Access, Route},
};
use tracing::debug;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(Redirect),
}

#[derive(Clone, Copy, Debug, Default)]
pub struct RouteGuard;

impl RouteGuard {
    /// Decides whether `session` may open `path`.
    ///
    /// A protected screen without a token redirects to login and keeps the
    /// requested path as given, query included; only route matching ignores
    /// the query. A role-gated screen the session cannot open (including while
    /// the profile is still pending) redirects to the landing page.
    /// Unknown paths go to login without a return path.
    #[must_use]
    pub fn check(session: &Session, path: &str) -> GuardDecision {
        let Some(route) = routes::resolve(path) else {
            debug!(path, "unknown route");
            return GuardDecision::Redirect(Redirect::Login {
                return_to: None,
                expired: false,
            });
        };

        if route.access == Access::Public {
            return GuardDecision::Allow;
        }

        if !session.is_authenticated() {
            return GuardDecision::Redirect(Redirect::login(path.trim()));
        }

        if Self::admits(session, route) {
            GuardDecision::Allow
        } else {
            debug!(path, role = ?session.role(), "route denied for role");
            GuardDecision::Redirect(Redirect::Landing)
        }
    }

    /// Whether the session satisfies the route's access rule.
    #[must_use]
    pub fn admits(session: &Session, route: &Route) -> bool {
        match route.access {
            Access::Public => true,
            Access::Authenticated => session.is_authenticated(),
            Access::Roles(allowed) => {
                session.is_authenticated() && roles::has_any(session.user.as_ref(), allowed)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::auth::{
        state::SessionPhase,
        types::{Role, User},
    };
    use secrecy::SecretString;

    fn signed_in(role: Option<Role>) -> Session {
        Session {
            access_token: Some(SecretString::from("A".to_string())),
            user: Some(User {
                id: None,
                username: "op".to_string(),
                email: None,
                role,
            }),
            phase: SessionPhase::AuthenticatedWithProfile,
            ..Session::default()
        }
    }

    #[test]
    fn login_is_always_allowed() {
        assert_eq!(RouteGuard::check(&Session::default(), "/login"), GuardDecision::Allow);
        assert_eq!(
            RouteGuard::check(&signed_in(None), "/login?expired=1"),
            GuardDecision::Allow
        );
    }

    #[test]
    fn anonymous_is_sent_to_login_with_return_path() {
        assert_eq!(
            RouteGuard::check(&Session::default(), "/customers"),
            GuardDecision::Redirect(Redirect::login("/customers"))
        );
        assert_eq!(
            RouteGuard::check(&Session::default(), "/vehicles/7/edit?tab=1"),
            GuardDecision::Redirect(Redirect::login("/vehicles/7/edit?tab=1"))
        );
    }

    #[test]
    fn authenticated_only_routes_allow_pending_profile() {
        let session = Session::from_tokens(Some(SecretString::from("A".to_string())), None);
        assert_eq!(RouteGuard::check(&session, "/dashboard"), GuardDecision::Allow);
        assert_eq!(
            RouteGuard::check(&session, "/vehicles"),
            GuardDecision::Redirect(Redirect::Landing)
        );
    }

    #[test]
    fn role_gates() {
        assert_eq!(
            RouteGuard::check(&signed_in(Some(Role::Admin)), "/users"),
            GuardDecision::Redirect(Redirect::Landing)
        );
        assert_eq!(
            RouteGuard::check(&signed_in(Some(Role::SuperAdmin)), "/users"),
            GuardDecision::Allow
        );
        assert_eq!(
            RouteGuard::check(&signed_in(Some(Role::User)), "/vehicles/3"),
            GuardDecision::Allow
        );
        assert_eq!(
            RouteGuard::check(&signed_in(None), "/vehicles"),
            GuardDecision::Redirect(Redirect::Landing)
        );
    }

    #[test]
    fn unknown_route_goes_to_login() {
        assert_eq!(
            RouteGuard::check(&signed_in(Some(Role::SuperAdmin)), "/nowhere"),
            GuardDecision::Redirect(Redirect::Login {
                return_to: None,
                expired: false
            })
        );
    }
}
