//! Console route table. Each entry names a screen path pattern, who may open
//! it and where it sits in the navigation menu. The route guard and the menu
//! both read this table, so a menu entry is shown exactly when the guard would
//! admit it.

use crate::features::auth::types::Role;

pub const LOGIN_PATH: &str = "/login";
/// Landing page after login and for role-denied screens.
pub const LANDING_PATH: &str = "/dashboard";

const VEHICLE_ROLES: &[Role] = &[Role::SuperAdmin, Role::Admin, Role::User];
const SUPER_ADMIN_ONLY: &[Role] = &[Role::SuperAdmin];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    Public,
    /// Any operator holding an access token.
    Authenticated,
    /// Access token plus one of these roles.
    Roles(&'static [Role]),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MenuItem {
    pub section: &'static str,
    pub label: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Route {
    /// Segments starting with `:` match any single non-empty segment.
    pub pattern: &'static str,
    pub access: Access,
    pub menu: Option<MenuItem>,
}

const fn route(pattern: &'static str, access: Access) -> Route {
    Route {
        pattern,
        access,
        menu: None,
    }
}

const fn entry(
    pattern: &'static str,
    access: Access,
    section: &'static str,
    label: &'static str,
) -> Route {
    Route {
        pattern,
        access,
        menu: Some(MenuItem { section, label }),
    }
}

/// Order matters: the first matching pattern wins.
pub static ROUTES: &[Route] = &[
    route(LOGIN_PATH, Access::Public),
    entry(LANDING_PATH, Access::Authenticated, "Dashboard", "Dashboard"),
    entry(
        "/vehicles",
        Access::Roles(VEHICLE_ROLES),
        "Vehicles",
        "View List",
    ),
    entry(
        "/vehicles/create",
        Access::Roles(VEHICLE_ROLES),
        "Vehicles",
        "Create Vehicle",
    ),
    route("/vehicles/:id", Access::Roles(VEHICLE_ROLES)),
    route("/vehicles/:id/edit", Access::Roles(VEHICLE_ROLES)),
    entry(
        "/customers",
        Access::Authenticated,
        "Customers",
        "Customer List",
    ),
    entry(
        "/customer-create",
        Access::Authenticated,
        "Customers",
        "Add Customer",
    ),
    entry("/services", Access::Authenticated, "Services", "Service List"),
    entry(
        "/services/create",
        Access::Authenticated,
        "Services",
        "Create Service",
    ),
    entry("/reminders", Access::Authenticated, "Services", "Reminders"),
    entry(
        "/users",
        Access::Roles(SUPER_ADMIN_ONLY),
        "Admin",
        "User Management",
    ),
    entry(
        "/user-details",
        Access::Roles(SUPER_ADMIN_ONLY),
        "Admin",
        "User Details",
    ),
    entry(
        "/user-create",
        Access::Roles(SUPER_ADMIN_ONLY),
        "Admin",
        "Create User",
    ),
    entry(
        "/garage-create",
        Access::Roles(SUPER_ADMIN_ONLY),
        "Admin",
        "Create Garage",
    ),
    entry(
        "/super-admin",
        Access::Roles(SUPER_ADMIN_ONLY),
        "Admin",
        "Super Admin",
    ),
];

/// Finds the route for a screen path. Query strings, fragments and trailing
/// slashes are ignored.
#[must_use]
pub fn resolve(path: &str) -> Option<&'static Route> {
    let path = normalize_path(path);
    ROUTES.iter().find(|route| matches(route.pattern, path))
}

/// Strips query, fragment and trailing slash; keeps `/` for the root.
#[must_use]
pub fn normalize_path(path: &str) -> &str {
    let path = path.trim();
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let path = &path[..end];
    match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    }
}

fn matches(pattern: &str, path: &str) -> bool {
    let mut pattern_segments = pattern.split('/');
    let mut path_segments = path.split('/');

    loop {
        match (pattern_segments.next(), path_segments.next()) {
            (None, None) => return true,
            (Some(expected), Some(actual)) => {
                let ok = if expected.starts_with(':') {
                    !actual.is_empty()
                } else {
                    expected == actual
                };
                if !ok {
                    return false;
                }
            }
            _ => return false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_static_and_parameterized_paths() {
        assert_eq!(resolve("/login").map(|r| r.access), Some(Access::Public));
        assert_eq!(
            resolve("/vehicles/create").map(|r| r.pattern),
            Some("/vehicles/create")
        );
        assert_eq!(resolve("/vehicles/42").map(|r| r.pattern), Some("/vehicles/:id"));
        assert_eq!(
            resolve("/vehicles/42/edit/").map(|r| r.pattern),
            Some("/vehicles/:id/edit")
        );
        assert_eq!(
            resolve("/users?page=2").map(|r| r.pattern),
            Some("/users")
        );
    }

    #[test]
    fn unknown_paths_do_not_resolve() {
        assert!(resolve("/").is_none());
        assert!(resolve("/bookings").is_none());
        assert!(resolve("/vehicles/42/delete").is_none());
        assert!(resolve("/vehicles//edit").is_none());
    }

    #[test]
    fn normalize_path_strips_query_and_slash() {
        assert_eq!(normalize_path("/customers/?x=1#top"), "/customers");
        assert_eq!(normalize_path("/"), "/");
        assert_eq!(normalize_path(""), "/");
    }

    #[test]
    fn admin_screens_are_super_admin_only() {
        for path in ["/user-details", "/users", "/user-create", "/garage-create", "/super-admin"] {
            assert_eq!(
                resolve(path).map(|r| r.access),
                Some(Access::Roles(SUPER_ADMIN_ONLY)),
                "{path}"
            );
        }
    }
}
