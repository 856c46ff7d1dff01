use std::fmt;

use crate::domain::{ApplicationId, User};

/// Screens reachable in the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Register,
    Dashboard,
    ApplicationNew,
    ApplicationTrack,
    ApplicationDetails(ApplicationId),
    AdminDashboard,
    AdminApplications,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    SignedIn,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    Allow,
    Redirect(Route),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::Dashboard => "/dashboard".to_string(),
            Route::ApplicationNew => "/application/new".to_string(),
            Route::ApplicationTrack => "/application/track".to_string(),
            Route::ApplicationDetails(id) => format!("/application/{id}"),
            Route::AdminDashboard => "/admin".to_string(),
            Route::AdminApplications => "/admin/applications".to_string(),
        }
    }

    /// Unknown paths fall back to [`Route::Home`].
    pub fn parse(path: &str) -> Route {
        let trimmed = path.trim().trim_end_matches('/');
        let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => Route::Home,
            ["login"] => Route::Login,
            ["register"] => Route::Register,
            ["dashboard"] => Route::Dashboard,
            ["application", "new"] => Route::ApplicationNew,
            ["application", "track"] => Route::ApplicationTrack,
            ["application", id] => Route::ApplicationDetails(ApplicationId((*id).to_string())),
            ["admin"] => Route::AdminDashboard,
            ["admin", "applications"] => Route::AdminApplications,
            _ => Route::Home,
        }
    }

    pub fn access(&self) -> Access {
        match self {
            Route::Dashboard | Route::ApplicationDetails(_) => Access::SignedIn,
            Route::AdminDashboard | Route::AdminApplications => Access::Admin,
            Route::Home
            | Route::Login
            | Route::Register
            | Route::ApplicationNew
            | Route::ApplicationTrack => Access::Public,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Decides whether `user` may open `route`.
pub fn guard(route: &Route, user: Option<&User>) -> RouteDecision {
    match (route.access(), user) {
        (Access::Public, _) => RouteDecision::Allow,
        (_, None) => RouteDecision::Redirect(Route::Login),
        (Access::Admin, Some(user)) if !user.is_admin() => RouteDecision::Redirect(Route::Dashboard),
        _ => RouteDecision::Allow,
    }
}

/// Where a freshly signed-in user lands.
pub fn landing_route(user: &User) -> Route {
    if user.is_admin() {
        Route::AdminDashboard
    } else {
        Route::Dashboard
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserRole;

    fn user(role: UserRole) -> User {
        User {
            id: "u-1".to_string(),
            email: "asha@example.com".to_string(),
            role,
        }
    }

    #[test]
    fn paths_parse_back_to_routes() {
        for route in [
            Route::Home,
            Route::Login,
            Route::Register,
            Route::Dashboard,
            Route::ApplicationNew,
            Route::ApplicationTrack,
            Route::ApplicationDetails(ApplicationId("65f0c1".to_string())),
            Route::AdminDashboard,
            Route::AdminApplications,
        ] {
            assert_eq!(Route::parse(&route.path()), route);
        }
    }

    #[test]
    fn unknown_paths_fall_back_home() {
        assert_eq!(Route::parse("/settings/profile"), Route::Home);
        assert_eq!(Route::parse(""), Route::Home);
    }

    #[test]
    fn signed_out_users_are_sent_to_login() {
        assert_eq!(
            guard(&Route::Dashboard, None),
            RouteDecision::Redirect(Route::Login)
        );
        assert_eq!(
            guard(&Route::AdminApplications, None),
            RouteDecision::Redirect(Route::Login)
        );
        assert_eq!(guard(&Route::ApplicationTrack, None), RouteDecision::Allow);
    }

    #[test]
    fn applicants_cannot_open_admin_screens() {
        let applicant = user(UserRole::Applicant);
        assert_eq!(
            guard(&Route::AdminDashboard, Some(&applicant)),
            RouteDecision::Redirect(Route::Dashboard)
        );
        assert_eq!(guard(&Route::Dashboard, Some(&applicant)), RouteDecision::Allow);

        let admin = user(UserRole::Admin);
        assert_eq!(guard(&Route::AdminApplications, Some(&admin)), RouteDecision::Allow);
        assert_eq!(landing_route(&admin), Route::AdminDashboard);
        assert_eq!(landing_route(&applicant), Route::Dashboard);
    }
}
