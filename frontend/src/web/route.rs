//! Route definitions and the guard decision.
//!
//! Pure domain logic: no DOM, no web_sys. The router service feeds it the
//! current location and session phase.

use std::fmt::Display;

use crate::auth::AuthPhase;

pub const LOGIN_PATH: &str = "/login";
pub const DASHBOARD_PATH: &str = "/dashboard";
pub const PATIENTS_PATH: &str = "/pacientes";

/// Application routes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppRoute {
    /// Login page; `from` is the protected location the user asked for.
    Login { from: Option<String> },
    Dashboard,
    Patients,
}

impl Default for AppRoute {
    fn default() -> Self {
        AppRoute::Login { from: None }
    }
}

/// What the outlet should do with a route in the current session phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Render,
    /// Session not resolved yet, show the loading placeholder.
    Pending,
    Redirect(AppRoute),
}

impl AppRoute {
    /// Parses `pathname` plus `search` (with or without the leading `?`).
    ///
    /// `/` and unknown paths fall back to the login page.
    pub fn from_location(path: &str, search: &str) -> Self {
        match path.trim_end_matches('/') {
            "/dashboard" => Self::Dashboard,
            "/pacientes" => Self::Patients,
            "/login" => Self::Login {
                from: query_param(search, "from"),
            },
            _ => Self::default(),
        }
    }

    /// Parses a relative URL such as `/login?from=%2Fpacientes`.
    pub fn from_url(url: &str) -> Self {
        match url.split_once('?') {
            Some((path, search)) => Self::from_location(path, search),
            None => Self::from_location(url, ""),
        }
    }

    pub fn to_url(&self) -> String {
        match self {
            Self::Login { from: None } => LOGIN_PATH.to_string(),
            Self::Login { from: Some(from) } => {
                format!("{}?from={}", LOGIN_PATH, urlencoding::encode(from))
            }
            Self::Dashboard => DASHBOARD_PATH.to_string(),
            Self::Patients => PATIENTS_PATH.to_string(),
        }
    }

    pub fn requires_auth(&self) -> bool {
        matches!(self, Self::Dashboard | Self::Patients)
    }

    /// Login route that remembers `current` when it is a protected page.
    pub fn login_from(current: &AppRoute) -> Self {
        let from = current.requires_auth().then(|| current.to_url());
        Self::Login { from }
    }

    /// Where a freshly authenticated user goes.
    ///
    /// Only a known protected route is honoured as `from`; anything else
    /// lands on the dashboard.
    pub fn auth_success_redirect(from: Option<&str>) -> Self {
        from.map(Self::from_url)
            .filter(AppRoute::requires_auth)
            .unwrap_or(Self::Dashboard)
    }

    /// **Guard logic**
    pub fn guard(&self, phase: AuthPhase) -> GuardDecision {
        match (self.requires_auth(), phase) {
            (_, AuthPhase::Uninitialized | AuthPhase::Resolving) => GuardDecision::Pending,
            (true, AuthPhase::Authenticated) => GuardDecision::Render,
            (true, AuthPhase::Anonymous) => GuardDecision::Redirect(Self::login_from(self)),
            (false, AuthPhase::Anonymous) => GuardDecision::Render,
            (false, AuthPhase::Authenticated) => {
                let from = match self {
                    Self::Login { from } => from.as_deref(),
                    _ => None,
                };
                GuardDecision::Redirect(Self::auth_success_redirect(from))
            }
        }
    }
}

fn query_param(search: &str, key: &str) -> Option<String> {
    search
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == key)
        .and_then(|(_, v)| urlencoding::decode(v).ok())
        .map(|v| v.into_owned())
        .filter(|v| !v.is_empty())
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("/", "", AppRoute::Login { from: None })]
    #[case("/login", "", AppRoute::Login { from: None })]
    #[case("/dashboard", "", AppRoute::Dashboard)]
    #[case("/pacientes/", "", AppRoute::Patients)]
    #[case("/nope", "", AppRoute::Login { from: None })]
    #[case("/login", "?from=%2Fpacientes", AppRoute::Login { from: Some("/pacientes".to_string()) })]
    fn parses_locations(#[case] path: &str, #[case] search: &str, #[case] expected: AppRoute) {
        assert_eq!(AppRoute::from_location(path, search), expected);
    }

    #[test]
    fn login_url_encodes_the_origin() {
        let route = AppRoute::login_from(&AppRoute::Patients);
        assert_eq!(route.to_url(), "/login?from=%2Fpacientes");
        assert_eq!(AppRoute::from_url(&route.to_url()), route);
        assert_eq!(
            AppRoute::login_from(&AppRoute::default()),
            AppRoute::Login { from: None }
        );
    }

    #[test]
    fn protected_routes_wait_for_resolution() {
        assert_eq!(
            AppRoute::Patients.guard(AuthPhase::Resolving),
            GuardDecision::Pending
        );
        assert_eq!(
            AppRoute::Dashboard.guard(AuthPhase::Uninitialized),
            GuardDecision::Pending
        );
        assert_eq!(
            AppRoute::Patients.guard(AuthPhase::Authenticated),
            GuardDecision::Render
        );
    }

    #[test]
    fn anonymous_users_are_sent_to_login_with_origin() {
        assert_eq!(
            AppRoute::Patients.guard(AuthPhase::Anonymous),
            GuardDecision::Redirect(AppRoute::Login {
                from: Some("/pacientes".to_string())
            })
        );
        assert_eq!(
            AppRoute::default().guard(AuthPhase::Anonymous),
            GuardDecision::Render
        );
    }

    #[test]
    fn authenticated_users_leave_login_for_origin_or_dashboard() {
        let with_origin = AppRoute::Login {
            from: Some("/pacientes".to_string()),
        };
        assert_eq!(
            with_origin.guard(AuthPhase::Authenticated),
            GuardDecision::Redirect(AppRoute::Patients)
        );
        assert_eq!(
            AppRoute::default().guard(AuthPhase::Authenticated),
            GuardDecision::Redirect(AppRoute::Dashboard)
        );
    }

    #[test]
    fn foreign_origins_are_ignored() {
        assert_eq!(
            AppRoute::auth_success_redirect(Some("https://evil.example/")),
            AppRoute::Dashboard
        );
        assert_eq!(
            AppRoute::auth_success_redirect(Some("/login?from=%2Fpacientes")),
            AppRoute::Dashboard
        );
    }
}
