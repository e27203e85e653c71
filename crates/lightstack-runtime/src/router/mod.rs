//! Route table and dynamic route registration.
//!
//! The table starts with the static routes every session has:
//!
//! | Name | Path | Notes |
//! |------|------|-------|
//! | `Login` | `/login` | hidden |
//! | `Home` | `/` | layout, redirects to the dashboard |
//! | `Dashboard` | `/dashboard` | child of `Home` |
//! | `NotFound` | `/404` | hidden, fallback view |
//! | `CatchAll` | `/:pathMatch(.*)*` | redirects to `/404` |
//!
//! (Paths come from [`RoutesConfig`](crate::config::RoutesConfig).)
//! Dynamic routes are added on top by [`RouterRegistrationState`] and
//! removed again on reset.

mod error;
mod registration;
mod table;

pub use error::RouterError;
pub use registration::{RegistrationOutcome, RouterRegistrationState};
pub use table::{RouteMatch, RouteTable};

use crate::config::RoutesConfig;
use crate::nav::{ComponentBinding, RouteDescriptor, RouteMeta};

/// Route name of the sign-in screen.
pub const LOGIN_ROUTE: &str = "Login";
/// Route name of the application root.
pub const HOME_ROUTE: &str = "Home";
/// Route name of the dashboard.
pub const DASHBOARD_ROUTE: &str = "Dashboard";
/// Route name of the not-found screen.
pub const NOT_FOUND_ROUTE: &str = "NotFound";
/// Route name of the catch-all redirect.
pub const CATCH_ALL_ROUTE: &str = "CatchAll";

/// The static routes present before and after any session.
#[must_use]
pub fn constant_routes(config: &RoutesConfig) -> Vec<RouteDescriptor> {
    vec![
        RouteDescriptor::new(&config.login_path, LOGIN_ROUTE, RouteMeta::fixed("Login", true))
            .with_component(ComponentBinding::View("login/index".into())),
        RouteDescriptor::new(&config.home_path, HOME_ROUTE, RouteMeta::fixed("Home", false))
            .with_component(ComponentBinding::Layout)
            .with_redirect(&config.dashboard_path)
            .with_children(vec![RouteDescriptor::new(
                &config.dashboard_path,
                DASHBOARD_ROUTE,
                RouteMeta::fixed("Dashboard", false),
            )
            .with_component(ComponentBinding::View("dashboard/index".into()))]),
        RouteDescriptor::new(
            &config.not_found_path,
            NOT_FOUND_ROUTE,
            RouteMeta::fixed("404", true),
        )
        .with_component(ComponentBinding::Fallback),
        RouteDescriptor::new(
            "/:pathMatch(.*)*",
            CATCH_ALL_ROUTE,
            RouteMeta::fixed("", true),
        )
        .with_redirect(&config.not_found_path),
    ]
}
