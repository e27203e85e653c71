//! One-time registration of the compiled dynamic routes.

use super::RouteTable;
use crate::nav::RouteDescriptor;
use std::sync::Arc;
use tracing::{info, warn};

/// Outcome of [`RouterRegistrationState::register`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// Routes were installed; names of every installed record.
    Registered(Vec<String>),
    /// The flag was already set; the table was left untouched.
    AlreadyRegistered,
}

/// Tracks whether the dynamic routes of the current session are installed.
///
/// The flag and the table are mutated together by the caller holding one
/// lock, so check-and-set is atomic.
///
/// ```
/// use lightstack_runtime::nav::{RouteDescriptor, RouteMeta};
/// use lightstack_runtime::router::{RegistrationOutcome, RouteTable, RouterRegistrationState};
///
/// let mut table = RouteTable::new();
/// let mut state = RouterRegistrationState::new();
/// let routes = vec![RouteDescriptor::new("/a", "a", RouteMeta::fixed("A", false))];
///
/// assert!(matches!(state.register(&mut table, routes.clone()), RegistrationOutcome::Registered(_)));
/// assert_eq!(state.register(&mut table, routes), RegistrationOutcome::AlreadyRegistered);
/// assert_eq!(table.len(), 1);
///
/// state.reset(&mut table);
/// assert!(table.is_empty());
/// assert!(!state.is_registered());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RouterRegistrationState {
    registered: bool,
    installed: Vec<String>,
    routes: Arc<Vec<RouteDescriptor>>,
}

impl RouterRegistrationState {
    /// Creates an unset state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` once routes were registered for this session.
    #[must_use]
    pub fn is_registered(&self) -> bool {
        self.registered
    }

    /// The compiled route set of this session (empty before registration).
    #[must_use]
    pub fn routes(&self) -> Arc<Vec<RouteDescriptor>> {
        Arc::clone(&self.routes)
    }

    /// Installs `routes` into `table` unless already registered.
    ///
    /// A top-level route whose names collide with an installed route is
    /// skipped and logged; the rest are still installed.
    pub fn register(
        &mut self,
        table: &mut RouteTable,
        routes: Vec<RouteDescriptor>,
    ) -> RegistrationOutcome {
        if self.registered {
            return RegistrationOutcome::AlreadyRegistered;
        }

        let mut accepted = Vec::with_capacity(routes.len());
        let mut names = Vec::new();
        for route in routes {
            match table.add_route(route.clone()) {
                Ok(()) => {
                    self.installed.push(route.name.clone());
                    names.extend(route.names().into_iter().map(str::to_string));
                    accepted.push(route);
                }
                Err(e) => warn!(route = %route.name, error = %e, "Dynamic route skipped"),
            }
        }

        self.registered = true;
        self.routes = Arc::new(accepted);
        info!(
            routes = self.installed.len(),
            records = names.len(),
            "Dynamic routes registered"
        );
        RegistrationOutcome::Registered(names)
    }

    /// Removes the installed routes from `table` and clears the flag.
    pub fn reset(&mut self, table: &mut RouteTable) {
        for name in self.installed.drain(..) {
            table.remove_route(&name);
        }
        if self.registered {
            info!("Dynamic routes removed");
        }
        self.registered = false;
        self.routes = Arc::new(Vec::new());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nav::RouteMeta;

    fn route(path: &str, name: &str) -> RouteDescriptor {
        RouteDescriptor::new(path, name, RouteMeta::fixed(name, false))
    }

    #[test]
    fn second_registration_is_noop() {
        let mut table = RouteTable::with_routes(vec![route("/login", "Login")]).unwrap();
        let mut state = RouterRegistrationState::new();

        let outcome = state.register(
            &mut table,
            vec![route("/a", "a").with_children(vec![route("b", "b")])],
        );
        assert_eq!(
            outcome,
            RegistrationOutcome::Registered(vec!["a".into(), "b".into()])
        );
        assert!(state.is_registered());
        let size = table.len();

        let again = state.register(&mut table, vec![route("/c", "c")]);
        assert_eq!(again, RegistrationOutcome::AlreadyRegistered);
        assert_eq!(table.len(), size);
        assert!(!table.has_route("c"));
    }

    #[test]
    fn colliding_route_skipped() {
        let mut table = RouteTable::with_routes(vec![route("/login", "Login")]).unwrap();
        let mut state = RouterRegistrationState::new();

        state.register(&mut table, vec![route("/x", "Login"), route("/y", "y")]);

        assert_eq!(state.routes().len(), 1);
        assert_eq!(table.resolve("/login").unwrap().name, "Login");
        assert!(table.has_route("y"));
    }

    #[test]
    fn reset_keeps_static_routes() {
        let mut table = RouteTable::with_routes(vec![route("/login", "Login")]).unwrap();
        let mut state = RouterRegistrationState::new();
        state.register(&mut table, vec![route("/a", "a")]);

        state.reset(&mut table);

        assert!(!state.is_registered());
        assert!(state.routes().is_empty());
        assert_eq!(table.len(), 1);
        assert!(table.has_route("Login"));

        let outcome = state.register(&mut table, vec![route("/a", "a")]);
        assert!(matches!(outcome, RegistrationOutcome::Registered(_)));
    }
}
