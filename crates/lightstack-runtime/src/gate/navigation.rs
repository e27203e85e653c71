//! The navigation gate.

use super::{GateState, NavigationDecision, RedirectReason};
use crate::config::RoutesConfig;
use crate::nav::{compile_routes, normalize_location, ComponentResolver, MenuNode, RouteDescriptor};
use crate::router::{
    constant_routes, RegistrationOutcome, RouteMatch, RouteTable, RouterRegistrationState,
};
use crate::session::{SessionError, SessionStore, TenantStore};
use lightstack_types::{ErrorCode, Tenant};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Evaluation passes before a continuously changing session gives up.
const MAX_PASSES: usize = 3;

/// Route table and registration flag; always locked together.
#[derive(Debug)]
struct Router {
    table: RouteTable,
    registration: RouterRegistrationState,
}

impl Router {
    fn new(config: &RoutesConfig) -> Self {
        let mut table = RouteTable::new();
        for route in constant_routes(config) {
            if let Err(e) = table.add_route(route) {
                warn!(error = %e, "Static route skipped");
            }
        }
        Self {
            table,
            registration: RouterRegistrationState::new(),
        }
    }

    fn reset(&mut self) {
        let Self {
            table,
            registration,
        } = self;
        registration.reset(table);
    }
}

enum Pass {
    Done(NavigationDecision),
    Retry,
}

/// Guard invoked on every navigation attempt.
///
/// Bootstraps the session on demand, compiles and registers the dynamic
/// routes exactly once per session, and decides whether the attempt may
/// proceed.
///
/// # Decision Table
///
/// | Situation | Decision |
/// |-----------|----------|
/// | location is the login path | `Proceed` |
/// | no token | `Redirect` to login (`NoToken`) |
/// | principal fetch rejected / failed | session cleared, `Redirect` to login |
/// | routes registered by this attempt and the location matches one | `Redispatch` |
/// | no dynamic routes and location outside home/dashboard/not-found | `Redirect` to dashboard (`EmptyMenuSet`) |
/// | otherwise | `Proceed` |
///
/// # Concurrency
///
/// Concurrent attempts share one principal fetch (see [`SessionStore`]).
/// The registration check-and-set and the table mutation happen under one
/// lock with no await inside, so routes are installed once. If the session
/// epoch moves between fetch and registration the attempt is re-evaluated.
pub struct NavigationGate {
    session: Arc<SessionStore>,
    tenants: Arc<TenantStore>,
    resolver: Arc<dyn ComponentResolver>,
    config: RoutesConfig,
    router: Mutex<Router>,
    state: Mutex<GateState>,
}

impl NavigationGate {
    /// Creates a gate with the default well-known paths.
    #[must_use]
    pub fn new(
        session: Arc<SessionStore>,
        tenants: Arc<TenantStore>,
        resolver: Arc<dyn ComponentResolver>,
    ) -> Self {
        let config = RoutesConfig::default();
        Self {
            session,
            tenants,
            resolver,
            router: Mutex::new(Router::new(&config)),
            config,
            state: Mutex::new(GateState::Unauthenticated),
        }
    }

    /// Uses `config` for the well-known paths and static routes.
    #[must_use]
    pub fn with_routes_config(mut self, config: RoutesConfig) -> Self {
        self.router = Mutex::new(Router::new(&config));
        self.config = config;
        self
    }

    /// Decides a navigation attempt to `location`.
    pub async fn navigate(&self, location: &str) -> NavigationDecision {
        for pass in 0..MAX_PASSES {
            match self.evaluate(location).await {
                Pass::Done(decision) => {
                    debug!(location, pass, decision = ?decision, "Navigation decided");
                    return decision;
                }
                Pass::Retry => debug!(location, pass, "Session changed mid-navigation, re-evaluating"),
            }
        }

        warn!(location, "Session kept changing, giving up");
        self.set_state(GateState::Error);
        NavigationDecision::redirect(&self.config.login_path, RedirectReason::SessionChanged)
    }

    async fn evaluate(&self, location: &str) -> Pass {
        let path = normalize_location(location);

        if path == normalize_location(&self.config.login_path) {
            if !self.session.has_token() {
                self.set_state(GateState::Unauthenticated);
            }
            return Pass::Done(NavigationDecision::Proceed);
        }

        let epoch = self.session.epoch();
        if !self.session.has_token() {
            self.set_state(GateState::Unauthenticated);
            return Pass::Done(self.to_login(RedirectReason::NoToken));
        }

        if self.session.cached_principal().is_none() {
            self.set_state(GateState::SessionLoading);
        }
        if let Err(err) = self.session.principal().await {
            return self.bootstrap_failed(&err, epoch);
        }

        let registered_now = if self.is_registered() {
            None
        } else {
            self.set_state(GateState::RoutesPending);
            let Some(tree) = self.session.menu_tree() else {
                return Pass::Retry;
            };
            let routes = compile_routes(&tree, self.resolver.as_ref());

            let mut router = self.router.lock();
            if self.session.epoch() != epoch {
                return Pass::Retry;
            }
            let Router {
                table,
                registration,
            } = &mut *router;
            match registration.register(table, routes) {
                RegistrationOutcome::Registered(names) => Some(names),
                RegistrationOutcome::AlreadyRegistered => None,
            }
        };

        self.set_state(GateState::Ready);
        let router = self.router.lock();

        if let Some(names) = registered_now {
            let hits_new_route = router
                .table
                .resolve(&path)
                .is_some_and(|m| m.matched.iter().any(|name| names.contains(name)));
            if hits_new_route {
                return Pass::Done(NavigationDecision::Redispatch {
                    path: location.to_string(),
                });
            }
        }

        if router.registration.routes().is_empty() && !self.is_allow_listed(&path) {
            debug!(path = %path, "No dynamic routes, degrading to dashboard");
            return Pass::Done(NavigationDecision::redirect(
                &self.config.dashboard_path,
                RedirectReason::EmptyMenuSet,
            ));
        }

        Pass::Done(NavigationDecision::Proceed)
    }

    fn bootstrap_failed(&self, err: &SessionError, epoch: u64) -> Pass {
        if matches!(err, SessionError::Superseded) || self.session.epoch() != epoch {
            return Pass::Retry;
        }
        if matches!(err, SessionError::NoToken) {
            self.set_state(GateState::Unauthenticated);
            return Pass::Done(self.to_login(RedirectReason::NoToken));
        }

        warn!(code = err.code(), error = %err, "Session bootstrap failed, signing out");
        self.session.clear();
        self.router.lock().reset();
        self.set_state(GateState::Error);
        Pass::Done(self.to_login(RedirectReason::from(err)))
    }

    fn to_login(&self, reason: RedirectReason) -> NavigationDecision {
        NavigationDecision::redirect(&self.config.login_path, reason)
    }

    fn is_allow_listed(&self, path: &str) -> bool {
        [
            &self.config.home_path,
            &self.config.dashboard_path,
            &self.config.not_found_path,
        ]
        .into_iter()
        .any(|allowed| normalize_location(allowed) == path)
    }

    fn set_state(&self, next: GateState) {
        let mut state = self.state.lock();
        if *state != next {
            debug!(from = %*state, to = %next, "Gate state changed");
            *state = next;
        }
    }

    /// Stores a new token. Any token other than the current one removes
    /// the dynamic routes installed so far, including routes left behind
    /// by a token cleared directly on the session.
    pub fn sign_in(&self, token: &str) -> bool {
        let previous = self.session.token();
        if !self.session.set_token(token) {
            return false;
        }
        if previous.as_deref() != Some(token) {
            self.router.lock().reset();
        }
        true
    }

    /// Signs out: clears the session and tenant context and removes the
    /// dynamic routes.
    pub fn logout(&self) {
        self.session.clear();
        self.tenants.clear();
        self.router.lock().reset();
        self.set_state(GateState::Unauthenticated);
        info!("Signed out");
    }

    /// Selects a tenant. A different tenant drops the principal (its
    /// menus are tenant-scoped) and removes the dynamic routes; the token
    /// is kept. Returns `true` if the selection changed.
    pub fn switch_tenant(&self, tenant: Tenant) -> bool {
        if !self.tenants.set_current(tenant) {
            return false;
        }
        self.session.invalidate_principal();
        self.router.lock().reset();
        true
    }

    /// Last observed state.
    #[must_use]
    pub fn state(&self) -> GateState {
        *self.state.lock()
    }

    /// Returns `true` once this session's dynamic routes are installed.
    #[must_use]
    pub fn is_registered(&self) -> bool {
        self.router.lock().registration.is_registered()
    }

    /// The compiled dynamic routes of this session.
    #[must_use]
    pub fn dynamic_routes(&self) -> Vec<RouteDescriptor> {
        self.router.lock().registration.routes().to_vec()
    }

    /// Navigation tree of the cached principal.
    #[must_use]
    pub fn menu_tree(&self) -> Vec<MenuNode> {
        self.session
            .menu_tree()
            .map(|tree| tree.to_vec())
            .unwrap_or_default()
    }

    /// Matches `location` against the live route table.
    #[must_use]
    pub fn resolve(&self, location: &str) -> Option<RouteMatch> {
        self.router.lock().table.resolve(location)
    }

    /// Number of top-level routes in the live table.
    #[must_use]
    pub fn route_count(&self) -> usize {
        self.router.lock().table.len()
    }

    /// The session store.
    #[must_use]
    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// The tenant store.
    #[must_use]
    pub fn tenants(&self) -> &Arc<TenantStore> {
        &self.tenants
    }

    /// Well-known paths in use.
    #[must_use]
    pub fn routes_config(&self) -> &RoutesConfig {
        &self.config
    }
}

impl fmt::Debug for NavigationGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigationGate")
            .field("state", &self.state())
            .field("registered", &self.is_registered())
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nav::ComponentCatalog;
    use crate::session::{FetchError, PrincipalSource};
    use crate::storage::{DurableStorage, MemoryStorage};
    use async_trait::async_trait;
    use lightstack_types::{MenuKind, MenuRecord, PrincipalProfile};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StaticSource {
        calls: AtomicUsize,
        result: Result<PrincipalProfile, FetchError>,
    }

    #[async_trait]
    impl PrincipalSource for StaticSource {
        async fn fetch_principal(&self, _token: &str) -> Result<PrincipalProfile, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone()
        }
    }

    fn gate(result: Result<PrincipalProfile, FetchError>) -> (NavigationGate, Arc<StaticSource>) {
        let source = Arc::new(StaticSource {
            calls: AtomicUsize::new(0),
            result,
        });
        let storage: Arc<dyn DurableStorage> = Arc::new(MemoryStorage::new());
        let session = Arc::new(SessionStore::new(
            Arc::clone(&source) as Arc<dyn PrincipalSource>,
            Arc::clone(&storage),
        ));
        let tenants = Arc::new(TenantStore::new(storage));
        let catalog = ComponentCatalog::new().with_view("system/users");
        (
            NavigationGate::new(session, tenants, Arc::new(catalog)),
            source,
        )
    }

    fn admin() -> PrincipalProfile {
        PrincipalProfile::new(1, "admin").with_menus(vec![
            MenuRecord::new(1, "sys", MenuKind::Directory).with_path("/system"),
            MenuRecord::new(2, "users", MenuKind::Menu)
                .with_parent(1)
                .with_path("users")
                .with_component("system/users"),
        ])
    }

    #[tokio::test]
    async fn login_path_always_proceeds() {
        let (gate, source) = gate(Ok(admin()));
        assert_eq!(gate.navigate("/login").await, NavigationDecision::Proceed);
        assert_eq!(gate.navigate("/login/?next=/a").await, NavigationDecision::Proceed);
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
        assert_eq!(gate.state(), GateState::Unauthenticated);
    }

    #[tokio::test]
    async fn no_token_redirects_to_login() {
        let (gate, _) = gate(Ok(admin()));
        assert_eq!(
            gate.navigate("/system/users").await,
            NavigationDecision::redirect("/login", RedirectReason::NoToken)
        );
        assert!(!gate.is_registered());
    }

    #[tokio::test]
    async fn first_navigation_registers_and_redispatches() {
        let (gate, _) = gate(Ok(admin()));
        assert!(gate.sign_in("t1"));

        assert_eq!(
            gate.navigate("/system/users").await,
            NavigationDecision::Redispatch {
                path: "/system/users".into()
            }
        );
        assert!(gate.is_registered());
        assert_eq!(gate.state(), GateState::Ready);
        assert_eq!(gate.resolve("/system/users").map(|m| m.name).as_deref(), Some("users"));

        assert_eq!(gate.navigate("/system/users").await, NavigationDecision::Proceed);
    }

    #[tokio::test]
    async fn unauthorized_clears_session() {
        let (gate, _) = gate(Err(FetchError::Unauthorized));
        gate.sign_in("expired");

        assert_eq!(
            gate.navigate("/dashboard").await,
            NavigationDecision::redirect("/login", RedirectReason::AuthExpired)
        );
        assert!(!gate.session().has_token());
        assert_eq!(gate.state(), GateState::Error);
    }

    #[tokio::test]
    async fn switching_token_drops_routes() {
        let (gate, _) = gate(Ok(admin()));
        gate.sign_in("t1");
        gate.navigate("/dashboard").await;
        assert!(gate.is_registered());

        assert!(gate.sign_in("t1"));
        assert!(gate.is_registered());

        assert!(gate.sign_in("t2"));
        assert!(!gate.is_registered());
        assert!(gate.resolve("/system/users").is_some_and(|m| m.name == "CatchAll"));
    }

    #[tokio::test]
    async fn tenant_switch_keeps_token() {
        let (gate, source) = gate(Ok(admin()));
        gate.sign_in("t1");
        gate.navigate("/dashboard").await;

        assert!(gate.switch_tenant(Tenant::new(7, "Acme")));
        assert!(!gate.switch_tenant(Tenant::new(7, "Acme")));
        assert!(gate.session().has_token());
        assert!(!gate.is_registered());

        gate.navigate("/dashboard").await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn custom_login_path() {
        let (gate, _) = gate(Ok(admin()));
        let gate = gate.with_routes_config(RoutesConfig {
            login_path: "/signin".into(),
            ..RoutesConfig::default()
        });

        assert_eq!(
            gate.navigate("/dashboard").await,
            NavigationDecision::redirect("/signin", RedirectReason::NoToken)
        );
        assert_eq!(gate.resolve("/signin").map(|m| m.name).as_deref(), Some("Login"));
    }
}
