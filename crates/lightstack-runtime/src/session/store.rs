//! Session store: token, principal and derived caches.

use super::{PrincipalSource, SessionError, SingleFlight, TieredCache};
use crate::nav::{build_menu_tree, MenuNode};
use crate::storage::{keys, DurableStorage};
use lightstack_auth::{PermissionOracle, PrincipalGrants};
use lightstack_types::PrincipalProfile;
use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Value memoized from one principal snapshot.
type Derived<T> = RwLock<Option<(Arc<PrincipalProfile>, Arc<T>)>>;

/// Single source of truth for the signed-in session.
///
/// # Caching
///
/// Token and principal each live in a [`TieredCache`]; a missing principal
/// is fetched from the [`PrincipalSource`] at most once per
/// missing-principal condition, however many callers ask concurrently.
///
/// # Epoch
///
/// Every reset ([`clear`](Self::clear), [`invalidate_principal`](Self::invalidate_principal),
/// a token change) advances the session epoch. A fetch that started in an
/// older epoch returns [`SessionError::Superseded`] and leaves the cache
/// untouched.
///
/// # Example
///
/// ```ignore
/// let store = SessionStore::new(source, Arc::new(MemoryStorage::new()));
/// store.set_token("eyJhbGciOi...");
/// let principal = store.principal().await?;
/// let tree = store.menu_tree();
/// ```
pub struct SessionStore {
    source: Arc<dyn PrincipalSource>,
    token: TieredCache<String>,
    principal: TieredCache<PrincipalProfile>,
    menu_tree: Derived<Vec<MenuNode>>,
    grants: Derived<PrincipalGrants>,
    /// Guards every epoch transition together with the cache mutation it
    /// implies.
    epoch: Mutex<u64>,
    flight: SingleFlight<Arc<PrincipalProfile>, SessionError>,
}

impl SessionStore {
    /// Creates a store; previously persisted values are rehydrated lazily.
    #[must_use]
    pub fn new(source: Arc<dyn PrincipalSource>, storage: Arc<dyn DurableStorage>) -> Self {
        Self {
            source,
            token: TieredCache::new(keys::TOKEN, Arc::clone(&storage)),
            principal: TieredCache::new(keys::PRINCIPAL, storage),
            menu_tree: RwLock::new(None),
            grants: RwLock::new(None),
            epoch: Mutex::new(0),
            flight: SingleFlight::new(),
        }
    }

    /// Current session epoch.
    #[must_use]
    pub fn epoch(&self) -> u64 {
        *self.epoch.lock()
    }

    /// Stores a bearer token.
    ///
    /// Blank tokens and tokens containing whitespace or control characters
    /// are rejected: nothing changes and `false` is returned. Replacing a
    /// different token drops the cached principal.
    pub fn set_token(&self, token: &str) -> bool {
        if token.is_empty() || token.chars().any(|c| c.is_whitespace() || c.is_control()) {
            warn!("Rejected malformed session token");
            return false;
        }

        let mut epoch = self.epoch.lock();
        if let Some(current) = self.token.get() {
            if current.as_str() == token {
                return true;
            }
            *epoch += 1;
            self.drop_principal();
            debug!(epoch = *epoch, "Token replaced, principal dropped");
        }
        self.token.put(token.to_string());
        true
    }

    /// The stored token, if any.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.token.get().map(|token| token.as_str().to_owned())
    }

    /// Returns `true` if a token is stored.
    #[must_use]
    pub fn has_token(&self) -> bool {
        self.token.get().is_some()
    }

    /// Removes the token together with the principal it authenticated.
    /// An in-flight principal fetch is discarded.
    pub fn clear_token(&self) {
        let mut epoch = self.epoch.lock();
        *epoch += 1;
        self.drop_principal();
        self.token.invalidate();
        debug!(epoch = *epoch, "Token cleared, principal dropped");
    }

    /// Stores a principal obtained out of band (e.g. from the sign-in
    /// response).
    pub fn set_principal(&self, profile: PrincipalProfile) -> Arc<PrincipalProfile> {
        let _epoch = self.epoch.lock();
        self.principal.put(profile)
    }

    /// The cached principal, without fetching.
    #[must_use]
    pub fn cached_principal(&self) -> Option<Arc<PrincipalProfile>> {
        self.principal.get()
    }

    /// The principal, fetched from the source when absent.
    ///
    /// # Errors
    ///
    /// - [`SessionError::NoToken`] when signed out
    /// - [`SessionError::AuthExpired`] when the token is rejected
    /// - [`SessionError::PrincipalFetchFailed`] on any other fetch failure
    /// - [`SessionError::Superseded`] when the session was reset mid-fetch
    pub async fn principal(&self) -> Result<Arc<PrincipalProfile>, SessionError> {
        if let Some(principal) = self.principal.get() {
            return Ok(principal);
        }
        if !self.has_token() {
            return Err(SessionError::NoToken);
        }
        self.flight.run(move || self.load_principal()).await
    }

    async fn load_principal(&self) -> Result<Arc<PrincipalProfile>, SessionError> {
        // A caller may have populated the cache between our miss and this run.
        if let Some(principal) = self.principal.get() {
            return Ok(principal);
        }

        let started = self.epoch();
        let token = self.token().ok_or(SessionError::NoToken)?;

        debug!(epoch = started, "Fetching principal");
        let profile = self.source.fetch_principal(&token).await.map_err(|e| {
            warn!(error = %e, "Principal fetch failed");
            SessionError::from(e)
        })?;

        let epoch = self.epoch.lock();
        if *epoch != started {
            info!(started, current = *epoch, "Discarding principal fetched for a stale session");
            return Err(SessionError::Superseded);
        }
        info!(principal = %profile, menus = profile.menu_count(), "Principal loaded");
        Ok(self.principal.put(profile))
    }

    /// Drops the principal and derived caches, keeping the token.
    pub fn invalidate_principal(&self) {
        let mut epoch = self.epoch.lock();
        *epoch += 1;
        self.drop_principal();
        debug!(epoch = *epoch, "Principal invalidated");
    }

    /// Signs out: token, principal and derived caches are removed from
    /// memory and durable storage.
    pub fn clear(&self) {
        let mut epoch = self.epoch.lock();
        *epoch += 1;
        self.drop_principal();
        self.token.invalidate();
        info!(epoch = *epoch, "Session cleared");
    }

    fn drop_principal(&self) {
        self.flight.forget();
        self.principal.invalidate();
        *self.menu_tree.write() = None;
        *self.grants.write() = None;
    }

    /// Navigation tree of the cached principal, memoized per principal.
    #[must_use]
    pub fn menu_tree(&self) -> Option<Arc<Vec<MenuNode>>> {
        let principal = self.principal.get()?;
        Some(memoize(&self.menu_tree, &principal, |p| {
            build_menu_tree(&p.menus)
        }))
    }

    /// Grants of the cached principal; empty when signed out.
    #[must_use]
    pub fn grants(&self) -> Arc<PrincipalGrants> {
        match self.principal.get() {
            Some(principal) => memoize(&self.grants, &principal, PrincipalGrants::from_profile),
            None => Arc::new(PrincipalGrants::empty()),
        }
    }
}

fn memoize<T>(
    slot: &Derived<T>,
    principal: &Arc<PrincipalProfile>,
    derive: impl FnOnce(&PrincipalProfile) -> T,
) -> Arc<T> {
    if let Some((owner, value)) = slot.read().as_ref() {
        if Arc::ptr_eq(owner, principal) {
            return Arc::clone(value);
        }
    }
    let value = Arc::new(derive(principal));
    *slot.write() = Some((Arc::clone(principal), Arc::clone(&value)));
    value
}

impl PermissionOracle for SessionStore {
    fn has_permission(&self, code: &str) -> bool {
        self.grants().has_permission(code)
    }

    fn has_role(&self, role: &str) -> bool {
        self.grants().has_role(role)
    }

    fn has_menu_permission(&self, code: &str) -> bool {
        self.grants().has_menu_permission(code)
    }
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("has_token", &self.has_token())
            .field("principal", &self.principal.peek().map(|p| p.to_string()))
            .field("epoch", &self.epoch())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::FetchError;
    use crate::storage::MemoryStorage;
    use async_trait::async_trait;
    use lightstack_types::{MenuKind, MenuRecord};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct CountingSource {
        calls: AtomicUsize,
        delay: Duration,
        result: Result<PrincipalProfile, FetchError>,
    }

    impl CountingSource {
        fn ok(profile: PrincipalProfile) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                delay: Duration::from_millis(10),
                result: Ok(profile),
            }
        }

        fn failing(err: FetchError) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                delay: Duration::from_millis(10),
                result: Err(err),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PrincipalSource for CountingSource {
        async fn fetch_principal(&self, _token: &str) -> Result<PrincipalProfile, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            self.result.clone()
        }
    }

    fn admin() -> PrincipalProfile {
        PrincipalProfile::new(1, "admin")
            .with_roles(["admin"])
            .with_permissions(["user:list"])
            .with_menus(vec![
                MenuRecord::new(1, "sys", MenuKind::Directory),
                MenuRecord::new(2, "users", MenuKind::Menu).with_parent(1),
                MenuRecord::new(3, "user:add", MenuKind::Permission).with_parent(2),
            ])
    }

    fn store(source: &Arc<CountingSource>) -> (SessionStore, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        let store = SessionStore::new(
            Arc::clone(source) as Arc<dyn PrincipalSource>,
            Arc::clone(&storage) as Arc<dyn DurableStorage>,
        );
        (store, storage)
    }

    #[test]
    fn set_token_rejects_malformed() {
        let source = Arc::new(CountingSource::ok(admin()));
        let (store, _) = store(&source);

        for bad in ["", "a b", "tab\there", "line\n", " "] {
            assert!(!store.set_token(bad), "{bad:?} should be rejected");
        }
        assert!(!store.has_token());

        assert!(store.set_token("abc.def"));
        assert_eq!(store.token().as_deref(), Some("abc.def"));
    }

    #[test]
    fn token_persists_to_storage() {
        let source = Arc::new(CountingSource::ok(admin()));
        let (store, storage) = store(&source);

        store.set_token("t1");
        assert_eq!(storage.get(keys::TOKEN).unwrap().as_deref(), Some("\"t1\""));
    }

    #[test]
    fn rehydrates_from_storage() {
        let source = Arc::new(CountingSource::ok(admin()));
        let (first, storage) = store(&source);
        first.set_token("t1");
        first.set_principal(admin());

        let second = SessionStore::new(
            Arc::clone(&source) as Arc<dyn PrincipalSource>,
            storage as Arc<dyn DurableStorage>,
        );
        assert_eq!(second.token().as_deref(), Some("t1"));
        assert_eq!(second.cached_principal().unwrap().username, "admin");
    }

    #[tokio::test]
    async fn principal_without_token() {
        let source = Arc::new(CountingSource::ok(admin()));
        let (store, _) = store(&source);

        assert_eq!(store.principal().await, Err(SessionError::NoToken));
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test]
    async fn concurrent_principal_calls_fetch_once() {
        let source = Arc::new(CountingSource::ok(admin()));
        let (store, _) = store(&source);
        store.set_token("t1");

        let (a, b) = tokio::join!(store.principal(), store.principal());

        assert_eq!(a.unwrap().username, "admin");
        assert_eq!(b.unwrap().username, "admin");
        assert_eq!(source.calls(), 1);

        store.principal().await.unwrap();
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn concurrent_failures_share_the_error() {
        let source = Arc::new(CountingSource::failing(FetchError::Unauthorized));
        let (store, _) = store(&source);
        store.set_token("t1");

        let (a, b) = tokio::join!(store.principal(), store.principal());

        assert_eq!(a, Err(SessionError::AuthExpired));
        assert_eq!(b, Err(SessionError::AuthExpired));
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn clear_during_fetch_discards_result() {
        let source = Arc::new(CountingSource::ok(admin()));
        let (store, storage) = store(&source);
        store.set_token("t1");

        let clear = async {
            tokio::time::sleep(Duration::from_millis(2)).await;
            store.clear();
        };
        let (result, ()) = tokio::join!(store.principal(), clear);

        assert_eq!(result, Err(SessionError::Superseded));
        assert!(store.cached_principal().is_none());
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn clear_removes_everything() {
        let source = Arc::new(CountingSource::ok(admin()));
        let (store, storage) = store(&source);
        store.set_token("t1");
        store.principal().await.unwrap();
        assert!(store.menu_tree().is_some());
        let before = store.epoch();

        store.clear();

        assert!(!store.has_token());
        assert!(store.cached_principal().is_none());
        assert!(store.menu_tree().is_none());
        assert!(store.grants().is_empty());
        assert!(storage.is_empty());
        assert!(store.epoch() > before);
    }

    #[tokio::test]
    async fn invalidate_principal_keeps_token_and_refetches() {
        let source = Arc::new(CountingSource::ok(admin()));
        let (store, _) = store(&source);
        store.set_token("t1");
        store.principal().await.unwrap();

        store.invalidate_principal();

        assert!(store.has_token());
        assert!(store.cached_principal().is_none());
        store.principal().await.unwrap();
        assert_eq!(source.calls(), 2);
    }

    #[test]
    fn replacing_token_drops_principal() {
        let source = Arc::new(CountingSource::ok(admin()));
        let (store, _) = store(&source);
        store.set_token("t1");
        store.set_principal(admin());

        assert!(store.set_token("t1"));
        assert!(store.cached_principal().is_some());

        assert!(store.set_token("t2"));
        assert!(store.cached_principal().is_none());
    }

    struct PerTokenSource;

    #[async_trait]
    impl PrincipalSource for PerTokenSource {
        async fn fetch_principal(&self, token: &str) -> Result<PrincipalProfile, FetchError> {
            Ok(PrincipalProfile::new(token.len() as u64, token))
        }
    }

    #[tokio::test]
    async fn cleared_token_takes_its_principal_along() {
        let storage = Arc::new(MemoryStorage::new());
        let store = SessionStore::new(
            Arc::new(PerTokenSource),
            Arc::clone(&storage) as Arc<dyn DurableStorage>,
        );
        store.set_token("alice");
        assert_eq!(store.principal().await.unwrap().username, "alice");
        assert!(store.menu_tree().is_some());

        store.clear_token();

        assert!(store.cached_principal().is_none());
        assert!(store.menu_tree().is_none());
        assert!(storage.get(keys::PRINCIPAL).unwrap().is_none());

        store.set_token("bob");
        assert_eq!(store.principal().await.unwrap().username, "bob");
    }

    #[test]
    fn derived_caches_are_memoized() {
        let source = Arc::new(CountingSource::ok(admin()));
        let (store, _) = store(&source);
        store.set_principal(admin());

        let a = store.menu_tree().unwrap();
        let b = store.menu_tree().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a[0].code, "sys");
    }

    #[test]
    fn oracle_reads_grants() {
        let source = Arc::new(CountingSource::ok(admin()));
        let (store, _) = store(&source);
        assert!(!store.has_permission("user:list"));

        store.set_principal(admin());
        assert!(store.has_permission("user:list"));
        assert!(store.has_permission("user:add"));
        assert!(store.has_menu_permission("users"));
        assert!(store.is_admin());
        assert!(!store.has_role("auditor"));
    }
}
