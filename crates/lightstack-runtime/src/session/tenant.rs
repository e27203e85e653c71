//! Tenant selection.

use super::TieredCache;
use crate::storage::{keys, DurableStorage};
use lightstack_types::Tenant;
use std::sync::Arc;
use tracing::info;

/// Persisted tenant context: the selected tenant and the super-admin flag.
#[derive(Debug)]
pub struct TenantStore {
    current: TieredCache<Tenant>,
    super_admin: TieredCache<bool>,
}

impl TenantStore {
    /// Creates a store over `storage`.
    #[must_use]
    pub fn new(storage: Arc<dyn DurableStorage>) -> Self {
        Self {
            current: TieredCache::new(keys::CURRENT_TENANT, Arc::clone(&storage)),
            super_admin: TieredCache::new(keys::IS_SUPER_ADMIN, storage),
        }
    }

    /// The selected tenant.
    #[must_use]
    pub fn current(&self) -> Option<Arc<Tenant>> {
        self.current.get()
    }

    /// Selects a tenant. Returns `true` if the selection changed.
    pub fn set_current(&self, tenant: Tenant) -> bool {
        let changed = self.current().map_or(true, |current| current.id != tenant.id);
        if changed {
            info!(tenant = %tenant.id, name = %tenant.name, "Tenant selected");
        }
        self.current.put(tenant);
        changed
    }

    /// Whether the principal administers all tenants.
    #[must_use]
    pub fn is_super_admin(&self) -> bool {
        self.super_admin.get().is_some_and(|flag| *flag)
    }

    /// Sets the super-admin flag.
    pub fn set_super_admin(&self, value: bool) {
        self.super_admin.put(value);
    }

    /// Forgets the tenant context (sign-out).
    pub fn clear(&self) {
        self.current.invalidate();
        self.super_admin.invalidate();
    }
}
