//! Durable client storage.
//!
//! The navigation core persists the token, the principal profile and the
//! tenant selection so that a restarted client can rehydrate its session.
//! The backing store is an external collaborator; this module defines the
//! contract and ships two implementations.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  SessionStore / TenantStore (TieredCache)    │
//! └──────────────────────────────────────────────┘
//!                      │
//!                      ▼
//! ┌──────────────────────────────────────────────┐
//! │  DurableStorage trait                        │
//! └──────────────────────────────────────────────┘
//!            │                       │
//!            ▼                       ▼
//!     ┌─────────────┐        ┌──────────────────┐
//!     │MemoryStorage│        │ LocalFileStorage │
//!     └─────────────┘        └──────────────────┘
//! ```

mod error;
mod local;
mod memory;

pub use error::StorageError;
pub use local::{default_storage_path, LocalFileStorage};
pub use memory::MemoryStorage;

use std::fmt::Debug;

/// Key/value storage that survives process restarts.
///
/// Operations are synchronous: every implementation in use is either
/// in-memory or a small local file, and callers never hold a lock across
/// them.
///
/// # Contract
///
/// - `get` of a missing key is `Ok(None)`, not an error
/// - `remove` of a missing key is `Ok(())`
/// - `set` replaces any previous value
pub trait DurableStorage: Send + Sync + Debug {
    /// Reads the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Deletes `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Well-known storage keys.
pub mod keys {
    /// Bearer token.
    pub const TOKEN: &str = "token";
    /// Serialized principal profile.
    pub const PRINCIPAL: &str = "principal";
    /// Serialized current tenant.
    pub const CURRENT_TENANT: &str = "current_tenant";
    /// Super-admin flag.
    pub const IS_SUPER_ADMIN: &str = "is_super_admin";
}
