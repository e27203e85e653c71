//! Two-tier cache: process memory in front of durable storage.
//!
//! ```text
//! get ──► memory ──hit──► value
//!           │ miss
//!           ▼
//!         durable ──hit──► promote to memory ──► value
//!           │ miss / corrupt
//!           ▼
//!          None   (caller fetches remotely, then `put` fills both tiers)
//! ```
//!
//! Durable failures never fail the cache: reads degrade to a miss and
//! writes keep the memory tier, both logged at `warn`.

use crate::storage::DurableStorage;
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, warn};

/// One cached value stored under a fixed storage key.
pub struct TieredCache<T> {
    key: &'static str,
    memory: RwLock<Option<Arc<T>>>,
    durable: Arc<dyn DurableStorage>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> TieredCache<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Creates an empty cache backed by `durable` under `key`.
    #[must_use]
    pub fn new(key: &'static str, durable: Arc<dyn DurableStorage>) -> Self {
        Self {
            key,
            memory: RwLock::new(None),
            durable,
            _marker: PhantomData,
        }
    }

    /// Storage key.
    #[must_use]
    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Returns the memory tier only.
    #[must_use]
    pub fn peek(&self) -> Option<Arc<T>> {
        self.memory.read().clone()
    }

    /// Memory, then durable (promoting a durable hit into memory).
    #[must_use]
    pub fn get(&self) -> Option<Arc<T>> {
        if let Some(value) = self.peek() {
            return Some(value);
        }

        let raw = match self.durable.get(self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(key = self.key, error = %e, "Durable read failed, treating as miss");
                return None;
            }
        };

        match serde_json::from_str::<T>(&raw) {
            Ok(value) => {
                debug!(key = self.key, "Promoted durable entry to memory");
                let mut memory = self.memory.write();
                // A concurrent put may have landed first; keep it.
                Some(memory.get_or_insert_with(|| Arc::new(value)).clone())
            }
            Err(e) => {
                warn!(key = self.key, error = %e, "Corrupt durable entry removed");
                if let Err(e) = self.durable.remove(self.key) {
                    warn!(key = self.key, error = %e, "Failed to remove corrupt entry");
                }
                None
            }
        }
    }

    /// Stores `value` in both tiers and returns the shared handle.
    pub fn put(&self, value: T) -> Arc<T> {
        match serde_json::to_string(&value) {
            Ok(raw) => {
                if let Err(e) = self.durable.set(self.key, &raw) {
                    warn!(key = self.key, error = %e, "Durable write failed, kept in memory only");
                }
            }
            Err(e) => {
                warn!(key = self.key, error = %e, "Serialization failed, kept in memory only");
            }
        }

        let value = Arc::new(value);
        *self.memory.write() = Some(Arc::clone(&value));
        value
    }

    /// Clears both tiers.
    pub fn invalidate(&self) {
        *self.memory.write() = None;
        if let Err(e) = self.durable.remove(self.key) {
            warn!(key = self.key, error = %e, "Durable remove failed");
        }
    }
}

impl<T> fmt::Debug for TieredCache<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TieredCache")
            .field("key", &self.key)
            .field("cached", &self.memory.read().is_some())
            .finish()
    }
}
