//! Tenant descriptor.
//!
//! Only the fields the navigation core needs to scope a session are
//! modelled here; tenant administration is a backend concern.

use crate::TenantId;
use serde::{Deserialize, Serialize};

/// A tenant the principal can act in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    /// Tenant id.
    pub id: TenantId,
    /// Display name.
    pub name: String,
    /// Custom domain, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// `1` when enabled.
    #[serde(default = "enabled")]
    pub status: i32,
}

impl Tenant {
    /// Creates an enabled tenant.
    #[must_use]
    pub fn new(id: impl Into<TenantId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            domain: None,
            status: enabled(),
        }
    }
}

fn enabled() -> i32 {
    crate::STATUS_ENABLED
}
