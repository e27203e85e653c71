//! Permission snapshot of a principal.
//!
//! [`PrincipalGrants`] flattens a [`PrincipalProfile`] into hash sets once,
//! so that UI conditionals evaluated on every render are O(1) lookups.

use crate::PermissionOracle;
use lightstack_types::PrincipalProfile;
use std::collections::HashSet;

/// Immutable permission snapshot built from a [`PrincipalProfile`].
///
/// # Sources
///
/// | Set | Filled from |
/// |-----|-------------|
/// | permissions | `profile.permissions` |
/// | roles | `profile.roles` |
/// | menu codes | `code` of every enabled menu/permission record, nested included |
///
/// Hidden records still grant their code: hiding controls navigation, not
/// authorization. Disabled records grant nothing.
///
/// [`has_permission`](PermissionOracle::has_permission) consults both the
/// raw permissions and the menu codes, so button-level permission records
/// authorize even though they never become navigation nodes.
///
/// # Example
///
/// ```
/// use lightstack_auth::{PermissionOracle, PrincipalGrants};
/// use lightstack_types::{MenuKind, MenuRecord, PrincipalProfile};
///
/// let profile = PrincipalProfile::new(1, "alice")
///     .with_roles(["editor"])
///     .with_permissions(["report:view"])
///     .with_menus(vec![MenuRecord::new(9, "user:delete", MenuKind::Permission)]);
///
/// let grants = PrincipalGrants::from_profile(&profile);
/// assert!(grants.has_permission("report:view"));
/// assert!(grants.has_permission("user:delete"));
/// assert!(grants.has_menu_permission("user:delete"));
/// assert!(!grants.has_menu_permission("report:view"));
/// assert!(grants.has_role("editor"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrincipalGrants {
    permissions: HashSet<String>,
    roles: HashSet<String>,
    menu_codes: HashSet<String>,
}

impl PrincipalGrants {
    /// Snapshot with no grants (signed-out state).
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a snapshot from a profile.
    #[must_use]
    pub fn from_profile(profile: &PrincipalProfile) -> Self {
        let mut menu_codes = HashSet::new();
        for menu in &profile.menus {
            menu.walk(&mut |record| {
                if record.kind.grants_permission()
                    && record.status == lightstack_types::STATUS_ENABLED
                    && !record.code.is_empty()
                {
                    menu_codes.insert(record.code.clone());
                }
            });
        }

        Self {
            permissions: profile.permissions.iter().cloned().collect(),
            roles: profile.roles.iter().cloned().collect(),
            menu_codes,
        }
    }

    /// Returns `true` if nothing is granted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty() && self.roles.is_empty() && self.menu_codes.is_empty()
    }

    /// Number of distinct permission codes (raw and menu-derived).
    #[must_use]
    pub fn permission_count(&self) -> usize {
        self.permissions.union(&self.menu_codes).count()
    }

    /// Role codes, sorted.
    #[must_use]
    pub fn roles(&self) -> Vec<&str> {
        let mut roles: Vec<&str> = self.roles.iter().map(String::as_str).collect();
        roles.sort_unstable();
        roles
    }
}

impl PermissionOracle for PrincipalGrants {
    fn has_permission(&self, code: &str) -> bool {
        self.permissions.contains(code) || self.menu_codes.contains(code)
    }

    fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    fn has_menu_permission(&self, code: &str) -> bool {
        self.menu_codes.contains(code)
    }
}
