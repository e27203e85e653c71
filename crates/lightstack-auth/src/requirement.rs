//! Access requirements for UI conditionals.
//!
//! An [`AccessRequirement`] is what a template attaches to a button or a
//! panel: "visible if the principal holds any of these permissions", "only
//! for admins", and so on. Evaluation is delegated to a
//! [`PermissionOracle`].
//!
//! ```text
//! AccessRequirement ──evaluate──▶ PermissionOracle ──▶ bool
//!                    ──check────▶                   ──▶ Result<(), AccessDenied>
//! ```

use crate::{AccessDenied, PermissionOracle};
use serde::{Deserialize, Serialize};

/// A visibility/authorization requirement.
///
/// # Example
///
/// ```
/// use lightstack_auth::{AccessRequirement, PrincipalGrants};
/// use lightstack_types::PrincipalProfile;
///
/// let grants = PrincipalGrants::from_profile(
///     &PrincipalProfile::new(1, "bob").with_permissions(["menu_management"]),
/// );
///
/// let req = AccessRequirement::any_permission(["menu_management", "user_management"]);
/// assert!(req.evaluate(&grants));
///
/// let admin_only = AccessRequirement::Admin;
/// assert!(admin_only.check(&grants).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "codes", rename_all = "snake_case")]
pub enum AccessRequirement {
    /// Satisfied if any listed permission (raw or menu-derived) is held.
    AnyPermission(Vec<String>),
    /// Satisfied if every listed permission is held.
    AllPermissions(Vec<String>),
    /// Satisfied if the principal has any listed role.
    AnyRole(Vec<String>),
    /// Satisfied for `admin` and `super_admin`.
    Admin,
}

impl AccessRequirement {
    /// Requirement on a single permission.
    #[must_use]
    pub fn permission(code: impl Into<String>) -> Self {
        Self::AnyPermission(vec![code.into()])
    }

    /// Requirement on any of several permissions.
    #[must_use]
    pub fn any_permission<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::AnyPermission(codes.into_iter().map(Into::into).collect())
    }

    /// Requirement on all of several permissions.
    #[must_use]
    pub fn all_permissions<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::AllPermissions(codes.into_iter().map(Into::into).collect())
    }

    /// Requirement on a single role.
    #[must_use]
    pub fn role(role: impl Into<String>) -> Self {
        Self::AnyRole(vec![role.into()])
    }

    /// Requirement on any of several roles.
    #[must_use]
    pub fn any_role<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::AnyRole(roles.into_iter().map(Into::into).collect())
    }

    /// Returns `true` if `oracle` satisfies the requirement.
    #[must_use]
    pub fn evaluate(&self, oracle: &dyn PermissionOracle) -> bool {
        match self {
            Self::AnyPermission(codes) => oracle.has_any_permission(&as_strs(codes)),
            Self::AllPermissions(codes) => oracle.has_all_permissions(&as_strs(codes)),
            Self::AnyRole(roles) => oracle.has_any_role(&as_strs(roles)),
            Self::Admin => oracle.is_admin(),
        }
    }

    /// Like [`evaluate`](Self::evaluate) but reports what was missing.
    ///
    /// # Errors
    ///
    /// Returns [`AccessDenied`] describing the unmet requirement.
    pub fn check(&self, oracle: &dyn PermissionOracle) -> Result<(), AccessDenied> {
        if self.evaluate(oracle) {
            return Ok(());
        }

        Err(match self {
            Self::AnyPermission(codes) | Self::AllPermissions(codes) => {
                AccessDenied::MissingPermission {
                    required: codes
                        .iter()
                        .filter(|code| !oracle.has_permission(code))
                        .cloned()
                        .collect(),
                }
            }
            Self::AnyRole(roles) => AccessDenied::MissingRole {
                required: roles.clone(),
            },
            Self::Admin => AccessDenied::NotAdmin,
        })
    }
}

fn as_strs(values: &[String]) -> Vec<&str> {
    values.iter().map(String::as_str).collect()
}
