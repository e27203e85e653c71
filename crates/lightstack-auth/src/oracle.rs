//! Permission oracle trait.
//!
//! Defines [`PermissionOracle`], the read-only predicate layer consumed by
//! UI conditionals. It lives in `lightstack-auth` so that renderers can
//! depend on it without pulling in the runtime.
//!
//! # Architecture
//!
//! ```text
//! PermissionOracle trait (lightstack-auth)   <- abstract, pure reads
//!          │
//!          └── PrincipalGrants (lightstack-auth) <- snapshot of a PrincipalProfile
//!                    ▲
//!                    └── SessionStore::grants() (lightstack-runtime)
//! ```

/// Read-only permission and role predicates.
///
/// Implementors answer the three primitive questions; the combinators
/// are provided.
///
/// # Empty Lists
///
/// `has_any_*` over an empty list is `false`, `has_all_*` over an empty
/// list is `true`.
///
/// # Example
///
/// ```
/// use lightstack_auth::PermissionOracle;
///
/// struct Everything;
///
/// impl PermissionOracle for Everything {
///     fn has_permission(&self, _code: &str) -> bool { true }
///     fn has_role(&self, _role: &str) -> bool { true }
///     fn has_menu_permission(&self, _code: &str) -> bool { true }
/// }
///
/// assert!(Everything.has_all_permissions(&["user:list", "user:edit"]));
/// assert!(!Everything.has_any_role(&[]));
/// ```
pub trait PermissionOracle: Send + Sync {
    /// Returns `true` if the principal holds `code`.
    fn has_permission(&self, code: &str) -> bool;

    /// Returns `true` if the principal has role `role`.
    fn has_role(&self, role: &str) -> bool;

    /// Returns `true` if `code` was granted through the menu set.
    fn has_menu_permission(&self, code: &str) -> bool;

    /// Returns `true` if any of `codes` is held.
    fn has_any_permission(&self, codes: &[&str]) -> bool {
        codes.iter().any(|code| self.has_permission(code))
    }

    /// Returns `true` if every one of `codes` is held.
    fn has_all_permissions(&self, codes: &[&str]) -> bool {
        codes.iter().all(|code| self.has_permission(code))
    }

    /// Returns `true` if the principal has any of `roles`.
    fn has_any_role(&self, roles: &[&str]) -> bool {
        roles.iter().any(|role| self.has_role(role))
    }

    /// Returns `true` if the principal has every one of `roles`.
    fn has_all_roles(&self, roles: &[&str]) -> bool {
        roles.iter().all(|role| self.has_role(role))
    }

    /// Returns `true` for tenant administrators and super administrators.
    fn is_admin(&self) -> bool {
        self.has_any_role(&[ADMIN_ROLE, SUPER_ADMIN_ROLE])
    }
}

/// Role code of a tenant administrator.
pub const ADMIN_ROLE: &str = "admin";

/// Role code of a cross-tenant super administrator.
pub const SUPER_ADMIN_ROLE: &str = "super_admin";

#[cfg(test)]
mod tests {
    use super::*;

    struct RolesOnly(&'static [&'static str]);

    impl PermissionOracle for RolesOnly {
        fn has_permission(&self, _code: &str) -> bool {
            false
        }

        fn has_role(&self, role: &str) -> bool {
            self.0.contains(&role)
        }

        fn has_menu_permission(&self, _code: &str) -> bool {
            false
        }
    }

    #[test]
    fn empty_list_semantics() {
        let oracle = RolesOnly(&[]);
        assert!(!oracle.has_any_permission(&[]));
        assert!(oracle.has_all_permissions(&[]));
        assert!(!oracle.has_any_role(&[]));
        assert!(oracle.has_all_roles(&[]));
    }

    #[test]
    fn admin_detection() {
        assert!(RolesOnly(&["admin"]).is_admin());
        assert!(RolesOnly(&["super_admin"]).is_admin());
        assert!(!RolesOnly(&["editor"]).is_admin());
    }

    #[test]
    fn role_combinators() {
        let oracle = RolesOnly(&["editor", "viewer"]);
        assert!(oracle.has_any_role(&["admin", "viewer"]));
        assert!(oracle.has_all_roles(&["editor", "viewer"]));
        assert!(!oracle.has_all_roles(&["editor", "admin"]));
    }
}
