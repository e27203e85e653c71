//! Component resolution.
//!
//! Whether a menu's `component` reference names a view the host can render
//! is host-specific. The compiler asks a [`ComponentResolver`] and never
//! assumes a particular module-loading mechanism.

use std::collections::BTreeSet;

/// Maps a component reference to a renderable view identifier.
pub trait ComponentResolver: Send + Sync {
    /// Returns the canonical view identifier for `name`, if the host has one.
    fn resolve(&self, name: &str) -> Option<String>;
}

/// In-memory set of known view identifiers.
///
/// Resolution is exact: `resolve(name)` succeeds only if `name` was
/// registered. Spelling variants are tried by the compiler, not here.
///
/// # Example
///
/// ```
/// use lightstack_runtime::nav::{ComponentCatalog, ComponentResolver};
///
/// let catalog: ComponentCatalog = ["system/users/index", "dashboard/index"]
///     .into_iter()
///     .collect();
///
/// assert_eq!(
///     catalog.resolve("system/users/index").as_deref(),
///     Some("system/users/index")
/// );
/// assert_eq!(catalog.resolve("system/users"), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ComponentCatalog {
    views: BTreeSet<String>,
}

impl ComponentCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a view (builder form).
    #[must_use]
    pub fn with_view(mut self, view: impl Into<String>) -> Self {
        self.insert(view);
        self
    }

    /// Adds a view.
    pub fn insert(&mut self, view: impl Into<String>) {
        self.views.insert(view.into());
    }

    /// Returns `true` if `view` is registered.
    #[must_use]
    pub fn contains(&self, view: &str) -> bool {
        self.views.contains(view)
    }

    /// Number of registered views.
    #[must_use]
    pub fn len(&self) -> usize {
        self.views.len()
    }

    /// Returns `true` if no view is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}

impl ComponentResolver for ComponentCatalog {
    fn resolve(&self, name: &str) -> Option<String> {
        self.views.get(name).cloned()
    }
}

impl<S: Into<String>> FromIterator<S> for ComponentCatalog {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            views: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_and_lookup() {
        let catalog = ComponentCatalog::new()
            .with_view("system/users")
            .with_view("system/users");

        assert_eq!(catalog.len(), 1);
        assert!(catalog.contains("system/users"));
        assert_eq!(catalog.resolve("System/Users"), None);
    }

    #[test]
    fn empty_catalog_resolves_nothing() {
        let catalog = ComponentCatalog::new();
        assert!(catalog.is_empty());
        assert_eq!(catalog.resolve(""), None);
    }
}
