//! Route descriptors: the router-facing output of the compiler.

use super::join_route_path;
use lightstack_types::MenuKind;
use serde::{Deserialize, Serialize};

/// What a route renders.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "view", rename_all = "snake_case")]
pub enum ComponentBinding {
    /// The persistent navigation shell.
    Layout,
    /// A resolved view identifier.
    View(String),
    /// The fallback view, used when a menu's view cannot be resolved.
    Fallback,
}

impl ComponentBinding {
    /// Returns `true` for [`ComponentBinding::Layout`].
    #[must_use]
    pub fn is_layout(&self) -> bool {
        matches!(self, Self::Layout)
    }

    /// Returns `true` for [`ComponentBinding::Fallback`].
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback)
    }

    /// Concrete view identifier, given the host's layout and fallback ids.
    #[must_use]
    pub fn view_id<'a>(&'a self, layout: &'a str, fallback: &'a str) -> &'a str {
        match self {
            Self::Layout => layout,
            Self::View(id) => id,
            Self::Fallback => fallback,
        }
    }
}

/// Route metadata consumed by menus, breadcrumbs and tabs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteMeta {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub hidden: bool,
    #[serde(rename = "type")]
    pub kind: MenuKind,
    /// Code checked by the permission oracle; empty for static routes.
    #[serde(default)]
    pub permission_code: String,
}

impl RouteMeta {
    /// Metadata for a static (non-menu) route.
    #[must_use]
    pub fn fixed(title: impl Into<String>, hidden: bool) -> Self {
        Self {
            title: title.into(),
            icon: None,
            hidden,
            kind: MenuKind::Menu,
            permission_code: String::new(),
        }
    }
}

/// One route record, possibly with nested child routes.
///
/// Child paths are relative to the parent unless they start with `/`; an
/// empty child path is the parent's index route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteDescriptor {
    pub path: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<ComponentBinding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RouteDescriptor>,
    pub meta: RouteMeta,
}

impl RouteDescriptor {
    /// Creates a leaf route.
    #[must_use]
    pub fn new(path: impl Into<String>, name: impl Into<String>, meta: RouteMeta) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            component: None,
            redirect: None,
            children: Vec::new(),
            meta,
        }
    }

    /// Sets the component binding.
    #[must_use]
    pub fn with_component(mut self, component: ComponentBinding) -> Self {
        self.component = Some(component);
        self
    }

    /// Sets the redirect target.
    #[must_use]
    pub fn with_redirect(mut self, redirect: impl Into<String>) -> Self {
        self.redirect = Some(redirect.into());
        self
    }

    /// Sets the child routes.
    #[must_use]
    pub fn with_children(mut self, children: Vec<RouteDescriptor>) -> Self {
        self.children = children;
        self
    }

    /// Names of this route and all its descendants, pre-order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.visit(&mut |route| names.push(route.name.as_str()));
        names
    }

    /// Number of route records in this subtree, including itself.
    #[must_use]
    pub fn record_count(&self) -> usize {
        1 + self.children.iter().map(Self::record_count).sum::<usize>()
    }

    /// Full paths of every record in this subtree, given the parent's
    /// full path.
    #[must_use]
    pub fn full_paths(&self, parent: &str) -> Vec<String> {
        let own = join_route_path(parent, &self.path);
        let mut paths = vec![own.clone()];
        for child in &self.children {
            paths.extend(child.full_paths(&own));
        }
        paths
    }

    fn visit<'a>(&'a self, f: &mut impl FnMut(&'a RouteDescriptor)) {
        f(self);
        for child in &self.children {
            child.visit(f);
        }
    }
}
