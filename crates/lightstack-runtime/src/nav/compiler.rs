//! Route compiler.
//!
//! Compiles the navigation tree into route descriptors. Compilation is
//! pure and total: an unusable path falls back to `/{code}` and an
//! unresolvable view falls back to [`ComponentBinding::Fallback`].
//!
//! # Shapes
//!
//! | Node | Placement | Route |
//! |------|-----------|-------|
//! | directory | root | layout, redirect to first menu descendant, nested children |
//! | directory | nested | container without component |
//! | menu | root | `{code}.layout` wrapper with the screen as index child |
//! | menu | nested | screen |

use super::{
    join_route_path, ComponentBinding, ComponentResolver, MenuNode, RouteDescriptor, RouteMeta,
};
use lightstack_types::{MenuKind, STATUS_ENABLED};
use tracing::warn;

/// Suffix of the layout wrapper generated around a root menu.
pub const LAYOUT_NAME_SUFFIX: &str = ".layout";

/// Position of a node in the route tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Top-level route; gets the layout wrapper.
    Root,
    /// Inside another route.
    Nested,
}

/// Compiles every root of the navigation tree.
///
/// # Example
///
/// ```
/// use lightstack_runtime::nav::{build_menu_tree, compile_routes, ComponentBinding, ComponentCatalog};
/// use lightstack_types::{MenuKind, MenuRecord};
///
/// let tree = build_menu_tree(&[
///     MenuRecord::new(1, "sys", MenuKind::Directory),
///     MenuRecord::new(2, "users", MenuKind::Menu)
///         .with_parent(1)
///         .with_path("/system/users")
///         .with_component("system/users"),
/// ]);
/// let catalog = ComponentCatalog::new().with_view("system/users");
///
/// let routes = compile_routes(&tree, &catalog);
/// assert_eq!(routes[0].component, Some(ComponentBinding::Layout));
/// assert_eq!(routes[0].redirect.as_deref(), Some("/system/users"));
/// ```
#[must_use]
pub fn compile_routes(tree: &[MenuNode], resolver: &dyn ComponentResolver) -> Vec<RouteDescriptor> {
    tree.iter()
        .map(|node| compile_route(node, Placement::Root, resolver))
        .collect()
}

/// Compiles one node. Children are always compiled [`Placement::Nested`],
/// in the order given.
#[must_use]
pub fn compile_route(
    node: &MenuNode,
    placement: Placement,
    resolver: &dyn ComponentResolver,
) -> RouteDescriptor {
    let path = effective_path(node);
    let children = node
        .children
        .iter()
        .map(|child| compile_route(child, Placement::Nested, resolver))
        .collect();

    match (node.kind, placement) {
        (MenuKind::Directory, Placement::Root) => {
            let mut route = RouteDescriptor::new(path.clone(), node.code.clone(), meta(node))
                .with_component(ComponentBinding::Layout)
                .with_children(children);
            route.redirect = first_menu_path(node, &path);
            route
        }
        (MenuKind::Directory, Placement::Nested) => {
            RouteDescriptor::new(path, node.code.clone(), meta(node)).with_children(children)
        }
        (_, Placement::Root) => {
            let screen = RouteDescriptor::new("", node.code.clone(), meta(node))
                .with_component(bind_view(node, resolver))
                .with_children(children);
            RouteDescriptor::new(
                path,
                format!("{}{LAYOUT_NAME_SUFFIX}", node.code),
                meta(node),
            )
            .with_component(ComponentBinding::Layout)
            .with_children(vec![screen])
        }
        (_, Placement::Nested) => RouteDescriptor::new(path, node.code.clone(), meta(node))
            .with_component(bind_view(node, resolver))
            .with_children(children),
    }
}

/// Resolves a component reference, trying common spelling variants.
///
/// Order: verbatim, slash-trimmed, `{name}/index`, lower-cased,
/// lower-cased `/index`.
#[must_use]
pub fn resolve_component(resolver: &dyn ComponentResolver, name: &str) -> Option<String> {
    if let Some(found) = resolver.resolve(name) {
        return Some(found);
    }

    let trimmed = name.trim_matches('/');
    let lower = trimmed.to_lowercase();
    let candidates = [
        trimmed.to_string(),
        format!("{trimmed}/index"),
        lower.clone(),
        format!("{lower}/index"),
    ];

    candidates
        .iter()
        .filter(|candidate| !candidate.is_empty() && candidate.as_str() != name)
        .find_map(|candidate| resolver.resolve(candidate))
}

fn bind_view(node: &MenuNode, resolver: &dyn ComponentResolver) -> ComponentBinding {
    let Some(component) = node.component.as_deref() else {
        return ComponentBinding::Fallback;
    };

    match resolve_component(resolver, component) {
        Some(view) => ComponentBinding::View(view),
        None => {
            warn!(code = %node.code, component, "Component unresolved, using fallback view");
            ComponentBinding::Fallback
        }
    }
}

fn effective_path(node: &MenuNode) -> String {
    node.route_path()
        .map_or_else(|| format!("/{}", node.code), str::to_string)
}

fn meta(node: &MenuNode) -> RouteMeta {
    let title = if node.name.is_empty() {
        node.code.clone()
    } else {
        node.name.clone()
    };
    RouteMeta {
        title,
        icon: node.icon.clone(),
        hidden: node.is_hidden,
        kind: node.kind,
        permission_code: node.code.clone(),
    }
}

/// Full path of the first menu descendant in pre-order.
fn first_menu_path(node: &MenuNode, base: &str) -> Option<String> {
    node.children.iter().find_map(|child| {
        let full = join_route_path(base, &effective_path(child));
        if child.kind == MenuKind::Menu && !child.is_hidden && child.status == STATUS_ENABLED {
            Some(full)
        } else {
            first_menu_path(child, &full)
        }
    })
}
