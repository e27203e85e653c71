//! Live route table.
//!
//! Holds the static routes plus whatever the gate registers, and matches
//! locations against them.
//!
//! # Pattern Syntax
//!
//! | Segment | Matches |
//! |---------|---------|
//! | `users` | the literal segment |
//! | `:id` | any one segment, captured as `id` |
//! | `:rest(.*)*` | zero or more remaining segments, captured as `rest` |
//!
//! Children are tried before their parent, and catch-all routes only
//! after every other route failed.

use super::RouterError;
use crate::nav::{join_route_path, normalize_location, RouteDescriptor};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

/// Result of matching a location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteMatch {
    /// Normalized location that was matched.
    pub path: String,
    /// Name of the deepest matched record.
    pub name: String,
    /// Names of the matched records, outermost first.
    pub matched: Vec<String>,
    /// Redirect of the deepest matched record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
    /// Captured parameters.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, String>,
}

/// Ordered set of top-level routes.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<RouteDescriptor>,
    names: HashSet<String>,
}

impl RouteTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a table holding `routes`.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::DuplicateName`] if two records share a name.
    pub fn with_routes(routes: Vec<RouteDescriptor>) -> Result<Self, RouterError> {
        let mut table = Self::new();
        for route in routes {
            table.add_route(route)?;
        }
        Ok(table)
    }

    /// Installs a top-level route.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::DuplicateName`] if any record of `route`
    /// shares a name with an installed record; the table is unchanged.
    pub fn add_route(&mut self, route: RouteDescriptor) -> Result<(), RouterError> {
        let mut incoming = HashSet::new();
        for name in route.names() {
            if self.names.contains(name) || !incoming.insert(name) {
                return Err(RouterError::DuplicateName(name.to_string()));
            }
        }
        self.names
            .extend(incoming.into_iter().map(ToString::to_string));
        self.routes.push(route);
        Ok(())
    }

    /// Removes the top-level route called `name` with its children.
    /// Returns `false` if no such route is installed.
    pub fn remove_route(&mut self, name: &str) -> bool {
        let Some(idx) = self.routes.iter().position(|route| route.name == name) else {
            return false;
        };
        let removed = self.routes.remove(idx);
        for name in removed.names() {
            self.names.remove(name);
        }
        true
    }

    /// Returns `true` if a record called `name` is installed at any depth.
    #[must_use]
    pub fn has_route(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Number of top-level routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns `true` if the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Number of records at every depth.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.names.len()
    }

    /// Installed top-level routes, in insertion order.
    #[must_use]
    pub fn routes(&self) -> &[RouteDescriptor] {
        &self.routes
    }

    /// Matches `location` against the table.
    #[must_use]
    pub fn resolve(&self, location: &str) -> Option<RouteMatch> {
        let path = normalize_location(location);
        let segments = split_segments(&path);

        [false, true].into_iter().find_map(|catch_all| {
            self.routes.iter().find_map(|route| {
                let mut chain = Vec::new();
                let mut params = BTreeMap::new();
                match_route(route, "/", &segments, catch_all, &mut chain, &mut params)
                    .then(|| build_match(&path, chain, params))
            })
        })
    }
}

fn build_match(
    path: &str,
    chain: Vec<&RouteDescriptor>,
    params: BTreeMap<String, String>,
) -> RouteMatch {
    let deepest = chain.last().copied();
    RouteMatch {
        path: path.to_string(),
        name: deepest.map(|r| r.name.clone()).unwrap_or_default(),
        matched: chain.iter().map(|r| r.name.clone()).collect(),
        redirect: deepest.and_then(|r| r.redirect.clone()),
        params,
    }
}

/// Depth-first: a matching descendant wins over the record itself.
fn match_route<'a>(
    route: &'a RouteDescriptor,
    parent: &str,
    segments: &[&str],
    catch_all: bool,
    chain: &mut Vec<&'a RouteDescriptor>,
    params: &mut BTreeMap<String, String>,
) -> bool {
    let full = join_route_path(parent, &route.path);
    chain.push(route);

    for child in &route.children {
        if match_route(child, &full, segments, catch_all, chain, params) {
            return true;
        }
    }

    let pattern = split_segments(&full);
    if is_catch_all(&pattern) == catch_all {
        if let Some(captured) = match_pattern(&pattern, segments) {
            params.extend(captured);
            return true;
        }
    }

    chain.pop();
    false
}

fn split_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

fn is_catch_all(pattern: &[&str]) -> bool {
    pattern.last().is_some_and(|s| s.starts_with(':') && s.ends_with('*'))
}

fn match_pattern(pattern: &[&str], segments: &[&str]) -> Option<BTreeMap<String, String>> {
    let mut params = BTreeMap::new();
    for (idx, part) in pattern.iter().enumerate() {
        if let Some(param) = part.strip_prefix(':') {
            if param.ends_with('*') {
                let name = param.split('(').next().unwrap_or(param);
                let rest = segments.get(idx..).unwrap_or_default();
                params.insert(name.to_string(), rest.join("/"));
                return Some(params);
            }
            let value = segments.get(idx)?;
            params.insert(param.to_string(), (*value).to_string());
        } else if segments.get(idx) != Some(part) {
            return None;
        }
    }
    (pattern.len() == segments.len()).then_some(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nav::{ComponentBinding, RouteMeta};

    fn route(path: &str, name: &str) -> RouteDescriptor {
        RouteDescriptor::new(path, name, RouteMeta::fixed(name, false))
    }

    fn table() -> RouteTable {
        RouteTable::with_routes(vec![
            route("/", "Home")
                .with_component(ComponentBinding::Layout)
                .with_redirect("/dashboard")
                .with_children(vec![route("/dashboard", "Dashboard")]),
            route("/system", "sys")
                .with_redirect("/system/users")
                .with_children(vec![
                    route("users", "users"),
                    route("users/:id", "user-detail"),
                ]),
            route("/:pathMatch(.*)*", "CatchAll").with_redirect("/404"),
            route("/404", "NotFound"),
        ])
        .unwrap()
    }

    #[test]
    fn resolves_nested_relative_child() {
        let m = table().resolve("/system/users").unwrap();
        assert_eq!(m.name, "users");
        assert_eq!(m.matched, vec!["sys", "users"]);
        assert_eq!(m.redirect, None);
    }

    #[test]
    fn parent_matches_when_no_child_does() {
        let m = table().resolve("/system").unwrap();
        assert_eq!(m.name, "sys");
        assert_eq!(m.redirect.as_deref(), Some("/system/users"));
    }

    #[test]
    fn captures_params() {
        let m = table().resolve("/system/users/42?tab=roles").unwrap();
        assert_eq!(m.name, "user-detail");
        assert_eq!(m.params.get("id").map(String::as_str), Some("42"));
    }

    #[test]
    fn catch_all_tried_last() {
        let table = table();
        assert_eq!(table.resolve("/404").unwrap().name, "NotFound");

        let m = table.resolve("/nowhere/at/all").unwrap();
        assert_eq!(m.name, "CatchAll");
        assert_eq!(m.redirect.as_deref(), Some("/404"));
        assert_eq!(
            m.params.get("pathMatch").map(String::as_str),
            Some("nowhere/at/all")
        );
    }

    #[test]
    fn root_layout_and_absolute_child() {
        let table = table();
        let m = table.resolve("/dashboard/").unwrap();
        assert_eq!(m.matched, vec!["Home", "Dashboard"]);

        let m = table.resolve("/").unwrap();
        assert_eq!(m.name, "Home");
        assert_eq!(m.redirect.as_deref(), Some("/dashboard"));
    }

    #[test]
    fn duplicate_names_rejected_atomically() {
        let mut table = table();
        let before = table.record_count();

        let err = table
            .add_route(route("/x", "x").with_children(vec![route("y", "users")]))
            .unwrap_err();

        assert_eq!(err, RouterError::DuplicateName("users".into()));
        assert_eq!(table.record_count(), before);
        assert!(!table.has_route("x"));
    }

    #[test]
    fn remove_drops_subtree() {
        let mut table = table();
        assert!(table.remove_route("sys"));
        assert!(!table.has_route("users"));
        assert!(!table.remove_route("sys"));
        assert_eq!(table.len(), 3);
        assert_eq!(table.resolve("/system/users").unwrap().name, "CatchAll");
    }

    #[test]
    fn empty_table_matches_nothing() {
        assert!(RouteTable::new().resolve("/").is_none());
    }
}
