//! Menu tree builder.
//!
//! Turns the principal's raw menu records (flat, pre-nested, or a mix of
//! both, in any order) into the pruned, sorted navigation tree.
//!
//! # Pipeline
//!
//! ```text
//! records ──► flatten ──► dedupe ──► filter ──► sort ──► link parents
//!                                                            │
//!            prune ◄── materialize children ◄── break cycles ◄┘
//! ```
//!
//! | Record | Outcome |
//! |--------|---------|
//! | hidden, disabled, permission, unknown kind | filtered out |
//! | parent `0` | root |
//! | parent survives | child of parent |
//! | parent filtered out | dropped with its subtree, logged at `debug` |
//! | parent unknown | promoted to root |
//! | on a parent cycle | first cycle member (sorted) becomes a root |
//! | directory without children or usable path | pruned |
//!
//! The builder is pure; it never fails.

use super::parse_route_path;
use lightstack_types::{MenuId, MenuKind, MenuRecord};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// A node of the built navigation tree.
///
/// Every node is visible, enabled, and a directory or menu; `children` is
/// already filtered and sorted by `sort_order`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuNode {
    pub id: MenuId,
    pub parent_id: MenuId,
    pub name: String,
    pub code: String,
    #[serde(rename = "type")]
    pub kind: MenuKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub sort_order: i32,
    pub is_hidden: bool,
    pub status: i32,
    #[serde(default)]
    pub children: Vec<MenuNode>,
}

impl MenuNode {
    fn from_record(record: &MenuRecord, parent_id: MenuId, children: Vec<MenuNode>) -> Self {
        Self {
            id: record.id,
            parent_id,
            name: record.name.clone(),
            code: record.code.clone(),
            kind: record.kind,
            path: record.path.clone(),
            component: record.component.clone(),
            icon: record.icon.clone(),
            sort_order: record.sort_order,
            is_hidden: record.is_hidden,
            status: record.status,
            children,
        }
    }

    /// Returns `true` for directory nodes.
    #[must_use]
    pub fn is_directory(&self) -> bool {
        self.kind == MenuKind::Directory
    }

    /// The node's own path, if it is usable as a route path.
    #[must_use]
    pub fn route_path(&self) -> Option<&str> {
        self.path.as_deref().and_then(parse_route_path)
    }

    /// Number of nodes in this subtree, including itself.
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Self::node_count).sum::<usize>()
    }

    /// Finds a node by code in this subtree.
    #[must_use]
    pub fn find(&self, code: &str) -> Option<&MenuNode> {
        if self.code == code {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(code))
    }
}

/// Builds the navigation tree from raw menu records.
///
/// # Example
///
/// ```
/// use lightstack_runtime::nav::build_menu_tree;
/// use lightstack_types::{MenuKind, MenuRecord};
///
/// let records = vec![
///     MenuRecord::new(1, "sys", MenuKind::Directory),
///     MenuRecord::new(2, "users", MenuKind::Menu)
///         .with_parent(1)
///         .with_path("/system/users"),
///     MenuRecord::new(3, "user:add", MenuKind::Permission).with_parent(2),
/// ];
///
/// let tree = build_menu_tree(&records);
/// assert_eq!(tree.len(), 1);
/// assert_eq!(tree[0].children[0].code, "users");
/// assert!(tree[0].children[0].children.is_empty());
/// ```
#[must_use]
pub fn build_menu_tree(records: &[MenuRecord]) -> Vec<MenuNode> {
    let flat = flatten_unique(records);

    // Every record the server sent, survivor or not.
    let known: HashSet<MenuId> = flat.iter().map(|entry| entry.record.id).collect();

    let mut survivors: Vec<&FlatEntry<'_>> = flat
        .iter()
        .filter(|entry| entry.record.is_active() && entry.record.kind.is_navigable())
        .collect();
    survivors.sort_by_key(|entry| entry.record.sort_order);

    let survivor_index: HashMap<MenuId, usize> = survivors
        .iter()
        .enumerate()
        .map(|(idx, entry)| (entry.record.id, idx))
        .collect();

    let mut links = link_parents(&survivors, &survivor_index, &known);
    break_cycles(&survivors, &mut links);

    let mut children_of: HashMap<usize, Vec<usize>> = HashMap::new();
    let mut roots = Vec::new();
    for (idx, link) in links.iter().enumerate() {
        match link {
            Link::Root => roots.push(idx),
            Link::Child(parent) => children_of.entry(*parent).or_default().push(idx),
            Link::Dropped => {}
        }
    }

    roots
        .into_iter()
        .filter_map(|idx| materialize(idx, MenuId::ROOT, &survivors, &children_of))
        .collect()
}

struct FlatEntry<'a> {
    record: &'a MenuRecord,
    parent: MenuId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Link {
    Root,
    Child(usize),
    Dropped,
}

/// Depth-first flatten; a nested record's parent is its container.
/// The first occurrence of an id wins.
fn flatten_unique(records: &[MenuRecord]) -> Vec<FlatEntry<'_>> {
    fn visit<'a>(
        record: &'a MenuRecord,
        parent: MenuId,
        seen: &mut HashSet<MenuId>,
        out: &mut Vec<FlatEntry<'a>>,
    ) {
        if seen.insert(record.id) {
            out.push(FlatEntry { record, parent });
        } else {
            debug!(id = %record.id, code = %record.code, "Duplicate menu id ignored");
        }
        for child in &record.children {
            visit(child, record.id, seen, out);
        }
    }

    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for record in records {
        visit(record, record.parent_id, &mut seen, &mut out);
    }
    out
}

fn link_parents(
    survivors: &[&FlatEntry<'_>],
    survivor_index: &HashMap<MenuId, usize>,
    known: &HashSet<MenuId>,
) -> Vec<Link> {
    let direct: Vec<Link> = survivors
        .iter()
        .map(|entry| {
            let parent = entry.parent;
            if parent.is_root() {
                Link::Root
            } else if let Some(&idx) = survivor_index.get(&parent) {
                Link::Child(idx)
            } else if known.contains(&parent) {
                debug!(
                    id = %entry.record.id,
                    code = %entry.record.code,
                    parent = %parent,
                    "Menu record dropped, parent filtered out"
                );
                Link::Dropped
            } else {
                warn!(
                    id = %entry.record.id,
                    code = %entry.record.code,
                    parent = %parent,
                    "Orphan menu record promoted to root"
                );
                Link::Root
            }
        })
        .collect();

    // A record under a dropped ancestor is dropped too.
    (0..survivors.len())
        .map(|idx| {
            let mut visited = HashSet::new();
            let mut cur = idx;
            loop {
                match direct[cur] {
                    Link::Dropped => {
                        if cur != idx {
                            debug!(
                                id = %survivors[idx].record.id,
                                code = %survivors[idx].record.code,
                                ancestor = %survivors[cur].record.id,
                                "Menu record dropped with its ancestor"
                            );
                        }
                        return Link::Dropped;
                    }
                    Link::Root => return direct[idx],
                    Link::Child(parent) => {
                        if !visited.insert(cur) {
                            return direct[idx];
                        }
                        cur = parent;
                    }
                }
            }
        })
        .collect()
}

/// Turns the first member (in sorted order) of every parent cycle into a root.
fn break_cycles(survivors: &[&FlatEntry<'_>], links: &mut [Link]) {
    for start in 0..links.len() {
        let mut visited = HashSet::new();
        let mut cur = start;
        while let Link::Child(parent) = links[cur] {
            if parent == start {
                warn!(
                    id = %survivors[start].record.id,
                    code = %survivors[start].record.code,
                    "Menu parent cycle broken, record promoted to root"
                );
                links[start] = Link::Root;
                break;
            }
            if !visited.insert(parent) {
                break;
            }
            cur = parent;
        }
    }
}

fn materialize(
    idx: usize,
    parent_id: MenuId,
    survivors: &[&FlatEntry<'_>],
    children_of: &HashMap<usize, Vec<usize>>,
) -> Option<MenuNode> {
    let record = survivors[idx].record;
    let children: Vec<MenuNode> = children_of
        .get(&idx)
        .map(|kids| {
            kids.iter()
                .filter_map(|&kid| materialize(kid, record.id, survivors, children_of))
                .collect()
        })
        .unwrap_or_default();

    let node = MenuNode::from_record(record, parent_id, children);
    if node.is_directory() && node.children.is_empty() && node.route_path().is_none() {
        debug!(id = %record.id, code = %record.code, "Empty directory pruned");
        return None;
    }
    Some(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn dir(id: u64, code: &str) -> MenuRecord {
        MenuRecord::new(id, code, MenuKind::Directory)
    }

    fn menu(id: u64, code: &str) -> MenuRecord {
        MenuRecord::new(id, code, MenuKind::Menu).with_path(format!("/{code}"))
    }

    fn codes(nodes: &[MenuNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.code.as_str()).collect()
    }

    fn assert_invariants(nodes: &[MenuNode]) {
        for window in nodes.windows(2) {
            assert!(window[0].sort_order <= window[1].sort_order);
        }
        for node in nodes {
            assert!(!node.is_hidden);
            assert_eq!(node.status, 1);
            assert!(node.kind.is_navigable());
            if node.is_directory() {
                assert!(!node.children.is_empty() || node.route_path().is_some());
            }
            assert_invariants(&node.children);
        }
    }

    /// Formatted log output of everything `f` emits at `debug` and above.
    fn logs_of(f: impl FnOnce()) -> String {
        #[derive(Clone, Default)]
        struct Captured(Arc<Mutex<Vec<u8>>>);

        impl std::io::Write for Captured {
            fn write(&mut self, data: &[u8]) -> std::io::Result<usize> {
                self.0.lock().extend_from_slice(data);
                Ok(data.len())
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for Captured {
            type Writer = Captured;

            fn make_writer(&'a self) -> Self::Writer {
                self.clone()
            }
        }

        let captured = Captured::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(captured.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        let bytes = captured.0.lock().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn empty_input() {
        assert!(build_menu_tree(&[]).is_empty());
    }

    #[test]
    fn filters_hidden_disabled_and_permissions() {
        let records = vec![
            menu(1, "a"),
            menu(2, "b").hidden(),
            menu(3, "c").with_status(2),
            MenuRecord::new(4, "d", MenuKind::Permission),
            MenuRecord::new(5, "e", MenuKind::Unknown),
        ];

        let tree = build_menu_tree(&records);
        assert_eq!(codes(&tree), vec!["a"]);
        assert_invariants(&tree);
    }

    #[test]
    fn sorts_roots_and_children_stably() {
        let records = vec![
            dir(1, "sys").with_sort_order(2),
            menu(2, "home").with_sort_order(1),
            menu(3, "roles").with_parent(1).with_sort_order(5),
            menu(4, "users").with_parent(1).with_sort_order(1),
            menu(5, "menus").with_parent(1).with_sort_order(5),
        ];

        let tree = build_menu_tree(&records);
        assert_eq!(codes(&tree), vec!["home", "sys"]);
        assert_eq!(codes(&tree[1].children), vec!["users", "roles", "menus"]);
        assert_invariants(&tree);
    }

    #[test]
    fn nested_input_matches_flat_input() {
        let nested = vec![dir(1, "sys").with_children(vec![
            menu(3, "roles").with_sort_order(2),
            menu(2, "users").with_sort_order(1),
        ])];
        let flat = vec![
            menu(3, "roles").with_parent(1).with_sort_order(2),
            dir(1, "sys"),
            menu(2, "users").with_parent(1).with_sort_order(1),
        ];

        assert_eq!(build_menu_tree(&nested), build_menu_tree(&flat));
    }

    #[test]
    fn nesting_position_wins_over_parent_id() {
        let records = vec![
            dir(1, "a"),
            dir(2, "b").with_children(vec![menu(3, "x").with_parent(1)]),
        ];

        let tree = build_menu_tree(&records);
        assert_eq!(codes(&tree), vec!["b"]);
        assert_eq!(tree[0].children[0].parent_id, MenuId::new(2));
    }

    #[test]
    fn duplicate_ids_first_wins() {
        let records = vec![menu(1, "first"), menu(1, "second")];
        assert_eq!(codes(&build_menu_tree(&records)), vec!["first"]);
    }

    #[test]
    fn child_of_filtered_parent_dropped_with_subtree() {
        let records = vec![
            dir(1, "sys").hidden(),
            dir(2, "inner").with_parent(1),
            menu(3, "deep").with_parent(2),
            menu(4, "other"),
        ];

        assert_eq!(codes(&build_menu_tree(&records)), vec!["other"]);
    }

    #[test]
    fn dropped_subtree_is_logged() {
        let records = vec![
            dir(1, "sys").hidden(),
            dir(2, "inner").with_parent(1),
            menu(3, "deep").with_parent(2),
        ];

        let logs = logs_of(|| {
            build_menu_tree(&records);
        });

        assert!(logs.contains("Menu record dropped, parent filtered out"), "{logs}");
        assert!(logs.contains("code=inner"), "{logs}");
        assert!(logs.contains("Menu record dropped with its ancestor"), "{logs}");
        assert!(logs.contains("code=deep"), "{logs}");
    }

    #[test]
    fn orphan_promoted_to_root() {
        let records = vec![menu(1, "lost").with_parent(99)];
        let tree = build_menu_tree(&records);
        assert_eq!(codes(&tree), vec!["lost"]);
        assert_eq!(tree[0].parent_id, MenuId::ROOT);
    }

    #[test]
    fn cycle_broken_at_first_sorted_member() {
        let records = vec![
            menu(1, "a").with_parent(2).with_sort_order(2),
            menu(2, "b").with_parent(1).with_sort_order(1),
        ];

        let tree = build_menu_tree(&records);
        assert_eq!(codes(&tree), vec!["b"]);
        assert_eq!(codes(&tree[0].children), vec!["a"]);
    }

    #[test]
    fn self_parent_is_cycle() {
        let records = vec![menu(7, "self").with_parent(7)];
        assert_eq!(codes(&build_menu_tree(&records)), vec!["self"]);
    }

    #[test]
    fn tail_hanging_off_cycle_survives() {
        let records = vec![
            menu(3, "tail").with_parent(1).with_sort_order(0),
            menu(1, "a").with_parent(2).with_sort_order(1),
            menu(2, "b").with_parent(1).with_sort_order(2),
        ];

        let tree = build_menu_tree(&records);
        assert_eq!(codes(&tree), vec!["a"]);
        let a = &tree[0];
        assert_eq!(a.node_count(), 3);
        assert!(a.find("tail").is_some());
        assert!(a.find("b").is_some());
    }

    #[test]
    fn prunes_empty_pathless_directories_bottom_up() {
        let records = vec![
            dir(1, "outer"),
            dir(2, "inner").with_parent(1),
            MenuRecord::new(3, "btn", MenuKind::Permission).with_parent(2),
            dir(4, "landing").with_path("/landing"),
            dir(5, "broken").with_path("/bad path"),
        ];

        let tree = build_menu_tree(&records);
        assert_eq!(codes(&tree), vec!["landing"]);
        assert_invariants(&tree);
    }

    #[test]
    fn menu_without_path_survives() {
        let records = vec![MenuRecord::new(1, "bare", MenuKind::Menu)];
        assert_eq!(codes(&build_menu_tree(&records)), vec!["bare"]);
    }
}
