//! Menu records as delivered by the backend.
//!
//! A [`MenuRecord`] is one node of the principal's menu grant set. The
//! backend may send the set flat (every record carries `parentId`) or
//! pre-nested (records carry `children`); both shapes deserialize into
//! the same type.
//!
//! # Wire Format
//!
//! ```json
//! {
//!   "id": 2, "parentId": 1, "name": "Users", "code": "users",
//!   "type": "menu", "path": "/system/users", "component": "system/users",
//!   "icon": "User", "sortOrder": 1, "isHidden": false, "status": 1
//! }
//! ```
//!
//! Deserialization is lenient so that a single odd record never rejects
//! the whole payload: missing `status` means enabled, blank strings mean
//! absent, and an unrecognised `type` becomes [`MenuKind::Unknown`].

use crate::MenuId;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// `status` value of an enabled record.
pub const STATUS_ENABLED: i32 = 1;

/// Kind of a menu record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuKind {
    /// Grouping node, rendered as a layout container.
    Directory,
    /// Navigable screen.
    #[default]
    Menu,
    /// Button-level permission. Never navigable.
    Permission,
    /// Anything the backend sends that this client does not understand.
    #[serde(other)]
    Unknown,
}

impl MenuKind {
    /// Returns `true` for kinds that can appear in the navigation tree.
    #[must_use]
    pub fn is_navigable(self) -> bool {
        matches!(self, Self::Directory | Self::Menu)
    }

    /// Returns `true` if the record's `code` acts as a permission identifier.
    #[must_use]
    pub fn grants_permission(self) -> bool {
        matches!(self, Self::Menu | Self::Permission)
    }

    /// Wire name of the kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Directory => "directory",
            Self::Menu => "menu",
            Self::Permission => "permission",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for MenuKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A menu record for the current principal.
///
/// # Example
///
/// ```
/// use lightstack_types::{MenuKind, MenuRecord};
///
/// let record: MenuRecord = serde_json::from_str(
///     r#"{"id":2,"parentId":1,"name":"Users","code":"users","type":"menu","path":"","sortOrder":3}"#,
/// ).unwrap();
///
/// assert_eq!(record.kind, MenuKind::Menu);
/// assert_eq!(record.path, None);
/// assert!(record.is_active());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuRecord {
    /// Primary key.
    pub id: MenuId,

    /// Parent record, [`MenuId::ROOT`] for roots.
    #[serde(default, deserialize_with = "null_as_default")]
    pub parent_id: MenuId,

    /// Display title.
    #[serde(default)]
    pub name: String,

    /// Unique code; the permission identifier for menu and permission kinds.
    pub code: String,

    /// Record kind.
    #[serde(rename = "type", default)]
    pub kind: MenuKind,

    /// Route path as configured by the administrator.
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub path: Option<String>,

    /// View component reference, e.g. `system/users`.
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub component: Option<String>,

    /// Icon name.
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub icon: Option<String>,

    /// Ordering among siblings, ascending.
    #[serde(default, deserialize_with = "null_as_default")]
    pub sort_order: i32,

    /// Hidden records never reach the navigation tree.
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_hidden: bool,

    /// [`STATUS_ENABLED`] for enabled records.
    #[serde(default = "default_status")]
    pub status: i32,

    /// Pre-nested children, if the backend sent a tree.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub children: Vec<MenuRecord>,
}

impl MenuRecord {
    /// Creates an enabled, visible root record with no path or component.
    #[must_use]
    pub fn new(id: impl Into<MenuId>, code: impl Into<String>, kind: MenuKind) -> Self {
        let code = code.into();
        Self {
            id: id.into(),
            parent_id: MenuId::ROOT,
            name: code.clone(),
            code,
            kind,
            path: None,
            component: None,
            icon: None,
            sort_order: 0,
            is_hidden: false,
            status: STATUS_ENABLED,
            children: Vec::new(),
        }
    }

    /// Sets the parent id.
    #[must_use]
    pub fn with_parent(mut self, parent: impl Into<MenuId>) -> Self {
        self.parent_id = parent.into();
        self
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the route path.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Sets the component reference.
    #[must_use]
    pub fn with_component(mut self, component: impl Into<String>) -> Self {
        self.component = Some(component.into());
        self
    }

    /// Sets the icon.
    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Sets the sort order.
    #[must_use]
    pub fn with_sort_order(mut self, sort_order: i32) -> Self {
        self.sort_order = sort_order;
        self
    }

    /// Sets the status.
    #[must_use]
    pub fn with_status(mut self, status: i32) -> Self {
        self.status = status;
        self
    }

    /// Marks the record hidden.
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.is_hidden = true;
        self
    }

    /// Sets pre-nested children.
    #[must_use]
    pub fn with_children(mut self, children: Vec<MenuRecord>) -> Self {
        self.children = children;
        self
    }

    /// Returns `true` if the record is enabled and not hidden.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.is_hidden && self.status == STATUS_ENABLED
    }

    /// Returns `true` if the record may appear in the navigation tree.
    #[must_use]
    pub fn is_navigable(&self) -> bool {
        self.is_active() && self.kind.is_navigable()
    }

    /// Visits this record and all nested children depth-first.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a MenuRecord)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }
}

fn default_status() -> i32 {
    STATUS_ENABLED
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty()))
}
