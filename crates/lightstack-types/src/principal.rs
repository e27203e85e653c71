//! Principal (authenticated account) profile.
//!
//! A [`PrincipalProfile`] is the payload of the authentication/session
//! endpoint: identity, role codes, raw permission strings and the menu
//! grant set. It is pure data; permission evaluation lives in
//! `lightstack-auth`.

use crate::{MenuRecord, PrincipalId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The authenticated principal as returned by the session endpoint.
///
/// # Example
///
/// ```
/// use lightstack_types::PrincipalProfile;
///
/// let profile: PrincipalProfile = serde_json::from_str(
///     r#"{"id":1,"username":"admin","roles":["admin"],"permissions":["user:list"],"menus":[]}"#,
/// ).unwrap();
///
/// assert_eq!(profile.username, "admin");
/// assert!(profile.menus.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrincipalProfile {
    /// Account id.
    pub id: PrincipalId,

    /// Login name.
    #[serde(default)]
    pub username: String,

    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,

    /// Contact email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Avatar URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,

    /// Role codes.
    #[serde(default)]
    pub roles: Vec<String>,

    /// Raw permission strings.
    #[serde(default)]
    pub permissions: Vec<String>,

    /// Raw menu grant set, flat or pre-nested.
    #[serde(default)]
    pub menus: Vec<MenuRecord>,
}

impl PrincipalProfile {
    /// Creates a profile with no roles, permissions or menus.
    #[must_use]
    pub fn new(id: impl Into<PrincipalId>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            nickname: None,
            email: None,
            avatar: None,
            roles: Vec::new(),
            permissions: Vec::new(),
            menus: Vec::new(),
        }
    }

    /// Sets role codes.
    #[must_use]
    pub fn with_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles = roles.into_iter().map(Into::into).collect();
        self
    }

    /// Sets raw permission strings.
    #[must_use]
    pub fn with_permissions<I, S>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.permissions = permissions.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the menu grant set.
    #[must_use]
    pub fn with_menus(mut self, menus: Vec<MenuRecord>) -> Self {
        self.menus = menus;
        self
    }

    /// Name to show in the UI: nickname, falling back to username.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.nickname
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.username)
    }

    /// Total number of menu records, nested ones included.
    #[must_use]
    pub fn menu_count(&self) -> usize {
        let mut count = 0usize;
        for menu in &self.menus {
            menu.walk(&mut |_| count += 1);
        }
        count
    }
}

impl fmt::Display for PrincipalProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.username, self.id)
    }
}
