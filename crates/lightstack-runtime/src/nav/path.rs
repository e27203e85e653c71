//! Route path validation and joining.

/// Returns `raw` if it can be used as a route path.
///
/// A usable path is non-empty, contains only `[A-Za-z0-9/_.~:-]`, and has
/// no empty, `.` or `..` segments. A single leading `/` marks it absolute;
/// `/` alone is the root path.
///
/// # Example
///
/// ```
/// use lightstack_runtime::nav::parse_route_path;
///
/// assert_eq!(parse_route_path("/system/users"), Some("/system/users"));
/// assert_eq!(parse_route_path("users"), Some("users"));
/// assert_eq!(parse_route_path("/system//users"), None);
/// assert_eq!(parse_route_path("/system users"), None);
/// ```
#[must_use]
pub fn parse_route_path(raw: &str) -> Option<&str> {
    if raw.is_empty() || !raw.chars().all(is_path_char) {
        return None;
    }
    if raw == "/" {
        return Some(raw);
    }

    let body = raw.strip_prefix('/').unwrap_or(raw);
    let valid = body
        .split('/')
        .all(|segment| !segment.is_empty() && segment != "." && segment != "..");

    valid.then_some(raw)
}

fn is_path_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '/' | '_' | '-' | '.' | '~' | ':')
}

/// Joins a child route path onto its parent's full path.
///
/// Absolute children replace the parent; an empty child is the parent
/// itself (index route).
///
/// ```
/// use lightstack_runtime::nav::join_route_path;
///
/// assert_eq!(join_route_path("/system", "users"), "/system/users");
/// assert_eq!(join_route_path("/system", "/other"), "/other");
/// assert_eq!(join_route_path("/system", ""), "/system");
/// assert_eq!(join_route_path("/", "users"), "/users");
/// ```
#[must_use]
pub fn join_route_path(parent: &str, child: &str) -> String {
    if child.starts_with('/') {
        return child.to_string();
    }
    if child.is_empty() {
        return parent.to_string();
    }
    format!("{}/{}", parent.trim_end_matches('/'), child)
}

/// Normalizes a requested location for matching: strips any query or
/// fragment and trailing slashes, and guarantees a leading `/`.
#[must_use]
pub fn normalize_location(location: &str) -> String {
    let path = location
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim();
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}
