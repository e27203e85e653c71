//! Configuration types.
//!
//! All types implement [`Default`] for compile-time fallback values.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure.
///
/// This is the unified configuration after merging all layers.
///
/// # Example
///
/// ```
/// use lightstack_runtime::config::LightstackConfig;
///
/// let config = LightstackConfig::default();
/// assert!(!config.debug);
/// assert_eq!(config.routes.login_path, "/login");
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LightstackConfig {
    /// Enable debug mode (verbose logging).
    pub debug: bool,

    /// Well-known paths and component identifiers.
    pub routes: RoutesConfig,

    /// Durable storage location.
    pub storage: StorageConfig,

    /// Views known to the default component catalog.
    pub catalog: CatalogConfig,
}

impl LightstackConfig {
    /// Creates a new config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serializes to TOML string.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Deserializes from TOML string.
    ///
    /// # Errors
    ///
    /// Returns error if deserialization fails.
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Merges another config into this one.
    ///
    /// Values from `other` override values in `self` only if they
    /// differ from the default. This enables layered configuration.
    pub fn merge(&mut self, other: &Self) {
        let default = Self::default();

        if other.debug != default.debug {
            self.debug = other.debug;
        }

        self.routes.merge(&other.routes);
        self.storage.merge(&other.storage);
        self.catalog.merge(&other.catalog);
    }
}

/// Well-known navigation paths and component identifiers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RoutesConfig {
    /// Sign-in screen; always reachable.
    pub login_path: String,

    /// Landing screen after sign-in and target of the empty-menu degradation.
    pub dashboard_path: String,

    /// Application root (the layout shell).
    pub home_path: String,

    /// Not-found screen.
    pub not_found_path: String,

    /// Component identifier of the layout wrapper.
    pub layout_component: String,

    /// Component identifier used when a menu's view cannot be resolved.
    pub fallback_component: String,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            login_path: "/login".into(),
            dashboard_path: "/dashboard".into(),
            home_path: "/".into(),
            not_found_path: "/404".into(),
            layout_component: "layout".into(),
            fallback_component: "error/404".into(),
        }
    }
}

impl RoutesConfig {
    fn merge(&mut self, other: &Self) {
        let default = Self::default();

        if other.login_path != default.login_path {
            self.login_path = other.login_path.clone();
        }
        if other.dashboard_path != default.dashboard_path {
            self.dashboard_path = other.dashboard_path.clone();
        }
        if other.home_path != default.home_path {
            self.home_path = other.home_path.clone();
        }
        if other.not_found_path != default.not_found_path {
            self.not_found_path = other.not_found_path.clone();
        }
        if other.layout_component != default.layout_component {
            self.layout_component = other.layout_component.clone();
        }
        if other.fallback_component != default.fallback_component {
            self.fallback_component = other.fallback_component.clone();
        }
    }
}

/// Durable storage configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    /// Storage directory. `None` means `~/.lightstack/storage`.
    pub dir: Option<PathBuf>,
}

impl StorageConfig {
    fn merge(&mut self, other: &Self) {
        if other.dir.is_some() {
            self.dir = other.dir.clone();
        }
    }
}

/// Component catalog configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CatalogConfig {
    /// View identifiers the host can render (e.g. `"system/users/index"`).
    pub views: Vec<String>,
}

impl CatalogConfig {
    fn merge(&mut self, other: &Self) {
        if !other.views.is_empty() {
            self.views = other.views.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_routes() {
        let routes = RoutesConfig::default();
        assert_eq!(routes.login_path, "/login");
        assert_eq!(routes.dashboard_path, "/dashboard");
        assert_eq!(routes.home_path, "/");
        assert_eq!(routes.not_found_path, "/404");
    }

    #[test]
    fn toml_roundtrip() {
        let mut config = LightstackConfig::default();
        config.debug = true;
        config.storage.dir = Some(PathBuf::from("/tmp/ls"));
        config.catalog.views = vec!["system/users/index".into()];

        let toml = config.to_toml().unwrap();
        let parsed = LightstackConfig::from_toml(&toml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let config = LightstackConfig::from_toml(
            r#"
[routes]
dashboard_path = "/home"
"#,
        )
        .unwrap();

        assert_eq!(config.routes.dashboard_path, "/home");
        assert_eq!(config.routes.login_path, "/login");
        assert!(config.catalog.views.is_empty());
    }

    #[test]
    fn merge_keeps_base_when_other_is_default() {
        let mut base = LightstackConfig::default();
        base.routes.login_path = "/signin".into();
        base.catalog.views = vec!["a".into()];

        base.merge(&LightstackConfig::default());

        assert_eq!(base.routes.login_path, "/signin");
        assert_eq!(base.catalog.views, vec!["a".to_string()]);
    }

    #[test]
    fn merge_overrides() {
        let mut base = LightstackConfig::default();
        let mut other = LightstackConfig::default();
        other.debug = true;
        other.routes.fallback_component = "error/missing".into();
        other.storage.dir = Some(PathBuf::from("/data"));

        base.merge(&other);

        assert!(base.debug);
        assert_eq!(base.routes.fallback_component, "error/missing");
        assert_eq!(base.storage.dir, Some(PathBuf::from("/data")));
    }
}
