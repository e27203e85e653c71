//! Layered configuration loading.
//!
//! # Layers
//!
//! | Order | Source | Skipped by |
//! |-------|--------|------------|
//! | 1 | compiled-in defaults | never |
//! | 2 | `~/.lightstack/config.toml` | [`ConfigLoader::skip_global_config`] |
//! | 3 | `<project>/.lightstack/config.toml` | [`ConfigLoader::skip_project_config`] |
//! | 4 | `LIGHTSTACK_*` environment | [`ConfigLoader::skip_env_vars`] |
//!
//! Later layers win, but only for values they set to something other than
//! the default (see [`LightstackConfig::merge`]).

use super::{
    default_config_path, ConfigError, LightstackConfig, PROJECT_CONFIG_DIR, PROJECT_CONFIG_FILE,
};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Boolean env override; see [`parse_bool`] for accepted spellings.
macro_rules! parse_env_bool {
    ($field:expr, $var:literal) => {
        if let Ok(val) = std::env::var($var) {
            $field = parse_bool(&val)
                .ok_or_else(|| ConfigError::invalid_env_var($var, "expected bool"))?;
        }
    };
}

/// Route path env override; must be absolute.
macro_rules! parse_env_route {
    ($field:expr, $var:literal) => {
        if let Ok(val) = std::env::var($var) {
            if !val.starts_with('/') {
                return Err(ConfigError::invalid_env_var($var, "expected an absolute path"));
            }
            $field = val;
        }
    };
}

/// Builds a [`LightstackConfig`] from the layers above.
///
/// ```no_run
/// use lightstack_runtime::config::ConfigLoader;
///
/// # fn main() -> Result<(), lightstack_runtime::config::ConfigError> {
/// let config = ConfigLoader::new()
///     .with_project_root("/srv/console")
///     .skip_env_vars()
///     .load()?;
/// println!("login at {}", config.routes.login_path);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    global_config_path: Option<PathBuf>,
    project_root: Option<PathBuf>,
    skip_env: bool,
    skip_global: bool,
    skip_project: bool,
}

impl ConfigLoader {
    /// Loader with every layer enabled and no project root.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the global layer from `path` instead of `~/.lightstack/config.toml`.
    #[must_use]
    pub fn with_global_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.global_config_path = Some(path.into());
        self
    }

    /// Enables the project layer, read from `<root>/.lightstack/config.toml`.
    #[must_use]
    pub fn with_project_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.project_root = Some(root.into());
        self
    }

    /// Ignores `LIGHTSTACK_*` variables.
    #[must_use]
    pub fn skip_env_vars(mut self) -> Self {
        self.skip_env = true;
        self
    }

    #[must_use]
    pub fn skip_global_config(mut self) -> Self {
        self.skip_global = true;
        self
    }

    #[must_use]
    pub fn skip_project_config(mut self) -> Self {
        self.skip_project = true;
        self
    }

    /// Merges every enabled layer over the defaults.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::ReadFile`] if a config file exists but is unreadable
    /// - [`ConfigError::ParseToml`] if a config file is not valid
    /// - [`ConfigError::InvalidEnvVar`] if an override is malformed
    ///
    /// Absent files are not errors.
    pub fn load(&self) -> Result<LightstackConfig, ConfigError> {
        let mut config = LightstackConfig::default();

        for (layer, path) in self.file_layers() {
            if let Some(overlay) = read_layer(&path)? {
                debug!(layer, path = %path.display(), "Config layer applied");
                config.merge(&overlay);
            }
        }

        if !self.skip_env {
            apply_env_vars(&mut config)?;
        }
        Ok(config)
    }

    fn file_layers(&self) -> Vec<(&'static str, PathBuf)> {
        let mut layers = Vec::with_capacity(2);
        if !self.skip_global {
            let path = self
                .global_config_path
                .clone()
                .unwrap_or_else(default_config_path);
            layers.push(("global", path));
        }
        if let (false, Some(root)) = (self.skip_project, &self.project_root) {
            layers.push((
                "project",
                root.join(PROJECT_CONFIG_DIR).join(PROJECT_CONFIG_FILE),
            ));
        }
        layers
    }
}

fn read_layer(path: &Path) -> Result<Option<LightstackConfig>, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(ConfigError::read_file(path, e)),
    };
    LightstackConfig::from_toml(&content)
        .map(Some)
        .map_err(|e| ConfigError::parse_toml(path, e))
}

fn apply_env_vars(config: &mut LightstackConfig) -> Result<(), ConfigError> {
    parse_env_bool!(config.debug, "LIGHTSTACK_DEBUG");
    parse_env_route!(config.routes.login_path, "LIGHTSTACK_LOGIN_PATH");
    parse_env_route!(config.routes.dashboard_path, "LIGHTSTACK_DASHBOARD_PATH");

    if let Some(dir) = std::env::var_os("LIGHTSTACK_STORAGE_DIR").filter(|v| !v.is_empty()) {
        config.storage.dir = Some(PathBuf::from(dir));
    }
    Ok(())
}

/// `true`/`1`/`yes`/`on` and `false`/`0`/`no`/`off`, any case.
fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
