//! Configuration management with hierarchical layering.
//!
//! # Architecture
//!
//! ```text
//! Priority (highest to lowest):
//!
//! ┌──────────────────────────────────────────────┐
//! │  1. Environment Variables (LIGHTSTACK_*)     │  Runtime override
//! ├──────────────────────────────────────────────┤
//! │  2. Project Config (.lightstack/config.toml) │  Project-specific
//! ├──────────────────────────────────────────────┤
//! │  3. Global Config (~/.lightstack/config.toml)│  User defaults
//! ├──────────────────────────────────────────────┤
//! │  4. Default Values (compile-time)            │  Fallback
//! └──────────────────────────────────────────────┘
//! ```
//!
//! # Directory Structure
//!
//! ```text
//! ~/.lightstack/               # Global directory
//! ├── config.toml              # Global configuration
//! └── storage/                 # Durable session storage
//!     ├── token.json
//!     └── principal.json
//!
//! <project>/.lightstack/
//! └── config.toml              # Project configuration (overrides global)
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Config Field | Type |
//! |----------|--------------|------|
//! | `LIGHTSTACK_DEBUG` | `debug` | bool |
//! | `LIGHTSTACK_STORAGE_DIR` | `storage.dir` | PathBuf |
//! | `LIGHTSTACK_LOGIN_PATH` | `routes.login_path` | String |
//! | `LIGHTSTACK_DASHBOARD_PATH` | `routes.dashboard_path` | String |
//!
//! # Example Configuration
//!
//! ```toml
//! debug = false
//!
//! [routes]
//! login_path = "/login"
//! dashboard_path = "/dashboard"
//! home_path = "/"
//! not_found_path = "/404"
//! layout_component = "layout"
//! fallback_component = "error/404"
//!
//! [storage]
//! dir = "~/.lightstack/storage"
//!
//! [catalog]
//! views = ["dashboard/index", "system/users/index"]
//! ```

mod error;
mod loader;
mod types;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use types::{CatalogConfig, LightstackConfig, RoutesConfig, StorageConfig};

/// Default global config directory.
pub fn default_config_dir() -> std::path::PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join(".lightstack")
}

/// Default global config file path.
pub fn default_config_path() -> std::path::PathBuf {
    default_config_dir().join("config.toml")
}

/// Project config directory name.
pub const PROJECT_CONFIG_DIR: &str = ".lightstack";

/// Project config file name.
pub const PROJECT_CONFIG_FILE: &str = "config.toml";
