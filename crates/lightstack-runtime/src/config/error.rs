//! Configuration errors.

use lightstack_types::ErrorCode;
use std::path::PathBuf;
use thiserror::Error;

/// Why a configuration layer could not be applied.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A config file exists but could not be read.
    #[error("cannot read config '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A config file is not valid TOML for [`LightstackConfig`](super::LightstackConfig).
    #[error("invalid config '{path}': {source}")]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A `LIGHTSTACK_*` override has an unusable value.
    #[error("{name}: {reason}")]
    InvalidEnvVar { name: &'static str, reason: String },
}

impl ConfigError {
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadFile {
            path: path.into(),
            source,
        }
    }

    pub fn parse_toml(path: impl Into<PathBuf>, source: toml::de::Error) -> Self {
        Self::ParseToml {
            path: path.into(),
            source,
        }
    }

    pub fn invalid_env_var(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidEnvVar {
            name,
            reason: reason.into(),
        }
    }
}

impl ErrorCode for ConfigError {
    fn code(&self) -> &'static str {
        match self {
            Self::ReadFile { .. } => "CONFIG_READ_FILE",
            Self::ParseToml { .. } => "CONFIG_PARSE_TOML",
            Self::InvalidEnvVar { .. } => "CONFIG_INVALID_ENV_VAR",
        }
    }

    // Configuration is fixed for the life of the process.
    fn is_recoverable(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lightstack_types::assert_error_codes;

    #[test]
    fn env_var_error_names_variable() {
        let err = ConfigError::invalid_env_var("LIGHTSTACK_DEBUG", "expected bool");
        assert_eq!(err.to_string(), "LIGHTSTACK_DEBUG: expected bool");
    }

    #[test]
    fn codes() {
        let io = std::io::Error::from(std::io::ErrorKind::PermissionDenied);
        let errors = [
            ConfigError::read_file("/etc/lightstack.toml", io),
            ConfigError::invalid_env_var("LIGHTSTACK_LOGIN_PATH", "expected an absolute path"),
        ];
        assert_error_codes(&errors, "CONFIG_");
        assert!(errors.iter().all(|e| !e.is_recoverable()));
    }
}
