//! Router errors.

use lightstack_types::ErrorCode;
use thiserror::Error;

/// Route table mutation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
    /// A route with this name is already installed.
    #[error("duplicate route name: {0}")]
    DuplicateName(String),
}

impl ErrorCode for RouterError {
    fn code(&self) -> &'static str {
        match self {
            Self::DuplicateName(_) => "ROUTER_DUPLICATE_NAME",
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_name() {
        let err = RouterError::DuplicateName("users".into());
        assert!(err.to_string().contains("users"));
        lightstack_types::assert_error_code(&err, "ROUTER_");
    }
}
