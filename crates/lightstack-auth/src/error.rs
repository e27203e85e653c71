//! Access denied error type.

use lightstack_types::ErrorCode;
use thiserror::Error;

/// Why an [`AccessRequirement`](crate::AccessRequirement) was not met.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessDenied {
    /// One or more permissions are missing.
    #[error("missing permission: {}", required.join(", "))]
    MissingPermission {
        /// Codes that would have satisfied the requirement.
        required: Vec<String>,
    },

    /// None of the accepted roles is held.
    #[error("missing role: one of [{}] required", required.join(", "))]
    MissingRole {
        /// Accepted role codes.
        required: Vec<String>,
    },

    /// Administrator role required.
    #[error("administrator role required")]
    NotAdmin,
}

impl ErrorCode for AccessDenied {
    fn code(&self) -> &'static str {
        match self {
            Self::MissingPermission { .. } => "ACCESS_MISSING_PERMISSION",
            Self::MissingRole { .. } => "ACCESS_MISSING_ROLE",
            Self::NotAdmin => "ACCESS_NOT_ADMIN",
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lightstack_types::assert_error_codes;

    #[test]
    fn display() {
        let err = AccessDenied::MissingPermission {
            required: vec!["a".into(), "b".into()],
        };
        assert_eq!(err.to_string(), "missing permission: a, b");

        let err = AccessDenied::MissingRole {
            required: vec!["admin".into()],
        };
        assert!(err.to_string().contains("[admin]"), "got: {err}");
    }

    #[test]
    fn codes_follow_convention() {
        assert_error_codes(
            &[
                AccessDenied::MissingPermission { required: vec![] },
                AccessDenied::MissingRole { required: vec![] },
                AccessDenied::NotAdmin,
            ],
            "ACCESS_",
        );
    }
}
