//! Session errors.

use super::FetchError;
use lightstack_types::ErrorCode;
use thiserror::Error;

/// Errors returned by [`SessionStore::principal`](super::SessionStore::principal).
///
/// `Clone` so that every caller joined to one in-flight fetch receives
/// the same result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// No token is stored; sign-in is required.
    #[error("no session token")]
    NoToken,

    /// The token is missing server-side or was rejected.
    #[error("authentication expired")]
    AuthExpired,

    /// Network, status or payload failure while loading the principal.
    #[error("principal fetch failed: {0}")]
    PrincipalFetchFailed(FetchError),

    /// The session was cleared or switched while the fetch was in flight;
    /// the result was discarded.
    #[error("session changed while the principal was loading")]
    Superseded,
}

impl From<FetchError> for SessionError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Unauthorized => Self::AuthExpired,
            other => Self::PrincipalFetchFailed(other),
        }
    }
}

impl ErrorCode for SessionError {
    fn code(&self) -> &'static str {
        match self {
            Self::NoToken => "SESSION_NO_TOKEN",
            Self::AuthExpired => "SESSION_AUTH_EXPIRED",
            Self::PrincipalFetchFailed(_) => "SESSION_PRINCIPAL_FETCH_FAILED",
            Self::Superseded => "SESSION_SUPERSEDED",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            Self::NoToken | Self::AuthExpired | Self::Superseded => true,
            Self::PrincipalFetchFailed(inner) => inner.is_recoverable(),
        }
    }
}
