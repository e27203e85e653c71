//! Remote principal source.

use async_trait::async_trait;
use lightstack_types::{ErrorCode, PrincipalProfile};
use thiserror::Error;

/// Failure of a principal fetch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The token was rejected (HTTP 401).
    #[error("token rejected by the server")]
    Unauthorized,

    /// Any other non-success status.
    #[error("server returned status {status}: {message}")]
    Status { status: u16, message: String },

    /// Network failure or timeout.
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body is not a principal profile.
    #[error("invalid principal payload: {0}")]
    Decode(String),
}

impl FetchError {
    /// Creates an error from a response status; 401 maps to
    /// [`FetchError::Unauthorized`].
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        if status == 401 {
            Self::Unauthorized
        } else {
            Self::Status {
                status,
                message: message.into(),
            }
        }
    }

    /// Creates a Transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Creates a Decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

impl ErrorCode for FetchError {
    fn code(&self) -> &'static str {
        match self {
            Self::Unauthorized => "FETCH_UNAUTHORIZED",
            Self::Status { .. } => "FETCH_STATUS",
            Self::Transport(_) => "FETCH_TRANSPORT",
            Self::Decode(_) => "FETCH_DECODE",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(self, Self::Unauthorized | Self::Transport(_))
    }
}

/// Loads the authenticated principal for a bearer token.
///
/// Implemented by the host over its REST client. Timeouts and retries
/// belong to the implementation; the session store calls it at most once
/// per missing-principal condition.
#[async_trait]
pub trait PrincipalSource: Send + Sync {
    /// Fetches the principal that owns `token`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Unauthorized`] for a rejected token, other
    /// variants for transport, status or payload failures.
    async fn fetch_principal(&self, token: &str) -> Result<PrincipalProfile, FetchError>;
}
