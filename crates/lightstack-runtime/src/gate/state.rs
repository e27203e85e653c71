//! Gate states and decisions.

use crate::session::SessionError;
use serde::Serialize;
use std::fmt;

/// Bootstrap state of the navigation gate, as last observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GateState {
    /// No token.
    #[default]
    Unauthenticated,
    /// Token present, principal being fetched.
    SessionLoading,
    /// Principal present, routes being compiled and registered.
    RoutesPending,
    /// Routes registered.
    Ready,
    /// The last attempt failed and the session was cleared.
    Error,
}

impl GateState {
    /// Snake-case name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unauthenticated => "unauthenticated",
            Self::SessionLoading => "session_loading",
            Self::RoutesPending => "routes_pending",
            Self::Ready => "ready",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for GateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why the gate redirected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RedirectReason {
    /// No token stored.
    NoToken,
    /// The server rejected the token.
    AuthExpired,
    /// The principal could not be loaded.
    SessionFailed,
    /// The principal has no navigable menus and the path is outside the
    /// allow-list.
    EmptyMenuSet,
    /// The session kept changing while the attempt was evaluated.
    SessionChanged,
}

impl From<&SessionError> for RedirectReason {
    fn from(err: &SessionError) -> Self {
        match err {
            SessionError::NoToken => Self::NoToken,
            SessionError::AuthExpired => Self::AuthExpired,
            SessionError::PrincipalFetchFailed(_) => Self::SessionFailed,
            SessionError::Superseded => Self::SessionChanged,
        }
    }
}

/// What the caller should do with a navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum NavigationDecision {
    /// Continue to the requested location.
    Proceed,
    /// Routes were just registered; dispatch the same location again,
    /// replacing the history entry.
    Redispatch { path: String },
    /// Go somewhere else.
    Redirect { to: String, reason: RedirectReason },
}

impl NavigationDecision {
    /// Creates a Redirect decision.
    pub fn redirect(to: impl Into<String>, reason: RedirectReason) -> Self {
        Self::Redirect {
            to: to.into(),
            reason,
        }
    }

    /// Returns `true` for [`NavigationDecision::Proceed`].
    #[must_use]
    pub fn is_proceed(&self) -> bool {
        matches!(self, Self::Proceed)
    }
}
