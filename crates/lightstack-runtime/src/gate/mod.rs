//! Navigation gate: session bootstrap and one-time route registration.
//!
//! # State Machine
//!
//! ```text
//!                   token                 principal
//! Unauthenticated ────────► SessionLoading ─────────► RoutesPending ──► Ready
//!        ▲                        │                         │
//!        │   logout               │ fetch failed            │ epoch moved
//!        └────────────────── Error ◄┘                        └──► re-evaluate
//! ```
//!
//! Callers only ever see a [`NavigationDecision`]: `Proceed`,
//! `Redispatch { path }` or `Redirect { to, reason }`.

mod navigation;
mod state;

pub use navigation::NavigationGate;
pub use state::{GateState, NavigationDecision, RedirectReason};
