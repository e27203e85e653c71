//! Session state: bearer token, principal profile, tenant selection.
//!
//! # Architecture
//!
//! ```text
//!                 ┌──────────────────────────────┐
//!  principal() ──►│ SessionStore                 │
//!                 │  ├─ TieredCache<String>      │──► DurableStorage ("token")
//!                 │  ├─ TieredCache<Principal>   │──► DurableStorage ("principal")
//!                 │  ├─ SingleFlight             │──► PrincipalSource (remote)
//!                 │  └─ memoized tree / grants   │
//!                 └──────────────────────────────┘
//! ```
//!
//! # Lookup Order
//!
//! | Step | Tier | On hit |
//! |------|------|--------|
//! | 1 | memory | return |
//! | 2 | durable storage | promote to memory, return |
//! | 3 | [`PrincipalSource`] (single-flight) | populate both tiers |

mod cache;
mod error;
mod flight;
mod source;
mod store;
mod tenant;

pub use cache::TieredCache;
pub use error::SessionError;
pub use flight::SingleFlight;
pub use source::{FetchError, PrincipalSource};
pub use store::SessionStore;
pub use tenant::TenantStore;
