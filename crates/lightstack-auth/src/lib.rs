//! Permission primitives for LightStack.
//!
//! This crate provides the read-only authorization layer that rendering
//! code consults to decide what to show.
//!
//! # Model
//!
//! ```text
//! PrincipalProfile ──from_profile──▶ PrincipalGrants ──impl──▶ PermissionOracle
//!                                                                   ▲
//!                                  AccessRequirement ──evaluate─────┘
//! ```
//!
//! | Type | Role |
//! |------|------|
//! | [`PermissionOracle`] | Trait: permission/role predicates |
//! | [`PrincipalGrants`] | Snapshot implementation over a profile |
//! | [`AccessRequirement`] | Declarative requirement attached to UI elements |
//! | [`AccessDenied`] | What an unmet requirement was missing |
//!
//! # Design Principles
//!
//! - **Pure reads**: nothing here mutates session state
//! - **Snapshot per principal**: grants are rebuilt when the principal changes,
//!   never patched in place

pub mod error;
pub mod grants;
pub mod oracle;
pub mod requirement;

pub use error::AccessDenied;
pub use grants::PrincipalGrants;
pub use oracle::{PermissionOracle, ADMIN_ROLE, SUPER_ADMIN_ROLE};
pub use requirement::AccessRequirement;
