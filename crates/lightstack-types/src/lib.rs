//! Core types for LightStack.
//!
//! This crate holds the data model shared by every layer of the
//! navigation core: menu records, the principal profile, tenants,
//! identifiers and the [`ErrorCode`] convention.
//!
//! # Crate Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  lightstack-types   : MenuRecord, PrincipalProfile  ◄── HERE │
//! │  lightstack-auth    : PermissionOracle, grants              │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │  lightstack-runtime : session, nav, router, gate            │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │  lightstack-cli     : offline inspection tool               │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The types here have no behaviour beyond (de)serialization and small
//! predicates, so they can be shared with any frontend or test harness.

pub mod error;
pub mod id;
pub mod menu;
pub mod principal;
pub mod tenant;

pub use error::{assert_error_code, assert_error_codes, ErrorCode};
pub use id::{MenuId, PrincipalId, TenantId};
pub use menu::{MenuKind, MenuRecord, STATUS_ENABLED};
pub use principal::PrincipalProfile;
pub use tenant::Tenant;
