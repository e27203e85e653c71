//! Identifier types.
//!
//! The backend hands out numeric primary keys. They are wrapped in
//! newtypes so a menu id can never be passed where a tenant id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// Creates an identifier from its raw value.
            #[must_use]
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            /// Returns the raw value.
            #[must_use]
            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }
    };
}

numeric_id!(
    /// Identifier of a menu record.
    ///
    /// `MenuId(0)` is the "no parent" sentinel used by the backend for roots.
    ///
    /// ```
    /// use lightstack_types::MenuId;
    ///
    /// assert!(MenuId::ROOT.is_root());
    /// assert!(!MenuId::new(7).is_root());
    /// ```
    MenuId
);

numeric_id!(
    /// Identifier of an authenticated principal (user account).
    PrincipalId
);

numeric_id!(
    /// Identifier of a tenant.
    TenantId
);

impl MenuId {
    /// Parent id used by root records.
    pub const ROOT: Self = Self(0);

    /// Returns `true` for the root sentinel.
    #[must_use]
    pub const fn is_root(self) -> bool {
        self.0 == 0
    }
}
