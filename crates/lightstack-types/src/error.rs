//! Machine-readable error codes shared by every LightStack crate.
//!
//! Each crate keeps its own `thiserror` enum; [`ErrorCode`] is the common
//! surface used for structured logging (`code = err.code()`) and for
//! deciding whether a failure is worth surfacing as "sign in again" or
//! "try again".
//!
//! | Prefix | Crate / module |
//! |--------|----------------|
//! | `ACCESS_` | `lightstack-auth` |
//! | `CONFIG_` | `lightstack-runtime::config` |
//! | `STORAGE_` | `lightstack-runtime::storage` |
//! | `FETCH_`, `SESSION_` | `lightstack-runtime::session` |
//! | `ROUTER_` | `lightstack-runtime::router` |
//!
//! ```
//! use lightstack_types::ErrorCode;
//!
//! enum LookupError {
//!     Offline,
//!     UnknownTenant(u64),
//! }
//!
//! impl ErrorCode for LookupError {
//!     fn code(&self) -> &'static str {
//!         match self {
//!             Self::Offline => "LOOKUP_OFFLINE",
//!             Self::UnknownTenant(_) => "LOOKUP_UNKNOWN_TENANT",
//!         }
//!     }
//!
//!     fn is_recoverable(&self) -> bool {
//!         matches!(self, Self::Offline)
//!     }
//! }
//!
//! assert!(LookupError::Offline.is_recoverable());
//! assert_eq!(LookupError::UnknownTenant(4).code(), "LOOKUP_UNKNOWN_TENANT");
//! ```

/// Stable code plus recoverability for an error value.
///
/// Codes are `UPPER_SNAKE_CASE`, start with the owning module's prefix and
/// never change once published. An error is recoverable when retrying or
/// re-authenticating can succeed.
pub trait ErrorCode {
    /// Machine-readable code.
    fn code(&self) -> &'static str;

    /// Whether retrying or signing in again can help.
    fn is_recoverable(&self) -> bool;
}

/// Asserts that `err.code()` is well formed and carries `prefix`.
///
/// Intended for tests of each error enum.
///
/// # Panics
///
/// Panics when the code is empty, lacks the prefix, or is not
/// `UPPER_SNAKE_CASE`.
///
/// ```
/// use lightstack_types::{assert_error_code, ErrorCode};
///
/// struct Denied;
/// impl ErrorCode for Denied {
///     fn code(&self) -> &'static str { "ACCESS_DENIED" }
///     fn is_recoverable(&self) -> bool { false }
/// }
///
/// assert_error_code(&Denied, "ACCESS_");
/// ```
pub fn assert_error_code<E: ErrorCode>(err: &E, prefix: &str) {
    if let Err(problem) = check_code(err.code(), prefix) {
        panic!("{problem}");
    }
}

/// [`assert_error_code`] over every given variant.
pub fn assert_error_codes<E: ErrorCode>(errors: &[E], prefix: &str) {
    errors.iter().for_each(|err| assert_error_code(err, prefix));
}

fn check_code(code: &str, prefix: &str) -> Result<(), String> {
    if code.is_empty() {
        return Err("error code must not be empty".into());
    }
    if !code.starts_with(prefix) {
        return Err(format!("error code '{code}' must start with prefix '{prefix}'"));
    }
    if !is_upper_snake_case(code) {
        return Err(format!("error code '{code}' must be UPPER_SNAKE_CASE"));
    }
    Ok(())
}

fn is_upper_snake_case(s: &str) -> bool {
    !s.is_empty()
        && s.split('_').all(|word| !word.is_empty())
        && s.bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'_')
}
