//! LightStack navigation runtime.
//!
//! Turns a principal's menu grant set into a navigation tree and route
//! table, and guards every navigation attempt until both exist.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                     NavigationGate                       │
//! │     navigate(path) -> Proceed | Redispatch | Redirect    │
//! └──────┬───────────────────┬────────────────────┬──────────┘
//!        │                   │                    │
//!        ▼                   ▼                    ▼
//! ┌──────────────┐   ┌───────────────┐   ┌─────────────────┐
//! │ SessionStore │   │ nav           │   │ router          │
//! │ token        │──▶│ build tree    │──▶│ RouteTable      │
//! │ principal    │   │ compile routes│   │ registration    │
//! └──────┬───────┘   └───────────────┘   └─────────────────┘
//!        │
//!        ▼
//! ┌──────────────┐
//! │ storage      │  memory / local files
//! └──────────────┘
//! ```
//!
//! # Modules
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`config`] | Layered TOML + env configuration |
//! | [`storage`] | Durable key/value storage |
//! | [`session`] | Token, principal, tenant context |
//! | [`nav`] | Menu tree builder and route compiler |
//! | [`router`] | Route table and one-time registration |
//! | [`gate`] | The navigation gate |
//!
//! # Example
//!
//! ```
//! use lightstack_runtime::nav::{build_menu_tree, compile_routes, ComponentCatalog};
//! use lightstack_types::{MenuKind, MenuRecord};
//!
//! let menus = vec![
//!     MenuRecord::new(1, "sys", MenuKind::Directory).with_path("/system"),
//!     MenuRecord::new(2, "users", MenuKind::Menu)
//!         .with_parent(1)
//!         .with_path("/system/users")
//!         .with_component("system/users"),
//! ];
//!
//! let tree = build_menu_tree(&menus);
//! let catalog = ComponentCatalog::new().with_view("system/users");
//! let routes = compile_routes(&tree, &catalog);
//!
//! assert_eq!(routes[0].redirect.as_deref(), Some("/system/users"));
//! ```

pub mod config;
pub mod gate;
pub mod nav;
pub mod router;
pub mod session;
pub mod storage;

pub use config::{ConfigLoader, LightstackConfig};
pub use gate::{GateState, NavigationDecision, NavigationGate, RedirectReason};
pub use session::{FetchError, PrincipalSource, SessionError, SessionStore, TenantStore};
pub use storage::{DurableStorage, LocalFileStorage, MemoryStorage};
