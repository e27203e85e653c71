//! Navigation compilation: menu records to tree to routes.
//!
//! Both stages are pure functions. The session store memoizes the tree;
//! the gate compiles and registers the routes.
//!
//! ```text
//! Vec<MenuRecord> ──build_menu_tree──► Vec<MenuNode>
//!                                          │
//!                      ComponentResolver ──┤ compile_routes
//!                                          ▼
//!                                  Vec<RouteDescriptor>
//! ```

mod compiler;
mod path;
mod resolver;
mod route;
mod tree;

pub use compiler::{compile_route, compile_routes, resolve_component, Placement, LAYOUT_NAME_SUFFIX};
pub use path::{join_route_path, normalize_location, parse_route_path};
pub use resolver::{ComponentCatalog, ComponentResolver};
pub use route::{ComponentBinding, RouteDescriptor, RouteMeta};
pub use tree::{build_menu_tree, MenuNode};
