//! Output formatting.

use anyhow::Result;
use clap::ValueEnum;
use lightstack_runtime::config::RoutesConfig;
use lightstack_runtime::nav::{join_route_path, RouteDescriptor};
use lightstack_runtime::{GateState, NavigationDecision};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Pretty-printed JSON
    #[default]
    Json,
    /// One line per route record: full path, name, view, redirect
    Table,
}

/// One navigation attempt as printed by `navigate`.
#[derive(Debug, Serialize)]
pub struct Attempt<'a> {
    pub location: &'a str,
    #[serde(flatten)]
    pub decision: NavigationDecision,
    pub state: GateState,
}

pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Tab-separated route table, one line per record, depth-first.
pub fn route_table(routes: &[RouteDescriptor], config: &RoutesConfig) -> String {
    let mut out = String::new();
    for route in routes {
        write_route(&mut out, route, "/", config);
    }
    out
}

fn write_route(out: &mut String, route: &RouteDescriptor, parent: &str, config: &RoutesConfig) {
    let full = join_route_path(parent, &route.path);
    let view = route.component.as_ref().map_or("-", |binding| {
        binding.view_id(&config.layout_component, &config.fallback_component)
    });
    let redirect = route.redirect.as_deref().unwrap_or("-");

    out.push_str(&format!("{full}\t{}\t{view}\t{redirect}\n", route.name));
    for child in &route.children {
        write_route(out, child, &full, config);
    }
}
