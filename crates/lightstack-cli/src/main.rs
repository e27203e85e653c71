//! LightStack CLI - offline navigation inspector
//!
//! Runs the navigation core against JSON fixtures: builds menu trees,
//! compiles routes and replays navigation attempts through the gate.
//!
//! # Configuration
//!
//! Configuration is loaded from multiple sources with priority:
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`LIGHTSTACK_*`)
//! 3. Project config (`.lightstack/config.toml` in the project root)
//! 4. Global config (`~/.lightstack/config.toml`)
//! 5. Default values (lowest priority)
//!
//! # Environment Variables
//!
//! - `LIGHTSTACK_DEBUG`: Enable debug mode (`true`/`false`)
//! - `LIGHTSTACK_STORAGE_DIR`: Persist the session under this directory
//! - `LIGHTSTACK_LOGIN_PATH`: Login route path
//! - `LIGHTSTACK_DASHBOARD_PATH`: Dashboard route path

mod render;
mod source;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lightstack_runtime::nav::{build_menu_tree, compile_routes, ComponentCatalog};
use lightstack_runtime::storage::DurableStorage;
use lightstack_runtime::{
    ConfigLoader, LightstackConfig, LocalFileStorage, MemoryStorage, NavigationDecision,
    NavigationGate, PrincipalSource, SessionStore, TenantStore,
};
use render::{Attempt, Format};
use source::FilePrincipalSource;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Token stored for fixture sessions.
const FIXTURE_TOKEN: &str = "lightstack-cli";

/// LightStack CLI - offline navigation inspector
#[derive(Parser, Debug)]
#[command(name = "lightstack")]
#[command(version, about, long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Project root directory (defaults to current directory)
    #[arg(short = 'C', long, global = true)]
    project: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the navigation tree of a menu set
    Tree {
        /// Menu records (JSON array) or a principal document
        menus: PathBuf,
    },

    /// Compile the route set of a principal
    Routes {
        /// Principal document
        principal: PathBuf,

        /// View identifiers, one per line (added to `[catalog] views`)
        #[arg(long, value_name = "FILE")]
        views: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },

    /// Replay navigation attempts through the gate, in order
    Navigate {
        /// Principal document served as the session endpoint's answer
        principal: PathBuf,

        /// Locations to navigate to
        #[arg(required = true)]
        paths: Vec<String>,

        /// View identifiers, one per line (added to `[catalog] views`)
        #[arg(long, value_name = "FILE")]
        views: Option<PathBuf>,

        /// Start signed out
        #[arg(long)]
        signed_out: bool,

        /// Answer the principal fetch with 401
        #[arg(long)]
        reject_token: bool,

        /// Follow `redispatch` decisions once, as a client would
        #[arg(long)]
        follow: bool,
    },
}

fn resolve_config(args: &Args) -> Result<LightstackConfig> {
    let project_root = match &args.project {
        Some(path) => path.clone(),
        None => std::env::current_dir().context("Failed to get current directory")?,
    };

    let mut config = ConfigLoader::new()
        .with_project_root(project_root)
        .load()
        .context("Config error")?;

    // CLI args override (highest priority)
    if args.debug {
        config.debug = true;
    }
    Ok(config)
}

fn init_tracing(args: &Args, config: &LightstackConfig) {
    // Terminal filter: --debug > --verbose > RUST_LOG env > default "warn"
    let filter = if args.debug || config.debug {
        EnvFilter::new("debug")
    } else if args.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    // stderr keeps stdout clean for JSON.
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

fn catalog(config: &LightstackConfig, views: Option<&Path>) -> Result<ComponentCatalog> {
    let mut catalog: ComponentCatalog = config.catalog.views.iter().cloned().collect();
    if let Some(path) = views {
        for view in source::load_views(path)? {
            catalog.insert(view);
        }
    }
    debug!(views = catalog.len(), "Component catalog loaded");
    Ok(catalog)
}

fn storage(config: &LightstackConfig) -> Result<Arc<dyn DurableStorage>> {
    match &config.storage.dir {
        Some(dir) => {
            let storage = LocalFileStorage::new(dir.clone())
                .with_context(|| format!("Failed to open storage at {}", dir.display()))?;
            info!(path = %storage.base_path().display(), "Using local session storage");
            Ok(Arc::new(storage))
        }
        None => {
            debug!("No storage dir configured, session kept in memory");
            Ok(Arc::new(MemoryStorage::new()))
        }
    }
}

fn run_tree(menus: &Path) -> Result<()> {
    let records = source::load_menus(menus)?;
    let tree = build_menu_tree(&records);
    info!(records = records.len(), roots = tree.len(), "Menu tree built");
    println!("{}", render::json(&tree)?);
    Ok(())
}

fn run_routes(
    config: &LightstackConfig,
    principal: &Path,
    views: Option<&Path>,
    format: Format,
) -> Result<()> {
    let profile = source::load_profile(principal)?;
    let catalog = catalog(config, views)?;
    let routes = compile_routes(&build_menu_tree(&profile.menus), &catalog);

    match format {
        Format::Json => println!("{}", render::json(&routes)?),
        Format::Table => print!("{}", render::route_table(&routes, &config.routes)),
    }
    Ok(())
}

struct NavigateOptions<'a> {
    views: Option<&'a Path>,
    signed_out: bool,
    reject_token: bool,
    follow: bool,
}

async fn run_navigate(
    config: &LightstackConfig,
    principal: &Path,
    paths: &[String],
    opts: NavigateOptions<'_>,
) -> Result<()> {
    let profile = source::load_profile(principal)?;
    let principals: Arc<dyn PrincipalSource> =
        Arc::new(FilePrincipalSource::new(profile, opts.reject_token));
    let storage = storage(config)?;

    let session = Arc::new(SessionStore::new(principals, Arc::clone(&storage)));
    let tenants = Arc::new(TenantStore::new(storage));
    let gate = NavigationGate::new(session, tenants, Arc::new(catalog(config, opts.views)?))
        .with_routes_config(config.routes.clone());

    if opts.signed_out {
        gate.logout();
    } else {
        gate.sign_in(FIXTURE_TOKEN);
    }

    for path in paths {
        let decision = gate.navigate(path).await;
        let redispatch = matches!(decision, NavigationDecision::Redispatch { .. });
        print_attempt(path, decision, &gate)?;

        if redispatch && opts.follow {
            let decision = gate.navigate(path).await;
            print_attempt(path, decision, &gate)?;
        }
    }
    Ok(())
}

fn print_attempt(location: &str, decision: NavigationDecision, gate: &NavigationGate) -> Result<()> {
    let attempt = Attempt {
        location,
        decision,
        state: gate.state(),
    };
    println!("{}", serde_json::to_string(&attempt)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = resolve_config(&args)?;
    init_tracing(&args, &config);

    match &args.command {
        Command::Tree { menus } => run_tree(menus),
        Command::Routes {
            principal,
            views,
            format,
        } => run_routes(&config, principal, views.as_deref(), *format),
        Command::Navigate {
            principal,
            paths,
            views,
            signed_out,
            reject_token,
            follow,
        } => {
            let opts = NavigateOptions {
                views: views.as_deref(),
                signed_out: *signed_out,
                reject_token: *reject_token,
                follow: *follow,
            };
            run_navigate(&config, principal, paths, opts).await
        }
    }
}
