//! Route Permission Server
//!
//! Loads a policy table and serves every route in it behind the permission
//! middleware, plus a decision endpoint.
//!
//! # Usage
//!
//! ```bash
//! # Start with a policy file (0.0.0.0:8080)
//! cargo run -- --policy policy.json
//!
//! # Let routes that are missing from the policy through
//! cargo run -- --policy policy.json --allow-undefined
//!
//! # Enable debug logging
//! RUST_LOG=debug cargo run -- --policy policy.json
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Logging level (trace, debug, info, warn, error)
//! - `ROUTEPERM_HOST`: Server host (default: 0.0.0.0)
//! - `ROUTEPERM_PORT`: Server port (default: 8080)
//! - `ROUTEPERM_POLICY`: Path to the JSON policy table
//! - `ROUTEPERM_ALLOW_UNDEFINED`: Allow routes missing from the policy
//! - `ROUTEPERM_JSON_LOGS`: Emit JSON logs

use anyhow::{Context, Result};
use clap::Parser;
use routeperm_authz::{DecisionEngine, EngineConfig, PolicyTable};
use routeperm_server::{server::ServerBuilder, state::AppState};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Route Permission Server
#[derive(Parser, Debug)]
#[command(
    name = "routeperm-server",
    version,
    about = "Route permission gateway for a static policy table",
    long_about = None
)]
struct Args {
    /// Host to bind to
    #[arg(short = 'H', long, default_value = "0.0.0.0", env = "ROUTEPERM_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short = 'p', long, default_value = "8080", env = "ROUTEPERM_PORT")]
    port: u16,

    /// Path to the JSON policy table
    #[arg(short = 'P', long, env = "ROUTEPERM_POLICY")]
    policy: PathBuf,

    /// Allow requests to routes that are not in the policy table
    #[arg(long, env = "ROUTEPERM_ALLOW_UNDEFINED")]
    allow_undefined: bool,

    /// Enable JSON logging format
    #[arg(long, env = "ROUTEPERM_JSON_LOGS")]
    json_logs: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, default_value = "info", env = "RUST_LOG")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_tracing(&args);

    info!("Starting route permission server v{}", routeperm_authz::VERSION);

    let table = PolicyTable::from_path(&args.policy)
        .with_context(|| format!("Failed to load policy table from {}", args.policy.display()))?;
    info!("Loaded {} routes from {}", table.len(), args.policy.display());

    let engine = DecisionEngine::new(
        table,
        EngineConfig {
            allow_undefined: args.allow_undefined,
        },
    );

    let server = ServerBuilder::new()
        .host(&args.host)
        .port(args.port)
        .state(AppState::new(engine))
        .build()?;

    if let Err(e) = server.run().await {
        error!("Server error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Initialize tracing/logging subsystem
fn init_tracing(args: &Args) {
    let log_level = args.log_level.parse::<tracing::Level>().unwrap_or_else(|_| {
        eprintln!("Invalid log level '{}', using 'info'", args.log_level);
        tracing::Level::INFO
    });

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "routeperm_server={lvl},routeperm_authz={lvl},tower_http={http}",
            lvl = log_level,
            http = if log_level <= tracing::Level::DEBUG { "debug" } else { "info" },
        )
        .into()
    });

    if args.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .init();
    }
}
