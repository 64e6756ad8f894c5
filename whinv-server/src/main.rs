//! whinv-server - Warehouse inventory HTTP API
//!
//! Serves the item REST API and the browser page over one SQLite database.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info, warn};
use whinv_common::config::TomlConfig;
use whinv_common::logging::init_logging;
use whinv_server::{build_router, AppState};

/// Command-line overrides (take priority over environment and TOML)
#[derive(Debug, Parser)]
#[command(name = "whinv-server", version, about = "Warehouse inventory HTTP API")]
struct Args {
    /// HTTP port
    #[arg(long)]
    port: Option<u16>,

    /// SQLite database file
    #[arg(long)]
    database: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let (config, config_path) = TomlConfig::load()?;
    init_logging(&config.logging)?;

    // Build identification first, before any database delay
    info!(
        "Starting whinv-server v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    match &config_path {
        Some(path) => info!("Config file: {}", path.display()),
        None => warn!("No config file found; using compiled defaults"),
    }

    let db_path = config.resolve_database_path(args.database.as_deref());
    info!("Database path: {}", db_path.display());

    let pool = match whinv_common::db::init_database(&db_path).await {
        Ok(pool) => {
            info!("✓ Connected to database");
            pool
        }
        Err(e) => {
            error!("Failed to open database: {}", e);
            return Err(e.into());
        }
    };

    let port = config.resolve_port(args.port)?;
    let addr = format!("{}:{}", config.host, port);

    let app = build_router(AppState::new(pool));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("whinv-server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
