//! whinv-import - one-shot aisle import
//!
//! Takes no arguments. The spreadsheet path, sheet name and database come
//! from configuration (`WHINV_IMPORT_SOURCE`, `WHINV_DATABASE`, TOML).
//! Safe to re-run: the aisle's previous rows are purged first.

use anyhow::{Context, Result};
use tracing::{error, info, warn};
use whinv_common::config::TomlConfig;
use whinv_common::logging::init_logging;
use whinv_common::RackLayout;
use whinv_import::{open_source, run_import, ImportPlan};

#[tokio::main]
async fn main() -> Result<()> {
    let (config, config_path) = TomlConfig::load()?;
    init_logging(&config.logging)?;

    info!(
        "Starting whinv-import v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    if config_path.is_none() {
        warn!("No config file found; using compiled defaults");
    }

    let source_path = config.resolve_import_source();
    let mut source = open_source(&source_path, &config.import.sheet);
    info!("Reading file from: {}", source.describe());

    let grid = match source.read_grid() {
        Ok(grid) => grid,
        Err(e) => {
            error!("Error importing data: {}", e);
            return Err(e.into());
        }
    };
    info!("Read {} rows", grid.len());

    let db_path = config.resolve_database_path(None);
    info!("Database path: {}", db_path.display());
    let pool = whinv_common::db::init_database(&db_path)
        .await
        .with_context(|| format!("Failed to open database {}", db_path.display()))?;

    let plan = ImportPlan {
        layout: RackLayout::aisle_e(),
        header_rows: config.import.header_rows,
    };

    let report = run_import(&pool, &grid, &plan).await;
    pool.close().await;

    match report {
        Ok(report) => {
            info!(
                "Data import completed successfully. Total items imported: {}",
                report.created
            );
            Ok(())
        }
        Err(e) => {
            error!("Error importing data: {}", e);
            Err(e.into())
        }
    }
}
