//! whinv-console - terminal front-end for a running whinv-server
//!
//! Each invocation runs one subcommand against the items API and prints the
//! resulting rows and notifications.

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use whinv_common::config::TomlConfig;
use whinv_common::logging::init_logging;
use whinv_common::{ItemFields, ItemStatus, StatusCounts};
use whinv_console::{
    DialogOutcome, HttpItemsApi, ItemsApi, NotificationLevel, Row, SortDirection, SortKey,
    WarehouseView,
};

#[derive(Debug, Parser)]
#[command(name = "whinv-console", version, about = "Warehouse inventory terminal client")]
struct Args {
    /// Server base URL
    #[arg(long)]
    url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List items
    List {
        /// Case-insensitive match on name, position or details
        #[arg(long)]
        search: Option<String>,

        /// Only show one status (match, mismatch, empty, unplanned)
        #[arg(long)]
        status: Option<ItemStatus>,

        #[arg(long, value_enum, default_value_t = SortKey::Position)]
        sort: SortKey,

        #[arg(long, value_enum, default_value_t = SortDirection::Asc)]
        direction: SortDirection,
    },

    /// Add an item
    Add {
        #[arg(long)]
        name: String,

        #[arg(long)]
        position: String,

        #[arg(long, default_value = "")]
        details: String,

        #[arg(long, default_value_t = 0)]
        quantity: u32,

        #[arg(long)]
        planned: Option<u32>,
    },

    /// Edit an item; unspecified fields keep their current value
    Edit {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        position: Option<String>,

        #[arg(long)]
        details: Option<String>,

        #[arg(long)]
        quantity: Option<u32>,

        #[arg(long)]
        planned: Option<u32>,

        /// Clear the planned quantity
        #[arg(long, conflicts_with = "planned")]
        unplanned: bool,
    },

    /// Delete an item
    Delete { id: String },

    /// Per-status totals
    Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let (config, _) = TomlConfig::load()?;
    init_logging(&config.logging)?;
    info!(
        "Starting whinv-console v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let base_url = config.resolve_base_url(args.url.as_deref());
    info!("Server: {}", base_url);
    let view = WarehouseView::new(HttpItemsApi::new(base_url)?);

    let succeeded = match args.command {
        Command::List {
            search,
            status,
            sort,
            direction,
        } => {
            let fetched = match search {
                Some(term) => view.search(&term).await,
                None => view.refresh().await,
            };
            view.set_status_filter(status).await;
            view.set_sort(sort, direction).await;
            let term = view.search_term().await;
            if !term.is_empty() {
                println!("Search: \"{}\"", term);
            }
            print_rows(&view.rows().await);
            fetched
        }
        Command::Add {
            name,
            position,
            details,
            quantity,
            planned,
        } => {
            let fields = ItemFields {
                name,
                details,
                position,
                quantity,
                planned_quantity: planned,
            };
            view.create(&fields).await == DialogOutcome::Close
        }
        Command::Edit {
            id,
            name,
            position,
            details,
            quantity,
            planned,
            unplanned,
        } => {
            let Some(mut fields) = current_fields(&view, &id).await else {
                print_notifications(&view).await;
                bail!("No item with id {}", id);
            };
            if let Some(name) = name {
                fields.name = name;
            }
            if let Some(position) = position {
                fields.position = position;
            }
            if let Some(details) = details {
                fields.details = details;
            }
            if let Some(quantity) = quantity {
                fields.quantity = quantity;
            }
            if planned.is_some() || unplanned {
                fields.planned_quantity = planned;
            }
            view.update(&id, &fields).await == DialogOutcome::Close
        }
        Command::Delete { id } => view.delete(&id).await == DialogOutcome::Close,
        Command::Stats => {
            let fetched = view.refresh().await;
            print_counts(&view.counts().await);
            fetched
        }
    };

    print_notifications(&view).await;
    if !succeeded {
        bail!("Command failed");
    }
    Ok(())
}

/// Fields of the item with `id`, from a fresh fetch
async fn current_fields<A: ItemsApi>(view: &WarehouseView<A>, id: &str) -> Option<ItemFields> {
    if !view.refresh().await {
        return None;
    }
    view.rows()
        .await
        .iter()
        .find(|row| row.item.id == id)
        .map(|row| ItemFields::from(&row.item))
}

fn print_rows(rows: &[Row]) {
    println!(
        "{:<10} {:<24} {:>8} {:>8} {:>9} {:<10} {}",
        "POSITION", "NAME", "QTY", "PLANNED", "VARIANCE", "STATUS", "ID"
    );
    for row in rows {
        let planned = row
            .item
            .planned_quantity
            .map(|p| p.to_string())
            .unwrap_or_else(|| "-".to_string());
        let variance = row
            .variance
            .map(|v| format!("{:+}", v))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<10} {:<24} {:>8} {:>8} {:>9} {:<10} {}",
            row.item.position, row.item.name, row.item.quantity, planned, variance, row.status, row.item.id
        );
    }
    println!("{} item(s)", rows.len());
}

fn print_counts(counts: &StatusCounts) {
    println!("total      {}", counts.total);
    for status in ItemStatus::ALL {
        println!("{:<10} {}", status.as_str(), counts.get(status));
    }
}

async fn print_notifications<A: ItemsApi>(view: &WarehouseView<A>) {
    for notification in view.take_notifications().await {
        match notification.level {
            NotificationLevel::Success => println!("✓ {}", notification.message),
            NotificationLevel::Error => eprintln!("✗ {}", notification.message),
        }
    }
}
