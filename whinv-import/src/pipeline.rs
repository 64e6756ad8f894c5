//! Import pipeline
//!
//! Purge-then-reload: every run first deletes the aisle's existing rows
//! (by location prefix) and then creates one item per filled item cell.
//! Re-running with the same sheet therefore converges on the same item set.
//! Rows and cells that cannot be imported are logged and skipped.

use crate::cell::Cell;
use crate::error::ImportError;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{debug, error, info, warn};
use whinv_common::db;
use whinv_common::location::is_value_column;
use whinv_common::{ItemFields, RackLayout};

/// What to import and how to map it
#[derive(Debug, Clone)]
pub struct ImportPlan {
    pub layout: RackLayout,
    /// Title rows at the top of the sheet, discarded before mapping
    pub header_rows: usize,
}

impl Default for ImportPlan {
    fn default() -> Self {
        Self {
            layout: RackLayout::aisle_e(),
            header_rows: 2,
        }
    }
}

/// An item derived from one sheet cell, ready to create
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedItem {
    /// 1-based sheet row, for log messages
    pub sheet_row: usize,
    pub column: usize,
    pub fields: ItemFields,
}

/// Outcome of one import run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    /// Rows removed by the pre-import purge
    pub purged: u64,
    pub created: usize,
    /// Rows skipped for a missing level label
    pub skipped_rows: usize,
    /// Cells whose create failed
    pub failed_cells: usize,
}

/// Map a grid to items without touching the database
///
/// Returns the planned items in sheet order plus one error per skipped row.
pub fn plan_items(grid: &[Vec<Cell>], plan: &ImportPlan) -> (Vec<PlannedItem>, Vec<ImportError>) {
    let data = grid.get(plan.header_rows..).unwrap_or(&[]);
    let mut items = Vec::new();
    let mut skipped = Vec::new();

    for (row_index, row) in data.iter().enumerate() {
        let sheet_row = row_index + plan.header_rows + 1;

        let level = match row.first().and_then(Cell::text) {
            Some(level) => level,
            None => {
                skipped.push(ImportError::Row {
                    row: sheet_row,
                    reason: "missing level label".to_string(),
                });
                continue;
            }
        };

        for (col, cell) in row.iter().enumerate().skip(1) {
            if !is_value_column(col) {
                continue;
            }
            let Some(name) = cell.text() else {
                continue;
            };
            let Some(location) = plan.layout.locate(row_index, col, &level) else {
                continue;
            };

            let mut details = format!(
                "Item located in Aisle {}, Rack {:02}, Level {}",
                plan.layout.aisle_name, location.rack, level
            );
            if let Some(note) = row.get(col + 1).and_then(Cell::text) {
                details.push_str(" - ");
                details.push_str(note.trim());
            }

            items.push(PlannedItem {
                sheet_row,
                column: col,
                fields: ItemFields::new(name, location.code)
                    .with_details(details)
                    .with_quantity(0),
            });
        }
    }

    (items, skipped)
}

/// Run a full import against the repository
///
/// Only the purge aborts the run; per-cell create failures are counted.
pub async fn run_import(
    pool: &SqlitePool,
    grid: &[Vec<Cell>],
    plan: &ImportPlan,
) -> Result<ImportReport, ImportError> {
    let (items, skipped) = plan_items(grid, plan);

    let mut report = ImportReport {
        purged: db::delete_by_position_prefix(pool, &plan.layout.aisle_prefix).await?,
        skipped_rows: skipped.len(),
        ..ImportReport::default()
    };
    info!(
        "Cleared {} existing items with prefix '{}'",
        report.purged, plan.layout.aisle_prefix
    );

    for err in &skipped {
        warn!("Skipping {}", err);
    }

    for planned in items {
        match db::create_item(pool, &planned.fields).await {
            Ok(item) => {
                report.created += 1;
                debug!("Imported: {} at {}", item.name, item.position);
            }
            Err(e) => {
                report.failed_cells += 1;
                error!(
                    "Failed to import item at position {} (row {}, column {}): {}",
                    planned.fields.position, planned.sheet_row, planned.column, e
                );
            }
        }
    }

    info!(
        "Import completed: {} created, {} rows skipped, {} cells failed",
        report.created, report.skipped_rows, report.failed_cells
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::text_row;

    fn header() -> Vec<Vec<Cell>> {
        vec![
            text_row(&["AISLE E", "", "", ""]),
            text_row(&["Level", "Rack 1", "Notes", "Rack 2"]),
        ]
    }

    #[test]
    fn test_headers_discarded() {
        let (items, skipped) = plan_items(&header(), &ImportPlan::default());
        assert!(items.is_empty());
        assert!(skipped.is_empty());
    }

    #[test]
    fn test_example_row() {
        let mut grid = header();
        grid.push(text_row(&["01", "WidgetA", "note", "", "", "WidgetB", "note2"]));

        let (items, skipped) = plan_items(&grid, &ImportPlan::default());
        assert!(skipped.is_empty());

        let placed: Vec<(&str, &str)> = items
            .iter()
            .map(|p| (p.fields.name.as_str(), p.fields.position.as_str()))
            .collect();
        assert_eq!(placed, vec![("WidgetA", "PE-01-01"), ("WidgetB", "PE-03-01")]);

        assert_eq!(
            items[0].fields.details,
            "Item located in Aisle E, Rack 01, Level 01 - note"
        );
        assert_eq!(
            items[1].fields.details,
            "Item located in Aisle E, Rack 03, Level 01 - note2"
        );
        assert_eq!(items[0].fields.quantity, 0);
        assert_eq!(items[0].fields.planned_quantity, None);
    }

    #[test]
    fn test_even_columns_never_produce_items() {
        let mut grid = header();
        grid.push(text_row(&["03", "", "only a note", "", "another note"]));

        let (items, _) = plan_items(&grid, &ImportPlan::default());
        assert!(items.is_empty());
    }

    #[test]
    fn test_missing_level_skips_row() {
        let mut grid = header();
        grid.push(text_row(&["", "Orphan"]));
        grid.push(vec![]);
        grid.push(text_row(&["2", "Kept"]));

        let (items, skipped) = plan_items(&grid, &ImportPlan::default());

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].fields.position, "PE-01-02");
        assert_eq!(items[0].sheet_row, 5);
        assert_eq!(skipped.len(), 2);
        assert!(matches!(skipped[0], ImportError::Row { row: 3, .. }));
    }

    #[test]
    fn test_numeric_level_label() {
        let mut grid = header();
        grid.push(vec![Cell::Number(7.0), Cell::from("Bolt")]);

        let (items, _) = plan_items(&grid, &ImportPlan::default());
        assert_eq!(items[0].fields.position, "PE-01-07");
        assert_eq!(
            items[0].fields.details,
            "Item located in Aisle E, Rack 01, Level 7"
        );
    }

    #[test]
    fn test_row_bands_follow_stripped_row_index() {
        let mut grid = header();
        for _ in 0..35 {
            grid.push(text_row(&["1"]));
        }
        // Stripped row index 35: second band
        grid.push(text_row(&["1", "Deep"]));

        let (items, _) = plan_items(&grid, &ImportPlan::default());
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].fields.position, "PE-06-01");
    }
}
