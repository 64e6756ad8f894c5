//! Integration tests for the import pipeline against an in-memory repository

use std::io::Write;
use tempfile::Builder;
use whinv_common::db::{self, init_memory_database};
use whinv_common::{ItemFields, ItemStatus};
use whinv_import::cell::text_row;
use whinv_import::{open_source, run_import, Cell, ImportPlan};

fn header() -> Vec<Vec<Cell>> {
    vec![
        text_row(&["AISLE E Parts table"]),
        text_row(&["Level", "Rack 1", "", "Rack 2"]),
    ]
}

/// Nine well-formed rows with one item each, plus one row missing its level
fn grid_with_one_malformed_row() -> Vec<Vec<Cell>> {
    let mut grid = header();
    for level in 1..=9 {
        let level_label = level.to_string();
        let name = format!("Part-{}", level);
        grid.push(text_row(&[&level_label, &name]));
        if level == 4 {
            grid.push(text_row(&["", "NoLevel"]));
        }
    }
    grid
}

#[tokio::test]
async fn test_malformed_row_skipped_rest_imported() {
    let pool = init_memory_database().await.unwrap();

    let report = run_import(&pool, &grid_with_one_malformed_row(), &ImportPlan::default())
        .await
        .unwrap();

    assert_eq!(report.created, 9);
    assert_eq!(report.skipped_rows, 1);
    assert_eq!(report.failed_cells, 0);
    assert_eq!(db::count_items(&pool).await.unwrap(), 9);

    let items = db::list_items(&pool, None).await.unwrap();
    assert!(items.iter().all(|item| item.name != "NoLevel"));
    assert!(items.iter().all(|item| item.quantity == 0));
    assert!(items.iter().all(|item| item.status() == ItemStatus::Unplanned));
}

#[tokio::test]
async fn test_rerun_is_idempotent() {
    let pool = init_memory_database().await.unwrap();
    let grid = grid_with_one_malformed_row();
    let plan = ImportPlan::default();

    let first = run_import(&pool, &grid, &plan).await.unwrap();
    let mut first_set: Vec<(String, String)> = db::list_items(&pool, None)
        .await
        .unwrap()
        .into_iter()
        .map(|item| (item.position, item.name))
        .collect();

    let second = run_import(&pool, &grid, &plan).await.unwrap();
    let mut second_set: Vec<(String, String)> = db::list_items(&pool, None)
        .await
        .unwrap()
        .into_iter()
        .map(|item| (item.position, item.name))
        .collect();

    assert_eq!(first.purged, 0);
    assert_eq!(second.purged, 9);
    assert_eq!(first.created, second.created);

    first_set.sort();
    second_set.sort();
    assert_eq!(first_set, second_set);
}

#[tokio::test]
async fn test_purge_leaves_other_aisles() {
    let pool = init_memory_database().await.unwrap();
    db::create_item(&pool, &ItemFields::new("Other aisle", "PC-01-01"))
        .await
        .unwrap();
    db::create_item(&pool, &ItemFields::new("Stale", "PE-09-09"))
        .await
        .unwrap();

    let report = run_import(&pool, &grid_with_one_malformed_row(), &ImportPlan::default())
        .await
        .unwrap();

    assert_eq!(report.purged, 1);
    let names: Vec<String> = db::list_items(&pool, None)
        .await
        .unwrap()
        .into_iter()
        .map(|item| item.name)
        .collect();
    assert!(names.contains(&"Other aisle".to_string()));
    assert!(!names.contains(&"Stale".to_string()));
    assert_eq!(names.len(), 10);
}

#[tokio::test]
async fn test_failed_cell_does_not_abort_batch() {
    let pool = init_memory_database().await.unwrap();
    sqlx::query(
        "CREATE TRIGGER reject_broken BEFORE INSERT ON items
         WHEN NEW.name = 'Broken'
         BEGIN SELECT RAISE(ABORT, 'rejected'); END",
    )
    .execute(&pool)
    .await
    .unwrap();

    let mut grid = header();
    grid.push(text_row(&["1", "Good", "", "Broken", "", "AlsoGood"]));

    let report = run_import(&pool, &grid, &ImportPlan::default()).await.unwrap();

    assert_eq!(report.created, 2);
    assert_eq!(report.failed_cells, 1);
    assert_eq!(db::count_items(&pool).await.unwrap(), 2);
}

#[tokio::test]
async fn test_csv_end_to_end() {
    let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(file, "AISLE E,,,,,,").unwrap();
    writeln!(file, "Level,Rack 1,Notes,Rack 2,Notes,Rack 3,Notes").unwrap();
    writeln!(file, "01,WidgetA,note,,,WidgetB,note2").unwrap();

    let mut source = open_source(file.path(), "ignored for csv");
    let grid = source.read_grid().unwrap();

    let pool = init_memory_database().await.unwrap();
    let report = run_import(&pool, &grid, &ImportPlan::default()).await.unwrap();
    assert_eq!(report.created, 2);

    let items = db::list_items(&pool, None).await.unwrap();
    let placed: Vec<(&str, &str)> = items
        .iter()
        .map(|item| (item.name.as_str(), item.position.as_str()))
        .collect();
    assert_eq!(placed, vec![("WidgetA", "PE-01-01"), ("WidgetB", "PE-03-01")]);
    assert_eq!(
        items[0].details,
        "Item located in Aisle E, Rack 01, Level 01 - note"
    );
}
