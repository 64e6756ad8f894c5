//! Item repository
//!
//! CRUD over the `items` table plus the prefix purge used by the importer.
//! Every failure is returned to the caller with a distinguishable kind:
//! `Validation`, `NotFound` or `Database`.

use crate::models::{Item, ItemFields};
use crate::{Error, Result};
use chrono::{DateTime, SubsecRound, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

const ITEM_COLUMNS: &str =
    "id, name, details, position, quantity, planned_quantity, last_updated";

/// List items ordered by position
///
/// A non-blank `search` term keeps items whose name, position or details
/// contain it. Matching is a literal substring test on Unicode lowercase.
pub async fn list_items(pool: &SqlitePool, search: Option<&str>) -> Result<Vec<Item>> {
    let sql = format!(
        "SELECT {} FROM items ORDER BY position ASC, id ASC",
        ITEM_COLUMNS
    );
    let rows = sqlx::query(&sql).fetch_all(pool).await?;
    let items = rows.iter().map(item_from_row).collect::<Result<Vec<_>>>()?;

    let term = match search.map(str::trim).filter(|term| !term.is_empty()) {
        Some(term) => term.to_lowercase(),
        None => return Ok(items),
    };

    Ok(items
        .into_iter()
        .filter(|item| matches_search(item, &term))
        .collect())
}

/// `term` must already be lowercase
fn matches_search(item: &Item, term: &str) -> bool {
    [&item.name, &item.position, &item.details]
        .iter()
        .any(|field| field.to_lowercase().contains(term))
}

/// Load one item
pub async fn get_item(pool: &SqlitePool, id: &str) -> Result<Item> {
    let sql = format!("SELECT {} FROM items WHERE id = ?", ITEM_COLUMNS);
    let row = sqlx::query(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    match row {
        Some(row) => item_from_row(&row),
        None => Err(Error::NotFound(format!("item {}", id))),
    }
}

/// Create an item with a fresh id
pub async fn create_item(pool: &SqlitePool, fields: &ItemFields) -> Result<Item> {
    let fields = fields.validated()?;

    let item = Item {
        id: Uuid::new_v4().to_string(),
        name: fields.name,
        details: fields.details,
        position: fields.position,
        quantity: fields.quantity,
        planned_quantity: fields.planned_quantity,
        last_updated: timestamp(),
    };

    sqlx::query(
        r#"
        INSERT INTO items (id, name, details, position, quantity, planned_quantity, last_updated)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&item.id)
    .bind(&item.name)
    .bind(&item.details)
    .bind(&item.position)
    .bind(i64::from(item.quantity))
    .bind(item.planned_quantity.map(i64::from))
    .bind(item.last_updated)
    .execute(pool)
    .await?;

    Ok(item)
}

/// Replace the mutable fields of an item
pub async fn update_item(pool: &SqlitePool, id: &str, fields: &ItemFields) -> Result<Item> {
    let fields = fields.validated()?;

    let result = sqlx::query(
        r#"
        UPDATE items
        SET name = ?, details = ?, position = ?, quantity = ?, planned_quantity = ?,
            last_updated = ?
        WHERE id = ?
        "#,
    )
    .bind(&fields.name)
    .bind(&fields.details)
    .bind(&fields.position)
    .bind(i64::from(fields.quantity))
    .bind(fields.planned_quantity.map(i64::from))
    .bind(timestamp())
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("item {}", id)));
    }

    get_item(pool, id).await
}

/// Delete an item
pub async fn delete_item(pool: &SqlitePool, id: &str) -> Result<()> {
    let result = sqlx::query("DELETE FROM items WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("item {}", id)));
    }

    Ok(())
}

/// Delete every item whose position starts with `prefix` (case-sensitive)
///
/// Returns the number of rows removed. An empty prefix is rejected rather
/// than clearing the whole table.
pub async fn delete_by_position_prefix(pool: &SqlitePool, prefix: &str) -> Result<u64> {
    if prefix.is_empty() {
        return Err(Error::Validation("position prefix must not be empty".to_string()));
    }

    let result = sqlx::query("DELETE FROM items WHERE substr(position, 1, length(?)) = ?")
        .bind(prefix)
        .bind(prefix)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// Total number of stored items
pub async fn count_items(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Mutation timestamp, stored at millisecond precision
fn timestamp() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

fn item_from_row(row: &SqliteRow) -> Result<Item> {
    let quantity: i64 = row.try_get("quantity")?;
    let planned: Option<i64> = row.try_get("planned_quantity")?;

    Ok(Item {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        details: row.try_get("details")?,
        position: row.try_get("position")?,
        quantity: stored_count(quantity, "quantity")?,
        planned_quantity: planned
            .map(|p| stored_count(p, "planned_quantity"))
            .transpose()?,
        last_updated: row.try_get("last_updated")?,
    })
}

fn stored_count(value: i64, column: &str) -> Result<u32> {
    u32::try_from(value)
        .map_err(|_| Error::Internal(format!("stored {} out of range: {}", column, value)))
}
