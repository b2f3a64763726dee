//! Stock Repository

use super::{RepoError, RepoResult};
use shared::models::{Stock, StockCreate, StockUpdate};
use shared::util::now_millis;
use sqlx::SqlitePool;

const COLUMNS: &str =
    "id, establishment_id, product_id, name, quantity, unit, alert_threshold, deleted, updated_at";

pub async fn find_all(pool: &SqlitePool, establishment_id: i64) -> RepoResult<Vec<Stock>> {
    let stocks = sqlx::query_as::<_, Stock>(&format!(
        "SELECT {COLUMNS} FROM stock WHERE establishment_id = ? AND deleted = 0 ORDER BY name"
    ))
    .bind(establishment_id)
    .fetch_all(pool)
    .await?;
    Ok(stocks)
}

/// Entries at or below their alert threshold
pub async fn find_low(pool: &SqlitePool, establishment_id: i64) -> RepoResult<Vec<Stock>> {
    let stocks = sqlx::query_as::<_, Stock>(&format!(
        "SELECT {COLUMNS} FROM stock WHERE establishment_id = ? AND deleted = 0 \
         AND alert_threshold IS NOT NULL AND quantity <= alert_threshold ORDER BY name"
    ))
    .bind(establishment_id)
    .fetch_all(pool)
    .await?;
    Ok(stocks)
}

pub async fn find_by_id(
    pool: &SqlitePool,
    establishment_id: i64,
    id: i64,
) -> RepoResult<Option<Stock>> {
    let stock = sqlx::query_as::<_, Stock>(&format!(
        "SELECT {COLUMNS} FROM stock WHERE id = ? AND establishment_id = ? AND deleted = 0"
    ))
    .bind(id)
    .bind(establishment_id)
    .fetch_optional(pool)
    .await?;
    Ok(stock)
}

pub async fn create(
    pool: &SqlitePool,
    establishment_id: i64,
    data: &StockCreate,
) -> RepoResult<Stock> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO stock (establishment_id, product_id, name, quantity, unit, alert_threshold, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(establishment_id)
    .bind(data.product_id)
    .bind(&data.name)
    .bind(data.quantity)
    .bind(&data.unit)
    .bind(data.alert_threshold)
    .bind(now_millis())
    .fetch_one(pool)
    .await?;
    find_by_id(pool, establishment_id, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create stock".into()))
}

pub async fn update(
    pool: &SqlitePool,
    establishment_id: i64,
    id: i64,
    data: &StockUpdate,
) -> RepoResult<Stock> {
    let rows = sqlx::query(
        "UPDATE stock SET product_id = COALESCE(?1, product_id), name = COALESCE(?2, name), \
         quantity = COALESCE(?3, quantity), unit = COALESCE(?4, unit), \
         alert_threshold = COALESCE(?5, alert_threshold), updated_at = ?6 \
         WHERE id = ?7 AND establishment_id = ?8 AND deleted = 0",
    )
    .bind(data.product_id)
    .bind(&data.name)
    .bind(data.quantity)
    .bind(&data.unit)
    .bind(data.alert_threshold)
    .bind(now_millis())
    .bind(id)
    .bind(establishment_id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Stock {id} not found")));
    }
    find_by_id(pool, establishment_id, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Stock {id} not found")))
}

/// Soft delete
pub async fn delete(pool: &SqlitePool, establishment_id: i64, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE stock SET deleted = 1, updated_at = ? WHERE id = ? AND establishment_id = ? AND deleted = 0",
    )
    .bind(now_millis())
    .bind(id)
    .bind(establishment_id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}
