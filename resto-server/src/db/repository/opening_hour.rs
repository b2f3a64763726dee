//! Opening Hour Repository
//!
//! `day_of_week` is stored Sunday-zero (0=Sunday..6=Saturday).

use super::{RepoError, RepoResult};
use shared::models::{OpeningHour, OpeningHourCreate, OpeningHourUpdate};
use sqlx::SqlitePool;

const COLUMNS: &str = "id, establishment_id, day_of_week, open_time, close_time, is_active, deleted";

pub async fn find_all(pool: &SqlitePool, establishment_id: i64) -> RepoResult<Vec<OpeningHour>> {
    let rows = sqlx::query_as::<_, OpeningHour>(&format!(
        "SELECT {COLUMNS} FROM opening_hour WHERE establishment_id = ? AND deleted = 0 \
         ORDER BY day_of_week, open_time"
    ))
    .bind(establishment_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Active ranges of one day, the siblings an overlap check runs against
pub async fn find_active_by_day(
    pool: &SqlitePool,
    establishment_id: i64,
    day_of_week: i64,
) -> RepoResult<Vec<OpeningHour>> {
    let rows = sqlx::query_as::<_, OpeningHour>(&format!(
        "SELECT {COLUMNS} FROM opening_hour WHERE establishment_id = ? AND day_of_week = ? \
         AND is_active = 1 AND deleted = 0 ORDER BY open_time"
    ))
    .bind(establishment_id)
    .bind(day_of_week)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(
    pool: &SqlitePool,
    establishment_id: i64,
    id: i64,
) -> RepoResult<Option<OpeningHour>> {
    let row = sqlx::query_as::<_, OpeningHour>(&format!(
        "SELECT {COLUMNS} FROM opening_hour WHERE id = ? AND establishment_id = ? AND deleted = 0"
    ))
    .bind(id)
    .bind(establishment_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn create(
    pool: &SqlitePool,
    establishment_id: i64,
    data: &OpeningHourCreate,
) -> RepoResult<OpeningHour> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO opening_hour (establishment_id, day_of_week, open_time, close_time, is_active) \
         VALUES (?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(establishment_id)
    .bind(data.day_of_week)
    .bind(&data.open_time)
    .bind(&data.close_time)
    .bind(data.is_active.unwrap_or(true))
    .fetch_one(pool)
    .await?;
    find_by_id(pool, establishment_id, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create opening hour".into()))
}

pub async fn update(
    pool: &SqlitePool,
    establishment_id: i64,
    id: i64,
    data: &OpeningHourUpdate,
) -> RepoResult<OpeningHour> {
    let rows = sqlx::query(
        "UPDATE opening_hour SET day_of_week = COALESCE(?1, day_of_week), \
         open_time = COALESCE(?2, open_time), close_time = COALESCE(?3, close_time), \
         is_active = COALESCE(?4, is_active) \
         WHERE id = ?5 AND establishment_id = ?6 AND deleted = 0",
    )
    .bind(data.day_of_week)
    .bind(&data.open_time)
    .bind(&data.close_time)
    .bind(data.is_active)
    .bind(id)
    .bind(establishment_id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Opening hour {id} not found")));
    }
    find_by_id(pool, establishment_id, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Opening hour {id} not found")))
}

/// Soft delete
pub async fn delete(pool: &SqlitePool, establishment_id: i64, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE opening_hour SET deleted = 1 WHERE id = ? AND establishment_id = ? AND deleted = 0",
    )
    .bind(id)
    .bind(establishment_id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}
