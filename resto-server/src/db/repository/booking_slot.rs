//! Booking Slot Repository
//!
//! `day_of_week` is stored ISO (1=Monday..7=Sunday).

use super::{RepoError, RepoResult};
use shared::models::{BookingSlot, BookingSlotCreate, BookingSlotUpdate};
use sqlx::SqlitePool;

const COLUMNS: &str = "id, establishment_id, day_of_week, start_time, end_time, slot_name, \
                       max_capacity, is_active, valid_from, valid_until, deleted";

pub async fn find_all(pool: &SqlitePool, establishment_id: i64) -> RepoResult<Vec<BookingSlot>> {
    let rows = sqlx::query_as::<_, BookingSlot>(&format!(
        "SELECT {COLUMNS} FROM booking_slot WHERE establishment_id = ? AND deleted = 0 \
         ORDER BY day_of_week, start_time"
    ))
    .bind(establishment_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Active services of one ISO weekday
pub async fn find_active_by_day(
    pool: &SqlitePool,
    establishment_id: i64,
    iso_day: i64,
) -> RepoResult<Vec<BookingSlot>> {
    let rows = sqlx::query_as::<_, BookingSlot>(&format!(
        "SELECT {COLUMNS} FROM booking_slot WHERE establishment_id = ? AND day_of_week = ? \
         AND is_active = 1 AND deleted = 0 ORDER BY start_time"
    ))
    .bind(establishment_id)
    .bind(iso_day)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(
    pool: &SqlitePool,
    establishment_id: i64,
    id: i64,
) -> RepoResult<Option<BookingSlot>> {
    let row = sqlx::query_as::<_, BookingSlot>(&format!(
        "SELECT {COLUMNS} FROM booking_slot WHERE id = ? AND establishment_id = ? AND deleted = 0"
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
    data: &BookingSlotCreate,
) -> RepoResult<BookingSlot> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO booking_slot (establishment_id, day_of_week, start_time, end_time, slot_name, \
         max_capacity, is_active, valid_from, valid_until) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(establishment_id)
    .bind(data.day_of_week)
    .bind(&data.start_time)
    .bind(&data.end_time)
    .bind(&data.slot_name)
    .bind(data.max_capacity)
    .bind(data.is_active.unwrap_or(true))
    .bind(&data.valid_from)
    .bind(&data.valid_until)
    .fetch_one(pool)
    .await?;
    find_by_id(pool, establishment_id, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create booking slot".into()))
}

pub async fn update(
    pool: &SqlitePool,
    establishment_id: i64,
    id: i64,
    data: &BookingSlotUpdate,
) -> RepoResult<BookingSlot> {
    let rows = sqlx::query(
        "UPDATE booking_slot SET day_of_week = COALESCE(?1, day_of_week), \
         start_time = COALESCE(?2, start_time), end_time = COALESCE(?3, end_time), \
         slot_name = COALESCE(?4, slot_name), max_capacity = COALESCE(?5, max_capacity), \
         is_active = COALESCE(?6, is_active), valid_from = COALESCE(?7, valid_from), \
         valid_until = COALESCE(?8, valid_until) \
         WHERE id = ?9 AND establishment_id = ?10 AND deleted = 0",
    )
    .bind(data.day_of_week)
    .bind(&data.start_time)
    .bind(&data.end_time)
    .bind(&data.slot_name)
    .bind(data.max_capacity)
    .bind(data.is_active)
    .bind(&data.valid_from)
    .bind(&data.valid_until)
    .bind(id)
    .bind(establishment_id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Booking slot {id} not found")));
    }
    find_by_id(pool, establishment_id, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Booking slot {id} not found")))
}

/// Soft delete
pub async fn delete(pool: &SqlitePool, establishment_id: i64, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE booking_slot SET deleted = 1 WHERE id = ? AND establishment_id = ? AND deleted = 0",
    )
    .bind(id)
    .bind(establishment_id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}
