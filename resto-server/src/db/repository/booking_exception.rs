//! Booking Exception Repository

use super::{RepoError, RepoResult};
use shared::models::{
    BookingException, BookingExceptionCreate, BookingExceptionUpdate, ExceptionStatus,
};
use shared::util::now_millis;
use sqlx::SqlitePool;
use sqlx::types::Json;

const COLUMNS: &str = "id, establishment_id, exception_type, start_date, end_date, date, \
                       booking_slot_id, closed_slots, reason, status, created_at";

pub async fn find_all(
    pool: &SqlitePool,
    establishment_id: i64,
) -> RepoResult<Vec<BookingException>> {
    let rows = sqlx::query_as::<_, BookingException>(&format!(
        "SELECT {COLUMNS} FROM booking_exception WHERE establishment_id = ? \
         ORDER BY COALESCE(start_date, date), id"
    ))
    .bind(establishment_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_active(
    pool: &SqlitePool,
    establishment_id: i64,
) -> RepoResult<Vec<BookingException>> {
    let rows = sqlx::query_as::<_, BookingException>(&format!(
        "SELECT {COLUMNS} FROM booking_exception WHERE establishment_id = ? AND status = ? \
         ORDER BY COALESCE(start_date, date), id"
    ))
    .bind(establishment_id)
    .bind(ExceptionStatus::Active)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(
    pool: &SqlitePool,
    establishment_id: i64,
    id: i64,
) -> RepoResult<Option<BookingException>> {
    let row = sqlx::query_as::<_, BookingException>(&format!(
        "SELECT {COLUMNS} FROM booking_exception WHERE id = ? AND establishment_id = ?"
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
    data: &BookingExceptionCreate,
) -> RepoResult<BookingException> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO booking_exception (establishment_id, exception_type, start_date, end_date, \
         date, booking_slot_id, closed_slots, reason, status, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(establishment_id)
    .bind(data.exception_type)
    .bind(&data.start_date)
    .bind(&data.end_date)
    .bind(&data.date)
    .bind(data.booking_slot_id)
    .bind(Json(&data.closed_slots))
    .bind(&data.reason)
    .bind(data.status.unwrap_or_default())
    .bind(now_millis())
    .fetch_one(pool)
    .await?;
    find_by_id(pool, establishment_id, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create booking exception".into()))
}

pub async fn update(
    pool: &SqlitePool,
    establishment_id: i64,
    id: i64,
    data: &BookingExceptionUpdate,
) -> RepoResult<BookingException> {
    let rows = sqlx::query(
        "UPDATE booking_exception SET reason = COALESCE(?1, reason), status = COALESCE(?2, status), \
         closed_slots = COALESCE(?3, closed_slots) WHERE id = ?4 AND establishment_id = ?5",
    )
    .bind(&data.reason)
    .bind(data.status)
    .bind(data.closed_slots.as_ref().map(Json))
    .bind(id)
    .bind(establishment_id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Booking exception {id} not found")));
    }
    find_by_id(pool, establishment_id, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Booking exception {id} not found")))
}

/// Hard delete
pub async fn delete(pool: &SqlitePool, establishment_id: i64, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM booking_exception WHERE id = ? AND establishment_id = ?")
        .bind(id)
        .bind(establishment_id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
