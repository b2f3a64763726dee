//! Booking Repository

use super::{RepoError, RepoResult};
use shared::models::{Booking, BookingCreate, BookingStatus};
use shared::util::now_millis;
use sqlx::{SqliteConnection, SqlitePool};

const COLUMNS: &str = "id, establishment_id, booking_slot_id, date, slot_time, guests, \
                       customer_name, customer_email, customer_phone, notes, status, token, created_at";

/// Guests already booked, grouped per (service, slot time)
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BookedGuests {
    pub booking_slot_id: Option<i64>,
    pub slot_time: String,
    pub guests: i64,
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Booking>> {
    let row = sqlx::query_as::<_, Booking>(&format!("SELECT {COLUMNS} FROM booking WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_date(
    pool: &SqlitePool,
    establishment_id: i64,
    date: &str,
) -> RepoResult<Vec<Booking>> {
    let rows = sqlx::query_as::<_, Booking>(&format!(
        "SELECT {COLUMNS} FROM booking WHERE establishment_id = ? AND date = ? ORDER BY slot_time, id"
    ))
    .bind(establishment_id)
    .bind(date)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Non-cancelled guests per service and slot time for one day
pub async fn booked_guests(
    pool: &SqlitePool,
    establishment_id: i64,
    date: &str,
) -> RepoResult<Vec<BookedGuests>> {
    let rows = sqlx::query_as::<_, BookedGuests>(
        "SELECT booking_slot_id, slot_time, SUM(guests) AS guests FROM booking \
         WHERE establishment_id = ? AND date = ? AND status != 'cancelled' \
         GROUP BY booking_slot_id, slot_time",
    )
    .bind(establishment_id)
    .bind(date)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Non-cancelled guests of one service at one slot time, on a transaction
pub async fn guests_at(
    conn: &mut SqliteConnection,
    establishment_id: i64,
    booking_slot_id: i64,
    date: &str,
    slot_time: &str,
) -> RepoResult<i64> {
    let total: i64 = sqlx::query_scalar(
        "SELECT COALESCE(SUM(guests), 0) FROM booking WHERE establishment_id = ? \
         AND booking_slot_id = ? AND date = ? AND slot_time = ? AND status != 'cancelled'",
    )
    .bind(establishment_id)
    .bind(booking_slot_id)
    .bind(date)
    .bind(slot_time)
    .fetch_one(conn)
    .await?;
    Ok(total)
}

/// Insert a pending booking on a transaction
///
/// `slot_time` is the normalized `HH:MM` of the chosen slot.
pub async fn insert(
    conn: &mut SqliteConnection,
    data: &BookingCreate,
    booking_slot_id: i64,
    slot_time: &str,
    token: &str,
) -> RepoResult<i64> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO booking (establishment_id, booking_slot_id, date, slot_time, guests, \
         customer_name, customer_email, customer_phone, notes, status, token, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(data.establishment_id)
    .bind(booking_slot_id)
    .bind(&data.date)
    .bind(slot_time)
    .bind(data.guests)
    .bind(data.customer_name.trim())
    .bind(data.customer_email.trim())
    .bind(&data.customer_phone)
    .bind(&data.notes)
    .bind(BookingStatus::Pending)
    .bind(token)
    .bind(now_millis())
    .fetch_one(conn)
    .await?;
    Ok(id)
}

pub async fn update_status(pool: &SqlitePool, id: i64, status: BookingStatus) -> RepoResult<Booking> {
    let rows = sqlx::query("UPDATE booking SET status = ? WHERE id = ?")
        .bind(status)
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Booking {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Booking {id} not found")))
}
