//! Public booking
//!
//! - [`exceptions`]: closures resolved per date and slot numbers
//! - [`availability`]: 15-minute slot generator
//! - [`flow`]: booking wizard state machine
//!
//! Creating a booking runs in one SQLite write transaction: the row is
//! inserted first, then the slot's total is re-read under the write lock and
//! the transaction rolls back when the party no longer fits.

pub mod availability;
pub mod exceptions;
pub mod flow;

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};
use shared::error::{AppError, ErrorCode};
use shared::models::{
    Booking, BookingCreate, BookingCreated, BookingSlot, BookingStatus, weekday,
};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::repository::{RepoError, booking, booking_exception, booking_slot, establishment};
use crate::utils::AppResult;
use crate::utils::time::{format_date, format_hm, minutes_of_day, parse_date, parse_time};
use availability::{booked_map, compute_slots};
use exceptions::{DayClosures, SLOT_MINUTES, slot_number};
use flow::{BookingWizard, ContactForm, FlowError};

/// Whether `service` runs on `date` and covers `time`
fn service_covers(service: &BookingSlot, date: NaiveDate, time: NaiveTime) -> bool {
    let (Ok(start), Ok(end)) = (parse_time(&service.start_time), parse_time(&service.end_time))
    else {
        return false;
    };
    service.is_active
        && !service.deleted
        && service.day_of_week == weekday::to_iso(date.weekday())
        && service.is_valid_on(date)
        && start <= time
        && time < end
}

/// Service the guest books into
async fn resolve_service(
    pool: &SqlitePool,
    data: &BookingCreate,
    date: NaiveDate,
    time: NaiveTime,
) -> AppResult<BookingSlot> {
    let service = match data.booking_slot_id {
        Some(id) => booking_slot::find_by_id(pool, data.establishment_id, id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::BookingSlotNotFound).with_detail("id", id))?,
        None => {
            let services = booking_slot::find_active_by_day(
                pool,
                data.establishment_id,
                weekday::to_iso(date.weekday()),
            )
            .await?;
            services
                .into_iter()
                .find(|s| service_covers(s, date, time))
                .ok_or_else(|| {
                    AppError::new(ErrorCode::BookingSlotNotFound)
                        .with_detail("slot_time", format_hm(time))
                })?
        }
    };

    if !service_covers(&service, date, time) {
        return Err(AppError::with_message(
            ErrorCode::SlotClosed,
            "Ce service n'est pas ouvert à cette heure",
        )
        .with_detail("booking_slot_id", service.id)
        .with_detail("slot_time", format_hm(time)));
    }
    Ok(service)
}

/// Create a pending booking and hand back its confirmation token
///
/// The request is replayed through [`BookingWizard`]: date, then the slot as
/// the slot generator sees it, then the contact form. The stored date is the
/// canonical `YYYY-MM-DD` of the parsed input.
pub async fn create_booking(
    pool: &SqlitePool,
    data: &BookingCreate,
    today: NaiveDate,
) -> AppResult<BookingCreated> {
    let mut wizard = BookingWizard::new(data.establishment_id);

    let date = parse_date(&data.date)?;
    wizard.select_date(date, today)?;

    let time = parse_time(&data.slot_time)?;
    if minutes_of_day(time) % SLOT_MINUTES != 0 || time.second() != 0 {
        return Err(AppError::validation("Slot time must fall on a quarter hour")
            .with_detail("slot_time", data.slot_time.clone()));
    }

    let place = establishment::find_by_id(pool, data.establishment_id)
        .await?
        .ok_or_else(|| {
            AppError::new(ErrorCode::EstablishmentNotFound).with_detail("id", data.establishment_id)
        })?;
    if !place.booking_enabled {
        return Err(AppError::new(ErrorCode::BookingDisabled).with_detail("id", place.id));
    }

    let service = resolve_service(pool, data, date, time).await?;
    let number = slot_number(time);
    let day = format_date(date);

    let exceptions = booking_exception::find_active(pool, place.id).await?;
    let closures = DayClosures::resolve(&exceptions, date);
    let booked = booked_map(&booking::booked_guests(pool, place.id, &day).await?);
    let slot = compute_slots(std::slice::from_ref(&service), date, &closures, &booked)
        .into_iter()
        .find(|s| s.slot_number == number)
        .ok_or(FlowError::SlotUnavailable)
        .map_err(|e| AppError::from(e).with_detail("slot_number", number))?;
    wizard
        .select_slot(slot)
        .map_err(|e| AppError::from(e).with_detail("booking_slot_id", service.id))?;

    let payload = wizard.submit(&ContactForm {
        customer_name: data.customer_name.clone(),
        customer_email: data.customer_email.clone(),
        customer_phone: data.customer_phone.clone(),
        guests: data.guests,
        notes: data.notes.clone(),
    })?;
    let token = Uuid::new_v4().to_string();

    let mut tx = pool.begin().await.map_err(RepoError::from)?;
    let id = booking::insert(&mut *tx, &payload, service.id, &payload.slot_time, &token).await?;
    let total =
        booking::guests_at(&mut *tx, place.id, service.id, &payload.date, &payload.slot_time).await?;
    if total > service.max_capacity {
        // tx dropped here: rolled back
        let remaining = (service.max_capacity - (total - payload.guests)).max(0);
        tracing::info!(
            establishment_id = place.id,
            booking_slot_id = service.id,
            slot_time = %payload.slot_time,
            requested = payload.guests,
            remaining,
            "Booking rejected, slot full"
        );
        return Err(AppError::from(FlowError::SlotFull {
            available: remaining,
        })
        .with_detail("slot_time", payload.slot_time.clone()));
    }
    tx.commit().await.map_err(RepoError::from)?;
    wizard.complete(id)?;

    let booking = find_booking(pool, id).await?;
    tracing::info!(
        booking_id = booking.id,
        establishment_id = place.id,
        date = %booking.date,
        slot_time = %booking.slot_time,
        guests = booking.guests,
        "Booking created"
    );
    Ok(BookingCreated { booking, token })
}

pub async fn find_booking(pool: &SqlitePool, id: i64) -> AppResult<Booking> {
    booking::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::BookingNotFound).with_detail("id", id))
}

/// Check a confirmation token against the stored one
pub async fn verify_token(pool: &SqlitePool, id: i64, token: &str) -> AppResult<Booking> {
    let booking = find_booking(pool, id).await?;
    if booking.token != token.trim() {
        tracing::warn!(booking_id = id, "Booking token mismatch");
        return Err(AppError::new(ErrorCode::BookingTokenInvalid));
    }
    Ok(booking)
}

/// Guest-side cancellation, authorized by the token
pub async fn cancel(pool: &SqlitePool, id: i64, token: &str) -> AppResult<Booking> {
    let booking = verify_token(pool, id, token).await?;
    if booking.status == BookingStatus::Cancelled {
        return Ok(booking);
    }
    let booking = booking::update_status(pool, id, BookingStatus::Cancelled).await?;
    tracing::info!(booking_id = id, "Booking cancelled by guest");
    Ok(booking)
}
