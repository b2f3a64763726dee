//! Slot generator
//!
//! Quantizes the services of one day into 15-minute slots and subtracts the
//! guests already booked and the closures in force.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use shared::models::{AvailableSlot, BookingSlot, weekday};
use sqlx::SqlitePool;

use super::exceptions::{DayClosures, generate_time_slots_from_booking_slot};
use crate::db::repository::{booking, booking_exception, booking_slot};
use crate::db::repository::booking::BookedGuests;
use crate::utils::AppResult;
use crate::utils::time::{format_date, try_parse_time};

/// Guests booked per `(service, HH:MM)`
pub type BookedMap = HashMap<(i64, String), i64>;

/// Fold booked rows into a lookup map
///
/// Slot times are normalized to `HH:MM`; rows without a service are ignored.
pub fn booked_map(rows: &[BookedGuests]) -> BookedMap {
    let mut map = BookedMap::new();
    for row in rows {
        let (Some(service), Some(time)) = (row.booking_slot_id, try_parse_time(&row.slot_time)) else {
            continue;
        };
        *map.entry((service, time.format("%H:%M").to_string())).or_default() += row.guests;
    }
    map
}

/// Available slots of `date`, ordered by time then service
///
/// `slots` may contain any service; only active ones matching the date's
/// weekday and validity window contribute.
pub fn compute_slots(
    slots: &[BookingSlot],
    date: NaiveDate,
    closures: &DayClosures,
    booked: &BookedMap,
) -> Vec<AvailableSlot> {
    let iso_day = weekday::to_iso(date.weekday());
    let mut result: Vec<AvailableSlot> = slots
        .iter()
        .filter(|s| s.is_active && !s.deleted && s.day_of_week == iso_day && s.is_valid_on(date))
        .flat_map(|service| {
            generate_time_slots_from_booking_slot(service)
                .into_iter()
                .map(move |step| {
                    let taken = booked
                        .get(&(service.id, step.time.clone()))
                        .copied()
                        .unwrap_or(0);
                    let available_capacity = (service.max_capacity - taken).max(0);
                    let is_available = available_capacity > 0
                        && !closures.is_closed(service.id, step.slot_number);
                    AvailableSlot {
                        slot_time: step.time,
                        slot_number: step.slot_number,
                        booking_slot_id: service.id,
                        service_name: service.slot_name.clone(),
                        is_available,
                        available_capacity,
                        max_capacity: service.max_capacity,
                    }
                })
        })
        .collect();

    result.sort_by(|a, b| {
        a.slot_number
            .cmp(&b.slot_number)
            .then(a.booking_slot_id.cmp(&b.booking_slot_id))
    });
    result
}

/// Every 15-minute slot of `date` with its remaining capacity
pub async fn generate_15min_slots(
    pool: &SqlitePool,
    establishment_id: i64,
    date: NaiveDate,
) -> AppResult<Vec<AvailableSlot>> {
    let day = format_date(date);
    let services =
        booking_slot::find_active_by_day(pool, establishment_id, weekday::to_iso(date.weekday()))
            .await?;
    let exceptions = booking_exception::find_active(pool, establishment_id).await?;
    let booked = booking::booked_guests(pool, establishment_id, &day).await?;

    let closures = DayClosures::resolve(&exceptions, date);
    let slots = compute_slots(&services, date, &closures, &booked_map(&booked));
    tracing::debug!(
        establishment_id,
        date = %day,
        slots = slots.len(),
        "Generated booking slots"
    );
    Ok(slots)
}

/// Only the bookable slots of `date`
pub async fn get_available_slots_simple(
    pool: &SqlitePool,
    establishment_id: i64,
    date: NaiveDate,
) -> AppResult<Vec<AvailableSlot>> {
    let slots = generate_15min_slots(pool, establishment_id, date).await?;
    Ok(slots.into_iter().filter(|s| s.is_available).collect())
}
