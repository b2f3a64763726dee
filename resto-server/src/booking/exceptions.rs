//! Exception resolver
//!
//! Booking exceptions close either the whole establishment (`period`,
//! `single_day`), one service (`service`) or some 15-minute slots of one
//! service (`time_slots`). Slot numbers are `floor(minutes_since_midnight / 15)`.

use std::collections::{BTreeSet, HashMap, HashSet};

use chrono::{Days, NaiveDate, NaiveTime};
use serde::Serialize;
use serde_json::json;
use shared::CalendarEvent;
use shared::models::{BookingException, BookingSlot, ExceptionStatus, ExceptionType};

use crate::utils::time::{DATE_FORMAT, format_hm, minutes_of_day, try_parse_time};

/// Minutes per slot
pub const SLOT_MINUTES: u32 = 15;

/// Slot number of a time of day, in `[0, 96)`
pub fn slot_number(time: NaiveTime) -> u8 {
    // 23:59 -> 95
    (minutes_of_day(time) / SLOT_MINUTES) as u8
}

/// Start time of a slot number
pub fn slot_start(slot_number: u8) -> Option<NaiveTime> {
    let minutes = u32::from(slot_number) * SLOT_MINUTES;
    NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0)
}

fn exception_color(exception_type: ExceptionType) -> &'static str {
    match exception_type {
        ExceptionType::Period => "#ef4444",
        ExceptionType::SingleDay => "#f59e0b",
        ExceptionType::Service => "#8b5cf6",
        ExceptionType::TimeSlots => "#06b6d4",
    }
}

fn exception_title(exception: &BookingException) -> String {
    let label = match exception.exception_type {
        ExceptionType::Period => "Fermeture",
        ExceptionType::SingleDay => "Jour fermé",
        ExceptionType::Service => "Service fermé",
        ExceptionType::TimeSlots => "Créneaux fermés",
    };
    match exception.reason.as_deref().filter(|r| !r.trim().is_empty()) {
        Some(reason) => format!("{label} : {reason}"),
        None => label.to_string(),
    }
}

/// Whether `exception` applies to the `YYYY-MM-DD` string `day`
///
/// Zero-padded ISO dates compare correctly as strings.
fn applies_on(exception: &BookingException, day: &str) -> bool {
    match exception.exception_type {
        ExceptionType::Period => match (&exception.start_date, &exception.end_date) {
            (Some(start), Some(end)) => start.as_str() <= day && day <= end.as_str(),
            _ => false,
        },
        ExceptionType::SingleDay | ExceptionType::Service | ExceptionType::TimeSlots => {
            exception.date.as_deref() == Some(day)
        }
    }
}

/// Every exception touching `date`, whatever its status
pub fn exceptions_for_date(exceptions: &[BookingException], date: NaiveDate) -> Vec<&BookingException> {
    let day = date.format(DATE_FORMAT).to_string();
    exceptions.iter().filter(|e| applies_on(e, &day)).collect()
}

/// One calendar event per exception
///
/// Exceptions missing their date fields are skipped. Period events end one
/// day after `end_date` (exclusive end).
pub fn exception_calendar_events(exceptions: &[BookingException]) -> Vec<CalendarEvent> {
    exceptions
        .iter()
        .filter_map(|exception| {
            let (start, end) = match exception.exception_type {
                ExceptionType::Period => {
                    let start = exception.start_date.as_deref()?;
                    let end = NaiveDate::parse_from_str(exception.end_date.as_deref()?, DATE_FORMAT)
                        .ok()?;
                    let end = end.checked_add_days(Days::new(1))?;
                    (start.to_string(), end.format(DATE_FORMAT).to_string())
                }
                _ => {
                    let date = exception.date.clone()?;
                    (date.clone(), date)
                }
            };
            Some(CalendarEvent {
                id: format!("exception-{}", exception.id),
                title: exception_title(exception),
                start,
                end,
                all_day: true,
                color: exception_color(exception.exception_type).to_string(),
                extended_props: json!({
                    "exceptionId": exception.id,
                    "exceptionType": exception.exception_type,
                    "bookingSlotId": exception.booking_slot_id,
                    "closedSlots": exception.closed_slots,
                    "reason": exception.reason,
                    "status": exception.status,
                }),
            })
        })
        .collect()
}

/// One 15-minute step of a booking slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeSlot {
    pub slot_number: u8,
    /// HH:MM
    pub time: String,
}

/// Quantize a booking slot into 15-minute steps, `[start, end)`
///
/// Unparseable times yield no step.
pub fn generate_time_slots_from_booking_slot(slot: &BookingSlot) -> Vec<TimeSlot> {
    let (Some(start), Some(end)) = (try_parse_time(&slot.start_time), try_parse_time(&slot.end_time))
    else {
        return Vec::new();
    };
    let (start, end) = (minutes_of_day(start), minutes_of_day(end));

    (start..end)
        .step_by(SLOT_MINUTES as usize)
        .filter_map(|minutes| NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0))
        .map(|time| TimeSlot {
            slot_number: slot_number(time),
            time: format_hm(time),
        })
        .collect()
}

/// Symmetric difference of the edited set with `{slot}`
///
/// The result is sorted and free of duplicates.
pub fn toggle_slot(slots: &[u8], slot: u8) -> Vec<u8> {
    let mut set: BTreeSet<u8> = slots.iter().copied().collect();
    if !set.remove(&slot) {
        set.insert(slot);
    }
    set.into_iter().collect()
}

/// What committing an edited `time_slots` exception does
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotEdit {
    /// No slot left, the exception goes away
    Delete,
    Update(Vec<u8>),
}

pub fn commit_time_slot_edit(slots: &[u8]) -> SlotEdit {
    if slots.is_empty() {
        return SlotEdit::Delete;
    }
    let set: BTreeSet<u8> = slots.iter().copied().collect();
    SlotEdit::Update(set.into_iter().collect())
}

/// Closures in force on one day, folded from the active exceptions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayClosures {
    /// `period` or `single_day` covers the day
    pub whole_day: bool,
    /// Services closed by a `service` exception
    pub closed_services: HashSet<i64>,
    /// Slot numbers closed per service by `time_slots` exceptions
    pub closed_slots: HashMap<i64, HashSet<u8>>,
}

impl DayClosures {
    pub fn resolve(exceptions: &[BookingException], date: NaiveDate) -> Self {
        let mut closures = Self::default();
        for exception in exceptions_for_date(exceptions, date) {
            if exception.status != ExceptionStatus::Active {
                continue;
            }
            match (exception.exception_type, exception.booking_slot_id) {
                (ExceptionType::Period | ExceptionType::SingleDay, _) => closures.whole_day = true,
                (ExceptionType::Service, Some(service)) => {
                    closures.closed_services.insert(service);
                }
                (ExceptionType::TimeSlots, Some(service)) => {
                    closures
                        .closed_slots
                        .entry(service)
                        .or_default()
                        .extend(exception.closed_slots.iter().copied());
                }
                // service-level exception without its service
                _ => {}
            }
        }
        closures
    }

    pub fn is_service_closed(&self, booking_slot_id: i64) -> bool {
        self.whole_day || self.closed_services.contains(&booking_slot_id)
    }

    pub fn is_closed(&self, booking_slot_id: i64, slot_number: u8) -> bool {
        self.is_service_closed(booking_slot_id)
            || self
                .closed_slots
                .get(&booking_slot_id)
                .is_some_and(|slots| slots.contains(&slot_number))
    }
}
