//! Input validation helpers
//!
//! Centralized text length constants and validation functions shared by
//! every CRUD handler. Time-range rules (ordering, same-day overlap) live
//! here once so that opening hours and booking slots agree on them.

use chrono::Timelike;
use shared::error::ErrorCode;
use shared::models::{BookingExceptionCreate, ExceptionType, OpeningHour};
use validator::Validate;

use super::time::{format_hm, minutes_of_day, parse_date, parse_time};
use crate::booking::exceptions::SLOT_MINUTES;
use crate::utils::{AppError, AppResult};

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: menu, product, stock, booking slot, customer, etc.
pub const MAX_NAME_LEN: usize = 200;

/// Notes, descriptions, reasons (exception reason, booking note, etc.)
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: phone, slug, unit, category, etc.
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// URLs / image paths
pub const MAX_URL_LEN: usize = 2048;

/// Number of 15-minute slots in a day
pub const SLOTS_PER_DAY: u8 = 96;

// ── Validation helpers (CRUD handlers) ──────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Run `validator` derive rules, flattening field errors into details
pub fn validate_payload<T: Validate>(payload: &T) -> AppResult<()> {
    payload.validate().map_err(|errors| {
        let mut err = AppError::validation("Validation failed");
        for (field, field_errors) in errors.field_errors() {
            let codes: Vec<String> = field_errors.iter().map(|e| e.code.to_string()).collect();
            err = err.with_detail(field.to_string(), codes.join(","));
        }
        err
    })
}

// ── Numeric checks ──────────────────────────────────────────────────

pub fn validate_price(price: f64) -> AppResult<()> {
    if !price.is_finite() || price < 0.0 {
        return Err(AppError::new(ErrorCode::ProductInvalidPrice).with_detail("price", price));
    }
    Ok(())
}

pub fn validate_quantity(quantity: f64) -> AppResult<()> {
    if !quantity.is_finite() || quantity < 0.0 {
        return Err(
            AppError::new(ErrorCode::StockInvalidQuantity).with_detail("quantity", quantity)
        );
    }
    Ok(())
}

pub fn validate_capacity(capacity: i64) -> AppResult<()> {
    if capacity < 1 {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            "max_capacity must be at least 1",
        ));
    }
    Ok(())
}

/// ISO day number (1=Monday..7=Sunday)
pub fn validate_iso_day(day: i64) -> AppResult<()> {
    if !(1..=7).contains(&day) {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("day_of_week must be between 1 and 7, got {day}"),
        ));
    }
    Ok(())
}

/// Sunday-zero day number (0=Sunday..6=Saturday)
pub fn validate_sunday_zero_day(day: i64) -> AppResult<()> {
    if !(0..=6).contains(&day) {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("day_of_week must be between 0 and 6, got {day}"),
        ));
    }
    Ok(())
}

// ── Time ranges ─────────────────────────────────────────────────────

/// Half-open ranges `[a, b)` and `[c, d)` intersect
pub fn ranges_overlap<T: PartialOrd>(a: T, b: T, c: T, d: T) -> bool {
    a < d && b > c
}

/// The closing time must be strictly after the opening time
pub fn ensure_time_order(open: &str, close: &str) -> AppResult<()> {
    let open = parse_time(open)?;
    let close = parse_time(close)?;
    if close <= open {
        return Err(AppError::time_order());
    }
    Ok(())
}

/// Service bounds sit on the 15-minute grid; returns the `HH:MM` form
pub fn normalize_slot_time(time: &str, field: &str) -> AppResult<String> {
    let parsed = parse_time(time)?;
    if minutes_of_day(parsed) % SLOT_MINUTES != 0 || parsed.second() != 0 {
        return Err(AppError::validation(format!("{field} must fall on a quarter hour"))
            .with_detail("field", field.to_string())
            .with_detail("value", time.to_string()));
    }
    Ok(format_hm(parsed))
}

/// Check a candidate opening-hour range against the other ranges of its day
///
/// Only active, non-deleted siblings of the same `day_of_week` take part;
/// `exclude_id` is the record being updated.
pub fn check_opening_hours_overlap(
    day_of_week: i64,
    open: &str,
    close: &str,
    siblings: &[OpeningHour],
    exclude_id: Option<i64>,
) -> AppResult<()> {
    let start = minutes_of_day(parse_time(open)?);
    let end = minutes_of_day(parse_time(close)?);

    for other in siblings {
        if other.day_of_week != day_of_week
            || !other.is_active
            || other.deleted
            || Some(other.id) == exclude_id
        {
            continue;
        }
        // Malformed siblings never block a write
        let (Ok(o_start), Ok(o_end)) = (parse_time(&other.open_time), parse_time(&other.close_time))
        else {
            continue;
        };
        if ranges_overlap(start, end, minutes_of_day(o_start), minutes_of_day(o_end)) {
            return Err(AppError::new(ErrorCode::OpeningHoursOverlap)
                .with_detail("conflicting_id", other.id)
                .with_detail("open_time", other.open_time.clone())
                .with_detail("close_time", other.close_time.clone()));
        }
    }
    Ok(())
}

// ── Booking exceptions ──────────────────────────────────────────────

pub fn validate_slot_number(slot_number: u8) -> AppResult<()> {
    if slot_number >= SLOTS_PER_DAY {
        return Err(AppError::new(ErrorCode::SlotNumberOutOfRange)
            .with_detail("slot_number", slot_number));
    }
    Ok(())
}

pub fn validate_closed_slots(slots: &[u8]) -> AppResult<()> {
    slots.iter().try_for_each(|n| validate_slot_number(*n))
}

/// Type-dependent field presence of a booking exception
///
/// - `period`: `start_date` and `end_date`, with `start_date <= end_date`
/// - `single_day`: `date`
/// - `service`: `date` and `booking_slot_id`
/// - `time_slots`: `date`, `booking_slot_id` and at least one slot
pub fn validate_exception_fields(data: &BookingExceptionCreate) -> AppResult<()> {
    let missing = |field: &str| {
        AppError::with_message(
            ErrorCode::BookingExceptionInvalid,
            format!("{field} is required for {} exceptions", data.exception_type.as_str()),
        )
        .with_detail("field", field)
    };

    match data.exception_type {
        ExceptionType::Period => {
            let start = data.start_date.as_deref().ok_or_else(|| missing("start_date"))?;
            let end = data.end_date.as_deref().ok_or_else(|| missing("end_date"))?;
            if parse_date(start)? > parse_date(end)? {
                return Err(AppError::with_message(
                    ErrorCode::BookingExceptionInvalid,
                    "start_date must not be after end_date",
                ));
            }
        }
        ExceptionType::SingleDay => {
            parse_date(data.date.as_deref().ok_or_else(|| missing("date"))?)?;
        }
        ExceptionType::Service => {
            parse_date(data.date.as_deref().ok_or_else(|| missing("date"))?)?;
            data.booking_slot_id.ok_or_else(|| missing("booking_slot_id"))?;
        }
        ExceptionType::TimeSlots => {
            parse_date(data.date.as_deref().ok_or_else(|| missing("date"))?)?;
            data.booking_slot_id.ok_or_else(|| missing("booking_slot_id"))?;
            if data.closed_slots.is_empty() {
                return Err(missing("closed_slots"));
            }
            validate_closed_slots(&data.closed_slots)?;
        }
    }
    validate_optional_text(&data.reason, "reason", MAX_NOTE_LEN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hour(id: i64, day: i64, open: &str, close: &str) -> OpeningHour {
        OpeningHour {
            id,
            establishment_id: 1,
            day_of_week: day,
            open_time: open.into(),
            close_time: close.into(),
            is_active: true,
            deleted: false,
        }
    }

    fn exception(exception_type: ExceptionType) -> BookingExceptionCreate {
        BookingExceptionCreate {
            exception_type,
            start_date: None,
            end_date: None,
            date: None,
            booking_slot_id: None,
            closed_slots: vec![],
            reason: None,
            status: None,
        }
    }

    #[test]
    fn test_ranges_overlap() {
        // [09:00,12:00) vs [11:00,14:00)
        assert!(ranges_overlap(540, 720, 660, 840));
        // [09:00,12:00) vs [12:00,15:00) touch only
        assert!(!ranges_overlap(540, 720, 720, 900));
        // containment
        assert!(ranges_overlap(540, 900, 600, 660));
    }

    #[test]
    fn test_ensure_time_order() {
        assert!(ensure_time_order("09:00", "12:00").is_ok());
        let err = ensure_time_order("12:00", "12:00").unwrap_err();
        assert_eq!(err.code, ErrorCode::TimeOrderInvalid);
        assert!(err.message.contains("heure de fermeture doit être après l'heure d'ouverture"));
        assert!(ensure_time_order("22:00", "18:00").is_err());
    }

    #[test]
    fn test_opening_hours_overlap_same_day() {
        let siblings = vec![hour(1, 1, "09:00", "12:00")];
        let err = check_opening_hours_overlap(1, "11:00", "14:00", &siblings, None).unwrap_err();
        assert_eq!(err.code, ErrorCode::OpeningHoursOverlap);
        assert!(check_opening_hours_overlap(1, "12:00", "15:00", &siblings, None).is_ok());
    }

    #[test]
    fn test_opening_hours_overlap_ignores_other_days_and_self() {
        let mut inactive = hour(2, 1, "10:00", "11:00");
        inactive.is_active = false;
        let siblings = vec![hour(1, 1, "09:00", "12:00"), hour(3, 2, "09:00", "12:00"), inactive];
        // same record being updated
        assert!(check_opening_hours_overlap(1, "09:30", "12:30", &siblings, Some(1)).is_ok());
        // different day
        assert!(check_opening_hours_overlap(0, "09:00", "12:00", &siblings, None).is_ok());
    }

    #[test]
    fn test_slot_number_range() {
        assert!(validate_slot_number(0).is_ok());
        assert!(validate_slot_number(95).is_ok());
        assert_eq!(
            validate_slot_number(96).unwrap_err().code,
            ErrorCode::SlotNumberOutOfRange
        );
        assert!(validate_closed_slots(&[36, 37, 120]).is_err());
    }

    #[test]
    fn test_exception_fields_by_type() {
        let mut period = exception(ExceptionType::Period);
        assert!(validate_exception_fields(&period).is_err());
        period.start_date = Some("2024-08-01".into());
        period.end_date = Some("2024-08-15".into());
        assert!(validate_exception_fields(&period).is_ok());
        period.end_date = Some("2024-07-15".into());
        assert!(validate_exception_fields(&period).is_err());

        let mut service = exception(ExceptionType::Service);
        service.date = Some("2024-03-04".into());
        assert_eq!(
            validate_exception_fields(&service).unwrap_err().code,
            ErrorCode::BookingExceptionInvalid
        );
        service.booking_slot_id = Some(3);
        assert!(validate_exception_fields(&service).is_ok());

        let mut slots = exception(ExceptionType::TimeSlots);
        slots.date = Some("2024-03-04".into());
        slots.booking_slot_id = Some(3);
        assert!(validate_exception_fields(&slots).is_err());
        slots.closed_slots = vec![40];
        assert!(validate_exception_fields(&slots).is_ok());
    }

    #[test]
    fn test_validate_required_text() {
        assert!(validate_required_text("Carte", "name", MAX_NAME_LEN).is_ok());
        assert!(validate_required_text("   ", "name", MAX_NAME_LEN).is_err());
        assert!(validate_required_text(&"x".repeat(201), "name", MAX_NAME_LEN).is_err());
    }

    #[test]
    fn test_numeric_checks() {
        assert!(validate_price(0.0).is_ok());
        assert_eq!(
            validate_price(-1.0).unwrap_err().code,
            ErrorCode::ProductInvalidPrice
        );
        assert!(validate_quantity(f64::NAN).is_err());
        assert!(validate_capacity(0).is_err());
        assert!(validate_iso_day(7).is_ok());
        assert!(validate_iso_day(0).is_err());
        assert!(validate_sunday_zero_day(0).is_ok());
        assert!(validate_sunday_zero_day(7).is_err());
    }

    #[test]
    fn test_normalize_slot_time() {
        assert_eq!(normalize_slot_time("12:00:00", "start_time").unwrap(), "12:00");
        assert_eq!(normalize_slot_time("9:45", "start_time").unwrap(), "09:45");
        let err = normalize_slot_time("12:10", "start_time").unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert!(normalize_slot_time("12:15:30", "end_time").is_err());
    }
}
