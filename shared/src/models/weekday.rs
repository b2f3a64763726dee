//! Day-of-week conventions
//!
//! Two numbering schemes live in the data:
//!
//! | Entity | Column | Convention |
//! |--------|--------|------------|
//! | `menu_schedule`, `booking_slot` | `day_of_week` | ISO, 1=Monday..7=Sunday |
//! | `opening_hour` | `day_of_week` | 0=Sunday..6=Saturday |
//!
//! Everything inside the server works on [`chrono::Weekday`]. The helpers here
//! are the only places a raw column value becomes a weekday (or the reverse).

use chrono::Weekday;

/// ISO day number (1=Monday..7=Sunday) → weekday
pub fn from_iso(day: i64) -> Option<Weekday> {
    match day {
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        7 => Some(Weekday::Sun),
        _ => None,
    }
}

/// Sunday-zero day number (0=Sunday..6=Saturday) → weekday
pub fn from_sunday_zero(day: i64) -> Option<Weekday> {
    match day {
        0 => Some(Weekday::Sun),
        1..=6 => from_iso(day),
        _ => None,
    }
}

/// Weekday → ISO day number
pub fn to_iso(weekday: Weekday) -> i64 {
    i64::from(weekday.number_from_monday())
}

/// Weekday → Sunday-zero day number
pub fn to_sunday_zero(weekday: Weekday) -> i64 {
    i64::from(weekday.num_days_from_sunday())
}

/// Convert an ISO day number to the Sunday-zero convention (`7 → 0`)
pub fn iso_to_sunday_zero(day: i64) -> Option<i64> {
    from_iso(day).map(to_sunday_zero)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iso_roundtrip_all_days() {
        for day in 1..=7 {
            let weekday = from_iso(day).unwrap();
            assert_eq!(to_iso(weekday), day);
        }
        assert_eq!(from_iso(0), None);
        assert_eq!(from_iso(8), None);
    }

    #[test]
    fn test_sunday_is_seven_in_iso_and_zero_in_sunday_zero() {
        assert_eq!(from_iso(7), Some(Weekday::Sun));
        assert_eq!(from_sunday_zero(0), Some(Weekday::Sun));
        assert_eq!(iso_to_sunday_zero(7), Some(0));
        assert_eq!(iso_to_sunday_zero(1), Some(1));
        assert_eq!(iso_to_sunday_zero(0), None);
    }

    #[test]
    fn test_monday_matches_in_both_conventions() {
        assert_eq!(from_iso(1), from_sunday_zero(1));
        assert_eq!(from_sunday_zero(7), None);
    }
}
