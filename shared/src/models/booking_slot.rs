//! Booking Slot Model (services: lunch, dinner, ...)

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::weekday;

/// Booking slot entity
///
/// A weekly service window during which guests can book, quantized into
/// 15-minute slots by the availability generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct BookingSlot {
    pub id: i64,
    pub establishment_id: i64,
    /// ISO day number (1=Monday..7=Sunday)
    pub day_of_week: i64,
    /// HH:MM or HH:MM:SS
    pub start_time: String,
    /// HH:MM or HH:MM:SS (exclusive)
    pub end_time: String,
    pub slot_name: String,
    /// Guests per 15-minute slot
    pub max_capacity: i64,
    pub is_active: bool,
    /// YYYY-MM-DD
    pub valid_from: Option<String>,
    /// YYYY-MM-DD
    pub valid_until: Option<String>,
    #[serde(default)]
    pub deleted: bool,
}

impl BookingSlot {
    pub fn weekday(&self) -> Option<Weekday> {
        weekday::from_iso(self.day_of_week)
    }

    /// Whether the optional validity window contains `date`
    ///
    /// Unparseable bounds are treated as absent.
    pub fn is_valid_on(&self, date: NaiveDate) -> bool {
        let parse = |s: &Option<String>| {
            s.as_deref()
                .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        };
        let after_start = parse(&self.valid_from).is_none_or(|from| date >= from);
        let before_end = parse(&self.valid_until).is_none_or(|until| date <= until);
        after_start && before_end
    }
}

/// Create booking slot payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BookingSlotCreate {
    #[validate(range(min = 1, max = 7))]
    pub day_of_week: i64,
    pub start_time: String,
    pub end_time: String,
    #[validate(length(min = 1, max = 200))]
    pub slot_name: String,
    #[validate(range(min = 1))]
    pub max_capacity: i64,
    pub is_active: Option<bool>,
    pub valid_from: Option<String>,
    pub valid_until: Option<String>,
}

/// Update booking slot payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingSlotUpdate {
    pub day_of_week: Option<i64>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub slot_name: Option<String>,
    pub max_capacity: Option<i64>,
    pub is_active: Option<bool>,
    pub valid_from: Option<String>,
    pub valid_until: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(valid_from: Option<&str>, valid_until: Option<&str>) -> BookingSlot {
        BookingSlot {
            id: 1,
            establishment_id: 1,
            day_of_week: 7,
            start_time: "12:00".into(),
            end_time: "14:00".into(),
            slot_name: "Déjeuner".into(),
            max_capacity: 20,
            is_active: true,
            valid_from: valid_from.map(Into::into),
            valid_until: valid_until.map(Into::into),
            deleted: false,
        }
    }

    #[test]
    fn test_weekday_uses_iso() {
        assert_eq!(slot(None, None).weekday(), Some(Weekday::Sun));
    }

    #[test]
    fn test_validity_window_is_inclusive() {
        let s = slot(Some("2024-03-01"), Some("2024-03-31"));
        let d = |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap();
        assert!(s.is_valid_on(d("2024-03-01")));
        assert!(s.is_valid_on(d("2024-03-31")));
        assert!(!s.is_valid_on(d("2024-04-01")));
        assert!(!s.is_valid_on(d("2024-02-29")));
    }

    #[test]
    fn test_open_ended_window() {
        let s = slot(None, Some("2024-03-31"));
        assert!(s.is_valid_on(NaiveDate::from_ymd_opt(2000, 1, 1).unwrap()));
    }
}
