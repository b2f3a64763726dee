//! Opening Hour Model

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use super::weekday;

/// Opening hour entity
///
/// Several ranges may exist for one day (lunch + dinner) as long as they do
/// not overlap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OpeningHour {
    pub id: i64,
    pub establishment_id: i64,
    /// 0=Sunday..6=Saturday
    pub day_of_week: i64,
    pub open_time: String,
    pub close_time: String,
    pub is_active: bool,
    #[serde(default)]
    pub deleted: bool,
}

impl OpeningHour {
    pub fn weekday(&self) -> Option<Weekday> {
        weekday::from_sunday_zero(self.day_of_week)
    }
}

/// Create opening hour payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpeningHourCreate {
    pub day_of_week: i64,
    pub open_time: String,
    pub close_time: String,
    pub is_active: Option<bool>,
}

/// Update opening hour payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpeningHourUpdate {
    pub day_of_week: Option<i64>,
    pub open_time: Option<String>,
    pub close_time: Option<String>,
    pub is_active: Option<bool>,
}
