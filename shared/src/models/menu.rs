//! Menu Model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Menu entity (carte, menu du jour, brunch, ...)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Menu {
    pub id: i64,
    pub establishment_id: i64,
    pub organization_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub is_public: bool,
    pub display_order: i64,
    pub image_url: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create menu payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MenuCreate {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    pub is_active: Option<bool>,
    pub is_public: Option<bool>,
    pub display_order: Option<i64>,
    #[validate(length(max = 2048))]
    pub image_url: Option<String>,
    /// Schedules created together with the menu
    #[serde(default)]
    pub schedules: Vec<MenuScheduleCreate>,
}

/// Update menu payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
    pub is_public: Option<bool>,
    pub display_order: Option<i64>,
    pub image_url: Option<String>,
}

/// Menu schedule (when a menu is served)
///
/// The combination of filled columns decides the kind:
/// - `day_of_week` set: weekly recurrence (ISO 1=Monday..7=Sunday)
/// - `valid_from == valid_until`, no day: a single day
/// - `valid_from != valid_until`, no day: a date range
/// - nothing set: permanent
///
/// `start_time`/`end_time` make any kind timed, otherwise it is all-day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct MenuSchedule {
    pub id: i64,
    pub menu_id: i64,
    pub day_of_week: Option<i64>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    /// YYYY-MM-DD
    pub valid_from: Option<String>,
    /// YYYY-MM-DD
    pub valid_until: Option<String>,
}

/// Create menu schedule payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuScheduleCreate {
    pub day_of_week: Option<i64>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub valid_from: Option<String>,
    pub valid_until: Option<String>,
}

/// Menu with its schedules, as consumed by the calendar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuWithSchedules {
    #[serde(flatten)]
    pub menu: Menu,
    pub schedules: Vec<MenuSchedule>,
}
