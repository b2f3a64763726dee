//! Calendar event shape consumed by the dashboard calendars

use serde::{Deserialize, Serialize};

/// One displayable calendar event
///
/// `start`/`end` are local ISO strings: `YYYY-MM-DD` for all-day events,
/// `YYYY-MM-DDTHH:MM:SS` for timed ones. `end` is exclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub start: String,
    pub end: String,
    pub all_day: bool,
    pub color: String,
    #[serde(default)]
    pub extended_props: serde_json::Value,
}
