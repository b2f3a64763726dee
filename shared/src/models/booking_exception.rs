//! Booking Exception Model (closures)

use serde::{Deserialize, Serialize};

/// What a booking exception closes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum ExceptionType {
    /// Whole establishment closed from `start_date` to `end_date` (inclusive)
    Period,
    /// Whole establishment closed on `date`
    SingleDay,
    /// One service (`booking_slot_id`) closed on `date`
    Service,
    /// Some 15-minute slots of one service closed on `date`
    TimeSlots,
}

impl ExceptionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Period => "period",
            Self::SingleDay => "single_day",
            Self::Service => "service",
            Self::TimeSlots => "time_slots",
        }
    }
}

/// Exception status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum ExceptionStatus {
    #[default]
    Active,
    Inactive,
}

/// Booking exception entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct BookingException {
    pub id: i64,
    pub establishment_id: i64,
    pub exception_type: ExceptionType,
    /// Period start (YYYY-MM-DD)
    pub start_date: Option<String>,
    /// Period end (YYYY-MM-DD, inclusive)
    pub end_date: Option<String>,
    /// Day of a single_day / service / time_slots exception (YYYY-MM-DD)
    pub date: Option<String>,
    pub booking_slot_id: Option<i64>,
    /// Slot numbers (minutes since midnight / 15), time_slots only
    #[cfg_attr(feature = "db", sqlx(json))]
    #[serde(default)]
    pub closed_slots: Vec<u8>,
    pub reason: Option<String>,
    pub status: ExceptionStatus,
    pub created_at: i64,
}

/// Create booking exception payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingExceptionCreate {
    pub exception_type: ExceptionType,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub date: Option<String>,
    pub booking_slot_id: Option<i64>,
    #[serde(default)]
    pub closed_slots: Vec<u8>,
    pub reason: Option<String>,
    pub status: Option<ExceptionStatus>,
}

/// Update booking exception payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingExceptionUpdate {
    pub reason: Option<String>,
    pub status: Option<ExceptionStatus>,
    pub closed_slots: Option<Vec<u8>>,
}

/// Toggle one slot of a time_slots exception
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToggleSlotRequest {
    pub slot_number: u8,
}
