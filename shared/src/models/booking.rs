//! Booking Model (public reservations)

use serde::{Deserialize, Serialize};

/// Booking status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
}

/// Booking entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Booking {
    pub id: i64,
    pub establishment_id: i64,
    pub booking_slot_id: Option<i64>,
    /// YYYY-MM-DD
    pub date: String,
    /// HH:MM
    pub slot_time: String,
    pub guests: i64,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub notes: Option<String>,
    pub status: BookingStatus,
    /// Confirmation token handed to the guest
    #[serde(skip_serializing)]
    pub token: String,
    pub created_at: i64,
}

/// Create booking payload (`POST /api/booking/create`)
///
/// Contact fields are checked by the server's booking wizard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingCreate {
    pub establishment_id: i64,
    pub booking_slot_id: Option<i64>,
    pub date: String,
    pub slot_time: String,
    pub guests: i64,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub notes: Option<String>,
}

/// Response of a successful booking creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingCreated {
    pub booking: Booking,
    pub token: String,
}

/// `POST /api/booking/verify-token`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyTokenRequest {
    pub booking_id: i64,
    pub token: String,
}

/// One quantized slot as returned by the availability generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailableSlot {
    /// HH:MM
    pub slot_time: String,
    pub slot_number: u8,
    pub booking_slot_id: i64,
    pub service_name: String,
    pub is_available: bool,
    pub available_capacity: i64,
    pub max_capacity: i64,
}
