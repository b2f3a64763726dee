//! Unified error codes
//!
//! Error codes are shared between resto-server and the dashboard/booking
//! frontends. They are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Establishment errors
//! - 2xxx: Menu errors
//! - 3xxx: Catalog errors (products, stock)
//! - 4xxx: Opening hours errors
//! - 5xxx: Booking errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Establishment ====================
    /// Establishment not found (id or slug lookup)
    EstablishmentNotFound = 1001,
    /// Establishment slug already taken
    EstablishmentSlugExists = 1002,
    /// Public booking disabled for this establishment
    BookingDisabled = 1003,

    // ==================== 2xxx: Menu ====================
    /// Menu not found
    MenuNotFound = 2001,
    /// Menu schedule not found
    MenuScheduleNotFound = 2002,
    /// Menu schedule fields do not describe a known schedule kind
    MenuScheduleInvalid = 2003,

    // ==================== 3xxx: Catalog ====================
    /// Product not found
    ProductNotFound = 3001,
    /// Product has invalid price
    ProductInvalidPrice = 3002,
    /// Stock entry not found
    StockNotFound = 3101,
    /// Stock quantity is invalid
    StockInvalidQuantity = 3102,

    // ==================== 4xxx: Opening hours ====================
    /// Opening hour not found
    OpeningHourNotFound = 4001,
    /// Opening hour overlaps another range of the same day
    OpeningHoursOverlap = 4002,
    /// Closing time is not after opening time
    TimeOrderInvalid = 4003,

    // ==================== 5xxx: Booking ====================
    /// Booking not found
    BookingNotFound = 5001,
    /// Booking slot (service) not found
    BookingSlotNotFound = 5002,
    /// Not enough remaining capacity for the requested party
    SlotFull = 5003,
    /// Slot is closed by a booking exception
    SlotClosed = 5004,
    /// Booking token does not match
    BookingTokenInvalid = 5005,
    /// Booking date lies in the past
    BookingDateInPast = 5006,
    /// Booking exception not found
    BookingExceptionNotFound = 5101,
    /// Booking exception is missing its type-dependent fields
    BookingExceptionInvalid = 5102,
    /// Slot number outside [0, 96)
    SlotNumberOutOfRange = 5103,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Operation timeout
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
    /// Realtime channel closed or lagging
    RealtimeUnavailable = 9101,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Establishment
            ErrorCode::EstablishmentNotFound => "Establishment not found",
            ErrorCode::EstablishmentSlugExists => "Establishment slug already exists",
            ErrorCode::BookingDisabled => "Online booking is disabled for this establishment",

            // Menu
            ErrorCode::MenuNotFound => "Menu not found",
            ErrorCode::MenuScheduleNotFound => "Menu schedule not found",
            ErrorCode::MenuScheduleInvalid => "Menu schedule is invalid",

            // Catalog
            ErrorCode::ProductNotFound => "Product not found",
            ErrorCode::ProductInvalidPrice => "Product has invalid price",
            ErrorCode::StockNotFound => "Stock entry not found",
            ErrorCode::StockInvalidQuantity => "Stock quantity is invalid",

            // Opening hours
            ErrorCode::OpeningHourNotFound => "Opening hour not found",
            ErrorCode::OpeningHoursOverlap => "Opening hours overlap for this day",
            ErrorCode::TimeOrderInvalid => "Closing time must be after opening time",

            // Booking
            ErrorCode::BookingNotFound => "Booking not found",
            ErrorCode::BookingSlotNotFound => "Booking slot not found",
            ErrorCode::SlotFull => "Not enough capacity left for this slot",
            ErrorCode::SlotClosed => "This slot is closed",
            ErrorCode::BookingTokenInvalid => "Booking token is invalid",
            ErrorCode::BookingDateInPast => "Booking date is in the past",
            ErrorCode::BookingExceptionNotFound => "Booking exception not found",
            ErrorCode::BookingExceptionInvalid => "Booking exception is invalid",
            ErrorCode::SlotNumberOutOfRange => "Slot number is out of range",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::RealtimeUnavailable => "Realtime channel unavailable",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Establishment
            1001 => Ok(ErrorCode::EstablishmentNotFound),
            1002 => Ok(ErrorCode::EstablishmentSlugExists),
            1003 => Ok(ErrorCode::BookingDisabled),

            // Menu
            2001 => Ok(ErrorCode::MenuNotFound),
            2002 => Ok(ErrorCode::MenuScheduleNotFound),
            2003 => Ok(ErrorCode::MenuScheduleInvalid),

            // Catalog
            3001 => Ok(ErrorCode::ProductNotFound),
            3002 => Ok(ErrorCode::ProductInvalidPrice),
            3101 => Ok(ErrorCode::StockNotFound),
            3102 => Ok(ErrorCode::StockInvalidQuantity),

            // Opening hours
            4001 => Ok(ErrorCode::OpeningHourNotFound),
            4002 => Ok(ErrorCode::OpeningHoursOverlap),
            4003 => Ok(ErrorCode::TimeOrderInvalid),

            // Booking
            5001 => Ok(ErrorCode::BookingNotFound),
            5002 => Ok(ErrorCode::BookingSlotNotFound),
            5003 => Ok(ErrorCode::SlotFull),
            5004 => Ok(ErrorCode::SlotClosed),
            5005 => Ok(ErrorCode::BookingTokenInvalid),
            5006 => Ok(ErrorCode::BookingDateInPast),
            5101 => Ok(ErrorCode::BookingExceptionNotFound),
            5102 => Ok(ErrorCode::BookingExceptionInvalid),
            5103 => Ok(ErrorCode::SlotNumberOutOfRange),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),
            9101 => Ok(ErrorCode::RealtimeUnavailable),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::EstablishmentNotFound.code(), 1001);
        assert_eq!(ErrorCode::MenuNotFound.code(), 2001);
        assert_eq!(ErrorCode::ProductNotFound.code(), 3001);
        assert_eq!(ErrorCode::OpeningHoursOverlap.code(), 4002);
        assert_eq!(ErrorCode::SlotFull.code(), 5003);
        assert_eq!(ErrorCode::SlotNumberOutOfRange.code(), 5103);
        assert_eq!(ErrorCode::DatabaseError.code(), 9002);
    }

    #[test]
    fn test_try_from_u16() {
        assert_eq!(ErrorCode::try_from(5003), Ok(ErrorCode::SlotFull));
        assert_eq!(ErrorCode::try_from(4003), Ok(ErrorCode::TimeOrderInvalid));
        assert_eq!(ErrorCode::try_from(4242), Err(InvalidErrorCode(4242)));
    }

    #[test]
    fn test_serde_as_number() {
        let json = serde_json::to_string(&ErrorCode::BookingNotFound).unwrap();
        assert_eq!(json, "5001");

        let code: ErrorCode = serde_json::from_str("2002").unwrap();
        assert_eq!(code, ErrorCode::MenuScheduleNotFound);

        assert!(serde_json::from_str::<ErrorCode>("7777").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(ErrorCode::SlotClosed.to_string(), "5004");
    }
}
