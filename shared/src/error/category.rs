//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// Categories are determined by the leading digit of the error code:
/// - 0xxx: General errors
/// - 1xxx: Establishment errors
/// - 2xxx: Menu errors
/// - 3xxx: Catalog errors
/// - 4xxx: Opening hours errors
/// - 5xxx: Booking errors
/// - 9xxx: System errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Establishment errors (1xxx)
    Establishment,
    /// Menu errors (2xxx)
    Menu,
    /// Catalog errors (3xxx)
    Catalog,
    /// Opening hours errors (4xxx)
    OpeningHours,
    /// Booking errors (5xxx)
    Booking,
    /// System errors (9xxx)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            1000..2000 => Self::Establishment,
            2000..3000 => Self::Menu,
            3000..4000 => Self::Catalog,
            4000..5000 => Self::OpeningHours,
            5000..6000 => Self::Booking,
            _ => Self::System,
        }
    }

    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Establishment => "establishment",
            Self::Menu => "menu",
            Self::Catalog => "catalog",
            Self::OpeningHours => "opening_hours",
            Self::Booking => "booking",
            Self::System => "system",
        }
    }
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_code() {
        assert_eq!(ErrorCategory::from_code(0), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(999), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(1001), ErrorCategory::Establishment);
        assert_eq!(ErrorCategory::from_code(2003), ErrorCategory::Menu);
        assert_eq!(ErrorCategory::from_code(3101), ErrorCategory::Catalog);
        assert_eq!(ErrorCategory::from_code(4002), ErrorCategory::OpeningHours);
        assert_eq!(ErrorCategory::from_code(5103), ErrorCategory::Booking);
        assert_eq!(ErrorCategory::from_code(9001), ErrorCategory::System);
        assert_eq!(ErrorCategory::from_code(10000), ErrorCategory::System);
    }

    #[test]
    fn test_error_code_category() {
        assert_eq!(ErrorCode::SlotFull.category(), ErrorCategory::Booking);
        assert_eq!(ErrorCode::MenuNotFound.category(), ErrorCategory::Menu);
        assert_eq!(ErrorCode::DatabaseError.category(), ErrorCategory::System);
    }

    #[test]
    fn test_category_serialize() {
        let json = serde_json::to_string(&ErrorCategory::OpeningHours).unwrap();
        assert_eq!(json, "\"opening_hours\"");

        let category: ErrorCategory = serde_json::from_str("\"booking\"").unwrap();
        assert_eq!(category, ErrorCategory::Booking);
    }
}
