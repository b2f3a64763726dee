//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::EstablishmentNotFound
            | Self::MenuNotFound
            | Self::MenuScheduleNotFound
            | Self::ProductNotFound
            | Self::StockNotFound
            | Self::OpeningHourNotFound
            | Self::BookingNotFound
            | Self::BookingSlotNotFound
            | Self::BookingExceptionNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists
            | Self::EstablishmentSlugExists
            | Self::OpeningHoursOverlap
            | Self::SlotFull
            | Self::SlotClosed => StatusCode::CONFLICT,

            // 401 Unauthorized
            Self::BookingTokenInvalid => StatusCode::UNAUTHORIZED,

            // 403 Forbidden
            Self::BookingDisabled => StatusCode::FORBIDDEN,

            // 503 Service Unavailable (transient errors, client can retry)
            Self::TimeoutError | Self::RealtimeUnavailable => StatusCode::SERVICE_UNAVAILABLE,

            // 500 Internal Server Error
            Self::InternalError | Self::DatabaseError | Self::ConfigError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }

            // 400 Bad Request (default for validation errors)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_status() {
        assert_eq!(ErrorCode::NotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::MenuNotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ErrorCode::EstablishmentNotFound.http_status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_conflict_status() {
        assert_eq!(ErrorCode::SlotFull.http_status(), StatusCode::CONFLICT);
        assert_eq!(
            ErrorCode::OpeningHoursOverlap.http_status(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_bad_request_default() {
        assert_eq!(
            ErrorCode::TimeOrderInvalid.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::SlotNumberOutOfRange.http_status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_internal_error_status() {
        assert_eq!(
            ErrorCode::DatabaseError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
