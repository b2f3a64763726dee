//! Shared types for the establishment management stack
//!
//! Common types used by the server and its clients: data models, calendar
//! events, realtime change payloads and the unified error system.

pub mod calendar;
pub mod error;
pub mod message;
pub mod models;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use calendar::CalendarEvent;
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use message::{ChangeEvent, ChangeFilter, ChangeKind};
