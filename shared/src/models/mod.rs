//! Data models
//!
//! Shared between resto-server and the frontends (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).

pub mod booking;
pub mod booking_exception;
pub mod booking_slot;
pub mod establishment;
pub mod menu;
pub mod opening_hour;
pub mod product;
pub mod stock;
pub mod weekday;

// Re-exports
pub use booking::*;
pub use booking_exception::*;
pub use booking_slot::*;
pub use establishment::*;
pub use menu::*;
pub use opening_hour::*;
pub use product::*;
pub use stock::*;
