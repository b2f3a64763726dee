//! 实时变更 WebSocket
//!
//! GET /api/realtime?table=<table>[&column=<column>&value=<value>]
//!
//! 协议:
//! - Server → Client: `ChangeEvent` JSON (`{table, event_type, new, old, commit_timestamp}`)
//! - 同一 (table, filter) 的连接共享一个订阅频道

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

/// 可订阅的表
pub const REALTIME_TABLES: &[&str] = &[
    "establishment",
    "menu",
    "menu_schedule",
    "product",
    "stock",
    "opening_hour",
    "booking_slot",
    "booking_exception",
    "booking",
];

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/realtime", get(handler::subscribe))
}
