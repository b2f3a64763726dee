//! Booking dashboard API 模块
//!
//! 门店侧查看和处理预订。

mod handler;

use axum::{
    Router,
    routing::{get, put},
};

use crate::api::scoped;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest(&scoped("bookings"), routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/availability", get(handler::availability))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/status", put(handler::update_status))
}
