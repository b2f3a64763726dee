//! Booking Slot API 模块
//!
//! 预订服务时段 (午市、晚市...)，`day_of_week` 使用 ISO 1=周一..7=周日。

mod handler;

use axum::{Router, routing::get};

use crate::api::scoped;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest(&scoped("booking-slots"), routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/{id}/time-slots", get(handler::time_slots))
}
