//! Booking Exception API 模块
//!
//! 预订例外：整段关闭、单日关闭、单个服务关闭、部分时间格关闭。

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::api::scoped;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest(&scoped("booking-exceptions"), routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/calendar", get(handler::calendar))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/{id}/toggle-slot", post(handler::toggle_slot))
}
