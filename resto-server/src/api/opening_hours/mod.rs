//! Opening Hours API 模块
//!
//! `day_of_week` 使用 0=周日..6=周六 (与存储一致)。

mod handler;

use axum::{Router, routing::get};

use crate::api::scoped;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest(&scoped("opening-hours"), routes())
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
}
