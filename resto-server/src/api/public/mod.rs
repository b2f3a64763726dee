//! 公开门店查询
//!
//! 预订页面通过 slug 访问门店，找不到时返回 404 错误体。

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/public/establishments", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/{slug}", get(handler::get_by_slug))
        .route("/{slug}/slots", get(handler::slots))
}
