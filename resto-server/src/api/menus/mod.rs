//! Menu API 模块
//!
//! 菜单 CRUD、排期管理以及菜单日历。

mod handler;

use axum::{
    Router,
    routing::{delete, get},
};

use crate::api::scoped;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest(&scoped("menus"), menu_routes())
}

fn menu_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/calendar", get(handler::calendar))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route(
            "/{id}/schedules",
            get(handler::list_schedules)
                .post(handler::create_schedule)
                .put(handler::replace_schedules),
        )
        .route("/{id}/schedules/{schedule_id}", delete(handler::delete_schedule))
}
