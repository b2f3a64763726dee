//! Establishment API 模块

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .nest("/api/organizations", organization_routes())
        .nest("/api/establishments", establishment_routes())
}

fn organization_routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::create_organization))
        .route("/{id}", get(handler::get_organization))
}

fn establishment_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/{establishment_id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
}
