//! 公开预订接口
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/booking/create | POST | 创建预订，返回确认令牌 |
//! | /api/booking/verify-token | POST | 校验确认令牌 |
//! | /api/booking/{id}?token= | GET | 凭令牌查询预订 |
//! | /api/booking/{id}/cancel | POST | 凭令牌取消预订 |

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/booking", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/create", post(handler::create))
        .route("/verify-token", post(handler::verify_token))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/cancel", post(handler::cancel))
}
