//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`establishments`] - 组织与门店管理
//! - [`menus`] - 菜单、菜单排期与日历
//! - [`products`] - 商品管理
//! - [`stocks`] - 库存管理
//! - [`opening_hours`] - 营业时间管理
//! - [`booking_slots`] - 预订服务时段管理
//! - [`booking_exceptions`] - 预订例外 (关闭) 管理
//! - [`bookings`] - 预订看板
//! - [`booking`] - 公开预订接口
//! - [`public`] - 公开门店查询
//! - [`realtime`] - 实时变更 WebSocket
//!
//! 门店范围的资源挂在 `/api/establishments/{establishment_id}/...` 下。

pub mod booking;
pub mod booking_exceptions;
pub mod booking_slots;
pub mod bookings;
pub mod establishments;
pub mod health;
pub mod menus;
pub mod opening_hours;
pub mod products;
pub mod public;
pub mod realtime;
pub mod stocks;

use shared::error::ErrorCode;
use shared::models::Establishment;
use sqlx::SqlitePool;

use crate::db::repository::establishment;
use crate::utils::{AppError, AppResult};

// Re-export common types for handlers
pub use crate::utils::ApiResponse;

/// 门店范围路由前缀
pub(crate) fn scoped(resource: &str) -> String {
    format!("/api/establishments/{{establishment_id}}/{resource}")
}

/// 加载门店，不存在时返回 404
pub(crate) async fn require_establishment(
    pool: &SqlitePool,
    establishment_id: i64,
) -> AppResult<Establishment> {
    establishment::find_by_id(pool, establishment_id)
        .await?
        .ok_or_else(|| {
            AppError::new(ErrorCode::EstablishmentNotFound).with_detail("id", establishment_id)
        })
}
