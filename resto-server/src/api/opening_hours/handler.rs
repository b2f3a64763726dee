//! Opening Hours API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::message::ChangeKind;
use shared::models::{OpeningHour, OpeningHourCreate, OpeningHourUpdate};

use crate::api::require_establishment;
use crate::core::ServerState;
use crate::db::repository::opening_hour;
use crate::utils::validation::{
    check_opening_hours_overlap, ensure_time_order, validate_sunday_zero_day,
};
use crate::utils::{AppError, AppResult, ErrorCode};

const RESOURCE: &str = "opening_hour";

async fn require_hour(state: &ServerState, establishment_id: i64, id: i64) -> AppResult<OpeningHour> {
    opening_hour::find_by_id(state.pool(), establishment_id, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OpeningHourNotFound).with_detail("id", id))
}

/// 时间顺序 + 同日重叠检查
///
/// 停用的时段不参与重叠检查。
async fn validate_range(
    state: &ServerState,
    establishment_id: i64,
    day_of_week: i64,
    open: &str,
    close: &str,
    is_active: bool,
    exclude_id: Option<i64>,
) -> AppResult<()> {
    validate_sunday_zero_day(day_of_week)?;
    ensure_time_order(open, close)?;
    if !is_active {
        return Ok(());
    }
    let siblings = opening_hour::find_active_by_day(state.pool(), establishment_id, day_of_week).await?;
    check_opening_hours_overlap(day_of_week, open, close, &siblings, exclude_id)
}

/// GET /api/establishments/:eid/opening-hours - 获取所有营业时间
pub async fn list(
    State(state): State<ServerState>,
    Path(establishment_id): Path<i64>,
) -> AppResult<Json<Vec<OpeningHour>>> {
    let hours = opening_hour::find_all(state.pool(), establishment_id).await?;
    Ok(Json(hours))
}

/// GET /api/establishments/:eid/opening-hours/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path((establishment_id, id)): Path<(i64, i64)>,
) -> AppResult<Json<OpeningHour>> {
    Ok(Json(require_hour(&state, establishment_id, id).await?))
}

/// POST /api/establishments/:eid/opening-hours - 创建营业时间
pub async fn create(
    State(state): State<ServerState>,
    Path(establishment_id): Path<i64>,
    Json(payload): Json<OpeningHourCreate>,
) -> AppResult<Json<OpeningHour>> {
    require_establishment(state.pool(), establishment_id).await?;
    validate_range(
        &state,
        establishment_id,
        payload.day_of_week,
        &payload.open_time,
        &payload.close_time,
        payload.is_active.unwrap_or(true),
        None,
    )
    .await?;

    let created = opening_hour::create(state.pool(), establishment_id, &payload).await?;
    state.broadcast_change(RESOURCE, ChangeKind::Insert, None, Some(&created));
    Ok(Json(created))
}

/// PUT /api/establishments/:eid/opening-hours/:id - 更新营业时间
pub async fn update(
    State(state): State<ServerState>,
    Path((establishment_id, id)): Path<(i64, i64)>,
    Json(payload): Json<OpeningHourUpdate>,
) -> AppResult<Json<OpeningHour>> {
    let old = require_hour(&state, establishment_id, id).await?;

    // 合并后的结果参与校验
    let day_of_week = payload.day_of_week.unwrap_or(old.day_of_week);
    let open = payload.open_time.as_deref().unwrap_or(&old.open_time);
    let close = payload.close_time.as_deref().unwrap_or(&old.close_time);
    let is_active = payload.is_active.unwrap_or(old.is_active);
    validate_range(&state, establishment_id, day_of_week, open, close, is_active, Some(id)).await?;

    let updated = opening_hour::update(state.pool(), establishment_id, id, &payload).await?;
    state.broadcast_change(RESOURCE, ChangeKind::Update, Some(&old), Some(&updated));
    Ok(Json(updated))
}

/// DELETE /api/establishments/:eid/opening-hours/:id - 删除营业时间 (软删除)
pub async fn delete(
    State(state): State<ServerState>,
    Path((establishment_id, id)): Path<(i64, i64)>,
) -> AppResult<Json<bool>> {
    let old = require_hour(&state, establishment_id, id).await?;
    let result = opening_hour::delete(state.pool(), establishment_id, id).await?;
    if result {
        state.broadcast_change(RESOURCE, ChangeKind::Delete, Some(&old), None);
    }
    Ok(Json(result))
}
