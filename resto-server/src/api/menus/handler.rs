//! Menu API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::message::ChangeKind;
use shared::models::{
    Menu, MenuCreate, MenuSchedule, MenuScheduleCreate, MenuUpdate, MenuWithSchedules,
};

use crate::api::require_establishment;
use crate::calendar::{CalendarView, MenuExpansion, classify, expand_menus};
use crate::core::ServerState;
use crate::db::repository::{menu, menu_schedule};
use crate::utils::time::{parse_date, today};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_URL_LEN, validate_optional_text, validate_payload,
};
use crate::utils::{AppError, AppResult, ErrorCode};

const RESOURCE: &str = "menu";
const RESOURCE_SCHEDULE: &str = "menu_schedule";

/// 排期写入前先分类，无法分类的排期拒绝写入
fn validate_schedules(schedules: &[MenuScheduleCreate]) -> AppResult<()> {
    for (index, data) in schedules.iter().enumerate() {
        let candidate = MenuSchedule {
            id: 0,
            menu_id: 0,
            day_of_week: data.day_of_week,
            start_time: data.start_time.clone(),
            end_time: data.end_time.clone(),
            valid_from: data.valid_from.clone(),
            valid_until: data.valid_until.clone(),
        };
        if let Err(err) = classify(&candidate) {
            return Err(AppError::with_message(ErrorCode::MenuScheduleInvalid, err.to_string())
                .with_detail("index", index)
                .with_detail("error", serde_json::to_value(&err).unwrap_or_default()));
        }
    }
    Ok(())
}

async fn require_menu(state: &ServerState, establishment_id: i64, id: i64) -> AppResult<Menu> {
    menu::find_by_id(state.pool(), establishment_id, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::MenuNotFound).with_detail("id", id))
}

/// GET /api/establishments/:eid/menus - 获取所有菜单 (含排期)
pub async fn list(
    State(state): State<ServerState>,
    Path(establishment_id): Path<i64>,
) -> AppResult<Json<Vec<MenuWithSchedules>>> {
    let menus = menu::find_all_with_schedules(state.pool(), establishment_id).await?;
    Ok(Json(menus))
}

/// GET /api/establishments/:eid/menus/:id - 获取单个菜单
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path((establishment_id, id)): Path<(i64, i64)>,
) -> AppResult<Json<MenuWithSchedules>> {
    let found = menu::find_with_schedules(state.pool(), establishment_id, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::MenuNotFound).with_detail("id", id))?;
    Ok(Json(found))
}

/// POST /api/establishments/:eid/menus - 创建菜单 (可同时创建排期)
pub async fn create(
    State(state): State<ServerState>,
    Path(establishment_id): Path<i64>,
    Json(payload): Json<MenuCreate>,
) -> AppResult<Json<MenuWithSchedules>> {
    validate_payload(&payload)?;
    validate_schedules(&payload.schedules)?;
    let place = require_establishment(state.pool(), establishment_id).await?;

    let created = menu::create(state.pool(), place.id, place.organization_id, &payload).await?;
    tracing::info!(
        establishment_id,
        menu_id = created.menu.id,
        schedules = created.schedules.len(),
        "Menu created"
    );

    state.broadcast_change(RESOURCE, ChangeKind::Insert, None, Some(&created.menu));
    for schedule in &created.schedules {
        state.broadcast_change(RESOURCE_SCHEDULE, ChangeKind::Insert, None, Some(schedule));
    }
    Ok(Json(created))
}

/// PUT /api/establishments/:eid/menus/:id - 更新菜单
pub async fn update(
    State(state): State<ServerState>,
    Path((establishment_id, id)): Path<(i64, i64)>,
    Json(payload): Json<MenuUpdate>,
) -> AppResult<Json<Menu>> {
    validate_optional_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(&payload.image_url, "image_url", MAX_URL_LEN)?;
    if payload.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(AppError::with_message(ErrorCode::RequiredField, "name is required")
            .with_detail("field", "name"));
    }

    let old = require_menu(&state, establishment_id, id).await?;
    let updated = menu::update(state.pool(), establishment_id, id, &payload).await?;

    state.broadcast_change(RESOURCE, ChangeKind::Update, Some(&old), Some(&updated));
    Ok(Json(updated))
}

/// DELETE /api/establishments/:eid/menus/:id - 删除菜单 (排期级联删除)
pub async fn delete(
    State(state): State<ServerState>,
    Path((establishment_id, id)): Path<(i64, i64)>,
) -> AppResult<Json<bool>> {
    let old = require_menu(&state, establishment_id, id).await?;
    let result = menu::delete(state.pool(), establishment_id, id).await?;
    if result {
        tracing::info!(establishment_id, menu_id = id, "Menu deleted");
        state.broadcast_change(RESOURCE, ChangeKind::Delete, Some(&old), None);
    }
    Ok(Json(result))
}

// =============================================================================
// Schedules
// =============================================================================

/// GET /api/establishments/:eid/menus/:id/schedules
pub async fn list_schedules(
    State(state): State<ServerState>,
    Path((establishment_id, id)): Path<(i64, i64)>,
) -> AppResult<Json<Vec<MenuSchedule>>> {
    require_menu(&state, establishment_id, id).await?;
    let schedules = menu_schedule::find_by_menu(state.pool(), id).await?;
    Ok(Json(schedules))
}

/// POST /api/establishments/:eid/menus/:id/schedules - 新增一条排期
pub async fn create_schedule(
    State(state): State<ServerState>,
    Path((establishment_id, id)): Path<(i64, i64)>,
    Json(payload): Json<MenuScheduleCreate>,
) -> AppResult<Json<MenuSchedule>> {
    validate_schedules(std::slice::from_ref(&payload))?;
    require_menu(&state, establishment_id, id).await?;

    let created = menu_schedule::create(state.pool(), id, &payload).await?;
    state.broadcast_change(RESOURCE_SCHEDULE, ChangeKind::Insert, None, Some(&created));
    Ok(Json(created))
}

/// PUT /api/establishments/:eid/menus/:id/schedules - 整体替换排期
pub async fn replace_schedules(
    State(state): State<ServerState>,
    Path((establishment_id, id)): Path<(i64, i64)>,
    Json(payload): Json<Vec<MenuScheduleCreate>>,
) -> AppResult<Json<Vec<MenuSchedule>>> {
    validate_schedules(&payload)?;
    require_menu(&state, establishment_id, id).await?;

    let old = menu_schedule::find_by_menu(state.pool(), id).await?;
    let schedules = menu_schedule::replace_all(state.pool(), id, &payload).await?;

    for schedule in &old {
        state.broadcast_change(RESOURCE_SCHEDULE, ChangeKind::Delete, Some(schedule), None);
    }
    for schedule in &schedules {
        state.broadcast_change(RESOURCE_SCHEDULE, ChangeKind::Insert, None, Some(schedule));
    }
    Ok(Json(schedules))
}

/// DELETE /api/establishments/:eid/menus/:id/schedules/:schedule_id
pub async fn delete_schedule(
    State(state): State<ServerState>,
    Path((establishment_id, id, schedule_id)): Path<(i64, i64, i64)>,
) -> AppResult<Json<bool>> {
    require_menu(&state, establishment_id, id).await?;
    let old = menu_schedule::find_by_id(state.pool(), id, schedule_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::MenuScheduleNotFound).with_detail("id", schedule_id))?;

    let result = menu_schedule::delete(state.pool(), id, schedule_id).await?;
    if result {
        state.broadcast_change(RESOURCE_SCHEDULE, ChangeKind::Delete, Some(&old), None);
    }
    Ok(Json(result))
}

// =============================================================================
// Calendar
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct CalendarQuery {
    #[serde(default)]
    pub view: CalendarView,
    /// 参考日期 (YYYY-MM-DD)，默认今天
    pub date: Option<String>,
}

/// GET /api/establishments/:eid/menus/calendar?view=month&date=2024-03-01
pub async fn calendar(
    State(state): State<ServerState>,
    Path(establishment_id): Path<i64>,
    Query(query): Query<CalendarQuery>,
) -> AppResult<Json<MenuExpansion>> {
    require_establishment(state.pool(), establishment_id).await?;
    let reference = match query.date.as_deref() {
        Some(date) => parse_date(date)?,
        None => today(),
    };

    let menus = menu::find_all_with_schedules(state.pool(), establishment_id).await?;
    let expansion = expand_menus(&menus, query.view, reference);
    if !expansion.rejected.is_empty() {
        tracing::warn!(
            establishment_id,
            rejected = expansion.rejected.len(),
            "Some menu schedules could not be displayed"
        );
    }
    Ok(Json(expansion))
}
