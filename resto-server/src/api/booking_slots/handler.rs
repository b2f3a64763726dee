//! Booking Slot API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::message::ChangeKind;
use shared::models::{BookingSlot, BookingSlotCreate, BookingSlotUpdate};

use crate::api::require_establishment;
use crate::booking::exceptions::{TimeSlot, generate_time_slots_from_booking_slot};
use crate::core::ServerState;
use crate::db::repository::booking_slot;
use crate::utils::time::{normalize_optional_date, parse_date};
use crate::utils::validation::{
    MAX_NAME_LEN, ensure_time_order, normalize_slot_time, validate_capacity, validate_iso_day, validate_optional_text,
    validate_payload,
};
use crate::utils::{AppError, AppResult, ErrorCode};

const RESOURCE: &str = "booking_slot";

async fn require_slot(state: &ServerState, establishment_id: i64, id: i64) -> AppResult<BookingSlot> {
    booking_slot::find_by_id(state.pool(), establishment_id, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::BookingSlotNotFound).with_detail("id", id))
}

/// 有效期: 日期格式正确且起始不晚于结束
fn validate_window(valid_from: Option<&str>, valid_until: Option<&str>) -> AppResult<()> {
    let from = valid_from.map(parse_date).transpose()?;
    let until = valid_until.map(parse_date).transpose()?;
    if let (Some(from), Some(until)) = (from, until)
        && from > until
    {
        return Err(AppError::validation("valid_from must not be after valid_until"));
    }
    Ok(())
}

/// GET /api/establishments/:eid/booking-slots
pub async fn list(
    State(state): State<ServerState>,
    Path(establishment_id): Path<i64>,
) -> AppResult<Json<Vec<BookingSlot>>> {
    let slots = booking_slot::find_all(state.pool(), establishment_id).await?;
    Ok(Json(slots))
}

/// GET /api/establishments/:eid/booking-slots/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path((establishment_id, id)): Path<(i64, i64)>,
) -> AppResult<Json<BookingSlot>> {
    Ok(Json(require_slot(&state, establishment_id, id).await?))
}

/// GET /api/establishments/:eid/booking-slots/:id/time-slots - 15 分钟时间格
pub async fn time_slots(
    State(state): State<ServerState>,
    Path((establishment_id, id)): Path<(i64, i64)>,
) -> AppResult<Json<Vec<TimeSlot>>> {
    let slot = require_slot(&state, establishment_id, id).await?;
    Ok(Json(generate_time_slots_from_booking_slot(&slot)))
}

/// POST /api/establishments/:eid/booking-slots
pub async fn create(
    State(state): State<ServerState>,
    Path(establishment_id): Path<i64>,
    Json(mut payload): Json<BookingSlotCreate>,
) -> AppResult<Json<BookingSlot>> {
    validate_payload(&payload)?;
    validate_iso_day(payload.day_of_week)?;
    payload.start_time = normalize_slot_time(&payload.start_time, "start_time")?;
    payload.end_time = normalize_slot_time(&payload.end_time, "end_time")?;
    ensure_time_order(&payload.start_time, &payload.end_time)?;
    validate_capacity(payload.max_capacity)?;
    payload.valid_from = normalize_optional_date(payload.valid_from.as_deref())?;
    payload.valid_until = normalize_optional_date(payload.valid_until.as_deref())?;
    validate_window(payload.valid_from.as_deref(), payload.valid_until.as_deref())?;
    require_establishment(state.pool(), establishment_id).await?;

    let created = booking_slot::create(state.pool(), establishment_id, &payload).await?;
    state.broadcast_change(RESOURCE, ChangeKind::Insert, None, Some(&created));
    Ok(Json(created))
}

/// PUT /api/establishments/:eid/booking-slots/:id
pub async fn update(
    State(state): State<ServerState>,
    Path((establishment_id, id)): Path<(i64, i64)>,
    Json(mut payload): Json<BookingSlotUpdate>,
) -> AppResult<Json<BookingSlot>> {
    let old = require_slot(&state, establishment_id, id).await?;

    validate_optional_text(&payload.slot_name, "slot_name", MAX_NAME_LEN)?;
    if let Some(start) = payload.start_time.as_deref() {
        payload.start_time = Some(normalize_slot_time(start, "start_time")?);
    }
    if let Some(end) = payload.end_time.as_deref() {
        payload.end_time = Some(normalize_slot_time(end, "end_time")?);
    }
    if let Some(from) = payload.valid_from.as_deref() {
        payload.valid_from = normalize_optional_date(Some(from))?;
    }
    if let Some(until) = payload.valid_until.as_deref() {
        payload.valid_until = normalize_optional_date(Some(until))?;
    }
    validate_iso_day(payload.day_of_week.unwrap_or(old.day_of_week))?;
    ensure_time_order(
        payload.start_time.as_deref().unwrap_or(&old.start_time),
        payload.end_time.as_deref().unwrap_or(&old.end_time),
    )?;
    validate_capacity(payload.max_capacity.unwrap_or(old.max_capacity))?;
    validate_window(
        payload.valid_from.as_deref().or(old.valid_from.as_deref()),
        payload.valid_until.as_deref().or(old.valid_until.as_deref()),
    )?;

    let updated = booking_slot::update(state.pool(), establishment_id, id, &payload).await?;
    state.broadcast_change(RESOURCE, ChangeKind::Update, Some(&old), Some(&updated));
    Ok(Json(updated))
}

/// DELETE /api/establishments/:eid/booking-slots/:id - 软删除
pub async fn delete(
    State(state): State<ServerState>,
    Path((establishment_id, id)): Path<(i64, i64)>,
) -> AppResult<Json<bool>> {
    let old = require_slot(&state, establishment_id, id).await?;
    let result = booking_slot::delete(state.pool(), establishment_id, id).await?;
    if result {
        state.broadcast_change(RESOURCE, ChangeKind::Delete, Some(&old), None);
    }
    Ok(Json(result))
}
