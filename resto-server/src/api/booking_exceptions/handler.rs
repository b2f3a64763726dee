//! Booking Exception API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use shared::CalendarEvent;
use shared::message::ChangeKind;
use shared::models::{
    BookingException, BookingExceptionCreate, BookingExceptionUpdate, ExceptionType,
    ToggleSlotRequest,
};

use crate::api::require_establishment;
use crate::booking::exceptions::{
    self, SlotEdit, commit_time_slot_edit, exception_calendar_events, exceptions_for_date,
};
use crate::core::ServerState;
use crate::db::repository::{booking_exception, booking_slot};
use crate::utils::time::{normalize_optional_date, parse_date};
use crate::utils::validation::{
    MAX_NOTE_LEN, validate_closed_slots, validate_exception_fields, validate_optional_text,
    validate_slot_number,
};
use crate::utils::{AppError, AppResult, ErrorCode};

const RESOURCE: &str = "booking_exception";

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// 只返回影响该日期的例外 (YYYY-MM-DD)
    pub date: Option<String>,
}

/// 时间格编辑结果
#[derive(Debug, Serialize)]
pub struct SlotEditResult {
    /// 已无关闭时间格，例外被删除
    pub deleted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exception: Option<BookingException>,
}

async fn require_exception(
    state: &ServerState,
    establishment_id: i64,
    id: i64,
) -> AppResult<BookingException> {
    booking_exception::find_by_id(state.pool(), establishment_id, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::BookingExceptionNotFound).with_detail("id", id))
}

/// 提交编辑后的时间格集合: 为空则删除，否则更新
async fn commit_slots(
    state: &ServerState,
    old: BookingException,
    slots: &[u8],
) -> AppResult<SlotEditResult> {
    match commit_time_slot_edit(slots) {
        SlotEdit::Delete => {
            booking_exception::delete(state.pool(), old.establishment_id, old.id).await?;
            tracing::info!(exception_id = old.id, "Time-slot exception emptied, deleted");
            state.broadcast_change(RESOURCE, ChangeKind::Delete, Some(&old), None);
            Ok(SlotEditResult {
                deleted: true,
                exception: None,
            })
        }
        SlotEdit::Update(closed_slots) => {
            let update = BookingExceptionUpdate {
                closed_slots: Some(closed_slots),
                ..Default::default()
            };
            let updated =
                booking_exception::update(state.pool(), old.establishment_id, old.id, &update).await?;
            state.broadcast_change(RESOURCE, ChangeKind::Update, Some(&old), Some(&updated));
            Ok(SlotEditResult {
                deleted: false,
                exception: Some(updated),
            })
        }
    }
}

/// GET /api/establishments/:eid/booking-exceptions[?date=YYYY-MM-DD]
pub async fn list(
    State(state): State<ServerState>,
    Path(establishment_id): Path<i64>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<BookingException>>> {
    let exceptions = booking_exception::find_all(state.pool(), establishment_id).await?;
    let exceptions = match query.date.as_deref() {
        Some(date) => {
            let date = parse_date(date)?;
            exceptions_for_date(&exceptions, date)
                .into_iter()
                .cloned()
                .collect()
        }
        None => exceptions,
    };
    Ok(Json(exceptions))
}

/// GET /api/establishments/:eid/booking-exceptions/calendar
pub async fn calendar(
    State(state): State<ServerState>,
    Path(establishment_id): Path<i64>,
) -> AppResult<Json<Vec<CalendarEvent>>> {
    let exceptions = booking_exception::find_all(state.pool(), establishment_id).await?;
    Ok(Json(exception_calendar_events(&exceptions)))
}

/// GET /api/establishments/:eid/booking-exceptions/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path((establishment_id, id)): Path<(i64, i64)>,
) -> AppResult<Json<BookingException>> {
    Ok(Json(require_exception(&state, establishment_id, id).await?))
}

/// POST /api/establishments/:eid/booking-exceptions
pub async fn create(
    State(state): State<ServerState>,
    Path(establishment_id): Path<i64>,
    Json(mut payload): Json<BookingExceptionCreate>,
) -> AppResult<Json<BookingException>> {
    validate_exception_fields(&payload)?;
    require_establishment(state.pool(), establishment_id).await?;

    // 按字符串比较日期，入库前统一补零
    payload.start_date = normalize_optional_date(payload.start_date.as_deref())?;
    payload.end_date = normalize_optional_date(payload.end_date.as_deref())?;
    payload.date = normalize_optional_date(payload.date.as_deref())?;

    // 服务级例外必须指向本门店的服务时段
    if matches!(
        payload.exception_type,
        ExceptionType::Service | ExceptionType::TimeSlots
    ) && let Some(slot_id) = payload.booking_slot_id
    {
        booking_slot::find_by_id(state.pool(), establishment_id, slot_id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::BookingSlotNotFound).with_detail("id", slot_id))?;
    }

    if payload.exception_type == ExceptionType::TimeSlots {
        payload.closed_slots.sort_unstable();
        payload.closed_slots.dedup();
    } else {
        payload.closed_slots.clear();
    }

    let created = booking_exception::create(state.pool(), establishment_id, &payload).await?;
    tracing::info!(
        establishment_id,
        exception_id = created.id,
        exception_type = created.exception_type.as_str(),
        "Booking exception created"
    );
    state.broadcast_change(RESOURCE, ChangeKind::Insert, None, Some(&created));
    Ok(Json(created))
}

/// PUT /api/establishments/:eid/booking-exceptions/:id
///
/// 时间格例外提交空集合时删除该例外。
pub async fn update(
    State(state): State<ServerState>,
    Path((establishment_id, id)): Path<(i64, i64)>,
    Json(payload): Json<BookingExceptionUpdate>,
) -> AppResult<Json<SlotEditResult>> {
    validate_optional_text(&payload.reason, "reason", MAX_NOTE_LEN)?;
    let old = require_exception(&state, establishment_id, id).await?;

    if let Some(slots) = &payload.closed_slots {
        if old.exception_type != ExceptionType::TimeSlots {
            return Err(AppError::with_message(
                ErrorCode::BookingExceptionInvalid,
                "closed_slots only applies to time_slots exceptions",
            ));
        }
        validate_closed_slots(slots)?;
        if slots.is_empty() {
            return Ok(Json(commit_slots(&state, old, slots).await?));
        }
    }

    let mut payload = payload;
    if let Some(slots) = payload.closed_slots.as_mut() {
        slots.sort_unstable();
        slots.dedup();
    }
    let updated = booking_exception::update(state.pool(), establishment_id, id, &payload).await?;
    state.broadcast_change(RESOURCE, ChangeKind::Update, Some(&old), Some(&updated));
    Ok(Json(SlotEditResult {
        deleted: false,
        exception: Some(updated),
    }))
}

/// POST /api/establishments/:eid/booking-exceptions/:id/toggle-slot
pub async fn toggle_slot(
    State(state): State<ServerState>,
    Path((establishment_id, id)): Path<(i64, i64)>,
    Json(payload): Json<ToggleSlotRequest>,
) -> AppResult<Json<SlotEditResult>> {
    validate_slot_number(payload.slot_number)?;
    let old = require_exception(&state, establishment_id, id).await?;
    if old.exception_type != ExceptionType::TimeSlots {
        return Err(AppError::with_message(
            ErrorCode::BookingExceptionInvalid,
            "Only time_slots exceptions have slots to toggle",
        )
        .with_detail("exception_type", old.exception_type.as_str()));
    }

    let slots = exceptions::toggle_slot(&old.closed_slots, payload.slot_number);
    Ok(Json(commit_slots(&state, old, &slots).await?))
}

/// DELETE /api/establishments/:eid/booking-exceptions/:id
pub async fn delete(
    State(state): State<ServerState>,
    Path((establishment_id, id)): Path<(i64, i64)>,
) -> AppResult<Json<bool>> {
    let old = require_exception(&state, establishment_id, id).await?;
    let result = booking_exception::delete(state.pool(), establishment_id, id).await?;
    if result {
        state.broadcast_change(RESOURCE, ChangeKind::Delete, Some(&old), None);
    }
    Ok(Json(result))
}
