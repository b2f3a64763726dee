//! Booking dashboard Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::message::ChangeKind;
use shared::models::{AvailableSlot, Booking, BookingStatus};

use crate::api::require_establishment;
use crate::booking::{availability, find_booking};
use crate::core::ServerState;
use crate::db::repository::booking;
use crate::utils::time::{format_date, parse_date, today};
use crate::utils::{AppError, AppResult, ErrorCode};

const RESOURCE: &str = "booking";

#[derive(Debug, Deserialize)]
pub struct DateQuery {
    /// YYYY-MM-DD，默认今天
    pub date: Option<String>,
}

impl DateQuery {
    fn resolve(&self) -> AppResult<chrono::NaiveDate> {
        match self.date.as_deref() {
            Some(date) => parse_date(date),
            None => Ok(today()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: BookingStatus,
}

async fn require_booking(state: &ServerState, establishment_id: i64, id: i64) -> AppResult<Booking> {
    let found = find_booking(state.pool(), id).await?;
    if found.establishment_id != establishment_id {
        return Err(AppError::new(ErrorCode::BookingNotFound).with_detail("id", id));
    }
    Ok(found)
}

/// GET /api/establishments/:eid/bookings?date=YYYY-MM-DD
pub async fn list(
    State(state): State<ServerState>,
    Path(establishment_id): Path<i64>,
    Query(query): Query<DateQuery>,
) -> AppResult<Json<Vec<Booking>>> {
    let date = query.resolve()?;
    let bookings = booking::find_by_date(state.pool(), establishment_id, &format_date(date)).await?;
    Ok(Json(bookings))
}

/// GET /api/establishments/:eid/bookings/availability?date=YYYY-MM-DD
///
/// 包含已满和已关闭的时间格。
pub async fn availability(
    State(state): State<ServerState>,
    Path(establishment_id): Path<i64>,
    Query(query): Query<DateQuery>,
) -> AppResult<Json<Vec<AvailableSlot>>> {
    require_establishment(state.pool(), establishment_id).await?;
    let date = query.resolve()?;
    let slots = availability::generate_15min_slots(state.pool(), establishment_id, date).await?;
    Ok(Json(slots))
}

/// GET /api/establishments/:eid/bookings/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path((establishment_id, id)): Path<(i64, i64)>,
) -> AppResult<Json<Booking>> {
    Ok(Json(require_booking(&state, establishment_id, id).await?))
}

/// PUT /api/establishments/:eid/bookings/:id/status - 确认或取消
pub async fn update_status(
    State(state): State<ServerState>,
    Path((establishment_id, id)): Path<(i64, i64)>,
    Json(payload): Json<StatusUpdate>,
) -> AppResult<Json<Booking>> {
    let old = require_booking(&state, establishment_id, id).await?;
    if old.status == BookingStatus::Cancelled && payload.status != BookingStatus::Cancelled {
        return Err(AppError::invalid("A cancelled booking cannot be reopened")
            .with_detail("id", id));
    }

    let updated = booking::update_status(state.pool(), id, payload.status).await?;
    tracing::info!(
        establishment_id,
        booking_id = id,
        status = ?updated.status,
        "Booking status changed"
    );
    state.broadcast_change(RESOURCE, ChangeKind::Update, Some(&old), Some(&updated));
    Ok(Json(updated))
}
