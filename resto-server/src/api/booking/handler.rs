//! Public booking Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::message::ChangeKind;
use shared::models::{Booking, BookingCreate, BookingCreated, VerifyTokenRequest};

use crate::booking;
use crate::core::ServerState;
use crate::utils::AppResult;
use crate::utils::time::today;

const RESOURCE: &str = "booking";

#[derive(Debug, Deserialize)]
pub struct CancelRequest {
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct TokenQuery {
    #[serde(default)]
    pub token: String,
}

/// POST /api/booking/create
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<BookingCreate>,
) -> AppResult<Json<BookingCreated>> {
    let created = booking::create_booking(state.pool(), &payload, today()).await?;
    state.broadcast_change(RESOURCE, ChangeKind::Insert, None, Some(&created.booking));
    Ok(Json(created))
}

/// GET /api/booking/:id?token=...
///
/// 预订含顾客联系方式，只对持有确认令牌的一方可见。
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Query(query): Query<TokenQuery>,
) -> AppResult<Json<Booking>> {
    Ok(Json(booking::verify_token(state.pool(), id, &query.token).await?))
}

/// POST /api/booking/verify-token
pub async fn verify_token(
    State(state): State<ServerState>,
    Json(payload): Json<VerifyTokenRequest>,
) -> AppResult<Json<Booking>> {
    let found = booking::verify_token(state.pool(), payload.booking_id, &payload.token).await?;
    Ok(Json(found))
}

/// POST /api/booking/:id/cancel
pub async fn cancel(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<CancelRequest>,
) -> AppResult<Json<Booking>> {
    let old = booking::verify_token(state.pool(), id, &payload.token).await?;
    let cancelled = booking::cancel(state.pool(), id, &payload.token).await?;
    if old.status != cancelled.status {
        state.broadcast_change(RESOURCE, ChangeKind::Update, Some(&old), Some(&cancelled));
    }
    Ok(Json(cancelled))
}
