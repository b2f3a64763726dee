//! Public establishment Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use shared::models::{AvailableSlot, Establishment, Menu, OpeningHour};

use crate::booking::availability::{generate_15min_slots, get_available_slots_simple};
use crate::core::ServerState;
use crate::db::repository::{establishment, menu, opening_hour};
use crate::utils::time::{parse_date, today, validate_not_past};
use crate::utils::{AppError, AppResult, ErrorCode};

/// 公开门店信息
#[derive(Debug, Serialize)]
pub struct PublicEstablishment {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub timezone: String,
    pub booking_enabled: bool,
    /// 公开且启用的菜单
    pub menus: Vec<Menu>,
    pub opening_hours: Vec<OpeningHour>,
}

#[derive(Debug, Deserialize)]
pub struct SlotsQuery {
    pub date: String,
    /// 只返回可预订的时间格
    #[serde(default)]
    pub available_only: bool,
}

async fn require_by_slug(state: &ServerState, slug: &str) -> AppResult<Establishment> {
    establishment::find_by_slug(state.pool(), slug)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::EstablishmentNotFound).with_detail("slug", slug))
}

/// GET /api/public/establishments/:slug
pub async fn get_by_slug(
    State(state): State<ServerState>,
    Path(slug): Path<String>,
) -> AppResult<Json<PublicEstablishment>> {
    let place = require_by_slug(&state, &slug).await?;
    let menus = menu::find_public(state.pool(), place.id).await?;
    let opening_hours = opening_hour::find_all(state.pool(), place.id)
        .await?
        .into_iter()
        .filter(|h| h.is_active)
        .collect();

    Ok(Json(PublicEstablishment {
        id: place.id,
        name: place.name,
        slug: place.slug,
        timezone: place.timezone,
        booking_enabled: place.booking_enabled,
        menus,
        opening_hours,
    }))
}

/// GET /api/public/establishments/:slug/slots?date=YYYY-MM-DD
pub async fn slots(
    State(state): State<ServerState>,
    Path(slug): Path<String>,
    Query(query): Query<SlotsQuery>,
) -> AppResult<Json<Vec<AvailableSlot>>> {
    let place = require_by_slug(&state, &slug).await?;
    if !place.booking_enabled {
        return Err(AppError::new(ErrorCode::BookingDisabled).with_detail("slug", slug));
    }
    let date = parse_date(&query.date)?;
    validate_not_past(date, today())?;

    let slots = if query.available_only {
        get_available_slots_simple(state.pool(), place.id, date).await?
    } else {
        generate_15min_slots(state.pool(), place.id, date).await?
    };
    Ok(Json(slots))
}
