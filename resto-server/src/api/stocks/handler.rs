//! Stock API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::message::ChangeKind;
use shared::models::{Stock, StockCreate, StockUpdate};

use crate::api::require_establishment;
use crate::core::ServerState;
use crate::db::repository::{product, stock};
use crate::utils::validation::{MAX_NAME_LEN, validate_optional_text, validate_payload, validate_quantity};
use crate::utils::{AppError, AppResult, ErrorCode};

const RESOURCE: &str = "stock";

async fn require_stock(state: &ServerState, establishment_id: i64, id: i64) -> AppResult<Stock> {
    stock::find_by_id(state.pool(), establishment_id, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::StockNotFound).with_detail("id", id))
}

/// 关联商品必须属于同一门店
async fn check_product(state: &ServerState, establishment_id: i64, product_id: Option<i64>) -> AppResult<()> {
    if let Some(product_id) = product_id {
        product::find_by_id(state.pool(), establishment_id, product_id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound).with_detail("id", product_id))?;
    }
    Ok(())
}

/// GET /api/establishments/:eid/stocks - 获取所有库存
pub async fn list(
    State(state): State<ServerState>,
    Path(establishment_id): Path<i64>,
) -> AppResult<Json<Vec<Stock>>> {
    let stocks = stock::find_all(state.pool(), establishment_id).await?;
    Ok(Json(stocks))
}

/// GET /api/establishments/:eid/stocks/low - 低于警戒线的库存
pub async fn list_low(
    State(state): State<ServerState>,
    Path(establishment_id): Path<i64>,
) -> AppResult<Json<Vec<Stock>>> {
    let stocks = stock::find_low(state.pool(), establishment_id).await?;
    Ok(Json(stocks))
}

/// GET /api/establishments/:eid/stocks/:id - 获取单个库存
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path((establishment_id, id)): Path<(i64, i64)>,
) -> AppResult<Json<Stock>> {
    Ok(Json(require_stock(&state, establishment_id, id).await?))
}

/// POST /api/establishments/:eid/stocks - 创建库存
pub async fn create(
    State(state): State<ServerState>,
    Path(establishment_id): Path<i64>,
    Json(payload): Json<StockCreate>,
) -> AppResult<Json<Stock>> {
    validate_payload(&payload)?;
    validate_quantity(payload.quantity)?;
    require_establishment(state.pool(), establishment_id).await?;
    check_product(&state, establishment_id, payload.product_id).await?;

    let created = stock::create(state.pool(), establishment_id, &payload).await?;
    if created.is_low() {
        tracing::warn!(establishment_id, stock_id = created.id, name = %created.name, "Stock below alert threshold");
    }
    state.broadcast_change(RESOURCE, ChangeKind::Insert, None, Some(&created));
    Ok(Json(created))
}

/// PUT /api/establishments/:eid/stocks/:id - 更新库存
pub async fn update(
    State(state): State<ServerState>,
    Path((establishment_id, id)): Path<(i64, i64)>,
    Json(payload): Json<StockUpdate>,
) -> AppResult<Json<Stock>> {
    validate_optional_text(&payload.name, "name", MAX_NAME_LEN)?;
    if let Some(quantity) = payload.quantity {
        validate_quantity(quantity)?;
    }
    if let Some(threshold) = payload.alert_threshold {
        validate_quantity(threshold)?;
    }

    let old = require_stock(&state, establishment_id, id).await?;
    check_product(&state, establishment_id, payload.product_id).await?;
    let updated = stock::update(state.pool(), establishment_id, id, &payload).await?;
    if updated.is_low() && !old.is_low() {
        tracing::warn!(establishment_id, stock_id = id, name = %updated.name, "Stock below alert threshold");
    }
    state.broadcast_change(RESOURCE, ChangeKind::Update, Some(&old), Some(&updated));
    Ok(Json(updated))
}

/// DELETE /api/establishments/:eid/stocks/:id - 删除库存 (软删除)
pub async fn delete(
    State(state): State<ServerState>,
    Path((establishment_id, id)): Path<(i64, i64)>,
) -> AppResult<Json<bool>> {
    let old = require_stock(&state, establishment_id, id).await?;
    let result = stock::delete(state.pool(), establishment_id, id).await?;
    if result {
        state.broadcast_change(RESOURCE, ChangeKind::Delete, Some(&old), None);
    }
    Ok(Json(result))
}
