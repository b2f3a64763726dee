//! Product API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::message::ChangeKind;
use shared::models::{Product, ProductCreate, ProductUpdate};

use crate::api::require_establishment;
use crate::core::ServerState;
use crate::db::repository::product;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text, validate_payload,
    validate_price,
};
use crate::utils::{AppError, AppResult, ErrorCode};

const RESOURCE: &str = "product";

async fn require_product(state: &ServerState, establishment_id: i64, id: i64) -> AppResult<Product> {
    product::find_by_id(state.pool(), establishment_id, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound).with_detail("id", id))
}

/// GET /api/establishments/:eid/products - 获取所有商品
pub async fn list(
    State(state): State<ServerState>,
    Path(establishment_id): Path<i64>,
) -> AppResult<Json<Vec<Product>>> {
    let products = product::find_all(state.pool(), establishment_id).await?;
    Ok(Json(products))
}

/// GET /api/establishments/:eid/products/:id - 获取单个商品
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path((establishment_id, id)): Path<(i64, i64)>,
) -> AppResult<Json<Product>> {
    Ok(Json(require_product(&state, establishment_id, id).await?))
}

/// POST /api/establishments/:eid/products - 创建商品
pub async fn create(
    State(state): State<ServerState>,
    Path(establishment_id): Path<i64>,
    Json(payload): Json<ProductCreate>,
) -> AppResult<Json<Product>> {
    validate_payload(&payload)?;
    validate_price(payload.price)?;
    require_establishment(state.pool(), establishment_id).await?;

    let created = product::create(state.pool(), establishment_id, &payload).await?;
    state.broadcast_change(RESOURCE, ChangeKind::Insert, None, Some(&created));
    Ok(Json(created))
}

/// PUT /api/establishments/:eid/products/:id - 更新商品
pub async fn update(
    State(state): State<ServerState>,
    Path((establishment_id, id)): Path<(i64, i64)>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<Product>> {
    validate_optional_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(&payload.category, "category", MAX_SHORT_TEXT_LEN)?;
    if let Some(price) = payload.price {
        validate_price(price)?;
    }

    let old = require_product(&state, establishment_id, id).await?;
    let updated = product::update(state.pool(), establishment_id, id, &payload).await?;
    state.broadcast_change(RESOURCE, ChangeKind::Update, Some(&old), Some(&updated));
    Ok(Json(updated))
}

/// DELETE /api/establishments/:eid/products/:id - 删除商品 (软删除)
pub async fn delete(
    State(state): State<ServerState>,
    Path((establishment_id, id)): Path<(i64, i64)>,
) -> AppResult<Json<bool>> {
    let old = require_product(&state, establishment_id, id).await?;
    let result = product::delete(state.pool(), establishment_id, id).await?;
    if result {
        state.broadcast_change(RESOURCE, ChangeKind::Delete, Some(&old), None);
    }
    Ok(Json(result))
}
