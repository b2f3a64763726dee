//! Establishment API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::message::ChangeKind;
use shared::models::{
    Establishment, EstablishmentCreate, EstablishmentUpdate, Organization, OrganizationCreate,
};

use crate::api::require_establishment;
use crate::core::ServerState;
use crate::db::repository::{RepoError, establishment};
use crate::utils::validation::{MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text, validate_payload};
use crate::utils::{AppError, AppResult, ErrorCode};

const RESOURCE: &str = "establishment";

/// 唯一约束冲突映射为 slug 重复
fn slug_conflict(slug: &str) -> impl FnOnce(RepoError) -> AppError + '_ {
    move |err| match err {
        RepoError::Duplicate(_) => {
            AppError::new(ErrorCode::EstablishmentSlugExists).with_detail("slug", slug)
        }
        other => other.into(),
    }
}

fn validate_slug(slug: &str) -> AppResult<()> {
    let valid = !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if !valid {
        return Err(AppError::validation("Slug must use lowercase letters, digits and '-'")
            .with_detail("slug", slug));
    }
    Ok(())
}

/// POST /api/organizations - 创建组织
pub async fn create_organization(
    State(state): State<ServerState>,
    Json(payload): Json<OrganizationCreate>,
) -> AppResult<Json<Organization>> {
    validate_payload(&payload)?;
    let organization = establishment::create_organization(state.pool(), &payload).await?;
    tracing::info!(organization_id = organization.id, "Organization created");
    Ok(Json(organization))
}

/// GET /api/organizations/:id - 获取组织
pub async fn get_organization(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Organization>> {
    let organization = establishment::find_organization(state.pool(), id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Organization {}", id)))?;
    Ok(Json(organization))
}

/// GET /api/establishments - 获取所有门店
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Establishment>>> {
    let establishments = establishment::find_all(state.pool()).await?;
    Ok(Json(establishments))
}

/// GET /api/establishments/:id - 获取单个门店
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Establishment>> {
    Ok(Json(require_establishment(state.pool(), id).await?))
}

/// POST /api/establishments - 创建门店
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<EstablishmentCreate>,
) -> AppResult<Json<Establishment>> {
    validate_payload(&payload)?;
    validate_slug(&payload.slug)?;
    validate_optional_text(&payload.timezone, "timezone", MAX_SHORT_TEXT_LEN)?;
    establishment::find_organization(state.pool(), payload.organization_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Organization {}", payload.organization_id)))?;

    let created = establishment::create(state.pool(), &payload)
        .await
        .map_err(slug_conflict(&payload.slug))?;

    tracing::info!(establishment_id = created.id, slug = %created.slug, "Establishment created");
    state.broadcast_change(RESOURCE, ChangeKind::Insert, None, Some(&created));
    Ok(Json(created))
}

/// PUT /api/establishments/:id - 更新门店
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<EstablishmentUpdate>,
) -> AppResult<Json<Establishment>> {
    validate_optional_text(&payload.name, "name", MAX_NAME_LEN)?;
    if let Some(slug) = &payload.slug {
        validate_slug(slug)?;
    }
    validate_optional_text(&payload.timezone, "timezone", MAX_SHORT_TEXT_LEN)?;

    let old = require_establishment(state.pool(), id).await?;
    let slug = payload.slug.clone().unwrap_or_default();
    let updated = establishment::update(state.pool(), id, &payload)
        .await
        .map_err(slug_conflict(&slug))?;

    state.broadcast_change(RESOURCE, ChangeKind::Update, Some(&old), Some(&updated));
    Ok(Json(updated))
}

/// DELETE /api/establishments/:id - 删除门店 (级联删除所有数据)
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i64>) -> AppResult<Json<bool>> {
    let old = require_establishment(state.pool(), id).await?;
    let result = establishment::delete(state.pool(), id).await?;
    if result {
        tracing::info!(establishment_id = id, "Establishment deleted");
        state.broadcast_change(RESOURCE, ChangeKind::Delete, Some(&old), None);
    }
    Ok(Json(result))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_slug() {
        assert!(validate_slug("chez-marcel-2").is_ok());
        assert!(validate_slug("Chez Marcel").is_err());
        assert!(validate_slug("").is_err());
    }
}
