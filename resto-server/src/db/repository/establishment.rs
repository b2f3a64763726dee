//! Organization & Establishment Repository

use super::{RepoError, RepoResult};
use shared::models::{
    Establishment, EstablishmentCreate, EstablishmentUpdate, Organization, OrganizationCreate,
};
use shared::util::now_millis;
use sqlx::SqlitePool;

const COLUMNS: &str = "id, organization_id, name, slug, timezone, booking_enabled, created_at";

const DEFAULT_TIMEZONE: &str = "Europe/Paris";

// ── Organization ────────────────────────────────────────────────────

pub async fn find_organization(pool: &SqlitePool, id: i64) -> RepoResult<Option<Organization>> {
    let org = sqlx::query_as::<_, Organization>(
        "SELECT id, name, created_at FROM organization WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(org)
}

pub async fn create_organization(
    pool: &SqlitePool,
    data: &OrganizationCreate,
) -> RepoResult<Organization> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO organization (name, created_at) VALUES (?, ?) RETURNING id",
    )
    .bind(&data.name)
    .bind(now_millis())
    .fetch_one(pool)
    .await?;
    find_organization(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create organization".into()))
}

// ── Establishment ───────────────────────────────────────────────────

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Establishment>> {
    let rows = sqlx::query_as::<_, Establishment>(&format!(
        "SELECT {COLUMNS} FROM establishment ORDER BY name"
    ))
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Establishment>> {
    let row = sqlx::query_as::<_, Establishment>(&format!(
        "SELECT {COLUMNS} FROM establishment WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn find_by_slug(pool: &SqlitePool, slug: &str) -> RepoResult<Option<Establishment>> {
    let row = sqlx::query_as::<_, Establishment>(&format!(
        "SELECT {COLUMNS} FROM establishment WHERE slug = ? LIMIT 1"
    ))
    .bind(slug)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: &EstablishmentCreate) -> RepoResult<Establishment> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO establishment (organization_id, name, slug, timezone, booking_enabled, created_at) \
         VALUES (?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(data.organization_id)
    .bind(&data.name)
    .bind(&data.slug)
    .bind(data.timezone.as_deref().unwrap_or(DEFAULT_TIMEZONE))
    .bind(data.booking_enabled.unwrap_or(true))
    .bind(now_millis())
    .fetch_one(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create establishment".into()))
}

pub async fn update(
    pool: &SqlitePool,
    id: i64,
    data: &EstablishmentUpdate,
) -> RepoResult<Establishment> {
    let rows = sqlx::query(
        "UPDATE establishment SET name = COALESCE(?1, name), slug = COALESCE(?2, slug), \
         timezone = COALESCE(?3, timezone), booking_enabled = COALESCE(?4, booking_enabled) \
         WHERE id = ?5",
    )
    .bind(&data.name)
    .bind(&data.slug)
    .bind(&data.timezone)
    .bind(data.booking_enabled)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Establishment {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Establishment {id} not found")))
}

/// Hard delete; dependent rows cascade
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM establishment WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
