//! Product Repository

use super::{RepoError, RepoResult};
use shared::models::{Product, ProductCreate, ProductUpdate};
use shared::util::now_millis;
use sqlx::SqlitePool;

const COLUMNS: &str = "id, establishment_id, name, description, price, category, is_available, \
                       display_order, deleted, created_at, updated_at";

pub async fn find_all(pool: &SqlitePool, establishment_id: i64) -> RepoResult<Vec<Product>> {
    let products = sqlx::query_as::<_, Product>(&format!(
        "SELECT {COLUMNS} FROM product WHERE establishment_id = ? AND deleted = 0 \
         ORDER BY category, display_order, name"
    ))
    .bind(establishment_id)
    .fetch_all(pool)
    .await?;
    Ok(products)
}

pub async fn find_by_id(
    pool: &SqlitePool,
    establishment_id: i64,
    id: i64,
) -> RepoResult<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(&format!(
        "SELECT {COLUMNS} FROM product WHERE id = ? AND establishment_id = ? AND deleted = 0"
    ))
    .bind(id)
    .bind(establishment_id)
    .fetch_optional(pool)
    .await?;
    Ok(product)
}

pub async fn create(
    pool: &SqlitePool,
    establishment_id: i64,
    data: &ProductCreate,
) -> RepoResult<Product> {
    let now = now_millis();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO product (establishment_id, name, description, price, category, is_available, \
         display_order, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(establishment_id)
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.price)
    .bind(&data.category)
    .bind(data.is_available.unwrap_or(true))
    .bind(data.display_order.unwrap_or(0))
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;
    find_by_id(pool, establishment_id, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create product".into()))
}

pub async fn update(
    pool: &SqlitePool,
    establishment_id: i64,
    id: i64,
    data: &ProductUpdate,
) -> RepoResult<Product> {
    let rows = sqlx::query(
        "UPDATE product SET name = COALESCE(?1, name), description = COALESCE(?2, description), \
         price = COALESCE(?3, price), category = COALESCE(?4, category), \
         is_available = COALESCE(?5, is_available), display_order = COALESCE(?6, display_order), \
         updated_at = ?7 WHERE id = ?8 AND establishment_id = ?9 AND deleted = 0",
    )
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.price)
    .bind(&data.category)
    .bind(data.is_available)
    .bind(data.display_order)
    .bind(now_millis())
    .bind(id)
    .bind(establishment_id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Product {id} not found")));
    }
    find_by_id(pool, establishment_id, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Product {id} not found")))
}

/// Soft delete
pub async fn delete(pool: &SqlitePool, establishment_id: i64, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE product SET deleted = 1, updated_at = ? WHERE id = ? AND establishment_id = ? AND deleted = 0",
    )
    .bind(now_millis())
    .bind(id)
    .bind(establishment_id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}
