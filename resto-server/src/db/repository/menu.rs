//! Menu Repository

use std::collections::HashMap;

use super::{RepoError, RepoResult, menu_schedule};
use shared::models::{Menu, MenuCreate, MenuSchedule, MenuUpdate, MenuWithSchedules};
use shared::util::now_millis;
use sqlx::SqlitePool;

const COLUMNS: &str = "id, establishment_id, organization_id, name, description, is_active, \
                       is_public, display_order, image_url, created_at, updated_at";

pub async fn find_all(pool: &SqlitePool, establishment_id: i64) -> RepoResult<Vec<Menu>> {
    let menus = sqlx::query_as::<_, Menu>(&format!(
        "SELECT {COLUMNS} FROM menu WHERE establishment_id = ? ORDER BY display_order, name"
    ))
    .bind(establishment_id)
    .fetch_all(pool)
    .await?;
    Ok(menus)
}

/// Public, active menus (booking page)
pub async fn find_public(pool: &SqlitePool, establishment_id: i64) -> RepoResult<Vec<Menu>> {
    let menus = sqlx::query_as::<_, Menu>(&format!(
        "SELECT {COLUMNS} FROM menu WHERE establishment_id = ? AND is_active = 1 AND is_public = 1 \
         ORDER BY display_order, name"
    ))
    .bind(establishment_id)
    .fetch_all(pool)
    .await?;
    Ok(menus)
}

pub async fn find_by_id(
    pool: &SqlitePool,
    establishment_id: i64,
    id: i64,
) -> RepoResult<Option<Menu>> {
    let menu = sqlx::query_as::<_, Menu>(&format!(
        "SELECT {COLUMNS} FROM menu WHERE id = ? AND establishment_id = ?"
    ))
    .bind(id)
    .bind(establishment_id)
    .fetch_optional(pool)
    .await?;
    Ok(menu)
}

/// Every menu of the establishment with its schedules (two queries)
pub async fn find_all_with_schedules(
    pool: &SqlitePool,
    establishment_id: i64,
) -> RepoResult<Vec<MenuWithSchedules>> {
    let menus = find_all(pool, establishment_id).await?;
    let schedules = menu_schedule::find_by_establishment(pool, establishment_id).await?;

    let mut by_menu: HashMap<i64, Vec<MenuSchedule>> = HashMap::new();
    for schedule in schedules {
        by_menu.entry(schedule.menu_id).or_default().push(schedule);
    }

    Ok(menus
        .into_iter()
        .map(|menu| {
            let schedules = by_menu.remove(&menu.id).unwrap_or_default();
            MenuWithSchedules { menu, schedules }
        })
        .collect())
}

pub async fn find_with_schedules(
    pool: &SqlitePool,
    establishment_id: i64,
    id: i64,
) -> RepoResult<Option<MenuWithSchedules>> {
    let Some(menu) = find_by_id(pool, establishment_id, id).await? else {
        return Ok(None);
    };
    let schedules = menu_schedule::find_by_menu(pool, id).await?;
    Ok(Some(MenuWithSchedules { menu, schedules }))
}

/// Insert the menu and its initial schedules in one transaction
pub async fn create(
    pool: &SqlitePool,
    establishment_id: i64,
    organization_id: i64,
    data: &MenuCreate,
) -> RepoResult<MenuWithSchedules> {
    let now = now_millis();
    let mut tx = pool.begin().await?;

    let id: i64 = sqlx::query_scalar(
        "INSERT INTO menu (establishment_id, organization_id, name, description, is_active, \
         is_public, display_order, image_url, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(establishment_id)
    .bind(organization_id)
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.is_active.unwrap_or(true))
    .bind(data.is_public.unwrap_or(false))
    .bind(data.display_order.unwrap_or(0))
    .bind(&data.image_url)
    .bind(now)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    for schedule in &data.schedules {
        menu_schedule::insert(&mut *tx, id, schedule).await?;
    }

    tx.commit().await?;

    find_with_schedules(pool, establishment_id, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create menu".into()))
}

pub async fn update(
    pool: &SqlitePool,
    establishment_id: i64,
    id: i64,
    data: &MenuUpdate,
) -> RepoResult<Menu> {
    let rows = sqlx::query(
        "UPDATE menu SET name = COALESCE(?1, name), description = COALESCE(?2, description), \
         is_active = COALESCE(?3, is_active), is_public = COALESCE(?4, is_public), \
         display_order = COALESCE(?5, display_order), image_url = COALESCE(?6, image_url), \
         updated_at = ?7 WHERE id = ?8 AND establishment_id = ?9",
    )
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.is_active)
    .bind(data.is_public)
    .bind(data.display_order)
    .bind(&data.image_url)
    .bind(now_millis())
    .bind(id)
    .bind(establishment_id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Menu {id} not found")));
    }
    find_by_id(pool, establishment_id, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Menu {id} not found")))
}

/// Hard delete; schedules cascade
pub async fn delete(pool: &SqlitePool, establishment_id: i64, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM menu WHERE id = ? AND establishment_id = ?")
        .bind(id)
        .bind(establishment_id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
