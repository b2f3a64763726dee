//! Menu Schedule Repository

use super::{RepoError, RepoResult};
use shared::models::{MenuSchedule, MenuScheduleCreate};
use sqlx::{Sqlite, SqliteConnection, SqlitePool};

const COLUMNS: &str = "id, menu_id, day_of_week, start_time, end_time, valid_from, valid_until";

pub async fn find_by_menu(pool: &SqlitePool, menu_id: i64) -> RepoResult<Vec<MenuSchedule>> {
    let rows = sqlx::query_as::<_, MenuSchedule>(&format!(
        "SELECT {COLUMNS} FROM menu_schedule WHERE menu_id = ? ORDER BY id"
    ))
    .bind(menu_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_establishment(
    pool: &SqlitePool,
    establishment_id: i64,
) -> RepoResult<Vec<MenuSchedule>> {
    let rows = sqlx::query_as::<_, MenuSchedule>(
        "SELECT s.id, s.menu_id, s.day_of_week, s.start_time, s.end_time, s.valid_from, s.valid_until \
         FROM menu_schedule s JOIN menu m ON m.id = s.menu_id \
         WHERE m.establishment_id = ? ORDER BY s.menu_id, s.id",
    )
    .bind(establishment_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(
    pool: &SqlitePool,
    menu_id: i64,
    id: i64,
) -> RepoResult<Option<MenuSchedule>> {
    let row = sqlx::query_as::<_, MenuSchedule>(&format!(
        "SELECT {COLUMNS} FROM menu_schedule WHERE id = ? AND menu_id = ?"
    ))
    .bind(id)
    .bind(menu_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Insert on an existing connection (used inside transactions)
pub async fn insert(
    conn: &mut SqliteConnection,
    menu_id: i64,
    data: &MenuScheduleCreate,
) -> RepoResult<i64> {
    let id: i64 = sqlx::query_scalar::<Sqlite, i64>(
        "INSERT INTO menu_schedule (menu_id, day_of_week, start_time, end_time, valid_from, valid_until) \
         VALUES (?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(menu_id)
    .bind(data.day_of_week)
    .bind(&data.start_time)
    .bind(&data.end_time)
    .bind(&data.valid_from)
    .bind(&data.valid_until)
    .fetch_one(conn)
    .await?;
    Ok(id)
}

pub async fn create(
    pool: &SqlitePool,
    menu_id: i64,
    data: &MenuScheduleCreate,
) -> RepoResult<MenuSchedule> {
    let mut conn = pool.acquire().await?;
    let id = insert(&mut *conn, menu_id, data).await?;
    drop(conn);
    find_by_id(pool, menu_id, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create menu schedule".into()))
}

/// Replace every schedule of a menu in one transaction
pub async fn replace_all(
    pool: &SqlitePool,
    menu_id: i64,
    schedules: &[MenuScheduleCreate],
) -> RepoResult<Vec<MenuSchedule>> {
    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM menu_schedule WHERE menu_id = ?")
        .bind(menu_id)
        .execute(&mut *tx)
        .await?;
    for schedule in schedules {
        insert(&mut *tx, menu_id, schedule).await?;
    }
    tx.commit().await?;
    find_by_menu(pool, menu_id).await
}

pub async fn delete(pool: &SqlitePool, menu_id: i64, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM menu_schedule WHERE id = ? AND menu_id = ?")
        .bind(id)
        .bind(menu_id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
