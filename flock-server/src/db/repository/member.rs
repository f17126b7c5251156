//! Member Repository

use shared::models::{Member, MemberCreate, MemberUpdate};
use sqlx::SqlitePool;

use super::{RepoError, RepoResult};

const MEMBER_SELECT: &str = "SELECT id, full_name, phone_primary, phone_secondary, address, class_stage, university_year, confessor_name, photo_url, notes, attendance_code, is_active, created_at, updated_at FROM member";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Member>> {
    let sql = format!("{MEMBER_SELECT} WHERE is_active = 1 ORDER BY full_name");
    let rows = sqlx::query_as::<_, Member>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Member>> {
    let sql = format!("{MEMBER_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Member>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Member lookup by attendance code — the check-in core's entry point
pub async fn find_by_code(pool: &SqlitePool, code: &str) -> RepoResult<Option<Member>> {
    let sql = format!("{MEMBER_SELECT} WHERE attendance_code = ? AND is_active = 1");
    let row = sqlx::query_as::<_, Member>(&sql)
        .bind(code)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn search(pool: &SqlitePool, query: &str) -> RepoResult<Vec<Member>> {
    let pattern = format!("%{query}%");
    let sql = format!(
        "{MEMBER_SELECT} WHERE is_active = 1 AND (full_name LIKE ?1 OR phone_primary LIKE ?1 OR attendance_code LIKE ?1) ORDER BY full_name"
    );
    let rows = sqlx::query_as::<_, Member>(&sql)
        .bind(&pattern)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Insert a member with a pre-allocated attendance code
pub async fn create(
    pool: &SqlitePool,
    data: MemberCreate,
    attendance_code: &str,
) -> RepoResult<Member> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO member (id, full_name, phone_primary, phone_secondary, address, class_stage, university_year, confessor_name, photo_url, notes, attendance_code, is_active, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, 1, ?12, ?12)",
    )
    .bind(id)
    .bind(&data.full_name)
    .bind(&data.phone_primary)
    .bind(&data.phone_secondary)
    .bind(&data.address)
    .bind(&data.class_stage)
    .bind(data.university_year)
    .bind(&data.confessor_name)
    .bind(&data.photo_url)
    .bind(&data.notes)
    .bind(attendance_code)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create member".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: MemberUpdate) -> RepoResult<Member> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE member SET full_name = COALESCE(?1, full_name), phone_primary = COALESCE(?2, phone_primary), phone_secondary = COALESCE(?3, phone_secondary), address = COALESCE(?4, address), class_stage = COALESCE(?5, class_stage), university_year = COALESCE(?6, university_year), confessor_name = COALESCE(?7, confessor_name), photo_url = COALESCE(?8, photo_url), notes = COALESCE(?9, notes), is_active = COALESCE(?10, is_active), updated_at = ?11 WHERE id = ?12",
    )
    .bind(&data.full_name)
    .bind(&data.phone_primary)
    .bind(&data.phone_secondary)
    .bind(&data.address)
    .bind(&data.class_stage)
    .bind(data.university_year)
    .bind(&data.confessor_name)
    .bind(&data.photo_url)
    .bind(&data.notes)
    .bind(data.is_active)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Member {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Member {id} not found")))
}

/// Soft delete; the attendance code stays reserved so it is never reissued
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query("UPDATE member SET is_active = 0, updated_at = ? WHERE id = ? AND is_active = 1")
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Members whose code is missing or malformed (import leftovers)
pub async fn find_missing_codes(pool: &SqlitePool) -> RepoResult<Vec<Member>> {
    let sql = format!(
        "{MEMBER_SELECT} WHERE is_active = 1 AND (attendance_code IS NULL OR attendance_code NOT GLOB '[1-9][0-9][0-9][0-9]') ORDER BY created_at"
    );
    let rows = sqlx::query_as::<_, Member>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn assign_code(pool: &SqlitePool, id: i64, code: &str) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let rows = sqlx::query("UPDATE member SET attendance_code = ?, updated_at = ? WHERE id = ?")
        .bind(code)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Member {id} not found")));
    }
    Ok(())
}
