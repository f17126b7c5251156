//! User Repository (operator accounts + admin fallback list)

use shared::models::User;
use sqlx::SqlitePool;

use super::{RepoError, RepoResult};

const USER_SELECT: &str = "SELECT id, username, display_name, role, password_hash, is_active, created_at, updated_at FROM user";

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> RepoResult<Option<User>> {
    let sql = format!("{USER_SELECT} WHERE username = ? AND is_active = 1");
    let row = sqlx::query_as::<_, User>(&sql)
        .bind(username)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<User>> {
    let sql = format!("{USER_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, User>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(
    pool: &SqlitePool,
    username: &str,
    display_name: &str,
    role: &str,
    password_hash: &str,
) -> RepoResult<User> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO user (id, username, display_name, role, password_hash, is_active, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6, ?6)",
    )
    .bind(id)
    .bind(username)
    .bind(display_name)
    .bind(role)
    .bind(password_hash)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create user".into()))
}

pub async fn count(pool: &SqlitePool) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Explicit secondary role lookup: membership in the `admin` table grants
/// the admin role regardless of the user row
pub async fn is_admin_listed(pool: &SqlitePool, user_id: i64) -> RepoResult<bool> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM admin WHERE user_id = ?")
        .bind(user_id)
        .fetch_one(pool)
        .await?;
    Ok(count > 0)
}

pub async fn grant_admin(pool: &SqlitePool, user_id: i64, granted_by: &str) -> RepoResult<()> {
    let now = shared::util::now_millis();
    sqlx::query("INSERT OR IGNORE INTO admin (user_id, granted_by, created_at) VALUES (?1, ?2, ?3)")
        .bind(user_id)
        .bind(granted_by)
        .bind(now)
        .execute(pool)
        .await?;
    Ok(())
}
