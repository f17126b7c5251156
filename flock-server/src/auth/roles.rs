//! Role resolution
//!
//! The effective role is a function of (token claims, user id) with the
//! `admin` table as an explicit secondary lookup. An operator promoted
//! after their token was issued gets admin on the next request without
//! re-login.

use sqlx::SqlitePool;

use crate::db::repository::{RepoResult, user};

/// Resolve the effective role for a request
///
/// Order: an `admin` claim wins; otherwise membership in the `admin` table
/// grants admin; otherwise the claim role stands.
pub async fn resolve_role(claims_role: &str, user_id: i64, pool: &SqlitePool) -> RepoResult<String> {
    if claims_role == "admin" {
        return Ok("admin".to_string());
    }
    if user::is_admin_listed(pool, user_id).await? {
        return Ok("admin".to_string());
    }
    Ok(claims_role.to_string())
}
