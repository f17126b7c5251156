//! User Model (station operators)

use serde::{Deserialize, Serialize};

/// Operator account
///
/// `role` is the claim baked into issued tokens; the effective role is
/// resolved per request together with the `admin` table fallback (see
/// `auth::roles` in flock-server).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub username: String,
    pub display_name: String,
    /// "admin" | "servant"
    pub role: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}
