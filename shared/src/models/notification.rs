//! Notification Model
//!
//! Notification records only — delivery (push/web-push) is an external
//! concern and lives outside this system.

use serde::{Deserialize, Serialize};

/// Stored notification
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Notification {
    pub id: i64,
    pub title: String,
    pub message: String,
    pub image_url: Option<String>,
    /// "all" | "individuals"
    pub audience: String,
    /// JSON array of user IDs when audience = "individuals"
    pub target_ids: Option<String>,
    pub created_by: String,
    pub created_at: i64,
}

/// Create notification payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationCreate {
    pub title: String,
    pub message: String,
    pub image_url: Option<String>,
    pub audience: String,
    pub target_ids: Option<Vec<i64>>,
}
