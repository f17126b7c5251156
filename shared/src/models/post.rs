//! Post Model (social feed)

use serde::{Deserialize, Serialize};

/// Feed post
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Post {
    pub id: i64,
    pub author_id: i64,
    pub author_name: String,
    pub content: String,
    pub image_url: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Post with aggregate counts (for feed listings)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PostWithCounts {
    pub id: i64,
    pub author_id: i64,
    pub author_name: String,
    pub content: String,
    pub image_url: Option<String>,
    pub like_count: i64,
    pub comment_count: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create post payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostCreate {
    pub content: String,
    pub image_url: Option<String>,
}

/// Comment on a post
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PostComment {
    pub id: i64,
    pub post_id: i64,
    pub author_id: i64,
    pub author_name: String,
    pub content: String,
    pub created_at: i64,
}
