//! Meeting Model

use serde::{Deserialize, Serialize};

/// Scheduled gathering
///
/// `date` is the day the meeting falls on (midnight millis), kept separate
/// from `start_time`/`end_time` so day-range queries don't depend on the
/// meeting hour. The attendance flow reads `start_time` to compute lateness.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Meeting {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    /// "regular" | "special" | "training"
    pub kind: String,
    /// "scheduled" | "completed" | "cancelled"
    pub status: String,
    pub date: i64,
    pub start_time: i64,
    pub end_time: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create meeting payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingCreate {
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub kind: String,
    pub date: i64,
    pub start_time: i64,
    pub end_time: i64,
}

/// Update meeting payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub kind: Option<String>,
    pub status: Option<String>,
    pub date: Option<i64>,
    pub start_time: Option<i64>,
    pub end_time: Option<i64>,
}
