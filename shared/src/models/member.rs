//! Member Model

use serde::{Deserialize, Serialize};

/// Youth group member
///
/// `attendance_code` is a globally unique 4-digit string in "1000"–"9999",
/// assigned once at registration (or backfilled for imported members) and
/// never reassigned while the member is active. It is the payload a member
/// presents at check-in, whether typed, shown as a QR code, or read by the
/// numeric scanner.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Member {
    pub id: i64,
    pub full_name: String,
    pub phone_primary: String,
    pub phone_secondary: Option<String>,
    pub address: String,
    /// "secondary" | "university" | "graduation"
    pub class_stage: String,
    pub university_year: Option<i64>,
    pub confessor_name: String,
    pub photo_url: Option<String>,
    pub notes: Option<String>,
    pub attendance_code: Option<String>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create member payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberCreate {
    pub full_name: String,
    pub phone_primary: String,
    pub phone_secondary: Option<String>,
    pub address: String,
    pub class_stage: String,
    pub university_year: Option<i64>,
    pub confessor_name: String,
    pub photo_url: Option<String>,
    pub notes: Option<String>,
}

/// Update member payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberUpdate {
    pub full_name: Option<String>,
    pub phone_primary: Option<String>,
    pub phone_secondary: Option<String>,
    pub address: Option<String>,
    pub class_stage: Option<String>,
    pub university_year: Option<i64>,
    pub confessor_name: Option<String>,
    pub photo_url: Option<String>,
    pub notes: Option<String>,
    pub is_active: Option<bool>,
}
