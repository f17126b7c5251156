//! Attendance Log Model

use serde::{Deserialize, Serialize};

/// How a check-in was performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckInMethod {
    /// Operator picked the member from the list
    Manual,
    /// Member presented their code as a QR payload
    Qr,
    /// Code read off a card by the numeric scanner
    Scan,
}

impl CheckInMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            CheckInMethod::Manual => "manual",
            CheckInMethod::Qr => "qr",
            CheckInMethod::Scan => "scan",
        }
    }
}

impl std::fmt::Display for CheckInMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One successful check-in
///
/// At most one log exists per (member_id, meeting_id) pair; the store
/// enforces this with a composite unique index. Only the check-out update
/// mutates a log after insertion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct AttendanceLog {
    pub id: i64,
    pub member_id: i64,
    pub meeting_id: i64,
    pub check_in_time: i64,
    pub check_out_time: Option<i64>,
    /// "manual" | "qr" | "scan"
    pub method: String,
    /// Whole minutes after meeting start, floored at zero
    pub lateness_minutes: i64,
    /// Username of the operator who recorded the check-in
    pub recorded_by: String,
    pub note: Option<String>,
    pub created_at: i64,
}

/// A check-in that has not been persisted yet
///
/// This is both the insert payload for the attendance repository and the
/// record format of the offline queue (serialized as JSON while pending).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAttendanceLog {
    pub member_id: i64,
    pub meeting_id: i64,
    pub check_in_time: i64,
    pub method: CheckInMethod,
    pub lateness_minutes: i64,
    pub recorded_by: String,
    pub note: Option<String>,
}
