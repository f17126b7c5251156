//! Data models
//!
//! Shared between flock-server and API clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are Snowflake-style `i64` values; all timestamps are Unix millis.

mod attendance;
mod meeting;
mod member;
mod notification;
mod post;
mod user;

pub use attendance::{AttendanceLog, CheckInMethod, NewAttendanceLog};
pub use meeting::{Meeting, MeetingCreate, MeetingUpdate};
pub use member::{Member, MemberCreate, MemberUpdate};
pub use notification::{Notification, NotificationCreate};
pub use post::{Post, PostComment, PostCreate, PostWithCounts};
pub use user::User;
