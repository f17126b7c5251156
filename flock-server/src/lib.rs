//! Flock check-in station server
//!
//! Membership and attendance management for a church youth group, run as a
//! self-contained edge server at the meeting venue.
//!
//! # Module structure
//!
//! ```text
//! flock-server/src/
//! ├── core/          # Config, state, server, background tasks
//! ├── auth/          # JWT auth, role resolution, middleware
//! ├── api/           # HTTP routes and handlers
//! ├── db/            # SQLite pool, migrations, repositories
//! ├── checkin/       # Code allocation/validation, recorder, offline queue
//! ├── scanner/       # Camera + OCR numeric code scanner
//! ├── schedule/      # Friday meeting generation
//! └── utils/         # Errors, logging, time, validation
//! ```

pub mod api;
pub mod auth;
pub mod checkin;
pub mod core;
pub mod db;
pub mod scanner;
pub mod schedule;
pub mod utils;

// Re-export public types
pub use auth::{CurrentUser, JwtService};
pub use checkin::{AttendanceRecorder, CodeAllocator, ConnectivityState, OfflineQueue};
pub use core::{Config, Server, ServerState};
pub use scanner::NumberScanner;
pub use utils::{AppError, AppResult};
pub use utils::logger::{init_logger, init_logger_with_file};

/// Environment setup for the binary: dotenv then logging
pub fn setup_environment(config: &Config) {
    let log_dir = config.log_dir();
    init_logger_with_file(&config.log_level, log_dir.to_str());
}
