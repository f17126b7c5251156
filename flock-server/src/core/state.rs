//! Server state

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::{JwtConfig, JwtService};
use crate::checkin::{AttendanceRecorder, CodeAllocator, ConnectivityState, OfflineQueue};
use crate::core::Config;
use crate::db::DbService;
use crate::db::repository::user;
use crate::utils::AppError;

/// Shared server state — one instance, cloned cheaply into handlers
///
/// | Field | Purpose |
/// |-------|---------|
/// | config | Immutable settings |
/// | pool | SQLite connection pool (system of record) |
/// | jwt_service | Token issuing/validation |
/// | offline_queue | Durable buffer for offline check-ins |
/// | connectivity | Online/offline signal |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub pool: SqlitePool,
    pub jwt_service: Arc<JwtService>,
    pub offline_queue: Arc<OfflineQueue>,
    pub connectivity: ConnectivityState,
}

impl ServerState {
    /// Bring up the station: directories, database, queue, services, and
    /// the one-time startup fixes (code counter floor, admin seed)
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        config
            .ensure_work_dir_structure()
            .map_err(|e| AppError::internal(format!("Failed to create work directory: {e}")))?;

        let db_path = config.database_dir().join("flock.db");
        let db_service = DbService::new(&db_path.to_string_lossy()).await?;
        let pool = db_service.pool;

        let queue_path = config.queue_dir().join("pending.redb");
        let offline_queue = Arc::new(
            OfflineQueue::open(&queue_path)
                .map_err(|e| AppError::internal(format!("Failed to open offline queue: {e}")))?,
        );

        let jwt_config = JwtConfig::from_env(config.is_production())
            .map_err(|e| AppError::internal(e.to_string()))?;
        let jwt_service = Arc::new(JwtService::new(jwt_config));

        let connectivity = ConnectivityState::new(!config.start_offline);

        let state = Self {
            config: config.clone(),
            pool,
            jwt_service,
            offline_queue,
            connectivity,
        };

        // Imported members may carry codes above the fresh counter
        state.allocator().sync_floor().await.map_err(AppError::from)?;
        state.seed_admin_if_empty().await?;

        Ok(state)
    }

    pub fn allocator(&self) -> CodeAllocator {
        CodeAllocator::new(self.pool.clone())
    }

    pub fn recorder(&self) -> AttendanceRecorder {
        AttendanceRecorder::new(
            self.pool.clone(),
            self.offline_queue.clone(),
            self.connectivity.clone(),
        )
    }

    /// Create the first admin account on an empty station
    async fn seed_admin_if_empty(&self) -> Result<(), AppError> {
        if user::count(&self.pool).await? > 0 {
            return Ok(());
        }
        let (Some(username), Some(password)) =
            (&self.config.admin_username, &self.config.admin_password)
        else {
            tracing::warn!(
                "No users exist and ADMIN_USERNAME/ADMIN_PASSWORD are not set; \
                 nobody can log in until they are"
            );
            return Ok(());
        };

        let hash = crate::api::auth::hash_password(password)?;
        let admin = user::create(&self.pool, username, username, "admin", &hash).await?;
        user::grant_admin(&self.pool, admin.id, "bootstrap").await?;
        tracing::info!(username = %username, "Seeded initial admin account");
        Ok(())
    }
}
