use std::sync::Arc;

use villa_core::repository::{InMemoryVillaRepo, VillaRepository};
use villa_core::service::VillaService;
use villa_core::villa::seed_villas;
use villa_db::repositories::PgVillaRepo;

use crate::config::{ServerConfig, StorageBackend};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Villa resource service over the configured backend.
    pub villas: VillaService,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(repo: Arc<dyn VillaRepository>, config: Arc<ServerConfig>) -> Self {
        Self {
            villas: VillaService::new(repo),
            config,
        }
    }
}

/// Failures while opening the storage backend at startup.
#[derive(Debug, thiserror::Error)]
pub enum StorageInitError {
    #[error("DATABASE_URL must be set for the postgres backend")]
    MissingDatabaseUrl,

    #[error("Failed to connect to database: {0}")]
    Connect(#[from] sqlx::Error),

    #[error("Failed to run database migrations: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// Open the repository selected by `config.storage`.
///
/// For postgres this connects, health-checks and migrates before returning.
pub async fn open_repository(
    config: &ServerConfig,
) -> Result<Arc<dyn VillaRepository>, StorageInitError> {
    match config.storage {
        StorageBackend::Memory => {
            let repo = if config.seed_villas {
                InMemoryVillaRepo::with_villas(seed_villas())
            } else {
                InMemoryVillaRepo::new()
            };
            tracing::info!(seeded = config.seed_villas, "Using in-memory villa store");
            Ok(Arc::new(repo))
        }
        StorageBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .ok_or(StorageInitError::MissingDatabaseUrl)?;

            let pool = villa_db::create_pool(database_url).await?;
            tracing::info!("Database connection pool created");

            villa_db::health_check(&pool).await?;
            tracing::info!("Database health check passed");

            villa_db::run_migrations(&pool).await?;
            tracing::info!("Database migrations applied");

            Ok(Arc::new(PgVillaRepo::new(pool)))
        }
    }
}
