use std::sync::Arc;

use sea_orm::{ConnectOptions, Database};
use sqlx::postgres::PgPool;

use crate::config::Config;
use crate::repositories::{ProjectRepository, ProjectStore};
use crate::services::InsightsService;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Project persistence, PostgreSQL in production
    pub projects: Arc<dyn ProjectStore>,
    pub insights: InsightsService,
    pub config: Config,
}

impl AppState {
    /// Create a new AppState by connecting to the database
    pub async fn new(config: Config) -> Result<Self, AppStateError> {
        // Connect to PostgreSQL with SQLx (for migrations)
        let pg_pool = PgPool::connect(&config.database_url)
            .await
            .map_err(|e| AppStateError::Postgres(e.to_string()))?;

        // Run migrations
        sqlx::migrate!("./migrations")
            .run(&pg_pool)
            .await
            .map_err(|e| AppStateError::Migration(e.to_string()))?;
        pg_pool.close().await;

        // Connect to PostgreSQL with SeaORM
        let mut opt = ConnectOptions::new(&config.database_url);
        opt.max_connections(config.database_max_connections)
            .min_connections(1)
            .sqlx_logging(true);

        let db = Database::connect(opt)
            .await
            .map_err(|e| AppStateError::Postgres(e.to_string()))?;

        Self::with_store(config, Arc::new(ProjectRepository::new(db)))
    }

    /// Create AppState with a custom project store (for testing)
    pub fn with_store(
        config: Config,
        projects: Arc<dyn ProjectStore>,
    ) -> Result<Self, AppStateError> {
        let insights =
            InsightsService::new(&config).map_err(|e| AppStateError::HttpClient(e.to_string()))?;

        Ok(Self {
            projects,
            insights,
            config,
        })
    }

    /// Release the store's connections
    pub async fn shutdown(&self) {
        match self.projects.close().await {
            Ok(()) => tracing::info!("Project store closed"),
            Err(e) => tracing::warn!("Failed to close project store: {}", e),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppStateError {
    #[error("PostgreSQL connection error: {0}")]
    Postgres(String),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("HTTP client error: {0}")]
    HttpClient(String),
}
