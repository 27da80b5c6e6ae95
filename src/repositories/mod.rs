pub mod memory;
pub mod project;

pub use memory::InMemoryProjectStore;
pub use project::ProjectRepository;

use async_trait::async_trait;
use time::OffsetDateTime;

use crate::error::AppError;
use crate::models::{CreateProject, Project, UpdateProject};

/// Typed outcome of a store operation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,

    #[error("{0}")]
    Backend(String),
}

impl StoreError {
    /// Translate to a handler error; `action` reads like "update project"
    pub fn into_app_error(self, action: &'static str) -> AppError {
        match self {
            StoreError::NotFound => AppError::NotFound("Project".to_string()),
            StoreError::Backend(detail) => AppError::Store { action, detail },
        }
    }
}

impl From<sea_orm::DbErr> for StoreError {
    fn from(err: sea_orm::DbErr) -> Self {
        match err {
            sea_orm::DbErr::RecordNotFound(_) | sea_orm::DbErr::RecordNotUpdated => {
                StoreError::NotFound
            }
            _ => StoreError::Backend(err.to_string()),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Next `updated_at` for a record last stamped at `previous`; never earlier
/// than `previous`, even if the wall clock stepped back
pub fn touch(previous: OffsetDateTime) -> OffsetDateTime {
    OffsetDateTime::now_utc().max(previous)
}

/// Persistence boundary for project records.
///
/// The store owns record identity and timestamps; callers never supply them.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// All projects, newest first (ties: higher id first)
    async fn list(&self) -> StoreResult<Vec<Project>>;

    /// Find project by ID
    async fn find_by_id(&self, id: i32) -> StoreResult<Project>;

    /// Insert a project, assigning id and timestamps
    async fn create(&self, input: &CreateProject) -> StoreResult<Project>;

    /// Change only the supplied fields and refresh `updated_at`
    async fn update(&self, id: i32, input: &UpdateProject) -> StoreResult<Project>;

    /// Remove a project
    async fn delete(&self, id: i32) -> StoreResult<()>;

    /// Release connections on shutdown
    async fn close(&self) -> StoreResult<()> {
        Ok(())
    }
}
