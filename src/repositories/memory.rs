use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use time::OffsetDateTime;
use tokio::sync::Mutex;

use crate::models::{CreateProject, Project, UpdateProject};
use crate::repositories::{touch, ProjectStore, StoreError, StoreResult};

/// In-memory project store for tests and local runs without a database
#[derive(Clone)]
pub struct InMemoryProjectStore {
    inner: Arc<Mutex<InMemoryStoreInner>>,
}

struct InMemoryStoreInner {
    next_id: i32,
    projects: BTreeMap<i32, Project>,
}

impl InMemoryProjectStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(InMemoryStoreInner {
                next_id: 1,
                projects: BTreeMap::new(),
            })),
        }
    }

    /// Number of stored projects
    pub async fn len(&self) -> usize {
        self.inner.lock().await.projects.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for InMemoryProjectStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProjectStore for InMemoryProjectStore {
    async fn list(&self) -> StoreResult<Vec<Project>> {
        let inner = self.inner.lock().await;
        let mut projects: Vec<Project> = inner.projects.values().cloned().collect();
        projects.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(projects)
    }

    async fn find_by_id(&self, id: i32) -> StoreResult<Project> {
        let inner = self.inner.lock().await;
        inner.projects.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    async fn create(&self, input: &CreateProject) -> StoreResult<Project> {
        let mut inner = self.inner.lock().await;
        let id = inner.next_id;
        inner.next_id = id
            .checked_add(1)
            .ok_or_else(|| StoreError::Backend("project id sequence exhausted".to_string()))?;

        let now = OffsetDateTime::now_utc();
        let project = Project {
            id,
            title: input.title.clone(),
            description: input.description.clone(),
            image_url: input.image_url.clone(),
            project_url: input.project_url.clone(),
            github_url: input.github_url.clone(),
            technologies: input.technologies.clone(),
            created_at: now,
            updated_at: now,
        };
        inner.projects.insert(id, project.clone());
        Ok(project)
    }

    async fn update(&self, id: i32, input: &UpdateProject) -> StoreResult<Project> {
        let mut inner = self.inner.lock().await;
        let project = inner.projects.get_mut(&id).ok_or(StoreError::NotFound)?;

        input.apply_to(project);
        project.updated_at = touch(project.updated_at);

        Ok(project.clone())
    }

    async fn delete(&self, id: i32) -> StoreResult<()> {
        let mut inner = self.inner.lock().await;
        inner
            .projects
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}
