use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, DatabaseConnection, EntityTrait, QueryOrder, Set,
};
use time::OffsetDateTime;

use crate::entity::project::{self, ActiveModel, Column, Entity as ProjectEntity};
use crate::models::{CreateProject, Project, UpdateProject};
use crate::repositories::{touch, ProjectStore, StoreError, StoreResult};

/// Project repository backed by PostgreSQL through SeaORM
#[derive(Clone)]
pub struct ProjectRepository {
    db: DatabaseConnection,
}

impl ProjectRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProjectStore for ProjectRepository {
    async fn list(&self) -> StoreResult<Vec<Project>> {
        let models = ProjectEntity::find()
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(|m| m.into()).collect())
    }

    async fn find_by_id(&self, id: i32) -> StoreResult<Project> {
        let model = ProjectEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(StoreError::NotFound)?;

        Ok(model.into())
    }

    async fn create(&self, input: &CreateProject) -> StoreResult<Project> {
        // One clock reading so created_at == updated_at on a fresh row
        let now = OffsetDateTime::now_utc();

        let model = ActiveModel {
            id: NotSet,
            title: Set(input.title.clone()),
            description: Set(input.description.clone()),
            image_url: Set(input.image_url.clone()),
            project_url: Set(input.project_url.clone()),
            github_url: Set(input.github_url.clone()),
            technologies: Set(input.technologies.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = model.insert(&self.db).await?;
        Ok(result.into())
    }

    async fn update(&self, id: i32, input: &UpdateProject) -> StoreResult<Project> {
        let model = ProjectEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(StoreError::NotFound)?;

        let updated_at = touch(model.updated_at);
        let mut active: ActiveModel = model.into();

        if let Some(title) = &input.title {
            active.title = Set(title.clone());
        }
        if let Some(description) = &input.description {
            active.description = Set(description.clone());
        }
        if let Some(image_url) = &input.image_url {
            active.image_url = Set(image_url.clone());
        }
        if let Some(project_url) = &input.project_url {
            active.project_url = Set(project_url.clone());
        }
        if let Some(github_url) = &input.github_url {
            active.github_url = Set(github_url.clone());
        }
        if let Some(technologies) = &input.technologies {
            active.technologies = Set(technologies.clone());
        }
        active.updated_at = Set(updated_at);

        // A concurrent delete surfaces here as RecordNotUpdated -> NotFound
        let result = active.update(&self.db).await?;
        Ok(result.into())
    }

    async fn delete(&self, id: i32) -> StoreResult<()> {
        let result = ProjectEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }

    async fn close(&self) -> StoreResult<()> {
        self.db.clone().close().await?;
        Ok(())
    }
}

// Conversion from SeaORM model to our domain model
impl From<project::Model> for Project {
    fn from(m: project::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            description: m.description,
            image_url: m.image_url,
            project_url: m.project_url,
            github_url: m.github_url,
            technologies: m.technologies,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}
