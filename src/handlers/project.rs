use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;

use crate::error::AppResult;
use crate::handlers::common::{
    parse_project_id, validate_optional, validate_required, validate_technologies, JsonBody,
};
use crate::models::{CreateProject, Patch, Project, UpdateProject};
use crate::state::AppState;

// ============ Request/Response DTOs ============

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub image_url: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub project_url: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub github_url: Patch<String>,
    pub technologies: Option<Vec<String>>,
}

/// Partial update: keys left out of the body are not touched
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectRequest {
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub title: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub description: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub image_url: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub project_url: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub github_url: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<Vec<String>>)]
    pub technologies: Patch<Vec<String>>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResponse {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub project_url: Option<String>,
    pub github_url: Option<String>,
    pub technologies: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String)]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String)]
    pub updated_at: OffsetDateTime,
}

impl From<Project> for ProjectResponse {
    fn from(p: Project) -> Self {
        Self {
            id: p.id,
            title: p.title,
            description: p.description,
            image_url: p.image_url,
            project_url: p.project_url,
            github_url: p.github_url,
            technologies: p.technologies,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteProjectResponse {
    pub message: String,
}

// ============ Validation ============

impl CreateProjectRequest {
    /// Fail fast on the first violated rule, in field order
    pub fn validate(self) -> AppResult<CreateProject> {
        let title = validate_required(self.title, "Title is required")?;
        let description = validate_required(self.description, "Description is required")?;
        let technologies =
            validate_technologies(self.technologies, "At least one technology is required")?;

        Ok(CreateProject {
            title,
            description,
            image_url: validate_optional("imageUrl", self.image_url)?,
            project_url: validate_optional("projectUrl", self.project_url)?,
            github_url: validate_optional("githubUrl", self.github_url)?,
            technologies,
        })
    }
}

impl UpdateProjectRequest {
    /// Validate only the fields that are present
    pub fn validate(self) -> AppResult<UpdateProject> {
        let title = when_present(self.title, |v| validate_required(v, "Title cannot be empty"))?;
        let description = when_present(self.description, |v| {
            validate_required(v, "Description cannot be empty")
        })?;
        let technologies = when_present(self.technologies, |v| {
            validate_technologies(v, "Technologies must be a non-empty array")
        })?;

        Ok(UpdateProject {
            title,
            description,
            image_url: optional_url("imageUrl", self.image_url)?,
            project_url: optional_url("projectUrl", self.project_url)?,
            github_url: optional_url("githubUrl", self.github_url)?,
            technologies,
        })
    }
}

fn when_present<T, U>(
    patch: Patch<T>,
    validate: impl FnOnce(Option<T>) -> AppResult<U>,
) -> AppResult<Option<U>> {
    if patch.is_absent() {
        return Ok(None);
    }
    validate(patch.into_option()).map(Some)
}

fn optional_url(field: &str, patch: Patch<String>) -> AppResult<Option<Option<String>>> {
    if patch.is_absent() {
        return Ok(None);
    }
    validate_optional(field, patch).map(Some)
}

// ============ Handlers ============

/// List all projects, newest first
#[utoipa::path(
    get,
    path = "/api/projects",
    responses(
        (status = 200, description = "List of projects", body = Vec<ProjectResponse>),
        (status = 500, description = "Failed to fetch projects")
    ),
    tag = "Projects"
)]
pub async fn list_projects(State(state): State<AppState>) -> AppResult<Json<Vec<ProjectResponse>>> {
    let projects = state
        .projects
        .list()
        .await
        .map_err(|e| e.into_app_error("fetch projects"))?;

    Ok(Json(projects.into_iter().map(|p| p.into()).collect()))
}

/// Create a new project
#[utoipa::path(
    post,
    path = "/api/projects",
    request_body = CreateProjectRequest,
    responses(
        (status = 201, description = "Project created successfully", body = ProjectResponse),
        (status = 400, description = "Validation error"),
        (status = 500, description = "Failed to create project")
    ),
    tag = "Projects"
)]
pub async fn create_project(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateProjectRequest>,
) -> AppResult<(StatusCode, Json<ProjectResponse>)> {
    let input = payload.validate()?;

    let project = state
        .projects
        .create(&input)
        .await
        .map_err(|e| e.into_app_error("create project"))?;

    tracing::info!(project_id = project.id, "Project created");
    Ok((StatusCode::CREATED, Json(project.into())))
}

/// Get a project by ID
#[utoipa::path(
    get,
    path = "/api/projects/{id}",
    params(
        ("id" = i32, Path, description = "Project ID")
    ),
    responses(
        (status = 200, description = "Project details", body = ProjectResponse),
        (status = 400, description = "Invalid project ID"),
        (status = 404, description = "Project not found")
    ),
    tag = "Projects"
)]
pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ProjectResponse>> {
    let id = parse_project_id(&id)?;

    let project = state
        .projects
        .find_by_id(id)
        .await
        .map_err(|e| e.into_app_error("fetch project"))?;

    Ok(Json(project.into()))
}

/// Update a project
#[utoipa::path(
    put,
    path = "/api/projects/{id}",
    params(
        ("id" = i32, Path, description = "Project ID")
    ),
    request_body = UpdateProjectRequest,
    responses(
        (status = 200, description = "Project updated successfully", body = ProjectResponse),
        (status = 400, description = "Invalid project ID or validation error"),
        (status = 404, description = "Project not found")
    ),
    tag = "Projects"
)]
pub async fn update_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<UpdateProjectRequest>,
) -> AppResult<Json<ProjectResponse>> {
    let id = parse_project_id(&id)?;
    let input = payload.validate()?;

    let project = state
        .projects
        .update(id, &input)
        .await
        .map_err(|e| e.into_app_error("update project"))?;

    tracing::info!(project_id = project.id, "Project updated");
    Ok(Json(project.into()))
}

/// Delete a project
#[utoipa::path(
    delete,
    path = "/api/projects/{id}",
    params(
        ("id" = i32, Path, description = "Project ID")
    ),
    responses(
        (status = 200, description = "Project deleted successfully", body = DeleteProjectResponse),
        (status = 400, description = "Invalid project ID"),
        (status = 404, description = "Project not found")
    ),
    tag = "Projects"
)]
pub async fn delete_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DeleteProjectResponse>> {
    let id = parse_project_id(&id)?;

    state
        .projects
        .delete(id)
        .await
        .map_err(|e| e.into_app_error("delete project"))?;

    tracing::info!(project_id = id, "Project deleted");
    Ok(Json(DeleteProjectResponse {
        message: "Project deleted successfully".to_string(),
    }))
}
