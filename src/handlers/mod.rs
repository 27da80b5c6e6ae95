pub mod common;
pub mod diagnostics;
pub mod insights;
pub mod project;

pub use common::{parse_project_id, validate_optional, validate_required, JsonBody};
pub use diagnostics::{check_env, health, ApiKeyStatus, EnvCheckResponse, HealthResponse};
pub use insights::{generate_insights, InsightsRequest, InsightsResponse};
pub use project::{
    create_project, delete_project, get_project, list_projects, update_project,
    CreateProjectRequest, DeleteProjectResponse, ProjectResponse, UpdateProjectRequest,
};
