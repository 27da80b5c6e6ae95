use portfolio_api::models::{CreateProject, Project};
use portfolio_api::repositories::ProjectStore;
use portfolio_api::state::AppState;

/// Factory for creating test data
pub struct Factory<'a> {
    state: &'a AppState,
}

impl<'a> Factory<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Create a test project with every field filled
    pub async fn create_project(&self) -> Project {
        self.create_project_with_title("Test Portfolio Website").await
    }

    /// Create a test project with a specific title
    pub async fn create_project_with_title(&self, title: &str) -> Project {
        let input = CreateProject {
            title: title.to_string(),
            description: "A test portfolio website built with Rust".to_string(),
            image_url: Some("https://cdn.example.com/test-project.jpg".to_string()),
            project_url: Some("https://test-portfolio.example.com".to_string()),
            github_url: Some("https://github.com/testuser/portfolio".to_string()),
            technologies: vec![
                "Rust".to_string(),
                "Axum".to_string(),
                "PostgreSQL".to_string(),
            ],
        };

        self.state.projects.create(&input).await.unwrap()
    }
}
