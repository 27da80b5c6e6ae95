use anyhow::Context;
use tokio::signal;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use portfolio_api::config::Config;
use portfolio_api::handlers::{
    ApiKeyStatus, CreateProjectRequest, DeleteProjectResponse, EnvCheckResponse, HealthResponse,
    InsightsRequest, InsightsResponse, ProjectResponse, UpdateProjectRequest,
};
use portfolio_api::services::{ColumnMetrics, QualityMetrics};
use portfolio_api::state::AppState;
use portfolio_api::{build_router, handlers};

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::project::list_projects,
        handlers::project::create_project,
        handlers::project::get_project,
        handlers::project::update_project,
        handlers::project::delete_project,
        handlers::insights::generate_insights,
        handlers::diagnostics::health,
        handlers::diagnostics::check_env,
    ),
    components(schemas(
        CreateProjectRequest,
        UpdateProjectRequest,
        ProjectResponse,
        DeleteProjectResponse,
        InsightsRequest,
        InsightsResponse,
        QualityMetrics,
        ColumnMetrics,
        HealthResponse,
        EnvCheckResponse,
        ApiKeyStatus,
    )),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Projects", description = "Portfolio project management endpoints"),
        (name = "Insights", description = "Data-quality insights from an LLM provider")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    let addr = config.server_addr();

    // Initialize tracing, RUST_LOG wins over LOG_LEVEL
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    // Initialize application state (connects to the database)
    tracing::info!("Connecting to database...");
    let state = AppState::new(config)
        .await
        .context("Failed to initialize application state")?;
    tracing::info!("Database connection established");

    // Build the main application router
    let app = build_router(state.clone())
        // Add Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Server started on http://{}", addr);
    tracing::info!("Swagger UI: http://{}/swagger-ui/", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    state.shutdown().await;
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
