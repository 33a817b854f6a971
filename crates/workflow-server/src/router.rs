//! Route table.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the application router with all routes.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let health_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api/health", get(handlers::api_health));

    let workflow_routes = Router::new()
        .route("/api/workflows/execute", post(handlers::execute_workflow))
        .route(
            "/functions/v1/execute-workflow",
            post(handlers::execute_workflow),
        );

    let execution_routes = Router::new()
        .route("/api/executions", get(handlers::executions::list))
        .route(
            "/api/executions/{execution_id}",
            get(handlers::executions::get),
        );

    let database_routes = Router::new().route(
        "/api/db/validate",
        get(handlers::database::validate_database),
    );

    Router::new()
        .merge(health_routes)
        .merge(workflow_routes)
        .merge(execution_routes)
        .merge(database_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
