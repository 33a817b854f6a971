//! Liveness and readiness.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use serde_json::{json, Value};

use crate::db::pool::health_check as db_reachable;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseStatus {
    Connected,
    Disconnected,
}

#[derive(Debug, Serialize)]
pub struct ApiHealthResponse {
    pub status: &'static str,
    pub database: DatabaseStatus,
    pub server: String,
    pub uptime_seconds: u64,
    pub version: &'static str,
}

impl ApiHealthResponse {
    fn status_code(&self) -> StatusCode {
        match self.database {
            DatabaseStatus::Connected => StatusCode::OK,
            DatabaseStatus::Disconnected => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

/// `GET /health`: answers while the process is serving.
pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// `GET /api/health`: 503 when Postgres cannot be reached.
pub async fn api_health(State(state): State<AppState>) -> (StatusCode, Json<ApiHealthResponse>) {
    let database = if db_reachable(&state.db).await {
        DatabaseStatus::Connected
    } else {
        DatabaseStatus::Disconnected
    };

    let response = ApiHealthResponse {
        status: match database {
            DatabaseStatus::Connected => "ok",
            DatabaseStatus::Disconnected => "unhealthy",
        },
        database,
        server: state.config.server_name.clone(),
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION"),
    };

    (response.status_code(), Json(response))
}
