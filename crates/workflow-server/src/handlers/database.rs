//! Database schema check.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::error::AppResult;
use crate::state::AppState;

/// Tables the executor reads or writes.
pub const REQUIRED_TABLES: [&str; 7] = [
    "workflows",
    "workflow_executions",
    "tasks",
    "leads",
    "companies",
    "deals",
    "meetings",
];

/// Response for the schema check.
#[derive(Debug, Clone, Serialize)]
pub struct SchemaValidationResponse {
    pub status: String,
    pub message: String,
    pub schema: String,
    pub valid: bool,
    pub tables: Vec<String>,
    pub missing: Vec<String>,
}

/// Required tables absent from `existing`, in declaration order.
fn missing_tables(existing: &[String]) -> Vec<String> {
    REQUIRED_TABLES
        .iter()
        .filter(|t| !existing.iter().any(|e| e == *t))
        .map(|t| t.to_string())
        .collect()
}

/// Validate the database schema.
///
/// GET /api/db/validate
///
/// Reports which of the required tables exist in the configured schema.
pub async fn validate_database(
    State(state): State<AppState>,
) -> AppResult<Json<SchemaValidationResponse>> {
    let existing_tables: Vec<String> = sqlx::query_scalar(
        "SELECT table_name::text FROM information_schema.tables WHERE table_schema = $1 ORDER BY table_name",
    )
    .bind(state.schema.name())
    .fetch_all(&state.db)
    .await?;

    let missing = missing_tables(&existing_tables);
    let valid = missing.is_empty();

    Ok(Json(SchemaValidationResponse {
        status: "ok".to_string(),
        message: if valid {
            "Database schema is valid".to_string()
        } else {
            format!("Missing tables: {}", missing.join(", "))
        },
        schema: state.schema.name().to_string(),
        valid,
        tables: existing_tables,
        missing,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_tables() {
        let existing: Vec<String> = ["workflows", "leads", "deals", "activities"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        assert_eq!(
            missing_tables(&existing),
            vec!["workflow_executions", "tasks", "companies", "meetings"]
        );
    }

    #[test]
    fn test_nothing_missing() {
        let existing: Vec<String> = REQUIRED_TABLES.iter().map(|s| s.to_string()).collect();
        assert!(missing_tables(&existing).is_empty());
    }
}
