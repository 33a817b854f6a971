//! Execution query handlers.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use dealflow_engine::model::{Execution, ExecutionFilter, ExecutionStatus};
use dealflow_engine::WorkflowStore;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::result_ext::ResultExt;
use crate::state::AppState;

/// Query parameters for listing executions.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListExecutionsQuery {
    pub workflow_id: Option<Uuid>,
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl TryFrom<ListExecutionsQuery> for ExecutionFilter {
    type Error = AppError;

    fn try_from(query: ListExecutionsQuery) -> Result<Self, Self::Error> {
        let status = query
            .status
            .as_deref()
            .map(str::parse::<ExecutionStatus>)
            .transpose()
            .map_err(AppError::BadRequest)?;

        Ok(ExecutionFilter {
            workflow_id: query.workflow_id,
            status,
            limit: query.limit,
            offset: query.offset,
        })
    }
}

/// List executions, newest first.
///
/// GET /api/executions?workflowId=&status=&limit=&offset=
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListExecutionsQuery>,
) -> AppResult<Json<Vec<Execution>>> {
    let filter = ExecutionFilter::try_from(query)?;
    let executions = state
        .store()
        .list_executions(&filter)
        .await
        .log("listing executions")?;
    Ok(Json(executions))
}

/// Get one execution with its per-action results.
///
/// GET /api/executions/{execution_id}
pub async fn get(
    State(state): State<AppState>,
    Path(execution_id): Path<Uuid>,
) -> AppResult<Json<Execution>> {
    state
        .store()
        .get_execution(execution_id)
        .await
        .log("loading execution")?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Execution {}", execution_id)))
}
