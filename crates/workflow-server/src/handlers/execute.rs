//! Workflow invocation handler.

use axum::{extract::State, Json};
use dealflow_engine::model::{ActionResult, ExecutionStatus};
use dealflow_engine::{ExecuteWorkflowRequest, RunOutcome};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::AppResult;
use crate::result_ext::ResultExt;
use crate::state::AppState;

/// Response for a workflow invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteWorkflowResponse {
    pub success: bool,
    /// `None` when the workflow was skipped.
    pub execution_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ExecutionStatus>,
    pub actions_executed: Vec<ActionResult>,
    pub has_error: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<i64>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub skipped: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<RunOutcome> for ExecuteWorkflowResponse {
    fn from(outcome: RunOutcome) -> Self {
        match outcome {
            RunOutcome::Skipped { reason, .. } => Self {
                success: true,
                execution_id: None,
                status: None,
                actions_executed: Vec::new(),
                has_error: false,
                error_message: None,
                duration_ms: None,
                skipped: true,
                message: Some(reason),
            },
            RunOutcome::Executed(report) => Self {
                success: true,
                execution_id: Some(report.execution_id),
                status: Some(report.status),
                has_error: report.has_error(),
                actions_executed: report.actions_executed,
                error_message: report.error_message,
                duration_ms: Some(report.duration_ms),
                skipped: false,
                message: None,
            },
        }
    }
}

/// Execute a workflow against one entity.
///
/// POST /api/workflows/execute
/// POST /functions/v1/execute-workflow
///
/// Body: `{workflowId, entityId, triggerData?, manual?}`. Action failures
/// are reported in `actionsExecuted` with `hasError: true`; only a missing
/// workflow or a store failure turns into an error response.
pub async fn execute_workflow(
    State(state): State<AppState>,
    Json(request): Json<ExecuteWorkflowRequest>,
) -> AppResult<Json<ExecuteWorkflowResponse>> {
    info!(
        workflow_id = %request.workflow_id,
        entity_id = %request.entity_id,
        manual = request.manual,
        "Workflow execution requested"
    );

    let outcome = state
        .runner
        .run(&request)
        .await
        .log(format!("executing workflow {}", request.workflow_id))?;

    Ok(Json(outcome.into()))
}
