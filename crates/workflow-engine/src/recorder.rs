//! Execution recording.
//!
//! An execution row is written twice: once as `running` when the run starts,
//! and once more with the terminal status, per-action results and timing
//! when the action loop ends.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use crate::error::StoreError;
use crate::model::{ActionResult, ExecutionCompletion, ExecutionStatus, NewExecution, Workflow};
use crate::sanitize::sanitize_sensitive_data;
use crate::store::WorkflowStore;

/// Writes execution rows through the store.
#[derive(Clone)]
pub struct ExecutionRecorder {
    store: Arc<dyn WorkflowStore>,
}

/// A started execution, handed back to [`ExecutionRecorder::finish`].
#[derive(Debug)]
pub struct ExecutionHandle {
    pub id: Uuid,
    pub workflow_id: Uuid,
    pub started_at: DateTime<Utc>,
    started: Instant,
}

/// Summary of a finished execution.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionReport {
    pub execution_id: Uuid,
    pub workflow_id: Uuid,
    pub status: ExecutionStatus,
    pub actions_executed: Vec<ActionResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub duration_ms: i64,
}

impl ExecutionReport {
    /// True when at least one action failed.
    pub fn has_error(&self) -> bool {
        self.actions_executed.iter().any(ActionResult::is_failed)
    }
}

impl ExecutionRecorder {
    pub fn new(store: Arc<dyn WorkflowStore>) -> Self {
        Self { store }
    }

    /// Insert the `running` row for a new execution.
    ///
    /// Trigger data is redacted before it is persisted.
    pub async fn start(
        &self,
        workflow: &Workflow,
        entity_id: &str,
        trigger_data: &Value,
    ) -> Result<ExecutionHandle, StoreError> {
        let execution = NewExecution {
            id: Uuid::new_v4(),
            workflow_id: workflow.id,
            entity_type: workflow.entity_type,
            entity_id: entity_id.to_string(),
            trigger_data: sanitize_sensitive_data(trigger_data),
            started_at: Utc::now(),
        };

        self.store.create_execution(&execution).await?;

        tracing::info!(
            execution_id = %execution.id,
            workflow_id = %workflow.id,
            entity_type = %workflow.entity_type,
            entity_id = %entity_id,
            trigger_type = workflow.trigger_type.as_str(),
            "Execution started"
        );

        Ok(ExecutionHandle {
            id: execution.id,
            workflow_id: execution.workflow_id,
            started_at: execution.started_at,
            started: Instant::now(),
        })
    }

    /// Stamp the terminal status and results on a started execution.
    pub async fn finish(
        &self,
        handle: ExecutionHandle,
        results: Vec<ActionResult>,
    ) -> Result<ExecutionReport, StoreError> {
        let status = ExecutionStatus::from_results(&results);
        let error_message = summarize_failures(&results);
        let completed_at = Utc::now();
        let duration_ms = i64::try_from(handle.started.elapsed().as_millis()).unwrap_or(i64::MAX);

        let completion = ExecutionCompletion {
            status,
            actions_executed: results,
            error_message,
            completed_at,
            duration_ms,
        };
        // Actions have already had their side effects; one retry before
        // giving up on the row.
        if let Err(first) = self.store.complete_execution(handle.id, &completion).await {
            tracing::warn!(
                execution_id = %handle.id,
                error = %first,
                "Failed to finalize execution, retrying"
            );
            if let Err(e) = self.store.complete_execution(handle.id, &completion).await {
                tracing::error!(
                    execution_id = %handle.id,
                    workflow_id = %handle.workflow_id,
                    status = %status,
                    results = %serde_json::to_string(&completion.actions_executed)
                        .unwrap_or_default(),
                    error = %e,
                    "Execution left running, action results were not persisted"
                );
                return Err(e);
            }
        }

        tracing::info!(
            execution_id = %handle.id,
            workflow_id = %handle.workflow_id,
            status = %status,
            actions = completion.actions_executed.len(),
            duration_ms,
            "Execution finished"
        );

        Ok(ExecutionReport {
            execution_id: handle.id,
            workflow_id: handle.workflow_id,
            status,
            actions_executed: completion.actions_executed,
            error_message: completion.error_message,
            started_at: handle.started_at,
            completed_at,
            duration_ms,
        })
    }
}

impl std::fmt::Debug for ExecutionRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionRecorder").finish_non_exhaustive()
    }
}

/// One line per failed action, joined with `"; "`.
fn summarize_failures(results: &[ActionResult]) -> Option<String> {
    let messages: Vec<String> = results
        .iter()
        .filter(|r| r.is_failed())
        .map(|r| {
            format!(
                "Action {} ({}): {}",
                r.index,
                r.action_type,
                r.error.as_deref().unwrap_or("failed")
            )
        })
        .collect();

    if messages.is_empty() {
        None
    } else {
        Some(messages.join("; "))
    }
}
