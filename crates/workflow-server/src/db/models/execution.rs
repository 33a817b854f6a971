//! Workflow execution database model.

use chrono::{DateTime, Utc};
use dealflow_engine::model::{ActionResult, EntityType, Execution, ExecutionStatus};
use dealflow_engine::StoreError;
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Row of the `workflow_executions` table.
#[derive(Debug, Clone, FromRow)]
pub struct ExecutionRow {
    pub id: Uuid,
    pub workflow_id: Uuid,
    pub entity_type: String,
    pub entity_id: String,
    #[sqlx(default)]
    pub trigger_data: Option<Value>,
    pub status: String,
    #[sqlx(default)]
    pub actions_executed: Option<Value>,
    #[sqlx(default)]
    pub error_message: Option<String>,
    pub started_at: DateTime<Utc>,
    #[sqlx(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[sqlx(default)]
    pub duration_ms: Option<i64>,
}

impl TryFrom<ExecutionRow> for Execution {
    type Error = StoreError;

    fn try_from(row: ExecutionRow) -> Result<Self, Self::Error> {
        let entity_type: EntityType = row
            .entity_type
            .parse()
            .map_err(|e| StoreError::Backend(format!("execution {}: {}", row.id, e)))?;
        let status: ExecutionStatus = row
            .status
            .parse()
            .map_err(|e| StoreError::Backend(format!("execution {}: {}", row.id, e)))?;

        let actions_executed: Vec<ActionResult> = match row.actions_executed {
            None | Some(Value::Null) => Vec::new(),
            Some(value) => serde_json::from_value(value).map_err(|e| {
                StoreError::Backend(format!("execution {}: actions_executed: {}", row.id, e))
            })?,
        };

        Ok(Execution {
            id: row.id,
            workflow_id: row.workflow_id,
            entity_type,
            entity_id: row.entity_id,
            trigger_data: row.trigger_data.unwrap_or(Value::Null),
            status,
            actions_executed,
            error_message: row.error_message,
            started_at: row.started_at,
            completed_at: row.completed_at,
            duration_ms: row.duration_ms,
        })
    }
}
