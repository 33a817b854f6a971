//! Workflow execution database queries.

use dealflow_engine::model::{ExecutionCompletion, ExecutionFilter, NewExecution};
use sqlx::types::Json;
use uuid::Uuid;

use super::Schema;
use crate::db::models::ExecutionRow;
use crate::db::DbPool;

const EXECUTION_COLUMNS: &str = r#"
    id, workflow_id, entity_type, entity_id, trigger_data, status,
    actions_executed, error_message, started_at, completed_at, duration_ms
"#;

/// Insert a new execution in `running` state.
pub async fn insert_execution(
    pool: &DbPool,
    schema: &Schema,
    execution: &NewExecution,
) -> Result<(), sqlx::Error> {
    let sql = format!(
        r#"
        INSERT INTO {} (id, workflow_id, entity_type, entity_id, trigger_data, status,
                        actions_executed, started_at)
        VALUES ($1, $2, $3, $4, $5, 'running', '[]'::jsonb, $6)
        "#,
        schema.table("workflow_executions")
    );

    sqlx::query(&sql)
        .bind(execution.id)
        .bind(execution.workflow_id)
        .bind(execution.entity_type.as_str())
        .bind(&execution.entity_id)
        .bind(&execution.trigger_data)
        .bind(execution.started_at)
        .execute(pool)
        .await?;

    Ok(())
}

/// Write the terminal state of an execution.
///
/// Returns the number of rows updated.
pub async fn complete_execution(
    pool: &DbPool,
    schema: &Schema,
    id: Uuid,
    completion: &ExecutionCompletion,
) -> Result<u64, sqlx::Error> {
    let sql = format!(
        r#"
        UPDATE {}
        SET status = $2,
            actions_executed = $3,
            error_message = $4,
            completed_at = $5,
            duration_ms = $6
        WHERE id = $1
        "#,
        schema.table("workflow_executions")
    );

    let result = sqlx::query(&sql)
        .bind(id)
        .bind(completion.status.as_str())
        .bind(Json(&completion.actions_executed))
        .bind(completion.error_message.as_deref())
        .bind(completion.completed_at)
        .bind(completion.duration_ms)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// List executions newest first.
pub async fn list_executions(
    pool: &DbPool,
    schema: &Schema,
    filter: &ExecutionFilter,
) -> Result<Vec<ExecutionRow>, sqlx::Error> {
    let sql = format!(
        r#"
        SELECT {}
        FROM {}
        WHERE ($1::UUID IS NULL OR workflow_id = $1)
          AND ($2::TEXT IS NULL OR status = $2)
        ORDER BY started_at DESC
        LIMIT $3 OFFSET $4
        "#,
        EXECUTION_COLUMNS,
        schema.table("workflow_executions")
    );

    sqlx::query_as::<_, ExecutionRow>(&sql)
        .bind(filter.workflow_id)
        .bind(filter.status.map(|s| s.as_str()))
        .bind(filter.effective_limit())
        .bind(filter.effective_offset())
        .fetch_all(pool)
        .await
}

/// Get an execution by ID.
pub async fn get_execution(
    pool: &DbPool,
    schema: &Schema,
    id: Uuid,
) -> Result<Option<ExecutionRow>, sqlx::Error> {
    let sql = format!(
        "SELECT {} FROM {} WHERE id = $1",
        EXECUTION_COLUMNS,
        schema.table("workflow_executions")
    );

    sqlx::query_as::<_, ExecutionRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
}
