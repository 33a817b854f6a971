//! Workflow database queries.

use uuid::Uuid;

use super::Schema;
use crate::db::models::WorkflowRow;
use crate::db::DbPool;

/// Get a workflow by ID.
pub async fn get_workflow(
    pool: &DbPool,
    schema: &Schema,
    id: Uuid,
) -> Result<Option<WorkflowRow>, sqlx::Error> {
    let sql = format!(
        r#"
        SELECT id, user_id, name, description,
               entity_type::text AS entity_type,
               trigger_type::text AS trigger_type,
               trigger_config, is_active, actions, created_at, updated_at
        FROM {}
        WHERE id = $1
        "#,
        schema.table("workflows")
    );

    sqlx::query_as::<_, WorkflowRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
}
