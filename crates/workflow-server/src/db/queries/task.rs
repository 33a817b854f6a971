//! Task insert for `create_task` actions.

use dealflow_engine::model::NewTask;
use uuid::Uuid;

use super::Schema;
use crate::db::DbPool;

/// Insert a pending task and return its ID.
pub async fn insert_task(pool: &DbPool, schema: &Schema, task: &NewTask) -> Result<Uuid, sqlx::Error> {
    let sql = format!(
        r#"
        INSERT INTO {} (id, user_id, title, description, priority, due_date, status,
                        related_entity_type, related_entity_id, workflow_id)
        VALUES ($1, $2, $3, $4, $5, $6, 'pending', $7, $8, $9)
        RETURNING id
        "#,
        schema.table("tasks")
    );

    sqlx::query_scalar::<_, Uuid>(&sql)
        .bind(Uuid::new_v4())
        .bind(task.user_id)
        .bind(&task.title)
        .bind(task.description.as_deref())
        .bind(task.priority.as_str())
        .bind(task.due_date)
        .bind(task.related_entity_type.as_str())
        .bind(&task.related_entity_id)
        .bind(task.workflow_id)
        .fetch_one(pool)
        .await
}
