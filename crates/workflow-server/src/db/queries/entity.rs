//! Entity row queries (leads, companies, deals, tasks, meetings).
//!
//! Entity ids are compared as text so that tables keyed by UUID or by
//! integer are addressed the same way.

use dealflow_engine::model::EntityType;
use serde_json::Value;

use super::Schema;
use crate::db::DbPool;

/// Fetch an entity row as a JSON object.
pub async fn get_entity(
    pool: &DbPool,
    schema: &Schema,
    entity_type: EntityType,
    entity_id: &str,
) -> Result<Option<Value>, sqlx::Error> {
    let sql = format!(
        "SELECT to_jsonb(t) FROM {} AS t WHERE t.id::text = $1",
        schema.table(entity_type.table_name())
    );

    sqlx::query_scalar::<_, Value>(&sql)
        .bind(entity_id)
        .fetch_optional(pool)
        .await
}

/// Check whether `column` exists on the entity's table.
pub async fn column_exists(
    pool: &DbPool,
    schema: &Schema,
    entity_type: EntityType,
    column: &str,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM information_schema.columns
            WHERE table_schema = $1 AND table_name = $2 AND column_name = $3
        )
        "#,
    )
    .bind(schema.name())
    .bind(entity_type.table_name())
    .bind(column)
    .fetch_one(pool)
    .await
}

/// Set one column of one entity row from a JSON value.
///
/// The value is coerced to the column's type by `jsonb_populate_record`, so
/// a JSON string lands in a text column unquoted and a JSON number in a
/// numeric column as a number. `column` must already be validated as an
/// identifier. Returns the updated row, or `None` if no row matched.
pub async fn update_field(
    pool: &DbPool,
    schema: &Schema,
    entity_type: EntityType,
    entity_id: &str,
    column: &str,
    value: &Value,
) -> Result<Option<Value>, sqlx::Error> {
    let table = schema.table(entity_type.table_name());
    let sql = format!(
        r#"
        UPDATE {table} AS t
        SET "{column}" = (jsonb_populate_record(NULL::{table}, jsonb_build_object($1::text, $2::jsonb)))."{column}"
        WHERE t.id::text = $3
        RETURNING to_jsonb(t)
        "#,
    );

    sqlx::query_scalar::<_, Value>(&sql)
        .bind(column)
        .bind(value)
        .bind(entity_id)
        .fetch_optional(pool)
        .await
}
