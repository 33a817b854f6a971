//! Postgres-backed [`WorkflowStore`].

use async_trait::async_trait;
use dealflow_engine::model::{
    EntityType, Execution, ExecutionCompletion, ExecutionFilter, NewExecution, NewTask, Workflow,
};
use dealflow_engine::store::is_writable_field_name;
use dealflow_engine::{StoreError, WorkflowStore};
use serde_json::Value;
use uuid::Uuid;

use crate::db::queries::{self, Schema};
use crate::db::DbPool;

fn backend(err: sqlx::Error) -> StoreError {
    StoreError::Backend(err.to_string())
}

/// Workflow store over a sqlx Postgres pool.
#[derive(Clone)]
pub struct PgWorkflowStore {
    pool: DbPool,
    schema: Schema,
}

impl PgWorkflowStore {
    pub fn new(pool: DbPool, schema: Schema) -> Self {
        Self { pool, schema }
    }
}

#[async_trait]
impl WorkflowStore for PgWorkflowStore {
    async fn get_workflow(&self, id: Uuid) -> Result<Option<Workflow>, StoreError> {
        queries::workflow::get_workflow(&self.pool, &self.schema, id)
            .await
            .map_err(backend)?
            .map(Workflow::try_from)
            .transpose()
    }

    async fn get_entity(
        &self,
        entity_type: EntityType,
        entity_id: &str,
    ) -> Result<Option<Value>, StoreError> {
        queries::entity::get_entity(&self.pool, &self.schema, entity_type, entity_id)
            .await
            .map_err(backend)
    }

    async fn insert_task(&self, task: &NewTask) -> Result<Uuid, StoreError> {
        queries::task::insert_task(&self.pool, &self.schema, task)
            .await
            .map_err(backend)
    }

    async fn update_entity_field(
        &self,
        entity_type: EntityType,
        entity_id: &str,
        field: &str,
        value: &Value,
    ) -> Result<Value, StoreError> {
        let invalid = || StoreError::InvalidField(format!("{}.{}", entity_type.table_name(), field));

        if !is_writable_field_name(field) {
            return Err(invalid());
        }

        let exists = queries::entity::column_exists(&self.pool, &self.schema, entity_type, field)
            .await
            .map_err(backend)?;
        if !exists {
            return Err(invalid());
        }

        queries::entity::update_field(&self.pool, &self.schema, entity_type, entity_id, field, value)
            .await
            .map_err(backend)?
            .ok_or_else(|| StoreError::NotFound(format!("{}/{}", entity_type.table_name(), entity_id)))
    }

    async fn create_execution(&self, execution: &NewExecution) -> Result<(), StoreError> {
        queries::execution::insert_execution(&self.pool, &self.schema, execution)
            .await
            .map_err(backend)
    }

    async fn complete_execution(
        &self,
        id: Uuid,
        completion: &ExecutionCompletion,
    ) -> Result<(), StoreError> {
        let updated = queries::execution::complete_execution(&self.pool, &self.schema, id, completion)
            .await
            .map_err(backend)?;

        if updated == 0 {
            return Err(StoreError::NotFound(format!("workflow_executions/{}", id)));
        }
        Ok(())
    }

    async fn list_executions(&self, filter: &ExecutionFilter) -> Result<Vec<Execution>, StoreError> {
        queries::execution::list_executions(&self.pool, &self.schema, filter)
            .await
            .map_err(backend)?
            .into_iter()
            .map(Execution::try_from)
            .collect()
    }

    async fn get_execution(&self, id: Uuid) -> Result<Option<Execution>, StoreError> {
        queries::execution::get_execution(&self.pool, &self.schema, id)
            .await
            .map_err(backend)?
            .map(Execution::try_from)
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::PgPoolOptions;

    fn lazy_store() -> PgWorkflowStore {
        let pool = PgPoolOptions::new()
            .acquire_timeout(std::time::Duration::from_millis(200))
            .connect_lazy("postgres://dealflow@127.0.0.1:1/dealflow")
            .unwrap();
        PgWorkflowStore::new(pool, Schema::default())
    }

    #[tokio::test]
    async fn test_invalid_field_rejected_before_query() {
        let store = lazy_store();

        let err = store
            .update_entity_field(EntityType::Lead, "1", "status; DROP TABLE leads", &Value::Null)
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::InvalidField("leads.status; DROP TABLE leads".to_string()));

        let err = store
            .update_entity_field(EntityType::Company, "1", "id", &Value::Null)
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::InvalidField("companies.id".to_string()));
    }

    #[tokio::test]
    async fn test_unreachable_database_is_backend_error() {
        let store = lazy_store();
        let err = store.get_workflow(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, StoreError::Backend(_)));
    }
}
