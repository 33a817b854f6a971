//! Relational store collaborator.
//!
//! The engine reads workflows and entity rows, inserts tasks, updates single
//! entity fields and records executions through this trait.

pub mod memory;

use async_trait::async_trait;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use uuid::Uuid;

use crate::error::StoreError;
use crate::model::{
    EntityType, Execution, ExecutionCompletion, ExecutionFilter, NewExecution, NewTask, Workflow,
};

static FIELD_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]{0,62}$").expect("field pattern is valid"));

/// Columns a workflow may never rewrite.
pub const PROTECTED_FIELDS: [&str; 3] = ["id", "user_id", "created_at"];

/// Check that `field` is a plain identifier a workflow may write.
pub fn is_writable_field_name(field: &str) -> bool {
    FIELD_NAME.is_match(field) && !PROTECTED_FIELDS.contains(&field)
}

#[async_trait]
pub trait WorkflowStore: Send + Sync {
    async fn get_workflow(&self, id: Uuid) -> Result<Option<Workflow>, StoreError>;

    /// Current row of an entity as a JSON object.
    async fn get_entity(
        &self,
        entity_type: EntityType,
        entity_id: &str,
    ) -> Result<Option<Value>, StoreError>;

    /// Insert a task, returning its id.
    async fn insert_task(&self, task: &NewTask) -> Result<Uuid, StoreError>;

    /// Write one column of one entity row, returning the updated row.
    ///
    /// Fails with `NotFound` when the row is missing and `InvalidField` when
    /// the column is not writable on that table.
    async fn update_entity_field(
        &self,
        entity_type: EntityType,
        entity_id: &str,
        field: &str,
        value: &Value,
    ) -> Result<Value, StoreError>;

    async fn create_execution(&self, execution: &NewExecution) -> Result<(), StoreError>;

    async fn complete_execution(
        &self,
        id: Uuid,
        completion: &ExecutionCompletion,
    ) -> Result<(), StoreError>;

    /// Executions newest first.
    async fn list_executions(&self, filter: &ExecutionFilter) -> Result<Vec<Execution>, StoreError>;

    async fn get_execution(&self, id: Uuid) -> Result<Option<Execution>, StoreError>;
}
