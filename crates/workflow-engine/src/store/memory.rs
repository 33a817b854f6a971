//! In-memory [`WorkflowStore`] for tests and local runs.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

use super::{is_writable_field_name, WorkflowStore};
use crate::error::StoreError;
use crate::model::{
    EntityType, Execution, ExecutionCompletion, ExecutionFilter, NewExecution, NewTask, Workflow,
};

#[derive(Default)]
struct MemoryState {
    workflows: HashMap<Uuid, Workflow>,
    entities: HashMap<(EntityType, String), Value>,
    tasks: Vec<(Uuid, NewTask)>,
    executions: HashMap<Uuid, Execution>,
}

/// Store backed by process memory.
///
/// An entity row only accepts writes to columns it already has, mirroring a
/// fixed table schema.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryState>, StoreError> {
        self.state
            .read()
            .map_err(|_| StoreError::Backend("memory store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryState>, StoreError> {
        self.state
            .write()
            .map_err(|_| StoreError::Backend("memory store lock poisoned".to_string()))
    }

    pub fn insert_workflow(&self, workflow: Workflow) -> Result<(), StoreError> {
        self.write()?.workflows.insert(workflow.id, workflow);
        Ok(())
    }

    pub fn insert_entity(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        row: Value,
    ) -> Result<(), StoreError> {
        self.write()?
            .entities
            .insert((entity_type, entity_id.into()), row);
        Ok(())
    }

    pub fn entity(&self, entity_type: EntityType, entity_id: &str) -> Option<Value> {
        self.read()
            .ok()?
            .entities
            .get(&(entity_type, entity_id.to_string()))
            .cloned()
    }

    /// Tasks in insertion order.
    pub fn tasks(&self) -> Vec<(Uuid, NewTask)> {
        self.read().map(|s| s.tasks.clone()).unwrap_or_default()
    }

    pub fn execution_count(&self) -> usize {
        self.read().map(|s| s.executions.len()).unwrap_or_default()
    }
}

#[async_trait]
impl WorkflowStore for MemoryStore {
    async fn get_workflow(&self, id: Uuid) -> Result<Option<Workflow>, StoreError> {
        Ok(self.read()?.workflows.get(&id).cloned())
    }

    async fn get_entity(
        &self,
        entity_type: EntityType,
        entity_id: &str,
    ) -> Result<Option<Value>, StoreError> {
        Ok(self
            .read()?
            .entities
            .get(&(entity_type, entity_id.to_string()))
            .cloned())
    }

    async fn insert_task(&self, task: &NewTask) -> Result<Uuid, StoreError> {
        let id = Uuid::new_v4();
        self.write()?.tasks.push((id, task.clone()));
        Ok(id)
    }

    async fn update_entity_field(
        &self,
        entity_type: EntityType,
        entity_id: &str,
        field: &str,
        value: &Value,
    ) -> Result<Value, StoreError> {
        if !is_writable_field_name(field) {
            return Err(StoreError::InvalidField(format!(
                "{}.{}",
                entity_type.table_name(),
                field
            )));
        }

        let mut state = self.write()?;
        let row = state
            .entities
            .get_mut(&(entity_type, entity_id.to_string()))
            .ok_or_else(|| {
                StoreError::NotFound(format!("{}/{}", entity_type.table_name(), entity_id))
            })?;

        let columns = row.as_object_mut().ok_or_else(|| {
            StoreError::Backend(format!("{}/{} is not an object", entity_type.table_name(), entity_id))
        })?;

        match columns.get_mut(field) {
            Some(slot) => *slot = value.clone(),
            None => {
                return Err(StoreError::InvalidField(format!(
                    "{}.{}",
                    entity_type.table_name(),
                    field
                )))
            }
        }

        Ok(row.clone())
    }

    async fn create_execution(&self, execution: &NewExecution) -> Result<(), StoreError> {
        self.write()?
            .executions
            .insert(execution.id, execution.clone().into_execution());
        Ok(())
    }

    async fn complete_execution(
        &self,
        id: Uuid,
        completion: &ExecutionCompletion,
    ) -> Result<(), StoreError> {
        let mut state = self.write()?;
        let execution = state
            .executions
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("workflow_executions/{}", id)))?;

        execution.status = completion.status;
        execution.actions_executed = completion.actions_executed.clone();
        execution.error_message = completion.error_message.clone();
        execution.completed_at = Some(completion.completed_at);
        execution.duration_ms = Some(completion.duration_ms);
        Ok(())
    }

    async fn list_executions(&self, filter: &ExecutionFilter) -> Result<Vec<Execution>, StoreError> {
        let state = self.read()?;
        let mut executions: Vec<Execution> = state
            .executions
            .values()
            .filter(|e| filter.workflow_id.map_or(true, |id| e.workflow_id == id))
            .filter(|e| filter.status.map_or(true, |s| e.status == s))
            .cloned()
            .collect();

        executions.sort_by(|a, b| b.started_at.cmp(&a.started_at));

        Ok(executions
            .into_iter()
            .skip(filter.effective_offset() as usize)
            .take(filter.effective_limit() as usize)
            .collect())
    }

    async fn get_execution(&self, id: Uuid) -> Result<Option<Execution>, StoreError> {
        Ok(self.read()?.executions.get(&id).cloned())
    }
}
