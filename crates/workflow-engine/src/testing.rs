//! Shared fakes for unit tests.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

use crate::error::{ActionError, StoreError};
use crate::model::{
    EntityType, Execution, ExecutionCompletion, ExecutionFilter, NewExecution, NewTask,
    TriggerType, Workflow,
};
use crate::notify::{EmailSender, NotificationSender, OutgoingEmail, OutgoingNotification};
use crate::store::memory::MemoryStore;
use crate::store::WorkflowStore;

pub fn workflow_with(actions: Vec<Value>) -> Workflow {
    Workflow {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        name: "Qualified lead follow-up".to_string(),
        description: None,
        entity_type: EntityType::Lead,
        trigger_type: TriggerType::StageChange,
        trigger_config: Value::Null,
        is_active: true,
        actions,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[derive(Default)]
pub struct RecordingEmailSender {
    pub sent: Mutex<Vec<OutgoingEmail>>,
}

#[async_trait]
impl EmailSender for RecordingEmailSender {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), ActionError> {
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

pub struct FailingEmailSender;

#[async_trait]
impl EmailSender for FailingEmailSender {
    async fn send(&self, _email: &OutgoingEmail) -> Result<(), ActionError> {
        Err(ActionError::Delivery("mailbox unavailable".to_string()))
    }
}

#[derive(Default)]
pub struct RecordingNotificationSender {
    pub sent: Mutex<Vec<OutgoingNotification>>,
}

#[async_trait]
impl NotificationSender for RecordingNotificationSender {
    async fn notify(&self, notification: &OutgoingNotification) -> Result<(), ActionError> {
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

/// A [`MemoryStore`] that fails selected operations with a backend error.
#[derive(Default)]
pub struct FaultyStore {
    pub inner: MemoryStore,
    pub fail_create_execution: bool,
    pub fail_get_entity: bool,
    /// `complete_execution` calls left to fail before it starts succeeding.
    pub complete_failures: AtomicUsize,
}

impl FaultyStore {
    fn outage() -> StoreError {
        StoreError::Backend("connection reset".to_string())
    }
}

#[async_trait]
impl WorkflowStore for FaultyStore {
    async fn get_workflow(&self, id: Uuid) -> Result<Option<Workflow>, StoreError> {
        self.inner.get_workflow(id).await
    }

    async fn get_entity(
        &self,
        entity_type: EntityType,
        entity_id: &str,
    ) -> Result<Option<Value>, StoreError> {
        if self.fail_get_entity {
            return Err(Self::outage());
        }
        self.inner.get_entity(entity_type, entity_id).await
    }

    async fn insert_task(&self, task: &NewTask) -> Result<Uuid, StoreError> {
        self.inner.insert_task(task).await
    }

    async fn update_entity_field(
        &self,
        entity_type: EntityType,
        entity_id: &str,
        field: &str,
        value: &Value,
    ) -> Result<Value, StoreError> {
        self.inner
            .update_entity_field(entity_type, entity_id, field, value)
            .await
    }

    async fn create_execution(&self, execution: &NewExecution) -> Result<(), StoreError> {
        if self.fail_create_execution {
            return Err(Self::outage());
        }
        self.inner.create_execution(execution).await
    }

    async fn complete_execution(
        &self,
        id: Uuid,
        completion: &ExecutionCompletion,
    ) -> Result<(), StoreError> {
        let remaining = self.complete_failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.complete_failures.store(remaining - 1, Ordering::SeqCst);
            return Err(Self::outage());
        }
        self.inner.complete_execution(id, completion).await
    }

    async fn list_executions(&self, filter: &ExecutionFilter) -> Result<Vec<Execution>, StoreError> {
        self.inner.list_executions(filter).await
    }

    async fn get_execution(&self, id: Uuid) -> Result<Option<Execution>, StoreError> {
        self.inner.get_execution(id).await
    }
}
