//! Workflow runner.
//!
//! Entry point for one invocation: load the workflow, record the execution,
//! run each action against the triggering entity and finalize the record.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use crate::action::{declared_type, Action};
use crate::actions::WebhookClient;
use crate::context::WorkflowContext;
use crate::dispatcher::ActionDispatcher;
use crate::error::{ActionError, EngineError};
use crate::model::{ActionResult, Workflow};
use crate::notify::{EmailSender, NotificationSender};
use crate::recorder::{ExecutionRecorder, ExecutionReport};
use crate::store::WorkflowStore;

/// Invocation payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteWorkflowRequest {
    pub workflow_id: Uuid,
    pub entity_id: String,
    #[serde(default)]
    pub trigger_data: Option<Value>,
    /// Run even when the workflow is inactive.
    #[serde(default)]
    pub manual: bool,
}

/// Result of [`WorkflowRunner::run`].
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// The workflow was not run and no execution row exists.
    Skipped { workflow_id: Uuid, reason: String },
    Executed(ExecutionReport),
}

/// Runs workflows against triggering entities.
#[derive(Clone)]
pub struct WorkflowRunner {
    store: Arc<dyn WorkflowStore>,
    dispatcher: ActionDispatcher,
    recorder: ExecutionRecorder,
}

impl WorkflowRunner {
    /// Runner with logging senders and a default webhook client.
    pub fn new(store: Arc<dyn WorkflowStore>) -> Self {
        Self {
            dispatcher: ActionDispatcher::new(store.clone()),
            recorder: ExecutionRecorder::new(store.clone()),
            store,
        }
    }

    pub fn with_email_sender(mut self, sender: Arc<dyn EmailSender>) -> Self {
        self.dispatcher = self.dispatcher.with_email_sender(sender);
        self
    }

    pub fn with_notification_sender(mut self, sender: Arc<dyn NotificationSender>) -> Self {
        self.dispatcher = self.dispatcher.with_notification_sender(sender);
        self
    }

    pub fn with_webhook_client(mut self, client: WebhookClient) -> Self {
        self.dispatcher = self.dispatcher.with_webhook_client(client);
        self
    }

    pub fn store(&self) -> &Arc<dyn WorkflowStore> {
        &self.store
    }

    /// Run one workflow invocation to completion.
    ///
    /// Actions run one at a time, strictly in the order they are stored,
    /// and each one starts only after the previous one has finished. A
    /// failing action is recorded and the loop moves on; only a missing
    /// workflow or a failure to write the execution row fails the call.
    ///
    /// An inactive workflow is skipped without creating an execution row
    /// unless the request is flagged `manual`.
    pub async fn run(&self, request: &ExecuteWorkflowRequest) -> Result<RunOutcome, EngineError> {
        let workflow = self
            .store
            .get_workflow(request.workflow_id)
            .await?
            .ok_or(EngineError::WorkflowNotFound(request.workflow_id))?;

        if !workflow.is_active && !request.manual {
            tracing::info!(
                workflow_id = %workflow.id,
                workflow = %workflow.name,
                "Workflow is inactive, skipping"
            );
            return Ok(RunOutcome::Skipped {
                workflow_id: workflow.id,
                reason: "Workflow is not active".to_string(),
            });
        }

        let trigger_data = request.trigger_data.clone().unwrap_or(Value::Null);
        let handle = self
            .recorder
            .start(&workflow, &request.entity_id, &trigger_data)
            .await?;

        let entity = self.load_entity(&workflow, &request.entity_id).await;
        let ctx = WorkflowContext::new(
            &workflow,
            handle.id,
            &request.entity_id,
            entity,
            &trigger_data,
            handle.started_at,
        );

        let mut results = Vec::with_capacity(workflow.actions.len());
        for (index, raw) in workflow.actions.iter().enumerate() {
            results.push(self.run_action(index, raw, &ctx).await);
        }

        let report = self.recorder.finish(handle, results).await?;
        Ok(RunOutcome::Executed(report))
    }

    async fn load_entity(&self, workflow: &Workflow, entity_id: &str) -> Option<Value> {
        match self.store.get_entity(workflow.entity_type, entity_id).await {
            Ok(Some(entity)) => Some(entity),
            Ok(None) => {
                tracing::warn!(
                    workflow_id = %workflow.id,
                    entity_type = %workflow.entity_type,
                    entity_id = %entity_id,
                    "Triggering entity not found, continuing with empty entity"
                );
                None
            }
            Err(e) => {
                tracing::warn!(
                    workflow_id = %workflow.id,
                    entity_type = %workflow.entity_type,
                    entity_id = %entity_id,
                    error = %e,
                    "Failed to load triggering entity, continuing with empty entity"
                );
                None
            }
        }
    }

    async fn run_action(&self, index: usize, raw: &Value, ctx: &WorkflowContext) -> ActionResult {
        let started = Instant::now();
        let action_type = declared_type(raw);

        let outcome: Result<Value, ActionError> = match Action::decode(raw) {
            Ok(action) => self.dispatcher.dispatch(&action, ctx).await,
            Err(e) => Err(e),
        };
        let elapsed = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        match outcome {
            Ok(value) => {
                tracing::debug!(
                    execution_id = %ctx.execution_id,
                    index,
                    action_type = %action_type,
                    duration_ms = elapsed,
                    "Action succeeded"
                );
                ActionResult::success(index, action_type, value, elapsed)
            }
            Err(e) => {
                tracing::warn!(
                    execution_id = %ctx.execution_id,
                    index,
                    action_type = %action_type,
                    error = %e,
                    "Action failed"
                );
                ActionResult::failure(index, action_type, e.to_string(), elapsed)
            }
        }
    }
}

impl std::fmt::Debug for WorkflowRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowRunner")
            .field("dispatcher", &self.dispatcher)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::model::{ActionStatus, EntityType, ExecutionStatus};
    use crate::store::memory::MemoryStore;
    use crate::testing::{workflow_with, FaultyStore, RecordingEmailSender};
    use serde_json::json;

    fn setup(actions: Vec<Value>) -> (Arc<MemoryStore>, Workflow) {
        let store = Arc::new(MemoryStore::new());
        store
            .insert_entity(
                EntityType::Lead,
                "lead-1",
                json!({"id": "lead-1", "company": "Acme", "email": "ada@acme.test", "status": "new"}),
            )
            .unwrap();
        let workflow = workflow_with(actions);
        store.insert_workflow(workflow.clone()).unwrap();
        (store, workflow)
    }

    fn request(workflow: &Workflow) -> ExecuteWorkflowRequest {
        ExecuteWorkflowRequest {
            workflow_id: workflow.id,
            entity_id: "lead-1".to_string(),
            trigger_data: Some(json!({"from_stage": "new", "to_stage": "qualified"})),
            manual: false,
        }
    }

    fn executed(outcome: RunOutcome) -> ExecutionReport {
        match outcome {
            RunOutcome::Executed(report) => report,
            other => panic!("expected an executed run, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_inactive_workflow_is_skipped() {
        let store = Arc::new(MemoryStore::new());
        let mut workflow = workflow_with(vec![json!({"type": "create_task", "title": "t"})]);
        workflow.is_active = false;
        store.insert_workflow(workflow.clone()).unwrap();
        let runner = WorkflowRunner::new(store.clone());

        let outcome = runner.run(&request(&workflow)).await.unwrap();

        assert!(matches!(outcome, RunOutcome::Skipped { workflow_id, .. } if workflow_id == workflow.id));
        assert_eq!(store.execution_count(), 0);
        assert!(store.tasks().is_empty());
    }

    #[tokio::test]
    async fn test_manual_runs_inactive_workflow() {
        let store = Arc::new(MemoryStore::new());
        let mut workflow = workflow_with(vec![json!({"type": "create_task", "title": "t"})]);
        workflow.is_active = false;
        store.insert_workflow(workflow.clone()).unwrap();
        let runner = WorkflowRunner::new(store.clone());

        let mut req = request(&workflow);
        req.manual = true;
        let report = executed(runner.run(&req).await.unwrap());

        assert_eq!(report.status, ExecutionStatus::Completed);
        assert_eq!(store.execution_count(), 1);
        assert_eq!(store.tasks().len(), 1);
    }

    #[tokio::test]
    async fn test_workflow_not_found() {
        let store = Arc::new(MemoryStore::new());
        let runner = WorkflowRunner::new(store.clone());
        let missing = Uuid::new_v4();

        let err = runner
            .run(&ExecuteWorkflowRequest {
                workflow_id: missing,
                entity_id: "lead-1".to_string(),
                trigger_data: None,
                manual: false,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, EngineError::WorkflowNotFound(id) if id == missing));
        assert_eq!(store.execution_count(), 0);
    }

    #[tokio::test]
    async fn test_task_title_interpolates_entity() {
        let (store, workflow) = setup(vec![json!({
            "type": "create_task",
            "title": "Follow up with {{entity.company}}",
            "config": {"priority": "high"}
        })]);
        let runner = WorkflowRunner::new(store.clone());

        let report = executed(runner.run(&request(&workflow)).await.unwrap());

        assert_eq!(report.status, ExecutionStatus::Completed);
        assert!(!report.has_error());
        let tasks = store.tasks();
        assert_eq!(tasks.len(), 1);
        assert!(tasks[0].1.title.contains("Acme"));
        assert_eq!(tasks[0].1.workflow_id, workflow.id);
    }

    #[tokio::test]
    async fn test_invalid_webhook_url_fails_execution() {
        let (store, workflow) = setup(vec![json!({
            "type": "webhook",
            "url": "::not a url::",
            "body": {"lead": "{{entity_id}}"}
        })]);
        let runner = WorkflowRunner::new(store.clone());

        let report = executed(runner.run(&request(&workflow)).await.unwrap());

        assert!(report.has_error());
        assert_eq!(report.actions_executed.len(), 1);
        assert_eq!(report.actions_executed[0].status, ActionStatus::Failed);
        assert!(report.actions_executed[0].error.is_some());
        assert_eq!(report.status, ExecutionStatus::Failed);

        let row = store.get_execution(report.execution_id).await.unwrap().unwrap();
        assert_eq!(row.status, ExecutionStatus::Failed);
        assert!(row.error_message.is_some());
    }

    #[tokio::test]
    async fn test_failed_update_does_not_stop_later_actions() {
        let (store, workflow) = setup(vec![
            json!({"type": "update_field", "entityId": "lead-404", "field": "status", "value": "x"}),
            json!({"type": "create_task", "title": "Call {{entity.company}}"}),
        ]);
        let runner = WorkflowRunner::new(store.clone());

        let report = executed(runner.run(&request(&workflow)).await.unwrap());

        assert_eq!(report.actions_executed.len(), 2);
        assert_eq!(report.actions_executed[0].status, ActionStatus::Failed);
        assert_eq!(report.actions_executed[0].action_type, "update_field");
        assert_eq!(report.actions_executed[1].status, ActionStatus::Success);
        assert_eq!(report.actions_executed[1].index, 1);
        assert_eq!(report.status, ExecutionStatus::PartiallyCompleted);
        assert_eq!(store.tasks().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_action_type_is_recorded() {
        let (store, workflow) = setup(vec![
            json!({"type": "unknown_type", "foo": 1}),
            json!({"type": "send_email", "to": "{{entity.email}}", "subject": "Hi"}),
        ]);
        let sender = Arc::new(RecordingEmailSender::default());
        let runner = WorkflowRunner::new(store.clone()).with_email_sender(sender.clone());

        let report = executed(runner.run(&request(&workflow)).await.unwrap());

        assert_eq!(report.actions_executed.len(), 2);
        let unknown = &report.actions_executed[0];
        assert_eq!(unknown.action_type, "unknown_type");
        assert_eq!(unknown.status, ActionStatus::Failed);
        assert_eq!(
            unknown.error.as_deref(),
            Some("Unknown action type: unknown_type")
        );
        assert_eq!(report.actions_executed[1].status, ActionStatus::Success);
        assert_eq!(sender.sent.lock().unwrap()[0].to, "ada@acme.test");
    }

    #[tokio::test]
    async fn test_missing_entity_does_not_abort() {
        let (store, workflow) = setup(vec![json!({
            "type": "create_task",
            "title": "Check {{entity.company}} ({{entity_id}})"
        })]);
        let runner = WorkflowRunner::new(store.clone());

        let mut req = request(&workflow);
        req.entity_id = "lead-gone".to_string();
        let report = executed(runner.run(&req).await.unwrap());

        assert_eq!(report.status, ExecutionStatus::Completed);
        let tasks = store.tasks();
        assert_eq!(tasks[0].1.title, "Check {{entity.company}} (lead-gone)");
    }

    #[tokio::test]
    async fn test_execution_row_redacts_trigger_data() {
        let (store, workflow) = setup(vec![]);
        let runner = WorkflowRunner::new(store.clone());

        let mut req = request(&workflow);
        req.trigger_data = Some(json!({"to_stage": "won", "password": "hunter2"}));
        let report = executed(runner.run(&req).await.unwrap());

        assert_eq!(report.status, ExecutionStatus::Completed);
        let row = store.get_execution(report.execution_id).await.unwrap().unwrap();
        assert_eq!(row.trigger_data["password"], "[REDACTED]");
        assert_eq!(row.trigger_data["to_stage"], "won");
    }

    #[tokio::test]
    async fn test_trigger_data_reaches_templates() {
        let (store, workflow) = setup(vec![json!({
            "type": "update_field",
            "field": "status",
            "value": "{{trigger.to_stage}}"
        })]);
        let runner = WorkflowRunner::new(store.clone());

        let report = executed(runner.run(&request(&workflow)).await.unwrap());

        assert_eq!(report.status, ExecutionStatus::Completed);
        assert_eq!(
            store.entity(EntityType::Lead, "lead-1").unwrap()["status"],
            "qualified"
        );
    }

    #[tokio::test]
    async fn test_store_failure_is_invocation_error() {
        let store = FaultyStore {
            fail_create_execution: true,
            ..Default::default()
        };
        let workflow = workflow_with(vec![json!({"type": "create_task", "title": "t"})]);
        store.inner.insert_workflow(workflow.clone()).unwrap();
        let store = Arc::new(store);
        let runner = WorkflowRunner::new(store.clone());

        let err = runner.run(&request(&workflow)).await.unwrap_err();

        assert!(matches!(err, EngineError::Store(StoreError::Backend(_))));
        assert!(store.inner.tasks().is_empty());
    }

    #[tokio::test]
    async fn test_entity_load_failure_runs_with_empty_entity() {
        let store = FaultyStore {
            fail_get_entity: true,
            ..Default::default()
        };
        let workflow =
            workflow_with(vec![json!({"type": "create_task", "title": "Call {{entity.company}}"})]);
        store.inner.insert_workflow(workflow.clone()).unwrap();
        let store = Arc::new(store);
        let runner = WorkflowRunner::new(store.clone());

        let report = executed(runner.run(&request(&workflow)).await.unwrap());

        assert_eq!(report.status, ExecutionStatus::Completed);
        assert_eq!(store.inner.tasks()[0].1.title, "Call {{entity.company}}");
    }

    #[tokio::test]
    async fn test_finalize_is_retried_once() {
        let store = FaultyStore {
            complete_failures: 1.into(),
            ..Default::default()
        };
        let workflow = workflow_with(vec![json!({"type": "create_task", "title": "t"})]);
        store.inner.insert_workflow(workflow.clone()).unwrap();
        let store = Arc::new(store);
        let runner = WorkflowRunner::new(store.clone());

        let report = executed(runner.run(&request(&workflow)).await.unwrap());

        let row = store.get_execution(report.execution_id).await.unwrap().unwrap();
        assert_eq!(row.status, ExecutionStatus::Completed);
        assert_eq!(row.actions_executed.len(), 1);
    }

    #[tokio::test]
    async fn test_finalize_failure_is_invocation_error() {
        let store = FaultyStore {
            complete_failures: 2.into(),
            ..Default::default()
        };
        let workflow = workflow_with(vec![json!({"type": "create_task", "title": "t"})]);
        store.inner.insert_workflow(workflow.clone()).unwrap();
        let store = Arc::new(store);
        let runner = WorkflowRunner::new(store.clone());

        let err = runner.run(&request(&workflow)).await.unwrap_err();

        assert!(matches!(err, EngineError::Store(StoreError::Backend(_))));
        assert_eq!(store.inner.tasks().len(), 1);
        assert_eq!(store.inner.execution_count(), 1);
    }
}
