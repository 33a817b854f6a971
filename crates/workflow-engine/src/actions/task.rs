//! `create_task` action.

use chrono::Utc;
use serde_json::{json, Value};

use crate::action::CreateTaskAction;
use crate::context::WorkflowContext;
use crate::due_date::resolve_due_date;
use crate::error::ActionError;
use crate::model::NewTask;
use crate::store::WorkflowStore;

pub(crate) async fn execute(
    action: &CreateTaskAction,
    ctx: &WorkflowContext,
    store: &dyn WorkflowStore,
) -> Result<Value, ActionError> {
    let due_date = action
        .due_date
        .as_deref()
        .and_then(|expr| resolve_due_date(&ctx.interpolate(expr), Utc::now()));

    let task = NewTask {
        user_id: ctx.user_id,
        title: ctx.interpolate(&action.title),
        description: action.description.as_deref().map(|d| ctx.interpolate(d)),
        priority: action.priority.unwrap_or_default(),
        due_date,
        related_entity_type: ctx.entity_type,
        related_entity_id: ctx.entity_id.clone(),
        workflow_id: ctx.workflow_id,
    };

    let task_id = store.insert_task(&task).await?;

    tracing::debug!(
        task_id = %task_id,
        execution_id = %ctx.execution_id,
        "Task created"
    );

    Ok(json!({
        "taskId": task_id,
        "title": task.title,
        "priority": task.priority.as_str(),
        "dueDate": task.due_date.map(|d| d.to_rfc3339()),
    }))
}
