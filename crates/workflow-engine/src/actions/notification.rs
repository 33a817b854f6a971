//! `send_notification` action.

use serde_json::{json, Value};

use crate::action::SendNotificationAction;
use crate::context::WorkflowContext;
use crate::error::ActionError;
use crate::notify::{NotificationSender, OutgoingNotification};

pub(crate) async fn execute(
    action: &SendNotificationAction,
    ctx: &WorkflowContext,
    sender: &dyn NotificationSender,
) -> Result<Value, ActionError> {
    // Recipient defaults to the workflow owner.
    let user_id = action
        .user_id
        .as_deref()
        .map(|id| ctx.interpolate(id))
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| ctx.user_id.to_string());

    let notification = OutgoingNotification {
        user_id,
        title: ctx.interpolate(&action.title),
        message: ctx.interpolate(&action.message),
        workflow_id: ctx.workflow_id,
        execution_id: ctx.execution_id,
    };

    sender.notify(&notification).await?;

    Ok(json!({"queued": true, "userId": notification.user_id}))
}
