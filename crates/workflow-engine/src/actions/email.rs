//! `send_email` action.

use serde_json::{json, Value};

use crate::action::SendEmailAction;
use crate::context::WorkflowContext;
use crate::error::ActionError;
use crate::notify::{EmailSender, OutgoingEmail};

pub(crate) async fn execute(
    action: &SendEmailAction,
    ctx: &WorkflowContext,
    sender: &dyn EmailSender,
) -> Result<Value, ActionError> {
    let email = OutgoingEmail {
        to: ctx.interpolate(&action.to),
        subject: ctx.interpolate(&action.subject),
        body: ctx.interpolate(&action.body),
        workflow_id: ctx.workflow_id,
        execution_id: ctx.execution_id,
    };

    if email.to.trim().is_empty() {
        return Err(ActionError::InvalidDefinition(
            "send_email: recipient is empty".to_string(),
        ));
    }

    sender.send(&email).await?;

    Ok(json!({"queued": true, "to": email.to}))
}
