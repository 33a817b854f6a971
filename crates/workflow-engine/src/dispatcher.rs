//! Action dispatch.

use serde_json::Value;
use std::sync::Arc;

use crate::action::Action;
use crate::actions::{email, notification, task, update_field, WebhookClient};
use crate::context::WorkflowContext;
use crate::error::ActionError;
use crate::notify::{EmailSender, LogEmailSender, LogNotificationSender, NotificationSender};
use crate::store::WorkflowStore;

/// Routes each action to its handler along with the collaborators it needs.
#[derive(Clone)]
pub struct ActionDispatcher {
    store: Arc<dyn WorkflowStore>,
    email: Arc<dyn EmailSender>,
    notifications: Arc<dyn NotificationSender>,
    webhook: WebhookClient,
}

impl ActionDispatcher {
    /// Dispatcher with logging senders and a default webhook client.
    pub fn new(store: Arc<dyn WorkflowStore>) -> Self {
        Self {
            store,
            email: Arc::new(LogEmailSender),
            notifications: Arc::new(LogNotificationSender),
            webhook: WebhookClient::default(),
        }
    }

    pub fn with_email_sender(mut self, sender: Arc<dyn EmailSender>) -> Self {
        self.email = sender;
        self
    }

    pub fn with_notification_sender(mut self, sender: Arc<dyn NotificationSender>) -> Self {
        self.notifications = sender;
        self
    }

    pub fn with_webhook_client(mut self, client: WebhookClient) -> Self {
        self.webhook = client;
        self
    }

    /// Run one action, returning its handler-specific result.
    pub async fn dispatch(
        &self,
        action: &Action,
        ctx: &WorkflowContext,
    ) -> Result<Value, ActionError> {
        match action {
            Action::SendEmail(a) => email::execute(a, ctx, self.email.as_ref()).await,
            Action::CreateTask(a) => task::execute(a, ctx, self.store.as_ref()).await,
            Action::SendNotification(a) => {
                notification::execute(a, ctx, self.notifications.as_ref()).await
            }
            Action::UpdateField(a) => update_field::execute(a, ctx, self.store.as_ref()).await,
            Action::Webhook(a) => self.webhook.execute(a, ctx).await,
        }
    }
}

impl std::fmt::Debug for ActionDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionDispatcher")
            .field("webhook", &self.webhook)
            .finish_non_exhaustive()
    }
}
