//! Email and in-app notification delivery collaborators.
//!
//! The runner receives these at construction. The logging implementations
//! acknowledge every message without contacting a provider.

use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use crate::error::ActionError;

/// Rendered email ready for a provider.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
    pub workflow_id: Uuid,
    pub execution_id: Uuid,
}

/// Rendered in-app notification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutgoingNotification {
    pub user_id: String,
    pub title: String,
    pub message: String,
    pub workflow_id: Uuid,
    pub execution_id: Uuid,
}

#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), ActionError>;
}

#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn notify(&self, notification: &OutgoingNotification) -> Result<(), ActionError>;
}

/// Email sender that only logs.
#[derive(Debug, Clone, Default)]
pub struct LogEmailSender;

#[async_trait]
impl EmailSender for LogEmailSender {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), ActionError> {
        tracing::info!(
            to = %email.to,
            subject = %email.subject,
            workflow_id = %email.workflow_id,
            execution_id = %email.execution_id,
            "Email queued (no provider configured)"
        );
        Ok(())
    }
}

/// Notification sender that only logs.
#[derive(Debug, Clone, Default)]
pub struct LogNotificationSender;

#[async_trait]
impl NotificationSender for LogNotificationSender {
    async fn notify(&self, notification: &OutgoingNotification) -> Result<(), ActionError> {
        tracing::info!(
            user_id = %notification.user_id,
            title = %notification.title,
            workflow_id = %notification.workflow_id,
            execution_id = %notification.execution_id,
            "Notification queued (no provider configured)"
        );
        Ok(())
    }
}
