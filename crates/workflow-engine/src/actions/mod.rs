//! Built-in action handlers.
//!
//! One module per action kind:
//! - `email` - Render and hand off an email to the [`crate::EmailSender`]
//! - `task` - Create a task linked to the triggering entity
//! - `notification` - Render and hand off an in-app notification
//! - `update_field` - Write a single column on an entity row
//! - `webhook` - Call an external HTTP endpoint

pub(crate) mod email;
pub(crate) mod notification;
pub(crate) mod task;
pub(crate) mod update_field;
mod webhook;

pub use self::webhook::WebhookClient;
