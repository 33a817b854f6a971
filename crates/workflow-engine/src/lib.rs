//! Dealflow Workflow Engine
//!
//! Executes CRM workflows: a workflow pairs a trigger with an ordered list of
//! typed actions, and one execution runs those actions against a single
//! triggering entity (a lead, company, deal, task or meeting).
//!
//! This crate provides:
//! - Template interpolation of `{{path.to.value}}` tokens
//! - Relative and absolute due-date resolution
//! - Typed action definitions and the action dispatcher
//! - Execution recording and the workflow runner
//! - Collaborator traits for the relational store and message delivery
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use dealflow_engine::{store::memory::MemoryStore, ExecuteWorkflowRequest, WorkflowRunner};
//!
//! let store = Arc::new(MemoryStore::new());
//! let runner = WorkflowRunner::new(store);
//! let outcome = runner.run(&request).await?;
//! ```

pub mod action;
pub mod actions;
pub mod context;
pub mod dispatcher;
pub mod due_date;
pub mod error;
pub mod model;
pub mod notify;
pub mod recorder;
pub mod runner;
pub mod sanitize;
pub mod store;
pub mod template;

#[cfg(test)]
pub(crate) mod testing;

pub use action::Action;
pub use actions::WebhookClient;
pub use context::WorkflowContext;
pub use dispatcher::ActionDispatcher;
pub use error::{ActionError, EngineError, StoreError};
pub use model::{
    ActionResult, ActionStatus, EntityType, Execution, ExecutionStatus, TriggerType, Workflow,
};
pub use notify::{EmailSender, NotificationSender};
pub use recorder::{ExecutionRecorder, ExecutionReport};
pub use runner::{ExecuteWorkflowRequest, RunOutcome, WorkflowRunner};
pub use store::WorkflowStore;
