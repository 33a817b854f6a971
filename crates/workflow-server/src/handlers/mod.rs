//! HTTP handlers for the Dealflow workflow API.

pub mod database;
pub mod execute;
pub mod executions;
pub mod health;

pub use execute::execute_workflow;
pub use health::{api_health, health_check};
