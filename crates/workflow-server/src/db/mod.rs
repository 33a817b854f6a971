//! PostgreSQL access for workflows, executions, tasks and entity rows.

pub mod models;
pub mod pool;
pub mod queries;

pub use pool::{create_pool, DbPool};
