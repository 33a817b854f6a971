//! Row types for the workflow tables.
//!
//! Rows are converted into the engine's models with `TryFrom`.

pub mod execution;
pub mod workflow;

pub use execution::ExecutionRow;
pub use workflow::WorkflowRow;
