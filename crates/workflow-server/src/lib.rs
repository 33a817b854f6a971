//! Dealflow Workflow Server Library
//!
//! HTTP entry point for CRM workflow executions:
//!
//! - **Invocation**: run a workflow against one triggering entity
//! - **Execution queries**: list and inspect recorded executions
//! - **Health**: liveness, database connectivity and schema checks
//!
//! Workflow semantics live in `dealflow_engine`; this crate supplies the
//! Postgres-backed [`store::PgWorkflowStore`] and the axum routes.
//!
//! ## Modules
//!
//! - [`config`]: Configuration loading from environment variables
//! - [`db`]: Connection pool, row types and queries
//! - [`error`]: Error type with Axum integration
//! - [`handlers`]: HTTP route handlers
//! - [`router`]: Route table
//! - [`state`]: Shared application state
//! - [`store`]: `WorkflowStore` implementation over sqlx
//!
//! ## Example
//!
//! ```ignore
//! use dealflow_server::{
//!     config::{AppConfig, DatabaseConfig},
//!     db::{create_pool, queries::Schema},
//!     router::build_router,
//!     state::AppState,
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let app_config = AppConfig::from_env()?;
//!     let db_config = DatabaseConfig::from_env()?;
//!     let db_pool = create_pool(&db_config).await?;
//!     let schema = Schema::new(&db_config.schema).map_err(anyhow::Error::msg)?;
//!     let app = build_router(AppState::new(db_pool, schema, app_config));
//!     // ... bind and serve
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod result_ext;
pub mod router;
pub mod state;
pub mod store;

pub use error::{AppError, AppResult};
pub use result_ext::ResultExt;
