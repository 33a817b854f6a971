//! Shared application state passed to every handler.

use dealflow_engine::{WebhookClient, WorkflowRunner, WorkflowStore};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::queries::Schema;
use crate::db::DbPool;
use crate::store::PgWorkflowStore;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool, used for health and schema checks
    pub db: DbPool,

    /// Schema holding the CRM tables
    pub schema: Schema,

    /// Workflow runner wired to the store and delivery collaborators
    pub runner: WorkflowRunner,

    /// Application configuration
    pub config: Arc<AppConfig>,

    /// Server start time for uptime calculation
    pub start_time: std::time::Instant,
}

impl AppState {
    /// State backed by the Postgres store.
    pub fn new(db: DbPool, schema: Schema, config: AppConfig) -> Self {
        let store = Arc::new(PgWorkflowStore::new(db.clone(), schema.clone()));
        Self::with_store(db, schema, store, config)
    }

    /// State with an explicit workflow store.
    pub fn with_store(
        db: DbPool,
        schema: Schema,
        store: Arc<dyn WorkflowStore>,
        config: AppConfig,
    ) -> Self {
        let runner = WorkflowRunner::new(store)
            .with_webhook_client(WebhookClient::new(config.webhook_timeout()));

        Self {
            db,
            schema,
            runner,
            config: Arc::new(config),
            start_time: std::time::Instant::now(),
        }
    }

    pub fn store(&self) -> &Arc<dyn WorkflowStore> {
        self.runner.store()
    }

    /// Get the server uptime in seconds.
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
