//! Request-scoped interpolation context for one execution.

use chrono::{DateTime, Utc};
use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::model::{EntityType, Workflow};
use crate::template;

/// Keys the context owns; trigger data merged into the root cannot replace them.
const RESERVED_KEYS: [&str; 9] = [
    "entity",
    "entity_id",
    "entity_type",
    "user_id",
    "workflow_id",
    "workflow_name",
    "execution_id",
    "timestamp",
    "trigger",
];

/// Read-only data available to templates during one execution.
///
/// Layout of the JSON view:
///
/// ```text
/// {
///   "entity": { ..triggering row.. },
///   "entity_id", "entity_type", "user_id",
///   "workflow_id", "workflow_name", "execution_id", "timestamp",
///   "trigger": { ..caller trigger data.. },
///   ..top-level trigger keys not shadowing the above..
/// }
/// ```
#[derive(Debug, Clone)]
pub struct WorkflowContext {
    pub workflow_id: Uuid,
    pub execution_id: Uuid,
    pub user_id: Uuid,
    pub entity_type: EntityType,
    pub entity_id: String,
    pub timestamp: DateTime<Utc>,
    data: Value,
}

impl WorkflowContext {
    /// Build the context for `workflow` running against one entity.
    ///
    /// `entity` is the triggering row, or `None` when it could not be loaded.
    pub fn new(
        workflow: &Workflow,
        execution_id: Uuid,
        entity_id: &str,
        entity: Option<Value>,
        trigger_data: &Value,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let mut data = Map::new();
        data.insert(
            "entity".to_string(),
            entity.unwrap_or_else(|| Value::Object(Map::new())),
        );
        data.insert("entity_id".to_string(), json!(entity_id));
        data.insert("entity_type".to_string(), json!(workflow.entity_type.as_str()));
        data.insert("user_id".to_string(), json!(workflow.user_id));
        data.insert("workflow_id".to_string(), json!(workflow.id));
        data.insert("workflow_name".to_string(), json!(workflow.name));
        data.insert("execution_id".to_string(), json!(execution_id));
        data.insert("timestamp".to_string(), json!(timestamp.to_rfc3339()));
        data.insert("trigger".to_string(), trigger_data.clone());

        if let Value::Object(extra) = trigger_data {
            for (key, value) in extra {
                if !RESERVED_KEYS.contains(&key.as_str()) {
                    data.entry(key.clone()).or_insert_with(|| value.clone());
                }
            }
        }

        Self {
            workflow_id: workflow.id,
            execution_id,
            user_id: workflow.user_id,
            entity_type: workflow.entity_type,
            entity_id: entity_id.to_string(),
            timestamp,
            data: Value::Object(data),
        }
    }

    /// JSON view used for path resolution.
    pub fn as_value(&self) -> &Value {
        &self.data
    }

    /// Interpolate a template string, logging any unresolved paths.
    pub fn interpolate(&self, template: &str) -> String {
        let report = template::interpolate_report(template, &self.data);
        if !report.unresolved.is_empty() {
            tracing::warn!(
                execution_id = %self.execution_id,
                unresolved = ?report.unresolved,
                "Template paths did not resolve"
            );
        }
        report.text
    }

    /// Deep-interpolate a composite payload.
    pub fn interpolate_value(&self, value: &Value) -> Value {
        template::interpolate_value(value, &self.data)
    }
}
