//! Workflow database model.

use chrono::{DateTime, Utc};
use dealflow_engine::model::{EntityType, TriggerType, Workflow};
use dealflow_engine::StoreError;
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Row of the `workflows` table.
#[derive(Debug, Clone, FromRow)]
pub struct WorkflowRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    #[sqlx(default)]
    pub description: Option<String>,
    pub entity_type: String,
    pub trigger_type: String,
    #[sqlx(default)]
    pub trigger_config: Option<Value>,
    pub is_active: bool,
    #[sqlx(default)]
    pub actions: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<WorkflowRow> for Workflow {
    type Error = StoreError;

    fn try_from(row: WorkflowRow) -> Result<Self, Self::Error> {
        let entity_type: EntityType = row
            .entity_type
            .parse()
            .map_err(|e| StoreError::Backend(format!("workflow {}: {}", row.id, e)))?;
        let trigger_type: TriggerType = row
            .trigger_type
            .parse()
            .map_err(|e| StoreError::Backend(format!("workflow {}: {}", row.id, e)))?;

        // Elements stay raw; each one is decoded when it runs.
        let actions = match row.actions {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(StoreError::Backend(format!(
                    "workflow {}: actions must be a JSON array, got {}",
                    row.id, other
                )))
            }
        };

        Ok(Workflow {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            description: row.description,
            entity_type,
            trigger_type,
            trigger_config: row.trigger_config.unwrap_or(Value::Null),
            is_active: row.is_active,
            actions,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(actions: Option<Value>) -> WorkflowRow {
        WorkflowRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            name: "Won deal handoff".to_string(),
            description: None,
            entity_type: "deal".to_string(),
            trigger_type: "stage_change".to_string(),
            trigger_config: Some(json!({"to_stage": "won"})),
            is_active: true,
            actions,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_row_into_workflow() {
        let workflow = Workflow::try_from(row(Some(json!([
            {"type": "create_task", "title": "Kickoff"},
            {"type": "unknown_type"}
        ]))))
        .unwrap();

        assert_eq!(workflow.entity_type, EntityType::Deal);
        assert_eq!(workflow.trigger_type, TriggerType::StageChange);
        assert_eq!(workflow.actions.len(), 2);
    }

    #[test]
    fn test_null_actions_are_empty() {
        let workflow = Workflow::try_from(row(None)).unwrap();
        assert!(workflow.actions.is_empty());
    }

    #[test]
    fn test_invalid_rows_rejected() {
        assert!(Workflow::try_from(row(Some(json!({"type": "webhook"})))).is_err());

        let mut bad = row(None);
        bad.entity_type = "contact".to_string();
        assert!(matches!(
            Workflow::try_from(bad),
            Err(StoreError::Backend(_))
        ));
    }
}
