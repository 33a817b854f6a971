//! `update_field` action.

use serde_json::{json, Value};

use crate::action::UpdateFieldAction;
use crate::context::WorkflowContext;
use crate::error::{ActionError, StoreError};
use crate::model::EntityType;
use crate::store::{is_writable_field_name, WorkflowStore};

pub(crate) async fn execute(
    action: &UpdateFieldAction,
    ctx: &WorkflowContext,
    store: &dyn WorkflowStore,
) -> Result<Value, ActionError> {
    let entity_type = match action.entity_type.as_deref() {
        Some(raw) if !raw.trim().is_empty() => ctx
            .interpolate(raw)
            .parse::<EntityType>()
            .map_err(ActionError::InvalidDefinition)?,
        _ => ctx.entity_type,
    };

    let entity_id = action
        .entity_id
        .as_deref()
        .map(|id| ctx.interpolate(id))
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| ctx.entity_id.clone());

    if !is_writable_field_name(&action.field) {
        return Err(StoreError::InvalidField(format!(
            "{}.{}",
            entity_type.table_name(),
            action.field
        ))
        .into());
    }

    let value = ctx.interpolate_value(&action.value);

    store
        .update_entity_field(entity_type, &entity_id, &action.field, &value)
        .await?;

    Ok(json!({
        "entityType": entity_type.as_str(),
        "entityId": entity_id,
        "field": action.field,
        "value": value,
    }))
}
