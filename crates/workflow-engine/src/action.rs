//! Typed workflow action definitions.
//!
//! Actions are stored as a JSON array on the workflow row. Each element is
//! decoded on its own, so an unknown or malformed entry fails only itself.

use reqwest::Method;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::error::ActionError;
use crate::model::TaskPriority;

/// Tags accepted in an action's `type` field.
pub const KNOWN_ACTION_TYPES: [&str; 5] = [
    "send_email",
    "create_task",
    "send_notification",
    "update_field",
    "webhook",
];

/// One step of a workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    SendEmail(SendEmailAction),
    CreateTask(CreateTaskAction),
    SendNotification(SendNotificationAction),
    UpdateField(UpdateFieldAction),
    Webhook(WebhookAction),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendEmailAction {
    pub to: String,
    pub subject: String,
    #[serde(default)]
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskAction {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Unrecognized values fall back to the default priority.
    #[serde(default, deserialize_with = "lenient_priority")]
    pub priority: Option<TaskPriority>,
    /// Relative (`+3 days`) or absolute due-date expression. Non-string
    /// values are treated as absent.
    #[serde(default, deserialize_with = "lenient_string")]
    pub due_date: Option<String>,
}

fn lenient_priority<'de, D>(deserializer: D) -> Result<Option<TaskPriority>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::String(s)) => match s.parse() {
            Ok(priority) => Some(priority),
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring task priority");
                None
            }
        },
        Some(Value::Null) | None => None,
        Some(other) => {
            tracing::warn!(value = %other, "Ignoring non-string task priority");
            None
        }
    })
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Null) | None => None,
        Some(other) => {
            tracing::warn!(value = %other, "Ignoring non-string due date");
            None
        }
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendNotificationAction {
    /// Recipient; the workflow owner when absent.
    #[serde(default)]
    pub user_id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFieldAction {
    /// Target entity type; the triggering entity's type when absent.
    #[serde(default)]
    pub entity_type: Option<String>,
    /// Target entity id template; the triggering entity when absent.
    #[serde(default)]
    pub entity_id: Option<String>,
    pub field: String,
    #[serde(default)]
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookAction {
    pub url: String,
    #[serde(default)]
    pub method: WebhookMethod,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default)]
    pub body: Option<Value>,
}

/// HTTP method for webhook calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[allow(clippy::upper_case_acronyms)]
pub enum WebhookMethod {
    #[serde(alias = "get")]
    GET,
    #[default]
    #[serde(alias = "post")]
    POST,
    #[serde(alias = "put")]
    PUT,
    #[serde(alias = "patch")]
    PATCH,
    #[serde(alias = "delete")]
    DELETE,
}

impl From<WebhookMethod> for Method {
    fn from(method: WebhookMethod) -> Self {
        match method {
            WebhookMethod::GET => Method::GET,
            WebhookMethod::POST => Method::POST,
            WebhookMethod::PUT => Method::PUT,
            WebhookMethod::PATCH => Method::PATCH,
            WebhookMethod::DELETE => Method::DELETE,
        }
    }
}

impl Action {
    /// Decode one stored action definition.
    ///
    /// Fields may sit at the top level or inside a nested `config` object;
    /// top-level fields win on conflict.
    pub fn decode(raw: &Value) -> Result<Action, ActionError> {
        let obj = raw
            .as_object()
            .ok_or_else(|| ActionError::InvalidDefinition("action must be a JSON object".to_string()))?;

        let tag = obj
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| ActionError::InvalidDefinition("missing action type".to_string()))?;

        if !KNOWN_ACTION_TYPES.contains(&tag) {
            return Err(ActionError::UnknownType(tag.to_string()));
        }

        let mut flat: Map<String, Value> = obj.clone();
        if let Some(Value::Object(config)) = flat.remove("config") {
            for (key, value) in config {
                flat.entry(key).or_insert(value);
            }
        }

        serde_json::from_value(Value::Object(flat))
            .map_err(|e| ActionError::InvalidDefinition(format!("{}: {}", tag, e)))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Action::SendEmail(_) => "send_email",
            Action::CreateTask(_) => "create_task",
            Action::SendNotification(_) => "send_notification",
            Action::UpdateField(_) => "update_field",
            Action::Webhook(_) => "webhook",
        }
    }
}

/// Declared `type` of a raw definition, for labeling results even when the
/// definition cannot be decoded.
pub fn declared_type(raw: &Value) -> String {
    raw.get("type")
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_each_kind() {
        let email = Action::decode(&json!({
            "type": "send_email",
            "to": "{{entity.email}}",
            "subject": "Hi",
            "body": "Hello {{entity.first_name}}"
        }))
        .unwrap();
        assert_eq!(email.type_name(), "send_email");

        let task = Action::decode(&json!({
            "type": "create_task",
            "title": "Call {{entity.company}}",
            "priority": "high",
            "dueDate": "+2 days"
        }))
        .unwrap();
        match task {
            Action::CreateTask(t) => {
                assert_eq!(t.priority, Some(TaskPriority::High));
                assert_eq!(t.due_date.as_deref(), Some("+2 days"));
                assert!(t.description.is_none());
            }
            other => panic!("unexpected action: {:?}", other),
        }

        let notify = Action::decode(&json!({
            "type": "send_notification",
            "title": "Deal moved"
        }))
        .unwrap();
        assert_eq!(notify.type_name(), "send_notification");

        let update = Action::decode(&json!({
            "type": "update_field",
            "entityType": "deal",
            "entityId": "{{trigger.deal_id}}",
            "field": "stage",
            "value": "won"
        }))
        .unwrap();
        match update {
            Action::UpdateField(u) => {
                assert_eq!(u.entity_type.as_deref(), Some("deal"));
                assert_eq!(u.field, "stage");
                assert_eq!(u.value, json!("won"));
            }
            other => panic!("unexpected action: {:?}", other),
        }
    }

    #[test]
    fn test_decode_webhook_defaults() {
        let action = Action::decode(&json!({
            "type": "webhook",
            "url": "https://hooks.example.com/crm"
        }))
        .unwrap();
        match action {
            Action::Webhook(w) => {
                assert_eq!(w.method, WebhookMethod::POST);
                assert!(w.headers.is_empty());
                assert!(w.body.is_none());
            }
            other => panic!("unexpected action: {:?}", other),
        }
    }

    #[test]
    fn test_decode_lowercase_method() {
        let action = Action::decode(&json!({
            "type": "webhook",
            "url": "https://hooks.example.com/crm",
            "method": "put"
        }))
        .unwrap();
        assert!(matches!(
            action,
            Action::Webhook(WebhookAction { method: WebhookMethod::PUT, .. })
        ));
    }

    #[test]
    fn test_decode_nested_config() {
        let action = Action::decode(&json!({
            "id": "a1",
            "type": "create_task",
            "config": {"title": "Nested title", "priority": "low"}
        }))
        .unwrap();
        match action {
            Action::CreateTask(t) => {
                assert_eq!(t.title, "Nested title");
                assert_eq!(t.priority, Some(TaskPriority::Low));
            }
            other => panic!("unexpected action: {:?}", other),
        }
    }

    #[test]
    fn test_decode_unknown_type() {
        let err = Action::decode(&json!({"type": "unknown_type"})).unwrap_err();
        assert!(matches!(err, ActionError::UnknownType(ref t) if t == "unknown_type"));
    }

    #[test]
    fn test_decode_invalid_definitions() {
        assert!(matches!(
            Action::decode(&json!("send_email")),
            Err(ActionError::InvalidDefinition(_))
        ));
        assert!(matches!(
            Action::decode(&json!({"to": "a@b.c"})),
            Err(ActionError::InvalidDefinition(_))
        ));
        assert!(matches!(
            Action::decode(&json!({"type": "webhook"})),
            Err(ActionError::InvalidDefinition(_))
        ));
        assert!(matches!(
            Action::decode(&json!({"type": "webhook", "url": "x", "method": "TRACE"})),
            Err(ActionError::InvalidDefinition(_))
        ));
    }

    #[test]
    fn test_declared_type() {
        assert_eq!(declared_type(&json!({"type": "webhook"})), "webhook");
        assert_eq!(declared_type(&json!({"kind": "webhook"})), "unknown");
        assert_eq!(declared_type(&json!(null)), "unknown");
    }

    #[test]
    fn test_method_conversion() {
        assert_eq!(Method::from(WebhookMethod::POST), Method::POST);
        assert_eq!(Method::from(WebhookMethod::PATCH), Method::PATCH);
    }
}
