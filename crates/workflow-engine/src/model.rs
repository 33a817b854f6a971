//! Workflow, execution and task models.
//!
//! These are the engine's view of the rows it reads and writes. Storage
//! backends convert their own row types into these.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;
use uuid::Uuid;

/// CRM entity kinds a workflow can be attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Lead,
    Company,
    Deal,
    Task,
    Meeting,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Lead => "lead",
            EntityType::Company => "company",
            EntityType::Deal => "deal",
            EntityType::Task => "task",
            EntityType::Meeting => "meeting",
        }
    }

    /// Table holding rows of this entity type.
    ///
    /// Plural of the type name; `companies` is the only irregular one.
    pub fn table_name(&self) -> &'static str {
        match self {
            EntityType::Lead => "leads",
            EntityType::Company => "companies",
            EntityType::Deal => "deals",
            EntityType::Task => "tasks",
            EntityType::Meeting => "meetings",
        }
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lead" => Ok(EntityType::Lead),
            "company" => Ok(EntityType::Company),
            "deal" => Ok(EntityType::Deal),
            "task" => Ok(EntityType::Task),
            "meeting" => Ok(EntityType::Meeting),
            other => Err(format!("unknown entity type '{}'", other)),
        }
    }
}

/// What causes a workflow to fire. Opaque to the executor beyond `Manual`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerType {
    StageChange,
    FieldChange,
    TimeBased,
    Manual,
    Webhook,
}

impl TriggerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerType::StageChange => "stage_change",
            TriggerType::FieldChange => "field_change",
            TriggerType::TimeBased => "time_based",
            TriggerType::Manual => "manual",
            TriggerType::Webhook => "webhook",
        }
    }
}

impl FromStr for TriggerType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stage_change" => Ok(TriggerType::StageChange),
            "field_change" => Ok(TriggerType::FieldChange),
            "time_based" => Ok(TriggerType::TimeBased),
            "manual" => Ok(TriggerType::Manual),
            "webhook" => Ok(TriggerType::Webhook),
            other => Err(format!("unknown trigger type '{}'", other)),
        }
    }
}

/// A user-defined workflow.
///
/// `actions` keeps the raw stored definitions so that one malformed entry
/// fails only itself when decoded.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub entity_type: EntityType,
    pub trigger_type: TriggerType,
    #[serde(default)]
    pub trigger_config: Value,
    pub is_active: bool,
    #[serde(default)]
    pub actions: Vec<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Lifecycle of an execution record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    Running,
    Completed,
    PartiallyCompleted,
    Failed,
}

impl ExecutionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionStatus::Running => "running",
            ExecutionStatus::Completed => "completed",
            ExecutionStatus::PartiallyCompleted => "partially_completed",
            ExecutionStatus::Failed => "failed",
        }
    }

    /// Terminal status for a finished action loop.
    ///
    /// No failures is `Completed` (including an empty action list), every
    /// action failing is `Failed`, anything in between is
    /// `PartiallyCompleted`.
    pub fn from_results(results: &[ActionResult]) -> Self {
        let failed = results.iter().filter(|r| r.is_failed()).count();
        if failed == 0 {
            ExecutionStatus::Completed
        } else if failed == results.len() {
            ExecutionStatus::Failed
        } else {
            ExecutionStatus::PartiallyCompleted
        }
    }
}

impl std::fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExecutionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "running" => Ok(ExecutionStatus::Running),
            "completed" => Ok(ExecutionStatus::Completed),
            "partially_completed" => Ok(ExecutionStatus::PartiallyCompleted),
            "failed" => Ok(ExecutionStatus::Failed),
            other => Err(format!("unknown execution status '{}'", other)),
        }
    }
}

/// Outcome of one action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionStatus {
    Success,
    Failed,
}

/// Per-action entry recorded on the execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResult {
    /// Position of the action in the workflow's list.
    pub index: usize,
    /// Declared action tag, or `unknown` when none could be read.
    #[serde(rename = "type")]
    pub action_type: String,
    pub status: ActionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub duration_ms: u64,
}

impl ActionResult {
    pub fn success(index: usize, action_type: impl Into<String>, result: Value, duration_ms: u64) -> Self {
        Self {
            index,
            action_type: action_type.into(),
            status: ActionStatus::Success,
            result: Some(result),
            error: None,
            duration_ms,
        }
    }

    pub fn failure(
        index: usize,
        action_type: impl Into<String>,
        error: impl Into<String>,
        duration_ms: u64,
    ) -> Self {
        Self {
            index,
            action_type: action_type.into(),
            status: ActionStatus::Failed,
            result: None,
            error: Some(error.into()),
            duration_ms,
        }
    }

    pub fn is_failed(&self) -> bool {
        self.status == ActionStatus::Failed
    }
}

/// Persisted record of one workflow run against one entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Execution {
    pub id: Uuid,
    pub workflow_id: Uuid,
    pub entity_type: EntityType,
    pub entity_id: String,
    #[serde(default)]
    pub trigger_data: Value,
    pub status: ExecutionStatus,
    #[serde(default)]
    pub actions_executed: Vec<ActionResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub started_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<i64>,
}

/// Insert payload for a new `running` execution.
#[derive(Debug, Clone)]
pub struct NewExecution {
    pub id: Uuid,
    pub workflow_id: Uuid,
    pub entity_type: EntityType,
    pub entity_id: String,
    pub trigger_data: Value,
    pub started_at: DateTime<Utc>,
}

impl NewExecution {
    /// The row as it reads right after insert.
    pub fn into_execution(self) -> Execution {
        Execution {
            id: self.id,
            workflow_id: self.workflow_id,
            entity_type: self.entity_type,
            entity_id: self.entity_id,
            trigger_data: self.trigger_data,
            status: ExecutionStatus::Running,
            actions_executed: Vec::new(),
            error_message: None,
            started_at: self.started_at,
            completed_at: None,
            duration_ms: None,
        }
    }
}

/// Final update applied to an execution when its action loop ends.
#[derive(Debug, Clone)]
pub struct ExecutionCompletion {
    pub status: ExecutionStatus,
    pub actions_executed: Vec<ActionResult>,
    pub error_message: Option<String>,
    pub completed_at: DateTime<Utc>,
    pub duration_ms: i64,
}

/// Filter for listing executions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecutionFilter {
    pub workflow_id: Option<Uuid>,
    pub status: Option<ExecutionStatus>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ExecutionFilter {
    pub fn effective_limit(&self) -> i64 {
        self.limit.unwrap_or(50).clamp(1, 100)
    }

    pub fn effective_offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

/// Task priority for `create_task`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
            TaskPriority::Urgent => "urgent",
        }
    }
}

impl FromStr for TaskPriority {
    type Err = String;

    /// Case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(TaskPriority::Low),
            "medium" => Ok(TaskPriority::Medium),
            "high" => Ok(TaskPriority::High),
            "urgent" => Ok(TaskPriority::Urgent),
            other => Err(format!("unknown task priority: {}", other)),
        }
    }
}

/// Insert payload for a task created by a workflow.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    /// Owner of the task: the workflow's user.
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub priority: TaskPriority,
    pub due_date: Option<DateTime<Utc>>,
    pub related_entity_type: EntityType,
    pub related_entity_id: String,
    pub workflow_id: Uuid,
}
