//! Workflow engine error types.

use thiserror::Error;
use uuid::Uuid;

/// Errors raised by a single action.
///
/// These never abort an execution: the runner records them against the
/// action that produced them and moves on to the next one.
#[derive(Debug, Error)]
pub enum ActionError {
    /// The stored action definition could not be decoded.
    #[error("Invalid action definition: {0}")]
    InvalidDefinition(String),

    /// The action declared a `type` outside the known set.
    #[error("Unknown action type: {0}")]
    UnknownType(String),

    /// The relational store rejected the operation.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// HTTP transport failure.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The webhook answered outside the 2xx range.
    #[error("Webhook responded with HTTP {0}")]
    HttpStatus(u16),

    /// An email or notification provider refused the message.
    #[error("Delivery failed: {0}")]
    Delivery(String),
}

impl From<reqwest::Error> for ActionError {
    fn from(e: reqwest::Error) -> Self {
        ActionError::Http(e.to_string())
    }
}

/// Errors returned by a [`crate::store::WorkflowStore`] implementation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The target row does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The field name is not a writable column of the target table.
    #[error("Invalid field: {0}")]
    InvalidField(String),

    /// Any other backend failure, surfaced verbatim.
    #[error("Store error: {0}")]
    Backend(String),
}

/// Invocation-level errors. These fail the whole request.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Workflow not found: {0}")]
    WorkflowNotFound(Uuid),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ActionError::UnknownType("unknown_type".to_string());
        assert_eq!(err.to_string(), "Unknown action type: unknown_type");

        let err = ActionError::HttpStatus(502);
        assert_eq!(err.to_string(), "Webhook responded with HTTP 502");
    }

    #[test]
    fn test_store_error_is_transparent() {
        let err: ActionError = StoreError::NotFound("leads/42".to_string()).into();
        assert_eq!(err.to_string(), "Not found: leads/42");
    }

    #[test]
    fn test_engine_error_display() {
        let id = Uuid::nil();
        let err = EngineError::WorkflowNotFound(id);
        assert_eq!(
            err.to_string(),
            "Workflow not found: 00000000-0000-0000-0000-000000000000"
        );
    }
}
