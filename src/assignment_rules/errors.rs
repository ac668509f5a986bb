use thiserror::Error;
use uuid::Uuid;

use crate::error::StorageError;
use crate::shared_types::UserId;

#[derive(Debug, Error)]
pub enum AssignmentError {
    #[error("User '{user_id}' is not permitted to {action}.")]
    PermissionDenied { user_id: UserId, action: String },

    #[error("User '{user_id}' cannot be assigned work: {reason}")]
    InvalidAssignee { user_id: UserId, reason: String },

    #[error("Assignment rule with ID '{0}' not found.")]
    RuleNotFound(Uuid),

    #[error("Invalid rule definition '{name}': {reason}")]
    InvalidRuleDefinition { name: String, reason: String },

    #[error("Rule persistence error: {0}")]
    Storage(#[from] StorageError),
}

impl AssignmentError {
    pub fn permission_denied(user_id: UserId, action: impl Into<String>) -> Self {
        AssignmentError::PermissionDenied {
            user_id,
            action: action.into(),
        }
    }

    pub fn invalid_assignee(user_id: UserId, reason: impl Into<String>) -> Self {
        AssignmentError::InvalidAssignee {
            user_id,
            reason: reason.into(),
        }
    }
}
