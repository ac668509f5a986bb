use thiserror::Error;
use uuid::Uuid;

use crate::error::StorageError;
use crate::shared_types::UserId;

#[derive(Debug, Error)]
pub enum NotificationError {
    /// The notification does not exist for this caller. Ownership mismatches
    /// report the same variant so existence never leaks across users.
    #[error("Notification with ID '{0}' not found.")]
    NotFound(Uuid),

    /// The intended recipient is unknown or inactive. Callers performing an
    /// assignment must treat this as non-fatal to the assignment itself.
    #[error("Notification target user '{0}' is inactive or unknown.")]
    TargetUserInactive(UserId),

    #[error("Notification persistence error: {0}")]
    Storage(#[from] StorageError),
}
