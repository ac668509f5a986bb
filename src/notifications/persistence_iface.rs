use async_trait::async_trait;
use uuid::Uuid;

use super::types::{Notification, NotificationFilter};
use crate::error::StorageError;
use crate::shared_types::UserId;

/// Trait for the notification inbox collaborator.
#[async_trait]
pub trait NotificationInbox: Send + Sync {
    async fn create(&self, notification: Notification) -> Result<Notification, StorageError>;

    /// Entries matching the filter, newest first.
    async fn find_many(
        &self,
        filter: &NotificationFilter,
    ) -> Result<Vec<Notification>, StorageError>;

    /// Scoped read-flag update. Returns `false` when no notification with
    /// this ID belongs to `user_id`; absent and foreign-owned are
    /// indistinguishable.
    async fn mark_read(&self, id: Uuid, user_id: &UserId) -> Result<bool, StorageError>;

    /// Deletes everything matching the filter and returns the count.
    async fn delete_many(&self, filter: &NotificationFilter) -> Result<usize, StorageError>;
}
