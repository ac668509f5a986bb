use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::persistence_iface::NotificationInbox;
use super::types::{Notification, NotificationFilter};
use crate::error::StorageError;
use crate::shared_types::UserId;

/// In-memory inbox for tests and embedding. A `RwLock<Vec<_>>` is plenty at
/// the expected scale; the real deployment fronts a relational store.
#[derive(Default)]
pub struct InMemoryNotificationInbox {
    entries: RwLock<Vec<Notification>>,
}

impl InMemoryNotificationInbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl NotificationInbox for InMemoryNotificationInbox {
    async fn create(&self, notification: Notification) -> Result<Notification, StorageError> {
        self.entries.write().await.push(notification.clone());
        Ok(notification)
    }

    async fn find_many(
        &self,
        filter: &NotificationFilter,
    ) -> Result<Vec<Notification>, StorageError> {
        let guard = self.entries.read().await;
        let mut found: Vec<Notification> =
            guard.iter().filter(|n| filter.matches(n)).cloned().collect();
        found.sort_by_key(|n| std::cmp::Reverse(n.created_at));
        Ok(found)
    }

    async fn mark_read(&self, id: Uuid, user_id: &UserId) -> Result<bool, StorageError> {
        let mut guard = self.entries.write().await;
        match guard
            .iter_mut()
            .find(|n| n.id == id && n.user_id == *user_id)
        {
            Some(n) => {
                n.mark_as_read();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_many(&self, filter: &NotificationFilter) -> Result<usize, StorageError> {
        let mut guard = self.entries.write().await;
        let before = guard.len();
        guard.retain(|n| !filter.matches(n));
        Ok(before - guard.len())
    }
}
