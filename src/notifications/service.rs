use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::errors::NotificationError;
use super::persistence_iface::NotificationInbox;
use super::types::{
    AssignmentNoticeOutcome, FanOutFailure, FanOutReport, Notification, NotificationEvent,
    NotificationFilter, NotificationStats, NotificationType,
};
use crate::ports::UserDirectory;
use crate::shared_types::{UserId, WorkOrderId, WorkOrderStatus};

const DEFAULT_RETENTION_DAYS: u32 = 30;
const DEFAULT_BROADCAST_CAPACITY: usize = 64;

/// Tunables for the dispatcher. `retention_days` is the age threshold the
/// sweep applies when the caller passes no explicit value.
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    pub retention_days: u32,
    pub broadcast_capacity: usize,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            retention_days: DEFAULT_RETENTION_DAYS,
            broadcast_capacity: DEFAULT_BROADCAST_CAPACITY,
        }
    }
}

// --- NotificationDispatch Trait ---

#[async_trait]
pub trait NotificationDispatch: Send + Sync {
    /// Creates one ASSIGNED notification for the responder, exactly once per
    /// `(work_order_id, assign_to)` pair. Fails with `TargetUserInactive`
    /// when the recipient is unknown or inactive; callers resolving an
    /// assignment treat that as non-fatal to the assignment itself.
    async fn notify_assignment(
        &self,
        work_order_id: &WorkOrderId,
        assign_to: &UserId,
        work_order_title: &str,
    ) -> Result<AssignmentNoticeOutcome, NotificationError>;

    /// Fans one UPDATED notification out to every active supervisor/admin.
    /// Per-recipient failures are reported in the result and never abort the
    /// remaining deliveries.
    async fn notify_status_change(
        &self,
        work_order_id: &WorkOrderId,
        from_status: WorkOrderStatus,
        to_status: WorkOrderStatus,
        work_order_title: &str,
    ) -> Result<FanOutReport, NotificationError>;

    /// Marks a notification read, scoped by `(id, user_id)`. A notification
    /// owned by another user reports `NotFound` rather than a permission
    /// error.
    async fn mark_as_read(&self, id: Uuid, user_id: &UserId) -> Result<(), NotificationError>;

    /// Total, unread and per-type counts for one recipient; every known
    /// type is present in the breakdown, zero-filled if absent.
    async fn get_user_stats(&self, user_id: &UserId)
        -> Result<NotificationStats, NotificationError>;

    /// Deletes notifications that are both read and older than the cutoff
    /// (`days_old`, defaulting to the configured retention window). Unread
    /// notifications are never auto-deleted regardless of age. Returns the
    /// deleted count.
    async fn cleanup_old_notifications(
        &self,
        days_old: Option<u32>,
    ) -> Result<usize, NotificationError>;

    fn subscribe_to_events(&self) -> broadcast::Receiver<NotificationEvent>;
}

// --- DefaultNotificationDispatcher ---

pub struct DefaultNotificationDispatcher {
    inbox: Arc<dyn NotificationInbox>,
    directory: Arc<dyn UserDirectory>,
    config: DispatcherConfig,
    /// Serializes the check-then-create window of `notify_assignment` so a
    /// concurrent double resolution of the same work order still yields
    /// exactly one record.
    assignment_gate: Mutex<()>,
    event_publisher: broadcast::Sender<NotificationEvent>,
}

impl DefaultNotificationDispatcher {
    pub fn new(
        inbox: Arc<dyn NotificationInbox>,
        directory: Arc<dyn UserDirectory>,
        config: DispatcherConfig,
    ) -> Self {
        let (event_publisher, _) = broadcast::channel(config.broadcast_capacity);
        Self {
            inbox,
            directory,
            config,
            assignment_gate: Mutex::new(()),
            event_publisher,
        }
    }

    fn publish_event(&self, event: NotificationEvent) {
        // A send error only means nobody is subscribed right now.
        let _ = self.event_publisher.send(event);
    }

    async fn create_and_publish(
        &self,
        notification: Notification,
    ) -> Result<Notification, NotificationError> {
        let created = self.inbox.create(notification).await?;
        self.publish_event(NotificationEvent::Created {
            notification: created.clone(),
        });
        Ok(created)
    }
}

#[async_trait]
impl NotificationDispatch for DefaultNotificationDispatcher {
    async fn notify_assignment(
        &self,
        work_order_id: &WorkOrderId,
        assign_to: &UserId,
        work_order_title: &str,
    ) -> Result<AssignmentNoticeOutcome, NotificationError> {
        let recipient = self.directory.get_user(assign_to).await?;
        match recipient {
            Some(profile) if profile.is_active => {}
            _ => return Err(NotificationError::TargetUserInactive(assign_to.clone())),
        }

        let _gate = self.assignment_gate.lock().await;
        let dedup_filter = NotificationFilter {
            user_id: Some(assign_to.clone()),
            work_order_id: Some(work_order_id.clone()),
            kind: Some(NotificationType::Assigned),
            ..NotificationFilter::default()
        };
        if !self.inbox.find_many(&dedup_filter).await?.is_empty() {
            debug!(
                "Assignment notification for work order '{}' to user '{}' already exists, skipping.",
                work_order_id, assign_to
            );
            return Ok(AssignmentNoticeOutcome::AlreadyNotified);
        }

        let notification = Notification::new(
            assign_to.clone(),
            NotificationType::Assigned,
            "Work order assigned",
            format!("You have been assigned work order '{}'.", work_order_title),
            Some(work_order_id.clone()),
        );
        let created = self.create_and_publish(notification).await?;
        info!(
            "Assignment notification {} created for user '{}' (work order '{}').",
            created.id, assign_to, work_order_id
        );
        Ok(AssignmentNoticeOutcome::Created(created))
    }

    async fn notify_status_change(
        &self,
        work_order_id: &WorkOrderId,
        from_status: WorkOrderStatus,
        to_status: WorkOrderStatus,
        work_order_title: &str,
    ) -> Result<FanOutReport, NotificationError> {
        let audience = self.directory.list_active_supervisors().await?;
        debug!(
            "Fanning out status change {} -> {} for work order '{}' to {} recipients.",
            from_status,
            to_status,
            work_order_id,
            audience.len()
        );

        let mut report = FanOutReport::default();
        for profile in audience {
            // The snapshot can be stale; re-check activity per recipient so
            // one lapsed account cannot sink the batch.
            if !profile.is_active {
                warn!(
                    "Skipping status-change notification for inactive user '{}'.",
                    profile.id
                );
                report.failures.push(FanOutFailure {
                    user_id: profile.id,
                    reason: "recipient inactive".to_string(),
                });
                continue;
            }
            let notification = Notification::new(
                profile.id.clone(),
                NotificationType::Updated,
                "Work order updated",
                format!(
                    "Work order '{}' changed status from {} to {}.",
                    work_order_title, from_status, to_status
                ),
                Some(work_order_id.clone()),
            );
            match self.create_and_publish(notification).await {
                Ok(created) => report.created.push(created),
                Err(e) => {
                    warn!(
                        "Status-change notification for user '{}' failed: {}",
                        profile.id, e
                    );
                    report.failures.push(FanOutFailure {
                        user_id: profile.id,
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            "Status-change fan-out for work order '{}': {} created, {} failed.",
            work_order_id,
            report.created.len(),
            report.failures.len()
        );
        Ok(report)
    }

    async fn mark_as_read(&self, id: Uuid, user_id: &UserId) -> Result<(), NotificationError> {
        if self.inbox.mark_read(id, user_id).await? {
            self.publish_event(NotificationEvent::MarkedRead {
                notification_id: id,
                user_id: user_id.clone(),
            });
            Ok(())
        } else {
            Err(NotificationError::NotFound(id))
        }
    }

    async fn get_user_stats(
        &self,
        user_id: &UserId,
    ) -> Result<NotificationStats, NotificationError> {
        let entries = self
            .inbox
            .find_many(&NotificationFilter::for_user(user_id.clone()))
            .await?;
        let mut stats = NotificationStats::default();
        for n in &entries {
            stats.total += 1;
            if !n.is_read {
                stats.unread += 1;
            }
            stats.by_type.bump(n.kind);
        }
        Ok(stats)
    }

    async fn cleanup_old_notifications(
        &self,
        days_old: Option<u32>,
    ) -> Result<usize, NotificationError> {
        let days = days_old.unwrap_or(self.config.retention_days);
        let cutoff = Utc::now() - Duration::days(i64::from(days));
        let filter = NotificationFilter {
            is_read: Some(true),
            created_before: Some(cutoff),
            ..NotificationFilter::default()
        };
        let deleted = self.inbox.delete_many(&filter).await?;
        if deleted > 0 {
            info!(
                "Retention sweep deleted {} read notifications older than {} days.",
                deleted, days
            );
            self.publish_event(NotificationEvent::Swept { deleted });
        }
        Ok(deleted)
    }

    fn subscribe_to_events(&self) -> broadcast::Receiver<NotificationEvent> {
        self.event_publisher.subscribe()
    }
}
