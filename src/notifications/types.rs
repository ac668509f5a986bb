use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared_types::{UserId, WorkOrderId};

// --- NotificationType Enum ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationType {
    Assigned,
    Updated,
    SystemAlert,
}

// --- Notification Struct ---
/// One inbox entry for one recipient. The only state transition is
/// unread -> read; deletion is reachable only from read (the retention
/// sweep filters on `is_read`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: UserId,
    pub kind: NotificationType,
    pub title: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_order_id: Option<WorkOrderId>,
    #[serde(default)]
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(
        user_id: UserId,
        kind: NotificationType,
        title: impl Into<String>,
        message: impl Into<String>,
        work_order_id: Option<WorkOrderId>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            kind,
            title: title.into(),
            message: message.into(),
            work_order_id,
            is_read: false,
            created_at: Utc::now(),
        }
    }

    pub fn mark_as_read(&mut self) {
        self.is_read = true;
    }
}

// --- NotificationFilter Struct ---
/// Conjunctive filter over inbox entries; `None` fields match anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct NotificationFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_order_id: Option<WorkOrderId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<NotificationType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_read: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_before: Option<DateTime<Utc>>,
}

impl NotificationFilter {
    pub fn for_user(user_id: UserId) -> Self {
        Self {
            user_id: Some(user_id),
            ..Self::default()
        }
    }

    pub fn matches(&self, notification: &Notification) -> bool {
        self.user_id
            .as_ref()
            .map_or(true, |u| notification.user_id == *u)
            && self
                .work_order_id
                .as_ref()
                .map_or(true, |w| notification.work_order_id.as_ref() == Some(w))
            && self.kind.map_or(true, |k| notification.kind == k)
            && self.is_read.map_or(true, |r| notification.is_read == r)
            && self
                .created_before
                .map_or(true, |cutoff| notification.created_at < cutoff)
    }
}

// --- NotificationStats ---
/// Per-type counts with every known type always present, so consumers never
/// guard against missing keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct NotificationTypeCounts {
    pub assigned: usize,
    pub updated: usize,
    pub system_alert: usize,
}

impl NotificationTypeCounts {
    pub fn bump(&mut self, kind: NotificationType) {
        match kind {
            NotificationType::Assigned => self.assigned += 1,
            NotificationType::Updated => self.updated += 1,
            NotificationType::SystemAlert => self.system_alert += 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct NotificationStats {
    pub total: usize,
    pub unread: usize,
    pub by_type: NotificationTypeCounts,
}

// --- Fan-out reporting ---
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FanOutFailure {
    pub user_id: UserId,
    pub reason: String,
}

/// Result of one status-change fan-out. Partial success is the expected
/// shape: failures ride alongside the created notifications and are never
/// aggregated into an overall error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FanOutReport {
    pub created: Vec<Notification>,
    pub failures: Vec<FanOutFailure>,
}

impl FanOutReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

// --- AssignmentNoticeOutcome ---
/// Outcome of `notify_assignment`: either a fresh notification or the
/// idempotent second pass over an already-notified `(work order, assignee)`
/// pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignmentNoticeOutcome {
    Created(Notification),
    AlreadyNotified,
}

impl AssignmentNoticeOutcome {
    pub fn created(&self) -> Option<&Notification> {
        match self {
            AssignmentNoticeOutcome::Created(n) => Some(n),
            AssignmentNoticeOutcome::AlreadyNotified => None,
        }
    }
}

// --- NotificationEvent Enum ---
/// Broadcast to interested observers (UI push channel, audit log).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationEvent {
    Created { notification: Notification },
    MarkedRead { notification_id: Uuid, user_id: UserId },
    Swept { deleted: usize },
}
