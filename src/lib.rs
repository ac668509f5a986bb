//! Domain layer for the FixFlow maintenance management system.
//!
//! This crate covers automatic work-order assignment and the notifications
//! that follow from it: prioritized assignment rules with a pure first-match
//! engine, a permission-gated rule management service, and a notification
//! dispatcher for assignment and status-change events.
//!
//! Persistence and user lookup are injected behind async traits
//! ([`AssignmentRuleStore`], [`NotificationInbox`], [`UserDirectory`]), so
//! the crate carries no opinion about the surrounding storage or web stack.

pub mod assignment_rules;
pub mod error;
pub mod notifications;
pub mod ports;
pub mod shared_types;

pub use error::{DomainError, DomainResult, StorageError, StorageErrorKind};
pub use shared_types::{UserId, UserRole, WorkOrderId, WorkOrderStatus};

pub use assignment_rules::{
    AssignmentDecision, AssignmentError, AssignmentEvent, AssignmentRule, AssignmentRuleDraft,
    AssignmentRuleSet, AssignmentRuleStore, AssignmentRuleUpdate, AssignmentService,
    DefaultAssignmentService, FilesystemRuleStore, InMemoryRuleStore, WorkOrderDescriptor,
    WorkOrderMatchInput,
};
pub use notifications::{
    AssignmentNoticeOutcome, DefaultNotificationDispatcher, DispatcherConfig, FanOutFailure,
    FanOutReport, InMemoryNotificationInbox, Notification, NotificationDispatch,
    NotificationError, NotificationEvent, NotificationFilter, NotificationInbox,
    NotificationStats, NotificationType, NotificationTypeCounts,
};
pub use ports::{ConfigServiceAsync, UserDirectory, UserProfile};
