//! Notification dispatch for work-order events.
//!
//! The dispatcher creates per-recipient inbox entries for assignment and
//! status-change events, answers unread/stat queries, and runs the retention
//! sweep. Persistence is abstracted behind [`NotificationInbox`].

pub mod errors;
pub mod persistence;
pub mod persistence_iface;
pub mod service;
pub mod types;

pub use errors::NotificationError;
pub use persistence::InMemoryNotificationInbox;
pub use persistence_iface::NotificationInbox;
pub use service::{DefaultNotificationDispatcher, DispatcherConfig, NotificationDispatch};
pub use types::{
    AssignmentNoticeOutcome, FanOutFailure, FanOutReport, Notification, NotificationEvent,
    NotificationFilter, NotificationStats, NotificationType, NotificationTypeCounts,
};
