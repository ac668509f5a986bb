use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug, Display};

/// Represents a unique identifier for a user account.
///
/// User identities are owned by the surrounding user service; the domain layer
/// treats them as opaque non-empty strings.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default, PartialOrd, Ord)]
pub struct UserId(String);

impl UserId {
    /// Creates a new `UserId`.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if the provided `id` is empty.
    pub fn new(id: impl Into<String>) -> Self {
        let id_str = id.into();
        debug_assert!(!id_str.is_empty(), "UserId must not be empty.");
        Self(id_str)
    }

    /// Returns a string slice of the user ID.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Debug for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("UserId").field(&self.0).finish()
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        debug_assert!(!id.is_empty(), "UserId must not be empty.");
        Self(id)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        debug_assert!(!id.is_empty(), "UserId must not be empty.");
        Self(id.to_string())
    }
}

/// Represents a unique identifier for a work order.
///
/// Work orders are persisted by the surrounding CRUD service; the domain layer
/// only ever references them by this opaque identifier.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default, PartialOrd, Ord)]
pub struct WorkOrderId(String);

impl WorkOrderId {
    /// Creates a new `WorkOrderId`.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if the provided `id` is empty.
    pub fn new(id: impl Into<String>) -> Self {
        let id_str = id.into();
        debug_assert!(!id_str.is_empty(), "WorkOrderId must not be empty.");
        Self(id_str)
    }

    /// Returns a string slice of the work order ID.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Debug for WorkOrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("WorkOrderId").field(&self.0).finish()
    }
}

impl Display for WorkOrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for WorkOrderId {
    fn from(id: String) -> Self {
        debug_assert!(!id.is_empty(), "WorkOrderId must not be empty.");
        Self(id)
    }
}

impl From<&str> for WorkOrderId {
    fn from(id: &str) -> Self {
        debug_assert!(!id.is_empty(), "WorkOrderId must not be empty.");
        Self(id.to_string())
    }
}

/// Role held by a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Admin,
    Supervisor,
    Technician,
    Requester,
}

impl UserRole {
    /// Whether this role may create, update or delete assignment rules.
    pub fn can_manage_rules(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::Supervisor)
    }

    /// Whether this role is eligible to receive assigned work.
    pub fn is_technician(&self) -> bool {
        matches!(self, UserRole::Technician)
    }
}

/// Lifecycle status of a work order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkOrderStatus {
    #[default]
    Open,
    InProgress,
    OnHold,
    Completed,
    Canceled,
}

impl Display for WorkOrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            WorkOrderStatus::Open => "OPEN",
            WorkOrderStatus::InProgress => "IN_PROGRESS",
            WorkOrderStatus::OnHold => "ON_HOLD",
            WorkOrderStatus::Completed => "COMPLETED",
            WorkOrderStatus::Canceled => "CANCELED",
        };
        write!(f, "{}", label)
    }
}
