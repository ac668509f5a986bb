use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::shared_types::{UserId, UserRole};

/// The slice of a user account the domain layer needs for permission and
/// eligibility checks. The full account record stays with the user service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub role: UserRole,
    pub is_active: bool,
}

impl UserProfile {
    /// Whether this profile may receive assigned work right now.
    pub fn is_eligible_assignee(&self) -> bool {
        self.is_active && self.role.is_technician()
    }
}

/// Trait for the user service consumed by the assignment resolver and the
/// notification dispatcher. Lookups reflect the account state at call time;
/// eligibility is checked at rule-evaluation time, not rule-definition time.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Resolves a user by ID. `Ok(None)` means the account does not exist.
    async fn get_user(&self, id: &UserId) -> Result<Option<UserProfile>, StorageError>;

    /// Lists every active user holding the supervisor or admin role, the
    /// audience for status-change fan-out.
    async fn list_active_supervisors(&self) -> Result<Vec<UserProfile>, StorageError>;
}
