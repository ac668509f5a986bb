use async_trait::async_trait;
use uuid::Uuid;

use super::types::{AssignmentRule, AssignmentRuleSet};
use crate::error::StorageError;

/// Trait for the rule store collaborator. Implementations must serialize
/// mutation per rule ID so concurrent updates cannot be lost; the matcher
/// relies on `list_active_rules_by_priority` handing out one coherent
/// snapshot per call.
#[async_trait]
pub trait AssignmentRuleStore: Send + Sync {
    /// Lists active rules ordered by priority descending, creation time
    /// ascending within equal priorities.
    async fn list_active_rules_by_priority(&self) -> Result<AssignmentRuleSet, StorageError>;

    async fn get_rule(&self, id: Uuid) -> Result<Option<AssignmentRule>, StorageError>;

    async fn create_rule(&self, rule: AssignmentRule) -> Result<AssignmentRule, StorageError>;

    /// Replaces the stored rule with the same ID. Returns `false` if no such
    /// rule exists.
    async fn update_rule(&self, rule: AssignmentRule) -> Result<bool, StorageError>;

    /// Returns `false` if no such rule exists.
    async fn delete_rule(&self, id: Uuid) -> Result<bool, StorageError>;
}
