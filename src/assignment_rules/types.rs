use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

use crate::shared_types::{UserId, WorkOrderId};

// --- AssignmentRule Struct ---
/// A prioritized filter-to-responder mapping used for automatic work
/// assignment. An empty filter set means "matches anything" (wildcard); a
/// non-empty set means the work order's value must be a member. The engine
/// treats each rule snapshot as immutable during one evaluation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentRule {
    pub id: Uuid,
    pub name: String,
    /// Higher value = evaluated first. Not required unique; ties break by
    /// creation time (earliest first).
    #[serde(default)]
    pub priority: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "HashSet::is_empty")]
    pub asset_types: HashSet<String>,
    #[serde(default, skip_serializing_if = "HashSet::is_empty")]
    pub categories: HashSet<String>,
    #[serde(default, skip_serializing_if = "HashSet::is_empty")]
    pub locations: HashSet<String>,
    #[serde(default, skip_serializing_if = "HashSet::is_empty")]
    pub priorities: HashSet<String>,
    pub assign_to: UserId,
    pub created_at: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

impl AssignmentRule {
    /// Whether every filter set is empty, i.e. the rule is a catch-all.
    pub fn is_catch_all(&self) -> bool {
        self.asset_types.is_empty()
            && self.categories.is_empty()
            && self.locations.is_empty()
            && self.priorities.is_empty()
    }
}

// --- AssignmentRuleDraft Struct ---
/// Input for rule creation. Identity and creation time are stamped by the
/// service on success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentRuleDraft {
    pub name: String,
    #[serde(default)]
    pub priority: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub asset_types: HashSet<String>,
    #[serde(default)]
    pub categories: HashSet<String>,
    #[serde(default)]
    pub locations: HashSet<String>,
    #[serde(default)]
    pub priorities: HashSet<String>,
    pub assign_to: UserId,
}

impl AssignmentRuleDraft {
    /// Stamps identity and creation time onto the draft.
    pub fn into_rule(self, id: Uuid, created_at: DateTime<Utc>) -> AssignmentRule {
        AssignmentRule {
            id,
            name: self.name,
            priority: self.priority,
            is_active: self.is_active,
            asset_types: self.asset_types,
            categories: self.categories,
            locations: self.locations,
            priorities: self.priorities,
            assign_to: self.assign_to,
            created_at,
        }
    }
}

// --- AssignmentRuleUpdate Struct ---
/// Partial rule update. `None` fields are left untouched; the assignee is
/// re-validated only when `assign_to` is present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AssignmentRuleUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_types: Option<HashSet<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<HashSet<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locations: Option<HashSet<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priorities: Option<HashSet<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assign_to: Option<UserId>,
}

impl AssignmentRuleUpdate {
    /// Applies this update on top of an existing rule. Identity and creation
    /// time are immutable.
    pub fn apply_to(&self, rule: &AssignmentRule) -> AssignmentRule {
        AssignmentRule {
            id: rule.id,
            name: self.name.clone().unwrap_or_else(|| rule.name.clone()),
            priority: self.priority.unwrap_or(rule.priority),
            is_active: self.is_active.unwrap_or(rule.is_active),
            asset_types: self.asset_types.clone().unwrap_or_else(|| rule.asset_types.clone()),
            categories: self.categories.clone().unwrap_or_else(|| rule.categories.clone()),
            locations: self.locations.clone().unwrap_or_else(|| rule.locations.clone()),
            priorities: self.priorities.clone().unwrap_or_else(|| rule.priorities.clone()),
            assign_to: self.assign_to.clone().unwrap_or_else(|| rule.assign_to.clone()),
            created_at: rule.created_at,
        }
    }
}

// --- WorkOrderMatchInput Struct ---
/// The matching-relevant slice of a work order, constructed per evaluation.
/// Pure value type with no identity; required vs. optional fields are
/// explicit so an absent optional field can never satisfy a present filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkOrderMatchInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_type: Option<String>,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub priority: String,
}

// --- WorkOrderDescriptor Struct ---
/// Everything `resolve_assignment` needs about one work order: identity for
/// the notification side effect, the match input for the rule engine, and an
/// optional manual assignee supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkOrderDescriptor {
    pub id: WorkOrderId,
    pub title: String,
    pub match_input: WorkOrderMatchInput,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manual_assign_to: Option<UserId>,
}

// --- AssignmentDecision Struct ---
/// Outcome of one evaluation pass. All fields absent means no rule matched,
/// which is a valid terminal outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AssignmentDecision {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_rule_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_rule_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_priority: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assign_to: Option<UserId>,
    /// Whether the "assigned" notification side effect took hold for this
    /// decision. Never affects the decision itself: a failed or deduplicated
    /// notification leaves the assignment valid.
    #[serde(default)]
    pub notified: bool,
}

impl AssignmentDecision {
    pub fn unmatched() -> Self {
        Self::default()
    }

    /// Manual override decision: rules were never consulted.
    pub fn manual(assign_to: UserId) -> Self {
        Self {
            assign_to: Some(assign_to),
            ..Self::default()
        }
    }

    pub fn from_rule(rule: &AssignmentRule) -> Self {
        Self {
            matched_rule_id: Some(rule.id),
            matched_rule_name: Some(rule.name.clone()),
            matched_priority: Some(rule.priority),
            assign_to: Some(rule.assign_to.clone()),
            notified: false,
        }
    }

    pub fn is_unmatched(&self) -> bool {
        self.assign_to.is_none()
    }
}

// --- AssignmentRuleSet Type Alias ---
pub type AssignmentRuleSet = Vec<AssignmentRule>;

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_rule() -> AssignmentRule {
        AssignmentRule {
            id: Uuid::new_v4(),
            name: "Electrical / ShopA".to_string(),
            priority: 10,
            is_active: true,
            asset_types: HashSet::new(),
            categories: ["Electrical".to_string()].into_iter().collect(),
            locations: ["ShopA".to_string()].into_iter().collect(),
            priorities: HashSet::new(),
            assign_to: UserId::new("tech-1"),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn rule_defaults_via_serde() {
        let json_minimal = r#"
        {
            "id": "a1a2a3a4-b1b2-c1c2-d1d2-d3d4d5d6d7d8",
            "name": "Catch-all",
            "assign_to": "tech-2",
            "created_at": "2024-05-01T08:00:00Z"
        }
        "#;
        let rule: AssignmentRule = serde_json::from_str(json_minimal).unwrap();
        assert_eq!(rule.priority, 0);
        assert!(rule.is_active);
        assert!(rule.is_catch_all());
    }

    #[test]
    fn rule_serde_round_trip() {
        let rule = sample_rule();
        let ser = serde_json::to_string_pretty(&rule).unwrap();
        let de: AssignmentRule = serde_json::from_str(&ser).unwrap();
        assert_eq!(rule, de);
    }

    #[test]
    fn empty_filter_sets_are_skipped_in_serialization() {
        let rule = sample_rule();
        let ser = serde_json::to_string(&rule).unwrap();
        assert!(!ser.contains("asset_types"));
        assert!(ser.contains("categories"));
    }

    #[test]
    fn update_applies_only_present_fields() {
        let rule = sample_rule();
        let update = AssignmentRuleUpdate {
            priority: Some(99),
            is_active: Some(false),
            ..Default::default()
        };
        let updated = update.apply_to(&rule);
        assert_eq!(updated.priority, 99);
        assert!(!updated.is_active);
        assert_eq!(updated.name, rule.name);
        assert_eq!(updated.assign_to, rule.assign_to);
        assert_eq!(updated.id, rule.id);
        assert_eq!(updated.created_at, rule.created_at);
    }

    #[test]
    fn draft_into_rule_stamps_identity() {
        let draft = AssignmentRuleDraft {
            name: "Mechanical".to_string(),
            priority: 5,
            is_active: true,
            asset_types: HashSet::new(),
            categories: ["Mechanical".to_string()].into_iter().collect(),
            locations: HashSet::new(),
            priorities: HashSet::new(),
            assign_to: UserId::new("tech-2"),
        };
        let id = Uuid::new_v4();
        let now = Utc::now();
        let rule = draft.into_rule(id, now);
        assert_eq!(rule.id, id);
        assert_eq!(rule.created_at, now);
        assert_eq!(rule.priority, 5);
    }

    #[test]
    fn unmatched_decision_is_default() {
        let decision = AssignmentDecision::unmatched();
        assert!(decision.is_unmatched());
        assert!(decision.matched_rule_id.is_none());
        assert!(!decision.notified);
    }

    #[test]
    fn decision_from_rule_carries_rule_fields() {
        let rule = sample_rule();
        let decision = AssignmentDecision::from_rule(&rule);
        assert_eq!(decision.matched_rule_id, Some(rule.id));
        assert_eq!(decision.matched_priority, Some(10));
        assert_eq!(decision.assign_to, Some(UserId::new("tech-1")));
        assert!(!decision.is_unmatched());
    }
}
