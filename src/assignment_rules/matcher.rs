//! Pure rule matching: given one work-order descriptor and a rule snapshot,
//! find the single winning rule.
//!
//! Matching is exact set membership, first-match-wins under priority order.
//! Filter specificity is not a tie-break dimension, and substring matching
//! never enters this contract.

use std::collections::HashSet;

use super::types::{AssignmentRule, WorkOrderMatchInput};

/// Returns the highest-priority active rule matching `input`, or `None` if
/// no rule matches (a valid terminal outcome, not a failure).
///
/// Ordering is priority descending; equal priorities resolve to the rule
/// created earliest, with the rule ID as a final deterministic tie-break so
/// repeated evaluations of an unchanged snapshot always return the same
/// winner.
pub fn find_best_match<'a>(
    input: &WorkOrderMatchInput,
    rules: &'a [AssignmentRule],
) -> Option<&'a AssignmentRule> {
    let mut candidates: Vec<&AssignmentRule> = rules.iter().filter(|r| r.is_active).collect();
    candidates.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then_with(|| a.created_at.cmp(&b.created_at))
            .then_with(|| a.id.cmp(&b.id))
    });
    candidates.into_iter().find(|rule| rule_matches(rule, input))
}

/// A rule matches iff every non-empty filter set contains the corresponding
/// input value. An empty set is a wildcard; a non-empty filter with an
/// absent optional input field never matches.
fn rule_matches(rule: &AssignmentRule, input: &WorkOrderMatchInput) -> bool {
    filter_accepts(&rule.asset_types, input.asset_type.as_deref())
        && filter_accepts(&rule.categories, Some(&input.category))
        && filter_accepts(&rule.locations, input.location.as_deref())
        && filter_accepts(&rule.priorities, Some(&input.priority))
}

fn filter_accepts(filter: &HashSet<String>, value: Option<&str>) -> bool {
    if filter.is_empty() {
        return true;
    }
    match value {
        Some(v) => filter.contains(v),
        None => false,
    }
}
