use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::errors::AssignmentError;
use super::matcher;
use super::persistence_iface::AssignmentRuleStore;
use super::types::{
    AssignmentDecision, AssignmentRule, AssignmentRuleDraft, AssignmentRuleUpdate,
    WorkOrderDescriptor,
};
use crate::notifications::NotificationDispatch;
use crate::ports::{UserDirectory, UserProfile};
use crate::shared_types::{UserId, WorkOrderId};

const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Broadcast to interested observers whenever the rule set or an assignment
/// changes.
#[derive(Debug, Clone, PartialEq)]
pub enum AssignmentEvent {
    RuleCreated { rule: AssignmentRule },
    RuleUpdated { rule: AssignmentRule },
    RuleDeleted { rule_id: Uuid },
    Resolved {
        work_order_id: WorkOrderId,
        decision: AssignmentDecision,
    },
}

// --- AssignmentService Trait ---

#[async_trait]
pub trait AssignmentService: Send + Sync {
    /// Creates a rule on behalf of `actor`. Requires an active supervisor or
    /// admin; the draft's assignee must be an active technician at creation
    /// time.
    async fn create_rule(
        &self,
        actor: &UserId,
        draft: AssignmentRuleDraft,
    ) -> Result<AssignmentRule, AssignmentError>;

    /// Applies a partial update. The assignee is re-validated only when the
    /// update carries a new `assign_to`.
    async fn update_rule(
        &self,
        actor: &UserId,
        rule_id: Uuid,
        update: AssignmentRuleUpdate,
    ) -> Result<AssignmentRule, AssignmentError>;

    async fn delete_rule(&self, actor: &UserId, rule_id: Uuid) -> Result<(), AssignmentError>;

    /// Resolves the responder for one work order. A manual assignee on the
    /// descriptor short-circuits rule evaluation entirely; otherwise the
    /// active rules are evaluated highest priority first and the first match
    /// wins. No match is a valid outcome, not an error.
    ///
    /// When a responder is determined, the "assigned" notification is
    /// dispatched as a side effect. Notification failure is logged and
    /// reflected in `AssignmentDecision::notified` but never fails the
    /// resolution itself.
    async fn resolve_assignment(
        &self,
        actor: &UserId,
        work_order: &WorkOrderDescriptor,
    ) -> Result<AssignmentDecision, AssignmentError>;

    fn subscribe_to_events(&self) -> broadcast::Receiver<AssignmentEvent>;
}

// --- DefaultAssignmentService ---

pub struct DefaultAssignmentService {
    rule_store: Arc<dyn AssignmentRuleStore>,
    directory: Arc<dyn UserDirectory>,
    dispatcher: Arc<dyn NotificationDispatch>,
    event_publisher: broadcast::Sender<AssignmentEvent>,
}

impl DefaultAssignmentService {
    pub fn new(
        rule_store: Arc<dyn AssignmentRuleStore>,
        directory: Arc<dyn UserDirectory>,
        dispatcher: Arc<dyn NotificationDispatch>,
    ) -> Self {
        let (event_publisher, _) = broadcast::channel(DEFAULT_EVENT_CAPACITY);
        Self {
            rule_store,
            directory,
            dispatcher,
            event_publisher,
        }
    }

    fn publish_event(&self, event: AssignmentEvent) {
        let _ = self.event_publisher.send(event);
    }

    /// Actor must be an active supervisor or admin.
    async fn require_rule_manager(
        &self,
        actor: &UserId,
        action: &str,
    ) -> Result<UserProfile, AssignmentError> {
        let profile = self.directory.get_user(actor).await?;
        match profile {
            Some(p) if p.is_active && p.role.can_manage_rules() => Ok(p),
            _ => Err(AssignmentError::permission_denied(actor.clone(), action)),
        }
    }

    /// Assignee must exist and be an active technician right now.
    async fn require_eligible_assignee(&self, user_id: &UserId) -> Result<(), AssignmentError> {
        match self.directory.get_user(user_id).await? {
            Some(p) if p.is_eligible_assignee() => Ok(()),
            Some(_) => Err(AssignmentError::invalid_assignee(
                user_id.clone(),
                "not an active technician",
            )),
            None => Err(AssignmentError::invalid_assignee(
                user_id.clone(),
                "unknown user",
            )),
        }
    }

    fn validate_rule_name(name: &str) -> Result<(), AssignmentError> {
        if name.trim().is_empty() {
            return Err(AssignmentError::InvalidRuleDefinition {
                name: name.to_string(),
                reason: "rule name must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Runs the notification side effect for a non-empty decision. Any
    /// failure is contained here.
    async fn dispatch_assignment_notice(
        &self,
        work_order: &WorkOrderDescriptor,
        decision: &mut AssignmentDecision,
    ) {
        let Some(assignee) = decision.assign_to.clone() else {
            return;
        };
        match self
            .dispatcher
            .notify_assignment(&work_order.id, &assignee, &work_order.title)
            .await
        {
            Ok(_outcome) => {
                // Created or already present, either way the notification
                // invariant holds for this (work order, assignee) pair.
                decision.notified = true;
            }
            Err(e) => {
                warn!(
                    "Assignment notification for work order '{}' to user '{}' failed: {}. \
                     Assignment stands.",
                    work_order.id, assignee, e
                );
                decision.notified = false;
            }
        }
    }
}

#[async_trait]
impl AssignmentService for DefaultAssignmentService {
    async fn create_rule(
        &self,
        actor: &UserId,
        draft: AssignmentRuleDraft,
    ) -> Result<AssignmentRule, AssignmentError> {
        self.require_rule_manager(actor, "create assignment rules")
            .await?;
        Self::validate_rule_name(&draft.name)?;
        self.require_eligible_assignee(&draft.assign_to).await?;

        let rule = draft.into_rule(Uuid::new_v4(), Utc::now());
        let created = self.rule_store.create_rule(rule).await?;
        info!(
            "Assignment rule '{}' ({}) created by '{}'.",
            created.name, created.id, actor
        );
        self.publish_event(AssignmentEvent::RuleCreated {
            rule: created.clone(),
        });
        Ok(created)
    }

    async fn update_rule(
        &self,
        actor: &UserId,
        rule_id: Uuid,
        update: AssignmentRuleUpdate,
    ) -> Result<AssignmentRule, AssignmentError> {
        self.require_rule_manager(actor, "update assignment rules")
            .await?;
        let existing = self
            .rule_store
            .get_rule(rule_id)
            .await?
            .ok_or(AssignmentError::RuleNotFound(rule_id))?;

        if let Some(name) = &update.name {
            Self::validate_rule_name(name)?;
        }
        if let Some(new_assignee) = &update.assign_to {
            if *new_assignee != existing.assign_to {
                self.require_eligible_assignee(new_assignee).await?;
            }
        }

        let updated = update.apply_to(&existing);
        if !self.rule_store.update_rule(updated.clone()).await? {
            // Deleted between the read and the write.
            return Err(AssignmentError::RuleNotFound(rule_id));
        }
        info!(
            "Assignment rule '{}' ({}) updated by '{}'.",
            updated.name, updated.id, actor
        );
        self.publish_event(AssignmentEvent::RuleUpdated {
            rule: updated.clone(),
        });
        Ok(updated)
    }

    async fn delete_rule(&self, actor: &UserId, rule_id: Uuid) -> Result<(), AssignmentError> {
        self.require_rule_manager(actor, "delete assignment rules")
            .await?;
        if !self.rule_store.delete_rule(rule_id).await? {
            return Err(AssignmentError::RuleNotFound(rule_id));
        }
        info!("Assignment rule {} deleted by '{}'.", rule_id, actor);
        self.publish_event(AssignmentEvent::RuleDeleted { rule_id });
        Ok(())
    }

    async fn resolve_assignment(
        &self,
        actor: &UserId,
        work_order: &WorkOrderDescriptor,
    ) -> Result<AssignmentDecision, AssignmentError> {
        let mut decision = if let Some(manual) = &work_order.manual_assign_to {
            self.require_rule_manager(actor, "assign work orders manually")
                .await?;
            self.require_eligible_assignee(manual).await?;
            debug!(
                "Work order '{}' manually assigned to '{}', rules not consulted.",
                work_order.id, manual
            );
            AssignmentDecision::manual(manual.clone())
        } else {
            let rules = self.rule_store.list_active_rules_by_priority().await?;
            match matcher::find_best_match(&work_order.match_input, &rules) {
                Some(rule) => {
                    debug!(
                        "Work order '{}' matched rule '{}' (priority {}).",
                        work_order.id, rule.name, rule.priority
                    );
                    AssignmentDecision::from_rule(rule)
                }
                None => {
                    debug!(
                        "Work order '{}' matched no assignment rule, left unassigned.",
                        work_order.id
                    );
                    AssignmentDecision::unmatched()
                }
            }
        };

        self.dispatch_assignment_notice(work_order, &mut decision)
            .await;
        self.publish_event(AssignmentEvent::Resolved {
            work_order_id: work_order.id.clone(),
            decision: decision.clone(),
        });
        Ok(decision)
    }

    fn subscribe_to_events(&self) -> broadcast::Receiver<AssignmentEvent> {
        self.event_publisher.subscribe()
    }
}
