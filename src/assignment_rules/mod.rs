//! Automatic work-order assignment.
//!
//! Rules map work-order attributes to a responsible technician. The matcher
//! is a pure function over an immutable rule snapshot; the service wraps it
//! with rule management (permission-gated), manual-override handling and the
//! assignment notification side effect. Rule persistence is abstracted
//! behind [`AssignmentRuleStore`].

pub mod errors;
pub mod matcher;
pub mod persistence;
pub mod persistence_iface;
pub mod service;
pub mod types;

pub use errors::AssignmentError;
pub use matcher::find_best_match;
pub use persistence::{FilesystemRuleStore, InMemoryRuleStore};
pub use persistence_iface::AssignmentRuleStore;
pub use service::{AssignmentEvent, AssignmentService, DefaultAssignmentService};
pub use types::{
    AssignmentDecision, AssignmentRule, AssignmentRuleDraft, AssignmentRuleSet,
    AssignmentRuleUpdate, WorkOrderDescriptor, WorkOrderMatchInput,
};
