//! Error module for the FixFlow domain layer.
//!
//! Subsystem errors live next to their modules; this module defines the
//! storage passthrough error and the crate-wide umbrella.

use thiserror::Error;

use crate::assignment_rules::errors::AssignmentError;
use crate::notifications::errors::NotificationError;

/// A general Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

/// Coarse classification of a storage failure. Providers use `NotFound` to
/// distinguish "the stored document does not exist" (readable as an empty
/// data set) from genuine I/O trouble.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageErrorKind {
    NotFound,
    Io,
    Serialization,
    Other,
}

/// Opaque failure reported by a storage collaborator (rule store, inbox,
/// user directory). The domain layer never interprets it beyond the kind
/// and operation label; callers decide whether to retry.
#[derive(Debug, Error)]
#[error("Storage failure during '{operation}': {message}")]
pub struct StorageError {
    pub kind: StorageErrorKind,
    pub operation: String,
    pub message: String,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl StorageError {
    pub fn new(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: StorageErrorKind::Other,
            operation: operation.into(),
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    ) -> Self {
        Self {
            kind: StorageErrorKind::Io,
            operation: operation.into(),
            message: message.into(),
            source: Some(source),
        }
    }

    /// Constructor for the missing-document case.
    pub fn not_found(operation: impl Into<String>, key: &str) -> Self {
        Self {
            kind: StorageErrorKind::NotFound,
            operation: operation.into(),
            message: format!("'{}' not found", key),
            source: None,
        }
    }

    pub fn serialization(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: StorageErrorKind::Serialization,
            operation: operation.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Whether this failure means "the stored document does not exist".
    pub fn is_not_found(&self) -> bool {
        self.kind == StorageErrorKind::NotFound
    }
}

/// The primary error type for the domain layer.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Assignment rule engine error.
    #[error(transparent)]
    Assignment(#[from] AssignmentError),

    /// Notification dispatch error.
    #[error(transparent)]
    Notification(#[from] NotificationError),

    /// Storage collaborator error.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Other error.
    #[error("Domain error: {0}")]
    Other(String),
}
