//! Ports to external collaborators.
//!
//! These traits abstract the services the domain layer consumes but does not
//! own: the user service (for permission and eligibility checks) and the
//! configuration persistence mechanism used by file-backed providers.

pub mod config_service;
pub mod user_directory;

pub use self::config_service::ConfigServiceAsync;
pub use self::user_directory::{UserDirectory, UserProfile};
