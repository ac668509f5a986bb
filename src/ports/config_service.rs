use async_trait::async_trait;

use crate::error::StorageError;

/// Trait for a service that can read and write configuration strings by key.
/// File-backed providers (like `FilesystemRuleStore`) use this to reach the
/// underlying persistence mechanism without knowing about paths or formats
/// beyond their own document.
#[async_trait]
pub trait ConfigServiceAsync: Send + Sync {
    /// Reads a configuration file identified by a key (e.g.
    /// "assignment/rules.toml") and returns its content as a string.
    /// A missing file is reported as a `StorageError` whose
    /// `is_not_found()` returns true.
    async fn read_config_file_string(&self, key: &str) -> Result<String, StorageError>;

    /// Writes the given content string to a configuration file identified by
    /// a key, replacing any previous content.
    async fn write_config_file_string(&self, key: &str, content: String)
        -> Result<(), StorageError>;
}
