use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info};
use uuid::Uuid;

use super::persistence_iface::AssignmentRuleStore;
use super::types::{AssignmentRule, AssignmentRuleSet};
use crate::error::StorageError;
use crate::ports::ConfigServiceAsync;

/// On-disk document shape. TOML requires a named top-level table, so the
/// rule list nests under `[[rules]]`.
#[derive(Debug, Default, Serialize, Deserialize)]
struct RuleSetDocument {
    #[serde(default)]
    rules: AssignmentRuleSet,
}

fn sort_for_evaluation(rules: &mut AssignmentRuleSet) {
    rules.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then_with(|| a.created_at.cmp(&b.created_at))
            .then_with(|| a.id.cmp(&b.id))
    });
}

// --- FilesystemRuleStore ---

/// Rule store persisting the whole rule set as one TOML document behind a
/// `ConfigServiceAsync`. Mutations are load-modify-save under a single
/// mutex, which serializes them per store (and therefore per rule ID).
pub struct FilesystemRuleStore {
    config_service: Arc<dyn ConfigServiceAsync>,
    rules_config_key: String, // e.g., "assignment/rules.toml"
    write_gate: Mutex<()>,
}

impl FilesystemRuleStore {
    pub fn new(config_service: Arc<dyn ConfigServiceAsync>, rules_config_key: String) -> Self {
        Self {
            config_service,
            rules_config_key,
            write_gate: Mutex::new(()),
        }
    }

    async fn load_document(&self) -> Result<RuleSetDocument, StorageError> {
        debug!("Loading assignment rules from key '{}'", self.rules_config_key);
        match self
            .config_service
            .read_config_file_string(&self.rules_config_key)
            .await
        {
            Ok(toml_string) => toml::from_str(&toml_string).map_err(|e| {
                error!(
                    "Failed to deserialize TOML assignment rules from key '{}': {}",
                    self.rules_config_key, e
                );
                StorageError::serialization(
                    "load_rules",
                    format!("Rule deserialization failed: {}", e),
                )
            }),
            Err(storage_error) => {
                if storage_error.is_not_found() {
                    info!(
                        "Assignment rules file (key '{}') not found. Returning empty rule set.",
                        self.rules_config_key
                    );
                    Ok(RuleSetDocument::default())
                } else {
                    error!(
                        "Storage error loading assignment rules (key '{}'): {}",
                        self.rules_config_key, storage_error
                    );
                    Err(storage_error)
                }
            }
        }
    }

    async fn save_document(&self, document: &RuleSetDocument) -> Result<(), StorageError> {
        debug!(
            "Saving {} assignment rules to key '{}'",
            document.rules.len(),
            self.rules_config_key
        );
        let toml_string = toml::to_string_pretty(document).map_err(|e| {
            error!(
                "Failed to serialize assignment rules to TOML for key '{}': {}",
                self.rules_config_key, e
            );
            StorageError::serialization("save_rules", format!("Rule serialization failed: {}", e))
        })?;
        self.config_service
            .write_config_file_string(&self.rules_config_key, toml_string)
            .await
    }
}

#[async_trait]
impl AssignmentRuleStore for FilesystemRuleStore {
    async fn list_active_rules_by_priority(&self) -> Result<AssignmentRuleSet, StorageError> {
        let document = self.load_document().await?;
        let mut rules: AssignmentRuleSet =
            document.rules.into_iter().filter(|r| r.is_active).collect();
        sort_for_evaluation(&mut rules);
        Ok(rules)
    }

    async fn get_rule(&self, id: Uuid) -> Result<Option<AssignmentRule>, StorageError> {
        let document = self.load_document().await?;
        Ok(document.rules.into_iter().find(|r| r.id == id))
    }

    async fn create_rule(&self, rule: AssignmentRule) -> Result<AssignmentRule, StorageError> {
        let _gate = self.write_gate.lock().await;
        let mut document = self.load_document().await?;
        document.rules.push(rule.clone());
        self.save_document(&document).await?;
        Ok(rule)
    }

    async fn update_rule(&self, rule: AssignmentRule) -> Result<bool, StorageError> {
        let _gate = self.write_gate.lock().await;
        let mut document = self.load_document().await?;
        match document.rules.iter_mut().find(|r| r.id == rule.id) {
            Some(slot) => {
                *slot = rule;
                self.save_document(&document).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_rule(&self, id: Uuid) -> Result<bool, StorageError> {
        let _gate = self.write_gate.lock().await;
        let mut document = self.load_document().await?;
        let before = document.rules.len();
        document.rules.retain(|r| r.id != id);
        if document.rules.len() == before {
            return Ok(false);
        }
        self.save_document(&document).await?;
        Ok(true)
    }
}

// --- InMemoryRuleStore ---

/// In-memory rule store for tests and embedding. The `RwLock` write path
/// serializes mutation; reads hand out cloned snapshots.
#[derive(Default)]
pub struct InMemoryRuleStore {
    rules: RwLock<HashMap<Uuid, AssignmentRule>>,
}

impl InMemoryRuleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store, replacing any existing rule with the same ID.
    pub async fn seed(&self, rules: impl IntoIterator<Item = AssignmentRule>) {
        let mut guard = self.rules.write().await;
        for rule in rules {
            guard.insert(rule.id, rule);
        }
    }
}

#[async_trait]
impl AssignmentRuleStore for InMemoryRuleStore {
    async fn list_active_rules_by_priority(&self) -> Result<AssignmentRuleSet, StorageError> {
        let guard = self.rules.read().await;
        let mut rules: AssignmentRuleSet =
            guard.values().filter(|r| r.is_active).cloned().collect();
        sort_for_evaluation(&mut rules);
        Ok(rules)
    }

    async fn get_rule(&self, id: Uuid) -> Result<Option<AssignmentRule>, StorageError> {
        Ok(self.rules.read().await.get(&id).cloned())
    }

    async fn create_rule(&self, rule: AssignmentRule) -> Result<AssignmentRule, StorageError> {
        self.rules.write().await.insert(rule.id, rule.clone());
        Ok(rule)
    }

    async fn update_rule(&self, rule: AssignmentRule) -> Result<bool, StorageError> {
        let mut guard = self.rules.write().await;
        match guard.get_mut(&rule.id) {
            Some(slot) => {
                *slot = rule;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_rule(&self, id: Uuid) -> Result<bool, StorageError> {
        Ok(self.rules.write().await.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared_types::UserId;
    use chrono::{Duration, Utc};
    use std::collections::HashSet;

    #[derive(Default)]
    struct MockConfigService {
        files: RwLock<HashMap<String, String>>,
        force_read_error: bool,
    }

    impl MockConfigService {
        async fn set_file_content(&self, key: &str, content: String) {
            self.files.write().await.insert(key.to_string(), content);
        }
    }

    #[async_trait]
    impl ConfigServiceAsync for MockConfigService {
        async fn read_config_file_string(&self, key: &str) -> Result<String, StorageError> {
            if self.force_read_error {
                return Err(StorageError::new(
                    "read_config_file_string",
                    format!("Forced read error on {}", key),
                ));
            }
            match self.files.read().await.get(key) {
                Some(content) => Ok(content.clone()),
                None => Err(StorageError::not_found("read_config_file_string", key)),
            }
        }

        async fn write_config_file_string(
            &self,
            key: &str,
            content: String,
        ) -> Result<(), StorageError> {
            self.files.write().await.insert(key.to_string(), content);
            Ok(())
        }
    }

    fn rule(name: &str, priority: i32) -> AssignmentRule {
        AssignmentRule {
            id: Uuid::new_v4(),
            name: name.to_string(),
            priority,
            is_active: true,
            asset_types: HashSet::new(),
            categories: HashSet::new(),
            locations: HashSet::new(),
            priorities: HashSet::new(),
            assign_to: UserId::new("tech-1"),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn filesystem_store_missing_file_reads_as_empty() {
        let config = Arc::new(MockConfigService::default());
        let store = FilesystemRuleStore::new(config, "test_rules.toml".to_string());
        let rules = store.list_active_rules_by_priority().await.unwrap();
        assert!(rules.is_empty());
    }

    #[tokio::test]
    async fn filesystem_store_create_and_list_round_trip() {
        let config = Arc::new(MockConfigService::default());
        let store = FilesystemRuleStore::new(config, "test_rules.toml".to_string());

        let low = rule("low", 1);
        let high = rule("high", 10);
        store.create_rule(low.clone()).await.unwrap();
        store.create_rule(high.clone()).await.unwrap();

        let listed = store.list_active_rules_by_priority().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].name, "high");
        assert_eq!(listed[1].name, "low");
    }

    #[tokio::test]
    async fn filesystem_store_update_and_delete() {
        let config = Arc::new(MockConfigService::default());
        let store = FilesystemRuleStore::new(config, "test_rules.toml".to_string());

        let mut r = rule("target", 3);
        store.create_rule(r.clone()).await.unwrap();

        r.priority = 7;
        assert!(store.update_rule(r.clone()).await.unwrap());
        assert_eq!(store.get_rule(r.id).await.unwrap().unwrap().priority, 7);

        assert!(store.delete_rule(r.id).await.unwrap());
        assert!(!store.delete_rule(r.id).await.unwrap());
        assert!(store.get_rule(r.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn filesystem_store_inactive_rules_not_listed() {
        let config = Arc::new(MockConfigService::default());
        let store = FilesystemRuleStore::new(config, "test_rules.toml".to_string());

        let mut inactive = rule("inactive", 50);
        inactive.is_active = false;
        store.create_rule(inactive.clone()).await.unwrap();
        store.create_rule(rule("active", 1)).await.unwrap();

        let listed = store.list_active_rules_by_priority().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "active");
        // Still retrievable by ID, just never matched.
        assert!(store.get_rule(inactive.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn filesystem_store_deserialization_error_is_reported() {
        let config = Arc::new(MockConfigService::default());
        config
            .set_file_content("bad_rules.toml", "this is not valid toml {}{".to_string())
            .await;
        let store = FilesystemRuleStore::new(config, "bad_rules.toml".to_string());
        let result = store.list_active_rules_by_priority().await;
        let err = result.err().unwrap();
        assert!(err.message.contains("Rule deserialization failed"));
    }

    #[tokio::test]
    async fn filesystem_store_read_error_propagates() {
        let config = Arc::new(MockConfigService {
            force_read_error: true,
            ..Default::default()
        });
        let store = FilesystemRuleStore::new(config, "error_rules.toml".to_string());
        let result = store.list_active_rules_by_priority().await;
        assert!(result.err().unwrap().message.contains("Forced read error"));
    }

    #[tokio::test]
    async fn in_memory_store_orders_by_priority_then_created_at() {
        let store = InMemoryRuleStore::new();
        let now = Utc::now();
        let mut first = rule("first", 10);
        first.created_at = now - Duration::minutes(5);
        let mut second = rule("second", 10);
        second.created_at = now;
        let top = rule("top", 20);
        store
            .seed(vec![second.clone(), top.clone(), first.clone()])
            .await;

        let listed = store.list_active_rules_by_priority().await.unwrap();
        let names: Vec<&str> = listed.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["top", "first", "second"]);
    }

    #[tokio::test]
    async fn in_memory_store_update_missing_returns_false() {
        let store = InMemoryRuleStore::new();
        assert!(!store.update_rule(rule("ghost", 1)).await.unwrap());
    }
}
