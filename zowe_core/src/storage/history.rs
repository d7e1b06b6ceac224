use std::collections::BTreeMap;

use log::debug;

use super::config::{keys, ConfigStore};
use crate::connections::errors::ZoweError;

pub const DEFAULT_CAPACITY: usize = 5;

type HistoryMap = BTreeMap<String, Vec<String>>;

/// Most-recently-used commands, one list per profile name.
///
/// `put` is a plain read-modify-write of the settings object. Two runs
/// writing the same profile at once both succeed and the later write wins.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    config: ConfigStore,
    capacity: usize,
}

impl HistoryStore {
    pub fn new(config: ConfigStore, capacity: usize) -> Self {
        Self {
            config,
            capacity: capacity.max(1),
        }
    }

    /// Capacity from `zowe.commands.maxHistory`, else [`DEFAULT_CAPACITY`].
    pub async fn from_config(config: ConfigStore) -> Self {
        let capacity = config
            .get::<usize>(keys::MAX_HISTORY)
            .await
            .unwrap_or(DEFAULT_CAPACITY);
        Self::new(config, capacity)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    async fn load(&self) -> HistoryMap {
        self.config
            .get::<HistoryMap>(keys::COMMAND_HISTORY)
            .await
            .unwrap_or_default()
    }

    /// Most recent first.
    pub async fn get(&self, profile: &str) -> Vec<String> {
        let mut entries = self.load().await.remove(profile).unwrap_or_default();
        entries.truncate(self.capacity);
        entries
    }

    /// Inserts `entry` at the front, promoting an existing copy instead of
    /// duplicating it, and drops whatever falls past the capacity.
    pub async fn put(&self, profile: &str, entry: &str) -> Result<(), ZoweError> {
        let mut all = self.load().await;
        let entries = all.entry(profile.to_string()).or_default();
        entries.retain(|e| e != entry);
        entries.insert(0, entry.to_string());
        entries.truncate(self.capacity);
        debug!("History for '{}' now holds {} entries", profile, entries.len());
        self.config.update(keys::COMMAND_HISTORY, &all).await
    }

    pub async fn clear(&self, profile: &str) -> Result<(), ZoweError> {
        let mut all = self.load().await;
        if all.remove(profile).is_some() {
            self.config.update(keys::COMMAND_HISTORY, &all).await?;
        }
        Ok(())
    }

    /// Profiles that have at least one entry.
    pub async fn profiles(&self) -> Vec<String> {
        self.load()
            .await
            .into_iter()
            .filter(|(_, entries)| !entries.is_empty())
            .map(|(name, _)| name)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn duplicate_is_promoted_not_repeated() {
        let history = HistoryStore::new(ConfigStore::in_memory(), 5);
        history.put("prod", "d iplinfo").await.unwrap();
        history.put("prod", "d m=cpu").await.unwrap();
        history.put("prod", "d iplinfo").await.unwrap();
        assert_eq!(history.get("prod").await, vec!["d iplinfo", "d m=cpu"]);
    }

    #[tokio::test]
    async fn capacity_is_never_exceeded() {
        let history = HistoryStore::new(ConfigStore::in_memory(), 3);
        for i in 0..10 {
            history.put("prod", &format!("d a,{i}")).await.unwrap();
            assert!(history.get("prod").await.len() <= 3);
        }
        assert_eq!(history.get("prod").await, vec!["d a,9", "d a,8", "d a,7"]);
    }

    #[tokio::test]
    async fn profiles_do_not_mix() {
        let history = HistoryStore::new(ConfigStore::in_memory(), 5);
        history.put("prod", "d iplinfo").await.unwrap();
        history.put("test", "d t").await.unwrap();
        assert_eq!(history.get("prod").await, vec!["d iplinfo"]);
        assert_eq!(history.get("test").await, vec!["d t"]);

        history.clear("prod").await.unwrap();
        assert!(history.get("prod").await.is_empty());
        assert_eq!(history.profiles().await, vec!["test"]);
    }

    #[tokio::test]
    async fn capacity_comes_from_settings() {
        let config = ConfigStore::in_memory();
        config.update(keys::MAX_HISTORY, &2usize).await.unwrap();
        assert_eq!(HistoryStore::from_config(config.clone()).await.capacity(), 2);

        config.update(keys::MAX_HISTORY, &0usize).await.unwrap();
        assert_eq!(HistoryStore::from_config(config).await.capacity(), 1);
    }
}
