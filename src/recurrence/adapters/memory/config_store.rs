//! In-memory config store.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use crate::recurrence::{
    domain::{ConfigId, GenerationConfig},
    ports::{ConfigStore, ConfigStoreError, ConfigStoreResult},
};

/// Thread-safe in-memory config store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryConfigStore {
    configs: Arc<RwLock<BTreeMap<ConfigId, GenerationConfig>>>,
}

impl InMemoryConfigStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding `configs`.
    #[must_use]
    pub fn with_configs(configs: impl IntoIterator<Item = GenerationConfig>) -> Self {
        let map = configs
            .into_iter()
            .map(|config| (config.id(), config))
            .collect();
        Self {
            configs: Arc::new(RwLock::new(map)),
        }
    }
}

#[async_trait]
impl ConfigStore for InMemoryConfigStore {
    async fn load_active(&self) -> ConfigStoreResult<Vec<GenerationConfig>> {
        let configs = self.configs.read().map_err(|err| {
            ConfigStoreError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(configs
            .values()
            .filter(|config| config.is_active())
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: ConfigId) -> ConfigStoreResult<Option<GenerationConfig>> {
        let configs = self.configs.read().map_err(|err| {
            ConfigStoreError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(configs.get(&id).cloned())
    }

    async fn save(&self, config: &GenerationConfig) -> ConfigStoreResult<()> {
        let mut configs = self.configs.write().map_err(|err| {
            ConfigStoreError::persistence(std::io::Error::other(err.to_string()))
        })?;
        configs.insert(config.id(), config.clone());
        Ok(())
    }
}
