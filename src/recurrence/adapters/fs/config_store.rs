//! JSON-file config store.

use async_trait::async_trait;
use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8::Dir};
use std::sync::{Arc, Mutex};

use super::document::{read_document, write_document};
use crate::recurrence::{
    domain::{ConfigId, GenerationConfig, PersistedConfigData},
    ports::{ConfigStore, ConfigStoreError, ConfigStoreResult},
};

const CONFIGS_FILE: &str = "configs.json";

/// Config store persisting every config in `configs.json`.
#[derive(Debug, Clone)]
pub struct JsonFileConfigStore {
    dir: Arc<Dir>,
    write_lock: Arc<Mutex<()>>,
}

impl JsonFileConfigStore {
    /// Opens a store rooted at `path`, which must be an existing directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigStoreError::Persistence`] when the directory cannot be
    /// opened.
    pub fn open(path: &Utf8Path) -> ConfigStoreResult<Self> {
        let dir = Dir::open_ambient_dir(path, ambient_authority())
            .map_err(ConfigStoreError::persistence)?;
        Ok(Self {
            dir: Arc::new(dir),
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Returns every stored config, active or not.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigStoreError::Persistence`] when the document cannot be
    /// read or a record fails validation.
    pub fn load_all(&self) -> ConfigStoreResult<Vec<GenerationConfig>> {
        self.read_records()?
            .into_iter()
            .map(|record| {
                GenerationConfig::from_persisted(record).map_err(ConfigStoreError::persistence)
            })
            .collect()
    }

    fn read_records(&self) -> ConfigStoreResult<Vec<PersistedConfigData>> {
        read_document(&self.dir, CONFIGS_FILE).map_err(ConfigStoreError::persistence)
    }
}

#[async_trait]
impl ConfigStore for JsonFileConfigStore {
    async fn load_active(&self) -> ConfigStoreResult<Vec<GenerationConfig>> {
        let mut active = Vec::new();
        for record in self.read_records()? {
            let id = record.id;
            match GenerationConfig::from_persisted(record) {
                Ok(config) if config.is_active() => active.push(config),
                Ok(_) => {}
                Err(err) => {
                    tracing::warn!(config_id = %id, error = %err, "skipping invalid stored config");
                }
            }
        }
        Ok(active)
    }

    async fn find_by_id(&self, id: ConfigId) -> ConfigStoreResult<Option<GenerationConfig>> {
        self.read_records()?
            .into_iter()
            .find(|record| record.id == id)
            .map(|record| {
                GenerationConfig::from_persisted(record).map_err(ConfigStoreError::persistence)
            })
            .transpose()
    }

    async fn save(&self, config: &GenerationConfig) -> ConfigStoreResult<()> {
        let _guard = self.write_lock.lock().map_err(|err| {
            ConfigStoreError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let mut records = self.read_records()?;
        let updated = config.to_persisted();
        match records.iter_mut().find(|record| record.id == updated.id) {
            Some(existing) => *existing = updated,
            None => records.push(updated),
        }
        write_document(&self.dir, CONFIGS_FILE, &records).map_err(ConfigStoreError::persistence)
    }
}
