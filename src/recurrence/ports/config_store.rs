//! Config store port: durable storage for generation configs.

use crate::recurrence::domain::{ConfigId, GenerationConfig};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for config store operations.
pub type ConfigStoreResult<T> = Result<T, ConfigStoreError>;

/// Generation config persistence contract.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Returns every active config.
    async fn load_active(&self) -> ConfigStoreResult<Vec<GenerationConfig>>;

    /// Finds a config by identifier, active or not.
    ///
    /// Returns `None` when the config does not exist.
    async fn find_by_id(&self, id: ConfigId) -> ConfigStoreResult<Option<GenerationConfig>>;

    /// Inserts or replaces the stored config with the same identifier.
    ///
    /// Writes are last-writer-wins per config.
    async fn save(&self, config: &GenerationConfig) -> ConfigStoreResult<()>;
}

/// Errors returned by config store implementations.
#[derive(Debug, Clone, Error)]
pub enum ConfigStoreError {
    /// The config was not found.
    #[error("generation config not found: {0}")]
    NotFound(ConfigId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ConfigStoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
