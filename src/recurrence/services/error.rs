//! Service-level errors for generation runs.

use crate::recurrence::{
    domain::ConfigurationError,
    ports::{ConfigStoreError, TaskSinkError},
};
use thiserror::Error;

/// Errors surfaced by generation runs.
#[derive(Debug, Clone, Error)]
pub enum GenerationError {
    /// A config failed validation.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    /// The task sink rejected a lookup or creation.
    #[error(transparent)]
    Sink(#[from] TaskSinkError),
    /// The config store failed.
    #[error(transparent)]
    Store(#[from] ConfigStoreError),
}

/// Result type for generation service operations.
pub type GenerationResult<T> = Result<T, GenerationError>;
