//! Task sink port: the collaborator that delivers tasks to users.

use crate::recurrence::domain::{AssigneeId, ConfigId, TaskHandle, TaskRequest};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task sink operations.
pub type TaskSinkResult<T> = Result<T, TaskSinkError>;

/// Task delivery contract.
///
/// Every task a sink creates is tagged with the originating config and the
/// occurrence date so that [`TaskSink::find`] can report it back later.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskSink: Send + Sync {
    /// Creates one task for the request's assignee, due on its occurrence
    /// date.
    ///
    /// # Errors
    ///
    /// Returns [`TaskSinkError::Unavailable`] when the sink cannot accept the
    /// request.
    async fn create(&self, request: &TaskRequest) -> TaskSinkResult<TaskHandle>;

    /// Returns the subset of `assignees` that already have a task tagged with
    /// `(config_id, occurrence_date)`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskSinkError::Unavailable`] when the lookup fails.
    async fn find(
        &self,
        config_id: ConfigId,
        occurrence_date: NaiveDate,
        assignees: &BTreeSet<AssigneeId>,
    ) -> TaskSinkResult<BTreeSet<AssigneeId>>;
}

/// Errors returned by task sink implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskSinkError {
    /// The sink could not serve the call.
    #[error("task sink unavailable: {0}")]
    Unavailable(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskSinkError {
    /// Wraps an underlying delivery failure.
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unavailable(Arc::new(err))
    }
}
