//! In-memory task sink.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::sync::{Arc, RwLock};

use crate::recurrence::{
    domain::{AssigneeId, ConfigId, TaskHandle, TaskRequest},
    ports::{TaskSink, TaskSinkError, TaskSinkResult},
};

/// A task recorded by [`InMemoryTaskSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredTask {
    /// Handle issued at creation.
    pub handle: TaskHandle,
    /// The request the task was created from.
    pub request: TaskRequest,
}

/// Thread-safe in-memory task sink.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskSink {
    tasks: Arc<RwLock<Vec<StoredTask>>>,
}

impl InMemoryTaskSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of every created task in creation order.
    ///
    /// # Errors
    ///
    /// Returns [`TaskSinkError::Unavailable`] when the lock is poisoned.
    pub fn tasks(&self) -> TaskSinkResult<Vec<StoredTask>> {
        let tasks = self.tasks.read().map_err(|err| {
            TaskSinkError::unavailable(std::io::Error::other(err.to_string()))
        })?;
        Ok(tasks.clone())
    }

    /// Returns the tasks tagged with `(config_id, occurrence_date)`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskSinkError::Unavailable`] when the lock is poisoned.
    pub fn tasks_for(
        &self,
        config_id: ConfigId,
        occurrence_date: NaiveDate,
    ) -> TaskSinkResult<Vec<StoredTask>> {
        Ok(self
            .tasks()?
            .into_iter()
            .filter(|task| {
                task.request.config_id() == config_id
                    && task.request.occurrence_date() == occurrence_date
            })
            .collect())
    }
}

#[async_trait]
impl TaskSink for InMemoryTaskSink {
    async fn create(&self, request: &TaskRequest) -> TaskSinkResult<TaskHandle> {
        let mut tasks = self.tasks.write().map_err(|err| {
            TaskSinkError::unavailable(std::io::Error::other(err.to_string()))
        })?;
        let handle = TaskHandle::new();
        tasks.push(StoredTask {
            handle,
            request: request.clone(),
        });
        Ok(handle)
    }

    async fn find(
        &self,
        config_id: ConfigId,
        occurrence_date: NaiveDate,
        assignees: &BTreeSet<AssigneeId>,
    ) -> TaskSinkResult<BTreeSet<AssigneeId>> {
        let tasks = self.tasks.read().map_err(|err| {
            TaskSinkError::unavailable(std::io::Error::other(err.to_string()))
        })?;
        Ok(tasks
            .iter()
            .map(|task| &task.request)
            .filter(|request| {
                request.config_id() == config_id
                    && request.occurrence_date() == occurrence_date
                    && assignees.contains(request.assignee())
            })
            .map(|request| request.assignee().clone())
            .collect())
    }
}
