//! JSON-file task sink.

use async_trait::async_trait;
use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8::Dir};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use super::document::{read_document, write_document};
use crate::recurrence::{
    domain::{AssigneeId, ConfigId, TaskHandle, TaskRequest},
    ports::{TaskSink, TaskSinkError, TaskSinkResult},
};

const TASKS_FILE: &str = "tasks.json";

/// A delivered task as stored in `tasks.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    /// Handle issued at creation.
    pub handle: TaskHandle,
    /// The request the task was created from.
    #[serde(flatten)]
    pub request: TaskRequest,
}

/// Task sink appending delivered tasks to `tasks.json`.
#[derive(Debug, Clone)]
pub struct JsonFileTaskSink {
    dir: Arc<Dir>,
    write_lock: Arc<Mutex<()>>,
}

impl JsonFileTaskSink {
    /// Opens a sink rooted at `path`, which must be an existing directory.
    ///
    /// # Errors
    ///
    /// Returns [`TaskSinkError::Unavailable`] when the directory cannot be
    /// opened.
    pub fn open(path: &Utf8Path) -> TaskSinkResult<Self> {
        let dir =
            Dir::open_ambient_dir(path, ambient_authority()).map_err(TaskSinkError::unavailable)?;
        Ok(Self {
            dir: Arc::new(dir),
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Returns every stored task in creation order.
    ///
    /// # Errors
    ///
    /// Returns [`TaskSinkError::Unavailable`] when the document cannot be
    /// read.
    pub fn records(&self) -> TaskSinkResult<Vec<TaskRecord>> {
        read_document(&self.dir, TASKS_FILE).map_err(TaskSinkError::unavailable)
    }
}

#[async_trait]
impl TaskSink for JsonFileTaskSink {
    async fn create(&self, request: &TaskRequest) -> TaskSinkResult<TaskHandle> {
        let _guard = self.write_lock.lock().map_err(|err| {
            TaskSinkError::unavailable(std::io::Error::other(err.to_string()))
        })?;
        let mut records = self.records()?;
        let handle = TaskHandle::new();
        records.push(TaskRecord {
            handle,
            request: request.clone(),
        });
        write_document(&self.dir, TASKS_FILE, &records).map_err(TaskSinkError::unavailable)?;
        Ok(handle)
    }

    async fn find(
        &self,
        config_id: ConfigId,
        occurrence_date: NaiveDate,
        assignees: &BTreeSet<AssigneeId>,
    ) -> TaskSinkResult<BTreeSet<AssigneeId>> {
        Ok(self
            .records()?
            .into_iter()
            .map(|record| record.request)
            .filter(|request| {
                request.config_id() == config_id
                    && request.occurrence_date() == occurrence_date
                    && assignees.contains(request.assignee())
            })
            .map(|request| request.assignee().clone())
            .collect())
    }
}
