//! Per-assignee task rendering and submission.

use crate::recurrence::{
    domain::{AssigneeId, GenerationConfig, TaskHandle, TaskRequest, format_occurrence_date},
    ports::{TaskSink, TaskSinkResult},
};
use chrono::NaiveDate;
use std::sync::Arc;

/// A task accepted by the sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedTask {
    /// Handle issued by the sink.
    pub handle: TaskHandle,
    /// The request that was submitted.
    pub request: TaskRequest,
    /// Human-readable audit line describing the creation.
    pub audit_line: String,
}

/// Renders task content and submits it to the sink.
#[derive(Debug)]
pub struct TaskGenerator<T>
where
    T: TaskSink,
{
    sink: Arc<T>,
}

impl<T> Clone for TaskGenerator<T>
where
    T: TaskSink,
{
    fn clone(&self) -> Self {
        Self {
            sink: Arc::clone(&self.sink),
        }
    }
}

impl<T> TaskGenerator<T>
where
    T: TaskSink,
{
    /// Creates a generator submitting to `sink`.
    #[must_use]
    pub const fn new(sink: Arc<T>) -> Self {
        Self { sink }
    }

    /// Creates the task for one assignee and one occurrence.
    ///
    /// Failures are not retried here.
    ///
    /// # Errors
    ///
    /// Returns the sink error when the request is rejected.
    pub async fn generate(
        &self,
        config: &GenerationConfig,
        occurrence_date: NaiveDate,
        assignee: &AssigneeId,
    ) -> TaskSinkResult<GeneratedTask> {
        let request = TaskRequest::render(
            config.id(),
            assignee.clone(),
            occurrence_date,
            config.template(),
        );
        let handle = self.sink.create(&request).await?;
        let audit_line = format!(
            "Task created for {assignee}: {} (due {})",
            request.title(),
            format_occurrence_date(occurrence_date)
        );
        tracing::info!(
            config_id = %config.id(),
            task = %handle,
            "{audit_line}"
        );
        Ok(GeneratedTask {
            handle,
            request,
            audit_line,
        })
    }
}
