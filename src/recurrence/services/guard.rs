//! Duplicate detection against tasks the sink already holds.

use crate::recurrence::{
    domain::{AssigneeId, ConfigId},
    ports::{TaskSink, TaskSinkResult},
};
use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::sync::Arc;

/// How much of an assignee set already has tasks for an occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Coverage {
    /// No assignee has a task yet.
    Uncovered,
    /// Some assignees have a task; the rest are listed.
    Partial {
        /// Assignees still without a task.
        missing: BTreeSet<AssigneeId>,
    },
    /// Every assignee has a task.
    Full,
}

impl Coverage {
    /// Returns `true` when at least one assignee already has a task.
    #[must_use]
    pub const fn any_covered(&self) -> bool {
        !matches!(self, Self::Uncovered)
    }
}

/// Side-effect-free check for occurrences that were already materialised.
#[derive(Debug)]
pub struct DuplicateGuard<T>
where
    T: TaskSink,
{
    sink: Arc<T>,
}

impl<T> Clone for DuplicateGuard<T>
where
    T: TaskSink,
{
    fn clone(&self) -> Self {
        Self {
            sink: Arc::clone(&self.sink),
        }
    }
}

impl<T> DuplicateGuard<T>
where
    T: TaskSink,
{
    /// Creates a guard backed by `sink`.
    #[must_use]
    pub const fn new(sink: Arc<T>) -> Self {
        Self { sink }
    }

    /// Classifies which of `assignees` already have a task tagged with
    /// `(config_id, occurrence_date)`.
    ///
    /// # Errors
    ///
    /// Returns the sink error when the lookup fails.
    pub async fn coverage(
        &self,
        config_id: ConfigId,
        occurrence_date: NaiveDate,
        assignees: &BTreeSet<AssigneeId>,
    ) -> TaskSinkResult<Coverage> {
        let existing = self.sink.find(config_id, occurrence_date, assignees).await?;
        let missing: BTreeSet<AssigneeId> = assignees.difference(&existing).cloned().collect();
        Ok(if missing.is_empty() {
            Coverage::Full
        } else if missing.len() == assignees.len() {
            Coverage::Uncovered
        } else {
            Coverage::Partial { missing }
        })
    }

    /// Returns `true` when any of `assignees` already has a task for the
    /// occurrence, treating partial coverage as already generated.
    ///
    /// # Errors
    ///
    /// Returns the sink error when the lookup fails.
    pub async fn already_generated(
        &self,
        config_id: ConfigId,
        occurrence_date: NaiveDate,
        assignees: &BTreeSet<AssigneeId>,
    ) -> TaskSinkResult<bool> {
        let coverage = self.coverage(config_id, occurrence_date, assignees).await?;
        Ok(coverage.any_covered())
    }
}
