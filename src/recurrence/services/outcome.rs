//! Outcomes reported by generation runs.

use super::{GenerationError, PlanStop};
use crate::recurrence::domain::ConfigId;
use chrono::NaiveDate;

/// Which configs an on-demand run covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunTarget {
    /// Every active config.
    All,
    /// A single config.
    Config(ConfigId),
}

/// Why processing of a config ended in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStop {
    /// The plan ran out of dates.
    Plan(PlanStop),
    /// The next occurrence's task is not due for creation yet.
    NotYetDue {
        /// The occurrence that is not due yet.
        occurrence: NaiveDate,
        /// The date on which its tasks become due for creation.
        creation_date: NaiveDate,
    },
    /// Generation for this occurrence failed; the cursor stays before it.
    Failed {
        /// The occurrence whose generation failed.
        occurrence: NaiveDate,
    },
    /// The config is inactive and was not processed.
    Inactive,
}

/// Result of processing one config in one run.
#[derive(Debug, Clone)]
pub struct ConfigRunOutcome {
    /// The processed config.
    pub config_id: ConfigId,
    /// Occurrences consumed, including ones that were already generated.
    pub occurrences_processed: usize,
    /// Tasks created in this run.
    pub tasks_created: u64,
    /// Cursor after the run.
    pub last_generated_date: Option<NaiveDate>,
    /// Why processing ended.
    pub stop: Option<RunStop>,
    /// Failures met while processing or saving the config.
    pub errors: Vec<GenerationError>,
}

impl ConfigRunOutcome {
    pub(crate) const fn new(config_id: ConfigId) -> Self {
        Self {
            config_id,
            occurrences_processed: 0,
            tasks_created: 0,
            last_generated_date: None,
            stop: None,
            errors: Vec::new(),
        }
    }

    /// Returns `true` when the config was processed without errors.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Overall classification of an on-demand run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnDemandOutcome {
    /// Tasks were created and nothing failed.
    Created,
    /// No occurrence was eligible, or every eligible one already had tasks.
    NothingToDo,
    /// At least one occurrence failed; some tasks may have been created.
    Failed,
}

/// Report returned to the caller of an on-demand run.
#[derive(Debug, Clone)]
pub struct OnDemandReport {
    /// Total tasks created across the covered configs.
    pub tasks_created: u64,
    /// Decision trace, one line per decision point.
    pub trace: Vec<String>,
    /// Overall classification.
    pub outcome: OnDemandOutcome,
    /// Per-config outcomes in processing order.
    pub configs: Vec<ConfigRunOutcome>,
}

impl OnDemandReport {
    pub(crate) fn from_outcomes(configs: Vec<ConfigRunOutcome>, trace: Vec<String>) -> Self {
        let tasks_created = configs
            .iter()
            .fold(0_u64, |total, config| total.saturating_add(config.tasks_created));
        let outcome = if configs.iter().any(|config| !config.is_success()) {
            OnDemandOutcome::Failed
        } else if tasks_created > 0 {
            OnDemandOutcome::Created
        } else {
            OnDemandOutcome::NothingToDo
        };
        Self {
            tasks_created,
            trace,
            outcome,
            configs,
        }
    }

    /// Renders the message shown to the operator.
    ///
    /// The diagnostic trace is appended only when `include_trace` is set,
    /// which hosts reserve for privileged callers.
    #[must_use]
    pub fn summary(&self, include_trace: bool) -> String {
        let mut message = match self.outcome {
            OnDemandOutcome::Created => format!("Created {} tasks.", self.tasks_created),
            OnDemandOutcome::NothingToDo => "No new tasks were created. Check the configuration \
                 or whether tasks already exist for the upcoming dates."
                .to_owned(),
            OnDemandOutcome::Failed => {
                let first_error = self
                    .configs
                    .iter()
                    .flat_map(|config| config.errors.iter())
                    .next()
                    .map(ToString::to_string)
                    .unwrap_or_default();
                format!(
                    "Task generation failed after creating {} tasks: {first_error}",
                    self.tasks_created
                )
            }
        };
        if include_trace && !self.trace.is_empty() {
            message.push_str("\n\nDiagnostics:\n");
            message.push_str(&self.trace.join("\n"));
        }
        message
    }
}
