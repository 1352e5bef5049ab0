//! Task text templates and the task request handed to a sink.

use super::{AssigneeId, ConfigId, ConfigurationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Placeholder substituted with the occurrence date when rendering.
pub const DATE_PLACEHOLDER: &str = "{date}";

/// Formats an occurrence date the way it appears in task text (`dd/mm/yyyy`).
#[must_use]
pub fn format_occurrence_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Title and body templates for generated tasks.
///
/// Both strings may contain [`DATE_PLACEHOLDER`]; nothing else is
/// interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskTemplate {
    title: String,
    body: String,
}

impl TaskTemplate {
    /// Creates a template pair.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::EmptyTitleTemplate`] when the title is
    /// blank.
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Result<Self, ConfigurationError> {
        let title_value = title.into();
        if title_value.trim().is_empty() {
            return Err(ConfigurationError::EmptyTitleTemplate);
        }
        Ok(Self {
            title: title_value,
            body: body.into(),
        })
    }

    /// Returns the raw title template.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the raw body template.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Renders title and body for the given occurrence date.
    #[must_use]
    pub fn render(&self, occurrence_date: NaiveDate) -> (String, String) {
        let formatted = format_occurrence_date(occurrence_date);
        (
            self.title.replace(DATE_PLACEHOLDER, &formatted),
            self.body.replace(DATE_PLACEHOLDER, &formatted),
        )
    }
}

impl Default for TaskTemplate {
    fn default() -> Self {
        Self {
            title: "Compliance check - {date}".to_owned(),
            body: "Reminder: complete the scheduled compliance check for {date}.".to_owned(),
        }
    }
}

/// One task creation request for a single assignee and occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRequest {
    config_id: ConfigId,
    assignee: AssigneeId,
    occurrence_date: NaiveDate,
    title: String,
    body: String,
}

impl TaskRequest {
    /// Builds a request by rendering `template` for `occurrence_date`.
    #[must_use]
    pub fn render(
        config_id: ConfigId,
        assignee: AssigneeId,
        occurrence_date: NaiveDate,
        template: &TaskTemplate,
    ) -> Self {
        let (title, body) = template.render(occurrence_date);
        Self {
            config_id,
            assignee,
            occurrence_date,
            title,
            body,
        }
    }

    /// Returns the originating config identifier.
    #[must_use]
    pub const fn config_id(&self) -> ConfigId {
        self.config_id
    }

    /// Returns the assignee.
    #[must_use]
    pub const fn assignee(&self) -> &AssigneeId {
        &self.assignee
    }

    /// Returns the occurrence (due) date.
    #[must_use]
    pub const fn occurrence_date(&self) -> NaiveDate {
        self.occurrence_date
    }

    /// Returns the rendered title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the rendered body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }
}
