//! Generation config aggregate: one configured recurring duty.

use super::{AssigneeId, ConfigId, ConfigurationError, Frequency, RecurrenceRule, TaskTemplate};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Default on-demand look-ahead in days.
pub const DEFAULT_DAYS_TO_GENERATE_AHEAD: u32 = 7;

/// Upper bound accepted for lead days and on-demand look-ahead.
pub const MAX_LOOK_AHEAD_DAYS: u32 = 366;

/// Parameter object for registering a new recurring duty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGenerationConfig {
    name: String,
    description: Option<String>,
    rule: RecurrenceRule,
    assignees: Vec<String>,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    lead_days: u32,
    days_to_generate_ahead: u32,
    template: TaskTemplate,
    active: bool,
}

impl NewGenerationConfig {
    /// Creates a request with the required fields and defaults for the rest.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        rule: RecurrenceRule,
        assignees: impl IntoIterator<Item = String>,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            name: name.into(),
            description: None,
            rule,
            assignees: assignees.into_iter().collect(),
            start_date,
            end_date: None,
            lead_days: 0,
            days_to_generate_ahead: DEFAULT_DAYS_TO_GENERATE_AHEAD,
            template: TaskTemplate::default(),
            active: true,
        }
    }

    /// Sets a free-text description shown next to the name.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the last date on which occurrences may fall.
    #[must_use]
    pub const fn with_end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    /// Sets how many days before each occurrence its task is created.
    #[must_use]
    pub const fn with_lead_days(mut self, lead_days: u32) -> Self {
        self.lead_days = lead_days;
        self
    }

    /// Sets the look-ahead used by on-demand runs.
    #[must_use]
    pub const fn with_days_to_generate_ahead(mut self, days: u32) -> Self {
        self.days_to_generate_ahead = days;
        self
    }

    /// Sets the title and body templates.
    #[must_use]
    pub fn with_template(mut self, template: TaskTemplate) -> Self {
        self.template = template;
        self
    }

    /// Registers the duty as inactive.
    #[must_use]
    pub const fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

/// Storage shape of a generation config.
///
/// Stores serialise this flat record; [`GenerationConfig::from_persisted`]
/// re-validates it on the way back in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedConfigData {
    /// Persisted identifier.
    pub id: ConfigId,
    /// Operator-facing name.
    pub name: String,
    /// Optional free-text description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Recurrence frequency.
    pub frequency: Frequency,
    /// Weekday (Monday = 0), meaningful for weekly rules only.
    #[serde(default)]
    pub weekday: Option<u8>,
    /// Day of month, meaningful for monthly rules only.
    #[serde(default)]
    pub day_of_month: Option<u8>,
    /// Assignee identifiers.
    pub assignees: Vec<String>,
    /// First eligible occurrence.
    pub start_date: NaiveDate,
    /// Last date on which occurrences may fall.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Days before an occurrence that its task is created.
    #[serde(default)]
    pub lead_days: i64,
    /// Look-ahead for on-demand runs.
    #[serde(default = "default_days_to_generate_ahead")]
    pub days_to_generate_ahead: i64,
    /// Title and body templates.
    #[serde(default)]
    pub template: TaskTemplate,
    /// Whether periodic and "all" runs pick the config up.
    #[serde(default = "default_active")]
    pub active: bool,
    /// Generation cursor.
    #[serde(default)]
    pub last_generated_date: Option<NaiveDate>,
    /// Number of tasks generated so far.
    #[serde(default)]
    pub total_generated: u64,
}

const fn default_days_to_generate_ahead() -> i64 {
    DEFAULT_DAYS_TO_GENERATE_AHEAD as i64
}

const fn default_active() -> bool {
    true
}

/// A configured recurring duty with its generation cursor and statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationConfig {
    id: ConfigId,
    name: String,
    description: Option<String>,
    rule: RecurrenceRule,
    assignees: BTreeSet<AssigneeId>,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    lead_days: u32,
    days_to_generate_ahead: u32,
    template: TaskTemplate,
    active: bool,
    last_generated_date: Option<NaiveDate>,
    total_generated: u64,
}

impl GenerationConfig {
    /// Creates a validated config that has never generated anything.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] when the assignee set is empty, the end
    /// date precedes the start date, or a day count is out of range.
    pub fn new(request: NewGenerationConfig) -> Result<Self, ConfigurationError> {
        let assignees = collect_assignees(request.assignees)?;
        validate_dates(request.start_date, request.end_date)?;
        Ok(Self {
            id: ConfigId::new(),
            name: request.name,
            description: non_blank(request.description),
            rule: request.rule,
            assignees,
            start_date: request.start_date,
            end_date: request.end_date,
            lead_days: day_count(
                i64::from(request.lead_days),
                ConfigurationError::LeadDaysOutOfRange,
            )?,
            days_to_generate_ahead: day_count(
                i64::from(request.days_to_generate_ahead),
                ConfigurationError::LookAheadOutOfRange,
            )?,
            template: request.template,
            active: request.active,
            last_generated_date: None,
            total_generated: 0,
        })
    }

    /// Reconstructs and re-validates a config from storage.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] when the stored record would not pass
    /// [`GenerationConfig::new`].
    pub fn from_persisted(data: PersistedConfigData) -> Result<Self, ConfigurationError> {
        let rule = RecurrenceRule::from_parts(data.frequency, data.weekday, data.day_of_month)?;
        let assignees = collect_assignees(data.assignees)?;
        validate_dates(data.start_date, data.end_date)?;
        Ok(Self {
            id: data.id,
            name: data.name,
            description: non_blank(data.description),
            rule,
            assignees,
            start_date: data.start_date,
            end_date: data.end_date,
            lead_days: day_count(data.lead_days, ConfigurationError::LeadDaysOutOfRange)?,
            days_to_generate_ahead: day_count(
                data.days_to_generate_ahead,
                ConfigurationError::LookAheadOutOfRange,
            )?,
            template: data.template,
            active: data.active,
            last_generated_date: data.last_generated_date,
            total_generated: data.total_generated,
        })
    }

    /// Returns the storage shape of this config.
    #[must_use]
    pub fn to_persisted(&self) -> PersistedConfigData {
        PersistedConfigData {
            id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
            frequency: self.rule.frequency(),
            weekday: self.rule.weekday_index(),
            day_of_month: self.rule.day_of_month(),
            assignees: self
                .assignees
                .iter()
                .map(|assignee| assignee.as_str().to_owned())
                .collect(),
            start_date: self.start_date,
            end_date: self.end_date,
            lead_days: i64::from(self.lead_days),
            days_to_generate_ahead: i64::from(self.days_to_generate_ahead),
            template: self.template.clone(),
            active: self.active,
            last_generated_date: self.last_generated_date,
            total_generated: self.total_generated,
        }
    }

    /// Returns the config identifier.
    #[must_use]
    pub const fn id(&self) -> ConfigId {
        self.id
    }

    /// Returns the operator-facing name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description, if one was given.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the recurrence rule.
    #[must_use]
    pub const fn rule(&self) -> &RecurrenceRule {
        &self.rule
    }

    /// Returns the assignee set in a stable order.
    #[must_use]
    pub const fn assignees(&self) -> &BTreeSet<AssigneeId> {
        &self.assignees
    }

    /// Returns the first eligible occurrence date.
    #[must_use]
    pub const fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    /// Returns the last date on which occurrences may fall, if any.
    #[must_use]
    pub const fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }

    /// Returns the lead time in days.
    #[must_use]
    pub const fn lead_days(&self) -> u32 {
        self.lead_days
    }

    /// Returns the on-demand look-ahead in days.
    #[must_use]
    pub const fn days_to_generate_ahead(&self) -> u32 {
        self.days_to_generate_ahead
    }

    /// Returns the task templates.
    #[must_use]
    pub const fn template(&self) -> &TaskTemplate {
        &self.template
    }

    /// Returns whether the config takes part in generation runs.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Returns the generation cursor.
    #[must_use]
    pub const fn last_generated_date(&self) -> Option<NaiveDate> {
        self.last_generated_date
    }

    /// Returns the number of tasks generated so far.
    #[must_use]
    pub const fn total_generated(&self) -> u64 {
        self.total_generated
    }

    /// Enables or disables the config.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Clears the cursor so the next run starts again from the start date.
    ///
    /// The generated-task counter is left untouched.
    pub fn reset_cursor(&mut self) {
        self.last_generated_date = None;
    }

    /// Marks `occurrence_date` as consumed.
    ///
    /// The cursor never moves backwards; an older date is ignored.
    pub(crate) fn advance_cursor(&mut self, occurrence_date: NaiveDate) {
        if self
            .last_generated_date
            .is_none_or(|cursor| occurrence_date > cursor)
        {
            self.last_generated_date = Some(occurrence_date);
        }
    }

    /// Adds `created` to the generated-task counter.
    pub(crate) const fn record_generated(&mut self, created: u64) {
        self.total_generated = self.total_generated.saturating_add(created);
    }
}

fn non_blank(description: Option<String>) -> Option<String> {
    description
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}

fn collect_assignees(
    raw: impl IntoIterator<Item = String>,
) -> Result<BTreeSet<AssigneeId>, ConfigurationError> {
    let assignees = raw
        .into_iter()
        .map(AssigneeId::new)
        .collect::<Result<BTreeSet<_>, _>>()?;
    if assignees.is_empty() {
        return Err(ConfigurationError::NoAssignees);
    }
    Ok(assignees)
}

fn validate_dates(
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
) -> Result<(), ConfigurationError> {
    if end_date.is_some_and(|end| end < start_date) {
        return Err(ConfigurationError::EndBeforeStart);
    }
    Ok(())
}

fn day_count(
    value: i64,
    out_of_range: fn(i64) -> ConfigurationError,
) -> Result<u32, ConfigurationError> {
    u32::try_from(value)
        .ok()
        .filter(|days| *days <= MAX_LOOK_AHEAD_DAYS)
        .ok_or_else(|| out_of_range(value))
}
