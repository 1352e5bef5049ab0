//! Error types for recurrence configuration validation.

use thiserror::Error;

/// Errors returned while constructing rules and generation configs.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    /// A weekly rule was declared without a weekday.
    #[error("weekly recurrence requires a weekday")]
    MissingWeekday,

    /// The weekday index is outside `0..=6` (Monday = 0).
    #[error("invalid weekday {0}, expected 0 (Monday) to 6 (Sunday)")]
    InvalidWeekday(u8),

    /// A monthly rule was declared without a day of month.
    #[error("monthly recurrence requires a day of month")]
    MissingDayOfMonth,

    /// The day of month is outside `1..=31`.
    #[error("invalid day of month {0}, expected 1 to 31")]
    InvalidDayOfMonth(u8),

    /// The end date precedes the start date.
    #[error("end date must not precede the start date")]
    EndBeforeStart,

    /// The assignee set is empty.
    #[error("at least one assignee is required")]
    NoAssignees,

    /// An assignee identifier is blank.
    #[error("assignee identifier must not be empty")]
    EmptyAssignee,

    /// The lead time is negative or unreasonably large.
    #[error("lead days {0} out of range, expected 0 to 366")]
    LeadDaysOutOfRange(i64),

    /// The on-demand look-ahead is negative or unreasonably large.
    #[error("days to generate ahead {0} out of range, expected 0 to 366")]
    LookAheadOutOfRange(i64),

    /// The title template is blank.
    #[error("title template must not be empty")]
    EmptyTitleTemplate,
}
