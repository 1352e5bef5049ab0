//! Recurrence rules and next-occurrence calendar arithmetic.

use super::ConfigurationError;
use chrono::{Datelike, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How often a recurring duty falls due.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    /// Every calendar day.
    Daily,
    /// Once a week on a fixed weekday.
    Weekly,
    /// Once a month on a fixed day of month.
    Monthly,
}

impl Frequency {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Day of month in `1..=31` used by monthly rules.
///
/// Months shorter than the requested day clamp to their last day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DayOfMonth(u8);

impl DayOfMonth {
    /// Creates a validated day of month.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidDayOfMonth`] outside `1..=31`.
    pub const fn new(value: u8) -> Result<Self, ConfigurationError> {
        if value == 0 || value > 31 {
            return Err(ConfigurationError::InvalidDayOfMonth(value));
        }
        Ok(Self(value))
    }

    /// Returns the numeric day.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

/// A recurrence rule: frequency plus the one parameter that frequency needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecurrenceRule {
    /// Falls due every day.
    Daily,
    /// Falls due on the given weekday.
    Weekly {
        /// Target weekday.
        weekday: Weekday,
    },
    /// Falls due on the given day of each month, clamped to month end.
    Monthly {
        /// Target day of month.
        day_of_month: DayOfMonth,
    },
}

impl RecurrenceRule {
    /// Builds a rule from its stored parts.
    ///
    /// Only the parameter relevant to `frequency` is inspected; the other one
    /// is ignored. `weekday` uses Monday = 0 through Sunday = 6.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] when the parameter required by the
    /// frequency is missing or out of range.
    pub fn from_parts(
        frequency: Frequency,
        weekday: Option<u8>,
        day_of_month: Option<u8>,
    ) -> Result<Self, ConfigurationError> {
        match frequency {
            Frequency::Daily => Ok(Self::Daily),
            Frequency::Weekly => {
                let index = weekday.ok_or(ConfigurationError::MissingWeekday)?;
                Ok(Self::Weekly {
                    weekday: weekday_from_index(index)?,
                })
            }
            Frequency::Monthly => {
                let day = day_of_month.ok_or(ConfigurationError::MissingDayOfMonth)?;
                Ok(Self::Monthly {
                    day_of_month: DayOfMonth::new(day)?,
                })
            }
        }
    }

    /// Returns the rule frequency.
    #[must_use]
    pub const fn frequency(&self) -> Frequency {
        match self {
            Self::Daily => Frequency::Daily,
            Self::Weekly { .. } => Frequency::Weekly,
            Self::Monthly { .. } => Frequency::Monthly,
        }
    }

    /// Returns the weekday index (Monday = 0) for weekly rules.
    #[must_use]
    pub fn weekday_index(&self) -> Option<u8> {
        match self {
            Self::Weekly { weekday } => u8::try_from(weekday.num_days_from_monday()).ok(),
            Self::Daily | Self::Monthly { .. } => None,
        }
    }

    /// Returns the day of month for monthly rules.
    #[must_use]
    pub const fn day_of_month(&self) -> Option<u8> {
        match self {
            Self::Monthly { day_of_month } => Some(day_of_month.value()),
            Self::Daily | Self::Weekly { .. } => None,
        }
    }

    /// Computes the first occurrence strictly after `from`.
    ///
    /// A weekly rule whose weekday matches `from` advances a full week. A
    /// monthly rule lands on the configured day of the following calendar
    /// month, clamped to that month's last day.
    ///
    /// Returns `None` only when the next occurrence would fall outside the
    /// calendar range representable by [`NaiveDate`].
    #[must_use]
    pub fn next_occurrence(&self, from: NaiveDate) -> Option<NaiveDate> {
        match *self {
            Self::Daily => from.succ_opt(),
            Self::Weekly { weekday } => from
                .iter_days()
                .skip(1)
                .take(7)
                .find(|candidate| candidate.weekday() == weekday),
            Self::Monthly { day_of_month } => next_month_on(from, day_of_month),
        }
    }
}

impl fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Daily => f.write_str("daily"),
            Self::Weekly { weekday } => write!(f, "weekly on {weekday}"),
            Self::Monthly { day_of_month } => write!(f, "monthly on day {}", day_of_month.value()),
        }
    }
}

fn weekday_from_index(index: u8) -> Result<Weekday, ConfigurationError> {
    match index {
        0 => Ok(Weekday::Mon),
        1 => Ok(Weekday::Tue),
        2 => Ok(Weekday::Wed),
        3 => Ok(Weekday::Thu),
        4 => Ok(Weekday::Fri),
        5 => Ok(Weekday::Sat),
        6 => Ok(Weekday::Sun),
        other => Err(ConfigurationError::InvalidWeekday(other)),
    }
}

fn next_month_on(from: NaiveDate, day_of_month: DayOfMonth) -> Option<NaiveDate> {
    let first_of_next = from.with_day(1)?.checked_add_months(Months::new(1))?;
    // Walk down from the requested day to the last day the month has.
    (1..=u32::from(day_of_month.value()))
        .rev()
        .find_map(|day| first_of_next.with_day(day))
}
