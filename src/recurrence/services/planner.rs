//! Occurrence window planning.
//!
//! A plan is a lazy, finite, single-use iterator over the occurrence dates a
//! run should consider for one config. It never mutates the config, so two
//! plans built from the same config state yield the same dates.

use crate::recurrence::domain::{GenerationConfig, RecurrenceRule};
use chrono::NaiveDate;

/// Bounds applied to one plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanLimits {
    horizon: NaiveDate,
    max_occurrences: usize,
}

impl PlanLimits {
    /// Creates limits with an inclusive `horizon` and a hard cap on emitted
    /// dates.
    #[must_use]
    pub const fn new(horizon: NaiveDate, max_occurrences: usize) -> Self {
        Self {
            horizon,
            max_occurrences,
        }
    }

    /// Returns the inclusive horizon.
    #[must_use]
    pub const fn horizon(&self) -> NaiveDate {
        self.horizon
    }

    /// Returns the occurrence cap.
    #[must_use]
    pub const fn max_occurrences(&self) -> usize {
        self.max_occurrences
    }
}

/// Why a plan stopped emitting dates. Every variant is a normal completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanStop {
    /// The next date lies beyond the horizon.
    Horizon(NaiveDate),
    /// The next date lies beyond the config's end date.
    EndDate(NaiveDate),
    /// The occurrence cap was reached while more dates were eligible.
    IterationLimit(usize),
    /// The rule has no further representable date.
    CalendarExhausted,
}

/// Lazy sequence of occurrence dates for one run.
#[derive(Debug)]
pub struct OccurrencePlan {
    rule: RecurrenceRule,
    end_date: Option<NaiveDate>,
    limits: PlanLimits,
    start: Option<NaiveDate>,
    pending: Option<NaiveDate>,
    emitted: usize,
    stop: Option<PlanStop>,
}

impl OccurrencePlan {
    /// Returns the first date the plan considers, before any filtering.
    #[must_use]
    pub const fn starting_point(&self) -> Option<NaiveDate> {
        self.start
    }

    /// Returns why the plan stopped, once it has.
    #[must_use]
    pub const fn stop_reason(&self) -> Option<PlanStop> {
        self.stop
    }

    /// Returns how many dates the plan has emitted so far.
    #[must_use]
    pub const fn emitted(&self) -> usize {
        self.emitted
    }

    fn halt(&mut self, reason: PlanStop) -> Option<NaiveDate> {
        self.stop = Some(reason);
        None
    }
}

impl Iterator for OccurrencePlan {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<Self::Item> {
        if self.stop.is_some() {
            return None;
        }
        let Some(candidate) = self.pending else {
            return self.halt(PlanStop::CalendarExhausted);
        };
        if let Some(end) = self.end_date
            && candidate > end
        {
            return self.halt(PlanStop::EndDate(end));
        }
        if candidate > self.limits.horizon {
            return self.halt(PlanStop::Horizon(self.limits.horizon));
        }
        if self.emitted >= self.limits.max_occurrences {
            return self.halt(PlanStop::IterationLimit(self.limits.max_occurrences));
        }
        self.emitted = self.emitted.saturating_add(1);
        self.pending = self.rule.next_occurrence(candidate);
        Some(candidate)
    }
}

/// Plans the occurrences to process for `config` within `limits`.
///
/// Planning starts at the occurrence after the cursor, or at the start date
/// itself when the config has never generated anything.
#[must_use]
pub fn plan_occurrences(config: &GenerationConfig, limits: PlanLimits) -> OccurrencePlan {
    let rule = *config.rule();
    let pending = match config.last_generated_date() {
        Some(cursor) => rule.next_occurrence(cursor),
        None => Some(config.start_date()),
    };
    OccurrencePlan {
        rule,
        end_date: config.end_date(),
        limits,
        start: pending,
        pending,
        emitted: 0,
        stop: None,
    }
}
