//! Generation runner: drives planning, duplicate detection, and task
//! creation for each config, then persists the advanced cursor.

use super::{
    ConfigRunOutcome, Coverage, DuplicateGuard, GenerationResult, OnDemandReport, PlanLimits,
    PlanStop, RunStop, RunTarget, RunTrace, TaskGenerator, plan_occurrences,
};
use crate::recurrence::{
    domain::{ConfigId, GenerationConfig, format_occurrence_date},
    ports::{ConfigStore, ConfigStoreError, TaskSink, TaskSinkError},
};
use crate::settings::{PartialCoveragePolicy, RunnerSettings};
use chrono::{Days, NaiveDate};
use mockable::Clock;
use std::sync::Arc;

/// Bounds of one config's pass in a run.
#[derive(Debug, Clone, Copy)]
struct RunWindow {
    today: NaiveDate,
    limits: PlanLimits,
    enforce_lead_time: bool,
}

/// Tasks created before a sink failure cut an occurrence short.
struct PartialFailure {
    created: u64,
    source: TaskSinkError,
}

/// Recurring task generation service.
///
/// Configs are processed one at a time and the occurrences of a config in
/// ascending order; the cursor written for one occurrence is in place before
/// the next occurrence is examined. A sink failure stops the affected config
/// for the rest of the run (its earlier progress is kept and saved) and the
/// run moves on to the next config. Both entry points follow this policy.
pub struct GenerationRunner<S, T, C>
where
    S: ConfigStore,
    T: TaskSink,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    guard: DuplicateGuard<T>,
    generator: TaskGenerator<T>,
    clock: Arc<C>,
    settings: RunnerSettings,
}

impl<S, T, C> GenerationRunner<S, T, C>
where
    S: ConfigStore,
    T: TaskSink,
    C: Clock + Send + Sync,
{
    /// Creates a runner with default settings.
    #[must_use]
    pub fn new(store: Arc<S>, sink: Arc<T>, clock: Arc<C>) -> Self {
        Self {
            store,
            guard: DuplicateGuard::new(Arc::clone(&sink)),
            generator: TaskGenerator::new(sink),
            clock,
            settings: RunnerSettings::default(),
        }
    }

    /// Replaces the runner settings.
    #[must_use]
    pub fn with_settings(mut self, settings: RunnerSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Returns the active settings.
    #[must_use]
    pub const fn settings(&self) -> &RunnerSettings {
        &self.settings
    }

    fn today(&self) -> NaiveDate {
        self.clock.local().date_naive()
    }

    /// Runs the periodic catch-up pass over every active config as of today.
    ///
    /// # Errors
    ///
    /// Returns [`super::GenerationError::Store`] when the active configs
    /// cannot be loaded. Failures inside a config are reported in its
    /// outcome and never abort the other configs.
    pub async fn run_catch_up(&self) -> GenerationResult<Vec<ConfigRunOutcome>> {
        self.run_catch_up_on(self.today()).await
    }

    /// Runs the catch-up pass as of `today`.
    ///
    /// Each config is planned up to `today` plus the larger of its lead days
    /// and the configured minimum look-ahead, capped at
    /// [`RunnerSettings::catch_up_cap`] occurrences.
    ///
    /// # Errors
    ///
    /// See [`GenerationRunner::run_catch_up`].
    pub async fn run_catch_up_on(&self, today: NaiveDate) -> GenerationResult<Vec<ConfigRunOutcome>> {
        let configs = self.store.load_active().await?;
        tracing::info!(configs = configs.len(), %today, "starting catch-up run");

        let mut outcomes = Vec::with_capacity(configs.len());
        for mut config in configs {
            let look_ahead = config
                .lead_days()
                .max(self.settings.catch_up_min_look_ahead_days);
            let window = RunWindow {
                today,
                limits: PlanLimits::new(add_days(today, look_ahead), self.settings.catch_up_cap),
                enforce_lead_time: true,
            };
            let mut trace = RunTrace::discarding();
            let outcome = self.process_and_save(&mut config, window, &mut trace).await;
            outcomes.push(outcome);
        }
        Ok(outcomes)
    }

    /// Runs an operator-requested pass as of today.
    ///
    /// # Errors
    ///
    /// Returns [`super::GenerationError::Store`] when the targeted configs
    /// cannot be loaded or a named config does not exist.
    pub async fn run_on_demand(&self, target: RunTarget) -> GenerationResult<OnDemandReport> {
        self.run_on_demand_on(target, self.today()).await
    }

    /// Runs an operator-requested pass as of `today`.
    ///
    /// Each config is planned up to `today` plus its own
    /// `days_to_generate_ahead`, capped at [`RunnerSettings::on_demand_cap`]
    /// occurrences, and every decision is written to the report's trace.
    ///
    /// # Errors
    ///
    /// See [`GenerationRunner::run_on_demand`].
    pub async fn run_on_demand_on(
        &self,
        target: RunTarget,
        today: NaiveDate,
    ) -> GenerationResult<OnDemandReport> {
        let configs = match target {
            RunTarget::All => self.store.load_active().await?,
            RunTarget::Config(id) => vec![self.load(id).await?],
        };
        tracing::info!(configs = configs.len(), %today, "starting on-demand run");

        let mut trace = RunTrace::recording();
        let mut outcomes = Vec::with_capacity(configs.len());
        for mut config in configs {
            trace.note(format!("Processing config: {}", config.name()));
            if let Some(description) = config.description() {
                trace.note(format!("Description: {description}"));
            }
            trace.note(format!("Start date: {}", config.start_date()));
            trace.note(format!("Frequency: {}", config.rule()));
            trace.note(format!(
                "Days to generate ahead: {}",
                config.days_to_generate_ahead()
            ));
            if !config.is_active() {
                trace.note("Config is inactive; skipped");
                let mut outcome = ConfigRunOutcome::new(config.id());
                outcome.last_generated_date = config.last_generated_date();
                outcome.stop = Some(RunStop::Inactive);
                outcomes.push(outcome);
                continue;
            }

            let window = RunWindow {
                today,
                limits: PlanLimits::new(
                    add_days(today, config.days_to_generate_ahead()),
                    self.settings.on_demand_cap,
                ),
                enforce_lead_time: !self.settings.on_demand_ignores_lead_time,
            };
            let outcome = self.process_and_save(&mut config, window, &mut trace).await;
            trace.note(format!(
                "Total generated in this run: {} tasks",
                outcome.tasks_created
            ));
            outcomes.push(outcome);
        }
        Ok(OnDemandReport::from_outcomes(outcomes, trace.into_lines()))
    }

    /// Clears the cursor of config `id` so generation restarts from its
    /// start date. The generated-task counter is kept. Resetting an
    /// already-reset config is a no-op apart from the save.
    ///
    /// # Errors
    ///
    /// Returns [`super::GenerationError::Store`] when the config does not
    /// exist or cannot be saved.
    pub async fn reset_cursor(&self, id: ConfigId) -> GenerationResult<GenerationConfig> {
        let mut config = self.load(id).await?;
        config.reset_cursor();
        self.store.save(&config).await?;
        tracing::info!(config_id = %id, "generation cursor reset");
        Ok(config)
    }

    async fn load(&self, id: ConfigId) -> GenerationResult<GenerationConfig> {
        Ok(self
            .store
            .find_by_id(id)
            .await?
            .ok_or(ConfigStoreError::NotFound(id))?)
    }

    async fn process_and_save(
        &self,
        config: &mut GenerationConfig,
        window: RunWindow,
        trace: &mut RunTrace,
    ) -> ConfigRunOutcome {
        let mut outcome = self.process_config(config, window, trace).await;
        if let Err(err) = self.store.save(config).await {
            tracing::warn!(config_id = %config.id(), error = %err, "failed to save generation cursor");
            trace.note(format!("Saving the cursor failed: {err}"));
            outcome.errors.push(err.into());
        }
        outcome.last_generated_date = config.last_generated_date();
        outcome
    }

    async fn process_config(
        &self,
        config: &mut GenerationConfig,
        window: RunWindow,
        trace: &mut RunTrace,
    ) -> ConfigRunOutcome {
        let mut outcome = ConfigRunOutcome::new(config.id());
        let mut plan = plan_occurrences(config, window.limits);
        match (config.last_generated_date(), plan.starting_point()) {
            (Some(cursor), Some(next)) => {
                trace.note(format!("Last generated date: {cursor}"));
                trace.note(format!("Next occurrence: {next}"));
            }
            (None, Some(start)) => trace.note(format!("First generation from: {start}")),
            (_, None) => trace.note("No further occurrence exists"),
        }
        trace.note(format!("Generating up to: {}", window.limits.horizon()));

        for occurrence in plan.by_ref() {
            let creation_date = subtract_days(occurrence, config.lead_days());
            if window.enforce_lead_time && creation_date > window.today {
                trace.note(format!(
                    "Occurrence {occurrence} is not due until {creation_date}; stopping"
                ));
                outcome.stop = Some(RunStop::NotYetDue {
                    occurrence,
                    creation_date,
                });
                return outcome;
            }

            match self.materialise(config, occurrence, trace).await {
                Ok(created) => {
                    config.record_generated(created);
                    config.advance_cursor(occurrence);
                    outcome.occurrences_processed = outcome.occurrences_processed.saturating_add(1);
                    outcome.tasks_created = outcome.tasks_created.saturating_add(created);
                }
                Err(failure) => {
                    config.record_generated(failure.created);
                    outcome.tasks_created = outcome.tasks_created.saturating_add(failure.created);
                    tracing::warn!(
                        config_id = %config.id(),
                        %occurrence,
                        error = %failure.source,
                        "task generation failed; cursor left before this occurrence"
                    );
                    trace.note(format!(
                        "Generation failed for {occurrence}: {}",
                        failure.source
                    ));
                    outcome.errors.push(failure.source.into());
                    outcome.stop = Some(RunStop::Failed { occurrence });
                    return outcome;
                }
            }
        }

        if let Some(reason) = plan.stop_reason() {
            trace.note(describe_plan_stop(reason));
            outcome.stop = Some(RunStop::Plan(reason));
        }
        outcome
    }

    async fn materialise(
        &self,
        config: &GenerationConfig,
        occurrence: NaiveDate,
        trace: &mut RunTrace,
    ) -> Result<u64, PartialFailure> {
        let assignees = config.assignees();
        let coverage = self
            .guard
            .coverage(config.id(), occurrence, assignees)
            .await
            .map_err(|source| PartialFailure { created: 0, source })?;

        let targets = match coverage {
            Coverage::Full => {
                trace.note(format!("Tasks already exist for {occurrence}"));
                return Ok(0);
            }
            Coverage::Partial { missing } => match self.settings.partial_coverage {
                PartialCoveragePolicy::SkipDate => {
                    trace.note(format!(
                        "Tasks already exist for some assignees on {occurrence}; skipped"
                    ));
                    return Ok(0);
                }
                PartialCoveragePolicy::TopUp => {
                    trace.note(format!(
                        "Topping up {} missing assignees for {occurrence}",
                        missing.len()
                    ));
                    missing
                }
            },
            Coverage::Uncovered => assignees.clone(),
        };

        let mut created = 0_u64;
        for assignee in &targets {
            match self.generator.generate(config, occurrence, assignee).await {
                Ok(task) => {
                    created = created.saturating_add(1);
                    trace.note(task.audit_line);
                }
                Err(source) => return Err(PartialFailure { created, source }),
            }
        }
        tracing::info!(config_id = %config.id(), %occurrence, created, "occurrence generated");
        trace.note(format!(
            "Generated {created} tasks for {}",
            format_occurrence_date(occurrence)
        ));
        Ok(created)
    }
}

fn describe_plan_stop(reason: PlanStop) -> String {
    match reason {
        PlanStop::Horizon(horizon) => format!("Reached the horizon {horizon}"),
        PlanStop::EndDate(end) => format!("Stopped at end date: {end}"),
        PlanStop::IterationLimit(cap) => format!("Iteration limit reached ({cap} occurrences)"),
        PlanStop::CalendarExhausted => "No further occurrence exists".to_owned(),
    }
}

fn add_days(date: NaiveDate, days: u32) -> NaiveDate {
    date.checked_add_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MAX)
}

fn subtract_days(date: NaiveDate, days: u32) -> NaiveDate {
    date.checked_sub_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MIN)
}
