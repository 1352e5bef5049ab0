//! Shared builders for recurrence unit tests.

use std::sync::Arc;

use crate::recurrence::{
    adapters::memory::{InMemoryConfigStore, InMemoryTaskSink},
    domain::{GenerationConfig, NewGenerationConfig, RecurrenceRule, TaskRequest},
    ports::TaskSink,
    services::GenerationRunner,
};
use crate::settings::RunnerSettings;
use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use mockable::{Clock, DefaultClock};

pub(super) type MemoryRunner =
    GenerationRunner<InMemoryConfigStore, InMemoryTaskSink, DefaultClock>;

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid calendar date")
}

pub(super) fn assignees(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| (*name).to_owned()).collect()
}

pub(super) fn daily_request(start: NaiveDate, names: &[&str]) -> NewGenerationConfig {
    NewGenerationConfig::new("Cold room cleaning", RecurrenceRule::Daily, assignees(names), start)
}

pub(super) fn build(request: NewGenerationConfig) -> GenerationConfig {
    GenerationConfig::new(request).expect("valid generation config")
}

/// Clock pinned to noon local time on one calendar date.
pub(super) struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        let noon = self.0.and_hms_opt(12, 0, 0).expect("valid time of day");
        Local
            .from_local_datetime(&noon)
            .earliest()
            .expect("noon exists in the local time zone")
    }

    fn utc(&self) -> DateTime<Utc> {
        self.local().with_timezone(&Utc)
    }
}

/// Wires a runner over in-memory adapters holding `configs`.
pub(super) struct Harness {
    pub runner: MemoryRunner,
    pub store: Arc<InMemoryConfigStore>,
    pub sink: Arc<InMemoryTaskSink>,
}

impl Harness {
    pub fn new(configs: impl IntoIterator<Item = GenerationConfig>) -> Self {
        Self::with_settings(configs, RunnerSettings::default())
    }

    pub fn with_settings(
        configs: impl IntoIterator<Item = GenerationConfig>,
        settings: RunnerSettings,
    ) -> Self {
        let store = Arc::new(InMemoryConfigStore::with_configs(configs));
        let sink = Arc::new(InMemoryTaskSink::new());
        let runner = GenerationRunner::new(
            Arc::clone(&store),
            Arc::clone(&sink),
            Arc::new(DefaultClock),
        )
        .with_settings(settings);
        Self {
            runner,
            store,
            sink,
        }
    }

    pub async fn stored(&self, config: &GenerationConfig) -> GenerationConfig {
        use crate::recurrence::ports::ConfigStore;
        self.store
            .find_by_id(config.id())
            .await
            .expect("store lookup should succeed")
            .expect("config should be stored")
    }

    /// Creates a task directly in the sink, as if delivered earlier.
    pub async fn seed_task(&self, config: &GenerationConfig, assignee: &str, occurrence: NaiveDate) {
        let assignee_id =
            crate::recurrence::domain::AssigneeId::new(assignee).expect("valid assignee");
        let request = TaskRequest::render(config.id(), assignee_id, occurrence, config.template());
        self.sink
            .create(&request)
            .await
            .expect("seeding a task should succeed");
    }

    pub fn task_count(&self) -> usize {
        self.sink.tasks().expect("sink snapshot").len()
    }
}
