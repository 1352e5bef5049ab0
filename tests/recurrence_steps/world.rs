//! Shared world state for recurring generation BDD scenarios.

use std::sync::Arc;

use cadence::recurrence::{
    adapters::memory::{InMemoryConfigStore, InMemoryTaskSink},
    domain::GenerationConfig,
    services::GenerationRunner,
};
use chrono::NaiveDate;
use mockable::DefaultClock;
use rstest::fixture;

/// Runner type used by the BDD world.
pub type TestRunner = GenerationRunner<InMemoryConfigStore, InMemoryTaskSink, DefaultClock>;

/// Scenario world for recurring generation behaviour tests.
pub struct DutyWorld {
    pub runner: TestRunner,
    pub store: Arc<InMemoryConfigStore>,
    pub sink: Arc<InMemoryTaskSink>,
    pub config: Option<GenerationConfig>,
}

impl DutyWorld {
    /// Creates a world with empty adapters.
    #[must_use]
    pub fn new() -> Self {
        let store = Arc::new(InMemoryConfigStore::new());
        let sink = Arc::new(InMemoryTaskSink::new());
        let runner = GenerationRunner::new(
            Arc::clone(&store),
            Arc::clone(&sink),
            Arc::new(DefaultClock),
        );
        Self {
            runner,
            store,
            sink,
            config: None,
        }
    }

    /// Returns the duty registered by a given step.
    pub fn config(&self) -> Result<&GenerationConfig, eyre::Report> {
        self.config
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing duty in scenario world"))
    }
}

impl Default for DutyWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> DutyWorld {
    DutyWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

/// Parses an ISO calendar date captured from a step.
pub fn parse_date(value: &str) -> Result<NaiveDate, eyre::Report> {
    value
        .parse::<NaiveDate>()
        .map_err(|err| eyre::eyre!("invalid date '{value}': {err}"))
}
