//! Catch-up run tests over in-memory adapters.

use std::sync::Arc;

use super::helpers::{FixedClock, Harness, build, daily_request, date};
use crate::recurrence::{
    adapters::memory::{InMemoryConfigStore, InMemoryTaskSink},
    ports::ConfigStore,
    services::{DuplicateGuard, GenerationRunner, OnDemandOutcome, PlanStop, RunStop, RunTarget},
};
use crate::settings::{PartialCoveragePolicy, RunnerSettings};

#[tokio::test(flavor = "multi_thread")]
async fn catch_up_creates_one_task_per_assignee_per_due_occurrence() {
    let config = build(daily_request(date(2024, 3, 1), &["alice", "bob"]));
    let harness = Harness::new([config.clone()]);

    let outcomes = harness
        .runner
        .run_catch_up_on(date(2024, 3, 3))
        .await
        .expect("catch-up should run");

    let outcome = outcomes.first().expect("one outcome");
    assert!(outcome.is_success());
    assert_eq!(outcome.occurrences_processed, 3);
    assert_eq!(outcome.tasks_created, 6);
    assert_eq!(
        outcome.stop,
        Some(RunStop::NotYetDue {
            occurrence: date(2024, 3, 4),
            creation_date: date(2024, 3, 4)
        })
    );
    let stored = harness.stored(&config).await;
    assert_eq!(stored.last_generated_date(), Some(date(2024, 3, 3)));
    assert_eq!(stored.total_generated(), 6);
    assert_eq!(harness.task_count(), 6);
}

#[tokio::test(flavor = "multi_thread")]
async fn rerunning_without_new_due_occurrences_changes_nothing() {
    let config = build(daily_request(date(2024, 3, 1), &["alice", "bob"]));
    let harness = Harness::new([config.clone()]);
    harness
        .runner
        .run_catch_up_on(date(2024, 3, 3))
        .await
        .expect("first run");
    let after_first = harness.stored(&config).await;

    let outcomes = harness
        .runner
        .run_catch_up_on(date(2024, 3, 3))
        .await
        .expect("second run");

    let after_second = harness.stored(&config).await;
    assert_eq!(after_second.total_generated(), after_first.total_generated());
    assert_eq!(
        after_second.last_generated_date(),
        after_first.last_generated_date()
    );
    assert_eq!(outcomes.first().map(|o| o.tasks_created), Some(0));
    assert_eq!(harness.task_count(), 6);
}

#[tokio::test(flavor = "multi_thread")]
async fn lead_days_bring_creation_forward() {
    let config = build(daily_request(date(2024, 3, 1), &["alice"]).with_lead_days(2));
    let harness = Harness::new([config.clone()]);

    harness
        .runner
        .run_catch_up_on(date(2024, 3, 3))
        .await
        .expect("catch-up should run");

    let stored = harness.stored(&config).await;
    assert_eq!(stored.last_generated_date(), Some(date(2024, 3, 5)));
    let tasks = harness.sink.tasks_for(config.id(), date(2024, 3, 5)).expect("sink lookup");
    assert_eq!(tasks.len(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn existing_tasks_are_consumed_without_duplication() {
    let config = build(daily_request(date(2024, 3, 1), &["alice", "bob"]));
    let harness = Harness::new([config.clone()]);
    harness.seed_task(&config, "alice", date(2024, 3, 1)).await;
    harness.seed_task(&config, "bob", date(2024, 3, 1)).await;

    let outcomes = harness
        .runner
        .run_catch_up_on(date(2024, 3, 2))
        .await
        .expect("catch-up should run");

    let outcome = outcomes.first().expect("one outcome");
    assert_eq!(outcome.occurrences_processed, 2);
    assert_eq!(outcome.tasks_created, 2);
    let stored = harness.stored(&config).await;
    assert_eq!(stored.last_generated_date(), Some(date(2024, 3, 2)));
    assert_eq!(stored.total_generated(), 2);
    let first_day = harness.sink.tasks_for(config.id(), date(2024, 3, 1)).expect("sink lookup");
    assert_eq!(first_day.len(), 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn reset_cursor_never_duplicates_on_rerun() {
    let config = build(daily_request(date(2024, 3, 1), &["alice", "bob"]));
    let harness = Harness::new([config.clone()]);
    harness
        .runner
        .run_catch_up_on(date(2024, 3, 4))
        .await
        .expect("first run");

    let reset = harness
        .runner
        .reset_cursor(config.id())
        .await
        .expect("reset should succeed");
    assert_eq!(reset.last_generated_date(), None);
    assert_eq!(reset.total_generated(), 8);

    harness
        .runner
        .run_catch_up_on(date(2024, 3, 4))
        .await
        .expect("second run");

    let stored = harness.stored(&config).await;
    assert_eq!(stored.last_generated_date(), Some(date(2024, 3, 4)));
    assert_eq!(stored.total_generated(), 8);
    assert_eq!(harness.task_count(), 8);
}

#[tokio::test(flavor = "multi_thread")]
async fn reset_cursor_is_idempotent() {
    let config = build(daily_request(date(2024, 3, 1), &["alice"]));
    let harness = Harness::new([config.clone()]);

    let first = harness.runner.reset_cursor(config.id()).await.expect("first reset");
    let second = harness.runner.reset_cursor(config.id()).await.expect("second reset");

    assert_eq!(first, second);
}

#[tokio::test(flavor = "multi_thread")]
async fn partially_covered_date_is_skipped_by_default() {
    let config = build(daily_request(date(2024, 3, 1), &["alice", "bob"]));
    let harness = Harness::new([config.clone()]);
    harness.seed_task(&config, "alice", date(2024, 3, 1)).await;

    let already = DuplicateGuard::new(Arc::clone(&harness.sink))
        .already_generated(config.id(), date(2024, 3, 1), config.assignees())
        .await
        .expect("guard lookup");
    assert!(already);

    harness
        .runner
        .run_catch_up_on(date(2024, 3, 1))
        .await
        .expect("catch-up should run");

    let tasks = harness.sink.tasks_for(config.id(), date(2024, 3, 1)).expect("sink lookup");
    assert_eq!(tasks.len(), 1);
    let stored = harness.stored(&config).await;
    assert_eq!(stored.last_generated_date(), Some(date(2024, 3, 1)));
    assert_eq!(stored.total_generated(), 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn partial_coverage_is_topped_up_when_configured() {
    let config = build(daily_request(date(2024, 3, 1), &["alice", "bob"]));
    let settings = RunnerSettings {
        partial_coverage: PartialCoveragePolicy::TopUp,
        ..RunnerSettings::default()
    };
    let harness = Harness::with_settings([config.clone()], settings);
    harness.seed_task(&config, "alice", date(2024, 3, 1)).await;

    harness
        .runner
        .run_catch_up_on(date(2024, 3, 1))
        .await
        .expect("catch-up should run");

    let tasks = harness.sink.tasks_for(config.id(), date(2024, 3, 1)).expect("sink lookup");
    let mut names: Vec<&str> = tasks.iter().map(|t| t.request.assignee().as_str()).collect();
    names.sort_unstable();
    assert_eq!(names, vec!["alice", "bob"]);
    assert_eq!(harness.stored(&config).await.total_generated(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn end_date_on_first_occurrence_generates_exactly_once() {
    let config = build(daily_request(date(2024, 3, 1), &["alice"]).with_end_date(date(2024, 3, 1)));
    let harness = Harness::new([config.clone()]);

    let first = harness
        .runner
        .run_catch_up_on(date(2024, 3, 5))
        .await
        .expect("first run");
    let later = harness
        .runner
        .run_catch_up_on(date(2024, 4, 20))
        .await
        .expect("later run");

    assert_eq!(first.first().map(|o| o.tasks_created), Some(1));
    assert_eq!(
        later.first().and_then(|o| o.stop),
        Some(RunStop::Plan(PlanStop::EndDate(date(2024, 3, 1))))
    );
    assert_eq!(harness.task_count(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn cursor_does_not_move_back_when_the_clock_does() {
    let config = build(daily_request(date(2024, 3, 1), &["alice"]));
    let harness = Harness::new([config.clone()]);
    harness
        .runner
        .run_catch_up_on(date(2024, 3, 6))
        .await
        .expect("first run");

    harness
        .runner
        .run_catch_up_on(date(2024, 3, 2))
        .await
        .expect("run with earlier clock");

    let stored = harness.stored(&config).await;
    assert_eq!(stored.last_generated_date(), Some(date(2024, 3, 6)));
    assert_eq!(harness.task_count(), 6);
}

#[tokio::test(flavor = "multi_thread")]
async fn catch_up_skips_inactive_configs() {
    let active = build(daily_request(date(2024, 3, 1), &["alice"]));
    let inactive = build(daily_request(date(2024, 3, 1), &["bob"]).inactive());
    let harness = Harness::new([active.clone(), inactive.clone()]);

    let outcomes = harness
        .runner
        .run_catch_up_on(date(2024, 3, 1))
        .await
        .expect("catch-up should run");

    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes.first().map(|o| o.config_id), Some(active.id()));
    assert_eq!(harness.stored(&inactive).await.last_generated_date(), None);
}

#[tokio::test(flavor = "multi_thread")]
async fn catch_up_stops_at_the_cap() {
    let config = build(daily_request(date(2024, 1, 1), &["alice"]));
    let settings = RunnerSettings {
        catch_up_cap: 5,
        ..RunnerSettings::default()
    };
    let harness = Harness::with_settings([config.clone()], settings);

    let outcomes = harness
        .runner
        .run_catch_up_on(date(2024, 3, 1))
        .await
        .expect("catch-up should run");

    assert_eq!(
        outcomes.first().and_then(|o| o.stop),
        Some(RunStop::Plan(PlanStop::IterationLimit(5)))
    );
    assert_eq!(
        harness.stored(&config).await.last_generated_date(),
        Some(date(2024, 1, 5))
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn clock_driven_entry_points_use_the_local_date() {
    let config = build(daily_request(date(2024, 3, 1), &["alice"]).with_days_to_generate_ahead(2));
    let store = Arc::new(InMemoryConfigStore::with_configs([config.clone()]));
    let sink = Arc::new(InMemoryTaskSink::new());
    let runner = GenerationRunner::new(
        Arc::clone(&store),
        Arc::clone(&sink),
        Arc::new(FixedClock(date(2024, 3, 3))),
    );

    let outcomes = runner.run_catch_up().await.expect("catch-up should run");
    let outcome = outcomes.first().expect("one outcome");
    assert_eq!(outcome.tasks_created, 3);
    assert_eq!(outcome.last_generated_date, Some(date(2024, 3, 3)));

    let report = runner
        .run_on_demand(RunTarget::Config(config.id()))
        .await
        .expect("on-demand run should succeed");
    assert_eq!(report.outcome, OnDemandOutcome::Created);
    assert_eq!(report.tasks_created, 2);
    let stored = store
        .find_by_id(config.id())
        .await
        .expect("store lookup")
        .expect("config stored");
    assert_eq!(stored.last_generated_date(), Some(date(2024, 3, 5)));
    assert_eq!(sink.tasks().expect("sink snapshot").len(), 5);
}
