//! Then steps for recurring generation scenarios.

use super::world::{DutyWorld, parse_date, run_async};
use cadence::recurrence::{domain::GenerationConfig, ports::ConfigStore};
use rstest_bdd_macros::then;

fn stored(world: &DutyWorld) -> Result<GenerationConfig, eyre::Report> {
    let id = world.config()?.id();
    run_async(world.store.find_by_id(id))
        .map_err(|err| eyre::eyre!("lookup failed: {err}"))?
        .ok_or_else(|| eyre::eyre!("duty missing from store"))
}

#[then("{count:u64} tasks exist for the duty")]
fn tasks_exist(world: &DutyWorld, count: u64) -> Result<(), eyre::Report> {
    let id = world.config()?.id();
    let found = world
        .sink
        .tasks()
        .map_err(|err| eyre::eyre!("sink snapshot failed: {err}"))?
        .into_iter()
        .filter(|task| task.request.config_id() == id)
        .count();
    eyre::ensure!(
        u64::try_from(found)? == count,
        "expected {count} tasks, found {found}"
    );
    Ok(())
}

#[then(r#"the cursor is "{expected}""#)]
fn cursor_is(world: &DutyWorld, expected: String) -> Result<(), eyre::Report> {
    let expected_date = parse_date(&expected)?;
    let cursor = stored(world)?.last_generated_date();
    eyre::ensure!(
        cursor == Some(expected_date),
        "expected cursor {expected_date}, found {cursor:?}"
    );
    Ok(())
}

#[then("the generated total is {total:u64}")]
fn generated_total(world: &DutyWorld, total: u64) -> Result<(), eyre::Report> {
    let actual = stored(world)?.total_generated();
    eyre::ensure!(actual == total, "expected total {total}, found {actual}");
    Ok(())
}
