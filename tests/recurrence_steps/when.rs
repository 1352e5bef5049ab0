//! When steps for recurring generation scenarios.

use super::world::{DutyWorld, parse_date, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::when;

#[when(r#"the catch-up run executes on "{today}""#)]
fn catch_up_on(world: &mut DutyWorld, today: String) -> Result<(), eyre::Report> {
    let date = parse_date(&today)?;
    let outcomes = run_async(world.runner.run_catch_up_on(date)).wrap_err("catch-up run")?;
    if let Some(failed) = outcomes.iter().find(|outcome| !outcome.is_success()) {
        return Err(eyre::eyre!("catch-up reported errors: {:?}", failed.errors));
    }
    Ok(())
}

#[when("the generation cursor is reset")]
fn reset_cursor(world: &mut DutyWorld) -> Result<(), eyre::Report> {
    let id = world.config()?.id();
    run_async(world.runner.reset_cursor(id)).wrap_err("reset cursor")?;
    Ok(())
}
