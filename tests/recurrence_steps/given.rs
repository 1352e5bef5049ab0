//! Given steps for recurring generation scenarios.

use super::world::{DutyWorld, parse_date, run_async};
use cadence::recurrence::{
    domain::{Frequency, GenerationConfig, NewGenerationConfig, RecurrenceRule},
    ports::ConfigStore,
};
use eyre::WrapErr;
use rstest_bdd_macros::given;

fn register(
    world: &mut DutyWorld,
    rule: RecurrenceRule,
    start: &str,
    assignees: &str,
) -> Result<(), eyre::Report> {
    let names: Vec<String> = assignees.split(',').map(|name| name.trim().to_owned()).collect();
    let request = NewGenerationConfig::new("Scenario duty", rule, names, parse_date(start)?);
    let config = GenerationConfig::new(request).wrap_err("build scenario duty")?;
    run_async(world.store.save(&config)).wrap_err("store scenario duty")?;
    world.config = Some(config);
    Ok(())
}

#[given(r#"a daily duty starting "{start}" for assignees "{assignees}""#)]
fn daily_duty(world: &mut DutyWorld, start: String, assignees: String) -> Result<(), eyre::Report> {
    register(world, RecurrenceRule::Daily, &start, &assignees)
}

#[given(r#"a weekly duty on weekday {weekday:u8} starting "{start}" for assignees "{assignees}""#)]
fn weekly_duty(
    world: &mut DutyWorld,
    weekday: u8,
    start: String,
    assignees: String,
) -> Result<(), eyre::Report> {
    let rule = RecurrenceRule::from_parts(Frequency::Weekly, Some(weekday), None)
        .wrap_err("build weekly rule")?;
    register(world, rule, &start, &assignees)
}
