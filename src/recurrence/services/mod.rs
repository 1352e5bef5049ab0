//! Application services for recurring task generation.

mod error;
mod generator;
mod guard;
mod outcome;
mod planner;
mod runner;
mod trace;

pub use error::{GenerationError, GenerationResult};
pub use generator::{GeneratedTask, TaskGenerator};
pub use guard::{Coverage, DuplicateGuard};
pub use outcome::{ConfigRunOutcome, OnDemandOutcome, OnDemandReport, RunStop, RunTarget};
pub use planner::{OccurrencePlan, PlanLimits, PlanStop, plan_occurrences};
pub use runner::GenerationRunner;
pub use trace::RunTrace;
