//! Recurring compliance task generation.
//!
//! A [`domain::GenerationConfig`] pairs a [`domain::RecurrenceRule`] with a
//! set of assignees and a persisted cursor. The services in [`services`]
//! plan the occurrences that are due, skip the ones that have already been
//! materialised, and hand one task request per assignee per occurrence to an
//! external [`ports::TaskSink`]. Re-running a generation pass never
//! duplicates work and never moves the cursor backwards.
//!
//! The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
