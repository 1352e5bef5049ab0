//! Cadence: recurring compliance task scheduling.
//!
//! Given a recurrence rule, a set of assignees, and a window of time, this
//! crate produces exactly one task-creation request per assignee per
//! scheduled occurrence. Generation passes are safe to re-run, whether from a
//! periodic trigger or on demand: occurrences that were already materialised
//! are detected and never duplicated, and the persisted cursor only moves
//! forward.
//!
//! # Architecture
//!
//! Cadence follows hexagonal architecture principles:
//!
//! - **Domain**: Recurrence rules and calendar arithmetic with no
//!   infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for config storage and task delivery
//! - **Adapters**: In-memory and JSON-file implementations of the ports
//!
//! # Modules
//!
//! - [`recurrence`]: Occurrence planning and idempotent task generation
//! - [`settings`]: Runner limits and policies
//! - [`telemetry`]: Tracing subscriber set-up for hosts

pub mod recurrence;
pub mod settings;
pub mod telemetry;
