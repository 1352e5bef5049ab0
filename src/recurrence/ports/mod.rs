//! Port contracts for recurring task generation.
//!
//! Ports define infrastructure-agnostic interfaces used by the generation
//! services: where configs are stored and where tasks are delivered.

pub mod config_store;
pub mod task_sink;

pub use config_store::{ConfigStore, ConfigStoreError, ConfigStoreResult};
pub use task_sink::{TaskSink, TaskSinkError, TaskSinkResult};

#[cfg(test)]
pub use task_sink::MockTaskSink;
