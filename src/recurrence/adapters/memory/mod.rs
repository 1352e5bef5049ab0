//! In-memory adapters for tests and embedding hosts.

mod config_store;
mod task_sink;

pub use config_store::InMemoryConfigStore;
pub use task_sink::{InMemoryTaskSink, StoredTask};
