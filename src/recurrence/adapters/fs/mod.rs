//! JSON-file adapters rooted in a capability directory.
//!
//! Both adapters keep their whole data set in a single JSON document and
//! replace it atomically on every write (write to a temporary sibling, then
//! rename). Writes are serialised within a process; cross-process locking is
//! left to the host.
//!
//! File I/O is synchronous and runs directly inside the `async fn`s of the
//! port traits, blocking the calling runtime worker for the duration of each
//! read or write. That suits the command-line host, which processes one
//! config at a time; hosts serving concurrent requests should wrap these
//! adapters in `tokio::task::spawn_blocking` or use another store.

mod config_store;
mod document;
mod task_sink;

pub use config_store::JsonFileConfigStore;
pub use task_sink::{JsonFileTaskSink, TaskRecord};
