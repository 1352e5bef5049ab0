//! Adapter implementations of the recurrence ports.

pub mod fs;
pub mod memory;
