//! Step definitions for recurring generation scenarios.

mod given;
mod then;
mod when;
pub mod world;
