//! Unit tests for recurring task generation.

mod helpers;
mod runner_tests;
