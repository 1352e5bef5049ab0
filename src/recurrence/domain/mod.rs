//! Domain model for recurring task generation.
//!
//! Everything here is pure data and pure calendar arithmetic. Persistence and
//! task delivery live behind the ports.

mod config;
mod error;
mod ids;
mod rule;
mod template;

pub use config::{
    DEFAULT_DAYS_TO_GENERATE_AHEAD, GenerationConfig, MAX_LOOK_AHEAD_DAYS, NewGenerationConfig,
    PersistedConfigData,
};
pub use error::ConfigurationError;
pub use ids::{AssigneeId, ConfigId, TaskHandle};
pub use rule::{DayOfMonth, Frequency, RecurrenceRule};
pub use template::{DATE_PLACEHOLDER, TaskRequest, TaskTemplate, format_occurrence_date};
