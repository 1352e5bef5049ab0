//! Runner settings.
//!
//! Settings are read from an optional JSON document. Every field has a
//! default, so an empty object (or no file at all) yields the standard
//! limits:
//!
//! ```json
//! {
//!   "catch_up_cap": 50,
//!   "on_demand_cap": 10,
//!   "catch_up_min_look_ahead_days": 7,
//!   "partial_coverage": "skip_date",
//!   "on_demand_ignores_lead_time": true
//! }
//! ```

use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8::Dir};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What a run does when only some assignees already have a task for an
/// occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartialCoveragePolicy {
    /// Treat the occurrence as already generated and create nothing.
    #[default]
    SkipDate,
    /// Create tasks for the missing assignees only.
    TopUp,
}

/// Limits and policies applied by the generation runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerSettings {
    /// Maximum occurrences planned per config in a catch-up run.
    pub catch_up_cap: usize,
    /// Maximum occurrences planned per config in an on-demand run.
    pub on_demand_cap: usize,
    /// Minimum look-ahead in days for catch-up runs; a config's lead days
    /// extend it.
    pub catch_up_min_look_ahead_days: u32,
    /// Handling of partially covered occurrences.
    pub partial_coverage: PartialCoveragePolicy,
    /// Lets on-demand runs create tasks for every occurrence inside their
    /// look-ahead, regardless of each config's lead days.
    pub on_demand_ignores_lead_time: bool,
}

impl Default for RunnerSettings {
    fn default() -> Self {
        Self {
            catch_up_cap: 50,
            on_demand_cap: 10,
            catch_up_min_look_ahead_days: 7,
            partial_coverage: PartialCoveragePolicy::SkipDate,
            on_demand_ignores_lead_time: true,
        }
    }
}

/// Errors raised while loading settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The path has no parent directory or file name.
    #[error("invalid settings path: {0}")]
    InvalidPath(String),
    /// The document could not be read.
    #[error("failed to read settings: {0}")]
    Read(#[source] std::io::Error),
    /// The document is not valid settings JSON.
    #[error("failed to parse settings: {0}")]
    Parse(#[source] serde_json::Error),
}

impl RunnerSettings {
    /// Parses settings from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Parse`] when the JSON is malformed.
    pub fn from_json_str(contents: &str) -> Result<Self, SettingsError> {
        serde_json::from_str(contents).map_err(SettingsError::Parse)
    }

    /// Loads settings from the JSON file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] when the file cannot be opened, read or
    /// parsed.
    pub fn load(path: &Utf8Path) -> Result<Self, SettingsError> {
        let file_name = path
            .file_name()
            .ok_or_else(|| SettingsError::InvalidPath(path.to_string()))?;
        let parent = match path.parent() {
            Some(dir) if !dir.as_str().is_empty() => dir,
            _ => Utf8Path::new("."),
        };
        let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(SettingsError::Read)?;
        let contents = dir.read_to_string(file_name).map_err(SettingsError::Read)?;
        Self::from_json_str(&contents)
    }
}
