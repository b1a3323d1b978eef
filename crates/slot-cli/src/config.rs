//! `slots` settings: working hours and default durations.
//!
//! The engine takes every parameter explicitly. Defaults live here, loaded from an
//! optional TOML file and overridden by command-line flags.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorkingHours {
    pub start: u32,
    pub end: u32,
}

impl Default for WorkingHours {
    fn default() -> Self {
        Self { start: 9, end: 17 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub working_hours: WorkingHours,
    pub default_duration_minutes: i64,
    /// Grid for suggested start times inside each free slot; unset disables it.
    pub slot_step_minutes: Option<i64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            working_hours: WorkingHours::default(),
            default_duration_minutes: 60,
            slot_step_minutes: None,
        }
    }
}

impl Settings {
    /// Load settings from `path`, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&raw)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }
}
