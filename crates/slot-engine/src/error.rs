//! Error types for slot-engine operations.

use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AvailabilityError {
    #[error("Invalid interval: start {start} is not before end {end}")]
    InvalidInterval {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("Invalid duration: {0} minutes (must be positive)")]
    InvalidDuration(i64),

    #[error("Invalid working envelope: start hour {start_hour}, end hour {end_hour} (need 0 <= start < end <= 23)")]
    InvalidEnvelope { start_hour: u32, end_hour: u32 },
}

pub type Result<T> = std::result::Result<T, AvailabilityError>;
