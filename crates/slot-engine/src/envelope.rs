//! Working-hours envelope bounding a free-slot search.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AvailabilityError, Result};
use crate::interval::Interval;

const MAX_HOUR: u32 = 23;

/// A single day's working hours, `[day start_hour:00, day end_hour:00)` in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawEnvelope")]
pub struct WorkingEnvelope {
    day: NaiveDate,
    start_hour: u32,
    end_hour: u32,
}

#[derive(Deserialize)]
struct RawEnvelope {
    day: NaiveDate,
    start_hour: u32,
    end_hour: u32,
}

impl TryFrom<RawEnvelope> for WorkingEnvelope {
    type Error = AvailabilityError;

    fn try_from(raw: RawEnvelope) -> Result<Self> {
        WorkingEnvelope::new(raw.day, raw.start_hour, raw.end_hour)
    }
}

impl WorkingEnvelope {
    /// # Errors
    /// Returns [`AvailabilityError::InvalidEnvelope`] if either hour is above 23
    /// or `start_hour >= end_hour`.
    pub fn new(day: NaiveDate, start_hour: u32, end_hour: u32) -> Result<Self> {
        if start_hour > MAX_HOUR || end_hour > MAX_HOUR || start_hour >= end_hour {
            return Err(AvailabilityError::InvalidEnvelope {
                start_hour,
                end_hour,
            });
        }
        Ok(Self {
            day,
            start_hour,
            end_hour,
        })
    }

    pub fn day(&self) -> NaiveDate {
        self.day
    }

    pub fn start_hour(&self) -> u32 {
        self.start_hour
    }

    pub fn end_hour(&self) -> u32 {
        self.end_hour
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.at_hour(self.start_hour)
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.at_hour(self.end_hour)
    }

    /// The envelope as a plain interval.
    pub fn interval(&self) -> Interval {
        Interval::new_unchecked(self.start(), self.end())
    }

    fn at_hour(&self, hour: u32) -> DateTime<Utc> {
        // `new` keeps hours within 0..=23, so this never wraps past midnight.
        let time = NaiveTime::MIN + Duration::hours(i64::from(hour));
        self.day.and_time(time).and_utc()
    }
}
