//! Half-open time spans over absolute UTC instants.
//!
//! An [`Interval`] covers `[start, end)`. An interval ending exactly when another
//! begins does NOT overlap it, so back-to-back meetings are compatible.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AvailabilityError, Result};

/// A non-empty `[start, end)` span of time.
///
/// Fields are private: the only way to obtain an `Interval` is through
/// [`Interval::new`] (or deserialization, which goes through the same check),
/// so `start < end` always holds.
///
/// The derived ordering compares `start` first and breaks ties by `end`
/// ascending, which is exactly [`compare_by_start`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawInterval")]
pub struct Interval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

#[derive(Deserialize)]
struct RawInterval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TryFrom<RawInterval> for Interval {
    type Error = AvailabilityError;

    fn try_from(raw: RawInterval) -> Result<Self> {
        Interval::new(raw.start, raw.end)
    }
}

impl Interval {
    /// Build an interval, rejecting zero or negative spans.
    ///
    /// # Errors
    /// Returns [`AvailabilityError::InvalidInterval`] when `start >= end`. The
    /// bounds are never swapped.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if start >= end {
            return Err(AvailabilityError::InvalidInterval { start, end });
        }
        Ok(Self { start, end })
    }

    /// Caller guarantees `start < end`.
    pub(crate) fn new_unchecked(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        debug_assert!(start < end, "interval bounds out of order");
        Self { start, end }
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Length of the interval in whole minutes (truncated).
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// True iff the two spans share at least one instant.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// The common part of two overlapping intervals, or `None` if they are
    /// disjoint or merely adjacent.
    pub fn intersection(&self, other: &Interval) -> Option<Interval> {
        if !self.overlaps(other) {
            return None;
        }
        Some(Interval {
            start: self.start.max(other.start),
            end: self.end.min(other.end),
        })
    }

    /// Truncate this interval to `bound`.
    ///
    /// Returns `None` when nothing of positive width remains, which includes an
    /// interval that only touches `bound` at one of its edges.
    pub fn clip_to(&self, bound: &Interval) -> Option<Interval> {
        self.intersection(bound)
    }
}

/// Overlap predicate for half-open intervals: `a.start < b.end && b.start < a.end`.
pub fn overlaps(a: &Interval, b: &Interval) -> bool {
    a.overlaps(b)
}

/// Total order by `start`, ties broken by `end` ascending (shorter first).
pub fn compare_by_start(a: &Interval, b: &Interval) -> Ordering {
    a.start.cmp(&b.start).then(a.end.cmp(&b.end))
}
