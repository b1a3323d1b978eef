//! Check a candidate window against existing busy intervals.
//!
//! Conflicts are reported against the raw busy intervals, not the merged blocks,
//! so each reported conflict still corresponds to one external event.
//! Adjacent intervals (where one ends exactly when another starts) are NOT conflicts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::freebusy::normalize;
use crate::interval::Interval;

/// Outcome of a conflict check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityCheck {
    pub is_available: bool,
    /// Busy intervals overlapping the candidate, in input order.
    pub conflicts: Vec<Interval>,
}

impl AvailabilityCheck {
    /// Minutes of `candidate` covered by the conflicts. Overlapping conflicts are
    /// counted once.
    pub fn overlap_minutes(&self, candidate: &Interval) -> i64 {
        let covered: Vec<Interval> = self
            .conflicts
            .iter()
            .filter_map(|c| c.intersection(candidate))
            .collect();
        normalize(&covered)
            .iter()
            .map(Interval::duration_minutes)
            .sum()
    }
}

/// Decide whether `candidate` is free of every busy interval.
///
/// Two intervals overlap when `a.start < b.end && b.start < a.end`.
pub fn check_availability(candidate: &Interval, busy: &[Interval]) -> AvailabilityCheck {
    let conflicts: Vec<Interval> = busy
        .iter()
        .filter(|b| candidate.overlaps(b))
        .copied()
        .collect();

    debug!(
        start = %candidate.start(),
        end = %candidate.end(),
        busy = busy.len(),
        conflicts = conflicts.len(),
        "availability checked"
    );

    AvailabilityCheck {
        is_available: conflicts.is_empty(),
        conflicts,
    }
}

/// Validate raw bounds, then run [`check_availability`].
///
/// # Errors
/// Returns [`AvailabilityError::InvalidInterval`](crate::AvailabilityError::InvalidInterval)
/// when `start >= end`.
pub fn check_availability_between(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    busy: &[Interval],
) -> Result<AvailabilityCheck> {
    let candidate = Interval::new(start, end)?;
    Ok(check_availability(&candidate, busy))
}
