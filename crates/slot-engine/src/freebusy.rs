//! Compute free time slots from busy intervals.
//!
//! Clips busy intervals to a working envelope, merges them into disjoint busy
//! blocks, then sweeps the envelope left to right emitting every gap at least as
//! long as the requested duration.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::envelope::WorkingEnvelope;
use crate::error::{AvailabilityError, Result};
use crate::interval::{compare_by_start, Interval};

/// A free time slot inside a working envelope.
///
/// `duration_minutes` is derived from the slot's own bounds, so it may exceed the
/// duration that was asked for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawFreeSlot")]
pub struct FreeSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub duration_minutes: i64,
}

#[derive(Deserialize)]
struct RawFreeSlot {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    duration_minutes: i64,
}

impl TryFrom<RawFreeSlot> for FreeSlot {
    type Error = AvailabilityError;

    /// Bounds must form a valid interval and `duration_minutes` must match them.
    fn try_from(raw: RawFreeSlot) -> Result<Self> {
        let interval = Interval::new(raw.start, raw.end)?;
        if raw.duration_minutes != interval.duration_minutes() {
            return Err(AvailabilityError::InvalidDuration(raw.duration_minutes));
        }
        Ok(FreeSlot::from_gap(raw.start, raw.end))
    }
}

impl FreeSlot {
    fn from_gap(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start,
            end,
            duration_minutes: (end - start).num_minutes(),
        }
    }

    /// The slot as an [`Interval`].
    ///
    /// # Errors
    /// Returns [`AvailabilityError::InvalidInterval`] if the public bounds were
    /// edited into an empty span.
    pub fn interval(&self) -> Result<Interval> {
        Interval::new(self.start, self.end)
    }
}

/// Sort and coalesce busy intervals into a minimal list of disjoint blocks.
///
/// Intervals are ordered by start (ties: shorter first). An interval is folded
/// into the running block when its start is `<=` the block's end, so back-to-back
/// busy time becomes one contiguous block. Merging is more
/// permissive than [`Interval::overlaps`].
///
/// `normalize(&normalize(x)) == normalize(x)`.
pub fn normalize(busy: &[Interval]) -> Vec<Interval> {
    let mut sorted = busy.to_vec();
    sorted.sort_by(compare_by_start);

    let mut merged: Vec<Interval> = Vec::with_capacity(sorted.len());
    for interval in sorted {
        if let Some(last) = merged.last_mut() {
            if interval.start() <= last.end() {
                // Overlapping or adjacent -- extend the current block.
                if interval.end() > last.end() {
                    *last = Interval::new_unchecked(last.start(), interval.end());
                }
                continue;
            }
        }
        merged.push(interval);
    }

    trace!(input = busy.len(), merged = merged.len(), "normalized busy set");
    merged
}

/// Clip busy intervals to `bound` and normalize the survivors.
///
/// Intervals entirely outside `bound`, or touching it only at an edge, are dropped.
pub(crate) fn merge_busy_within(busy: &[Interval], bound: &Interval) -> Vec<Interval> {
    let clipped: Vec<Interval> = busy.iter().filter_map(|b| b.clip_to(bound)).collect();
    normalize(&clipped)
}

/// Positive minute count as a `Duration`; zero, negative and overflowing counts
/// are rejected.
fn positive_minutes(minutes: i64) -> Result<Duration> {
    if minutes <= 0 {
        return Err(AvailabilityError::InvalidDuration(minutes));
    }
    Duration::try_minutes(minutes).ok_or(AvailabilityError::InvalidDuration(minutes))
}

/// Find every free gap of at least `duration_minutes` within `envelope`.
///
/// Gaps longer than requested are returned whole; the caller decides how much of
/// a gap to consume. A gap exactly `duration_minutes` long is included. Busy input
/// may be unsorted, overlapping or duplicated.
///
/// # Errors
/// Returns [`AvailabilityError::InvalidDuration`] when `duration_minutes <= 0`.
pub fn find_available_slots(
    envelope: &WorkingEnvelope,
    duration_minutes: i64,
    busy: &[Interval],
) -> Result<Vec<FreeSlot>> {
    let min_gap = positive_minutes(duration_minutes)?;

    let bound = envelope.interval();
    let merged = merge_busy_within(busy, &bound);

    let mut free_slots = Vec::new();
    let mut cursor = bound.start();

    for block in &merged {
        if block.start() - cursor >= min_gap {
            free_slots.push(FreeSlot::from_gap(cursor, block.start()));
        }
        cursor = cursor.max(block.end());
    }

    // Trailing free slot after the last busy block.
    if bound.end() - cursor >= min_gap {
        free_slots.push(FreeSlot::from_gap(cursor, bound.end()));
    }

    debug!(
        day = %envelope.day(),
        duration_minutes,
        busy = busy.len(),
        blocks = merged.len(),
        slots = free_slots.len(),
        "slot search complete"
    );

    Ok(free_slots)
}

/// Find the first free slot of at least `duration_minutes` within `envelope`.
///
/// Delegates to [`find_available_slots`].
pub fn find_first_available_slot(
    envelope: &WorkingEnvelope,
    duration_minutes: i64,
    busy: &[Interval],
) -> Result<Option<FreeSlot>> {
    Ok(find_available_slots(envelope, duration_minutes, busy)?
        .into_iter()
        .next())
}

/// Alternative start times for a `duration_minutes` meeting inside `slot`.
///
/// Starts at `slot.start` and advances by `step_minutes` while the meeting still
/// ends on or before `slot.end`.
///
/// # Errors
/// Returns [`AvailabilityError::InvalidDuration`] when `duration_minutes` or
/// `step_minutes` is not positive.
pub fn candidate_starts(
    slot: &FreeSlot,
    duration_minutes: i64,
    step_minutes: i64,
) -> Result<Vec<DateTime<Utc>>> {
    let duration = positive_minutes(duration_minutes)?;
    let step = positive_minutes(step_minutes)?;

    let mut starts = Vec::new();
    let mut start = slot.start;
    // Past chrono's range the meeting cannot fit and there is no next start.
    while let Some(end) = start.checked_add_signed(duration) {
        if end > slot.end {
            break;
        }
        starts.push(start);
        match start.checked_add_signed(step) {
            Some(next) => start = next,
            None => break,
        }
    }
    Ok(starts)
}
