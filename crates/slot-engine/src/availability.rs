//! Multi-calendar availability merging with privacy-preserving output.
//!
//! Accepts busy intervals from N calendars, merges them into unified busy blocks
//! within a working envelope, and computes the free slots left over. A privacy
//! level controls whether per-block source counts are exposed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::envelope::WorkingEnvelope;
use crate::error::Result;
use crate::freebusy::{self, FreeSlot};
use crate::interval::Interval;

/// Busy intervals fetched from a single calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusyCalendar {
    /// Opaque identifier for this calendar (e.g., "primary", "team-offsite").
    pub calendar_id: String,
    pub busy: Vec<Interval>,
}

/// Privacy level for availability output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrivacyLevel {
    /// Show time ranges and source count per busy block.
    Full,
    /// Show only busy/free time ranges. `source_count` is 0 for every block.
    #[default]
    Opaque,
}

/// A merged busy span across one or more calendars.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusyBlock {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Number of calendars with busy time inside this block.
    /// Set to 0 when privacy is `Opaque`.
    pub source_count: usize,
}

/// Unified availability after merging N calendars.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnifiedAvailability {
    /// Merged busy blocks (sorted by start, disjoint).
    pub busy: Vec<BusyBlock>,
    /// Free slots of at least the requested duration.
    pub free: Vec<FreeSlot>,
    pub envelope: WorkingEnvelope,
    pub privacy: PrivacyLevel,
}

fn flatten(calendars: &[BusyCalendar]) -> Vec<Interval> {
    calendars
        .iter()
        .flat_map(|c| c.busy.iter().copied())
        .collect()
}

/// Merge N calendars into unified availability within `envelope`.
///
/// Busy intervals from every calendar are clipped to the envelope and merged into
/// disjoint busy blocks. Free slots are identical to running
/// [`freebusy::find_available_slots`] over the flattened busy set.
///
/// # Errors
/// Returns [`AvailabilityError::InvalidDuration`](crate::AvailabilityError::InvalidDuration)
/// when `duration_minutes <= 0`.
pub fn merge_calendars(
    calendars: &[BusyCalendar],
    envelope: &WorkingEnvelope,
    duration_minutes: i64,
    privacy: PrivacyLevel,
) -> Result<UnifiedAvailability> {
    let all_busy = flatten(calendars);
    let free = freebusy::find_available_slots(envelope, duration_minutes, &all_busy)?;

    let bound = envelope.interval();
    let merged = freebusy::merge_busy_within(&all_busy, &bound);

    let busy = merged
        .iter()
        .map(|block| BusyBlock {
            start: block.start(),
            end: block.end(),
            source_count: match privacy {
                PrivacyLevel::Full => count_sources(calendars, block, &bound),
                PrivacyLevel::Opaque => 0,
            },
        })
        .collect();

    debug!(
        calendars = calendars.len(),
        blocks = merged.len(),
        free = free.len(),
        ?privacy,
        "merged calendars"
    );

    Ok(UnifiedAvailability {
        busy,
        free,
        envelope: *envelope,
        privacy,
    })
}

/// First free slot of at least `duration_minutes` across all calendars.
pub fn find_first_available_across(
    calendars: &[BusyCalendar],
    envelope: &WorkingEnvelope,
    duration_minutes: i64,
) -> Result<Option<FreeSlot>> {
    freebusy::find_first_available_slot(envelope, duration_minutes, &flatten(calendars))
}

/// How many calendars have at least one busy interval, clipped to the
/// envelope, overlapping `block`.
fn count_sources(calendars: &[BusyCalendar], block: &Interval, bound: &Interval) -> usize {
    calendars
        .iter()
        .filter(|calendar| {
            calendar
                .busy
                .iter()
                .filter_map(|b| b.clip_to(bound))
                .any(|b| b.overlaps(block))
        })
        .count()
}
