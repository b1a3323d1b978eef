//! Property-based tests for the interval model and availability engine.
//!
//! These tests verify invariants that should hold for *any* busy set, not just
//! the worked examples in `freebusy_tests.rs` and `conflict_tests.rs`.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use slot_engine::{
    candidate_starts, check_availability, find_available_slots, normalize, overlaps, Interval,
    WorkingEnvelope,
};

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn midnight() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap()
}

/// An interval starting somewhere in a 36-hour span around 2026-03-02, on a
/// 5-minute grid so that back-to-back and exact-fit cases come up often.
fn arb_interval() -> impl Strategy<Value = Interval> {
    (0i64..=(36 * 12), 1i64..=48).prop_map(|(start_step, len_steps)| {
        let start = midnight() - Duration::hours(6) + Duration::minutes(start_step * 5);
        let end = start + Duration::minutes(len_steps * 5);
        Interval::new(start, end).unwrap()
    })
}

fn arb_busy_set() -> impl Strategy<Value = Vec<Interval>> {
    prop::collection::vec(arb_interval(), 0..16)
}

fn arb_envelope() -> impl Strategy<Value = WorkingEnvelope> {
    (0u32..23)
        .prop_flat_map(|start| (Just(start), (start + 1)..=23))
        .prop_map(|(start, end)| {
            WorkingEnvelope::new(NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(), start, end)
                .unwrap()
        })
}

fn arb_duration() -> impl Strategy<Value = i64> {
    prop_oneof![Just(60i64), 5i64..=240]
}

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Interval model
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn overlap_is_symmetric(a in arb_interval(), b in arb_interval()) {
        prop_assert_eq!(overlaps(&a, &b), overlaps(&b, &a));
    }

    #[test]
    fn interval_overlaps_itself(a in arb_interval()) {
        prop_assert!(overlaps(&a, &a));
    }
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn normalize_is_idempotent(busy in arb_busy_set()) {
        let once = normalize(&busy);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn normalized_blocks_are_sorted_and_separated(busy in arb_busy_set()) {
        let merged = normalize(&busy);
        for pair in merged.windows(2) {
            // Strictly after: adjacent blocks would have been coalesced.
            prop_assert!(pair[0].end() < pair[1].start());
        }
    }

    #[test]
    fn normalized_blocks_cover_every_input(busy in arb_busy_set()) {
        let merged = normalize(&busy);
        for b in &busy {
            prop_assert!(
                merged.iter().any(|m| m.start() <= b.start() && b.end() <= m.end()),
                "{:?} not covered by {:?}", b, merged
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Conflict check soundness
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn conflicts_are_exactly_the_overlapping_raw_intervals(
        candidate in arb_interval(),
        busy in arb_busy_set(),
    ) {
        let check = check_availability(&candidate, &busy);
        let expected: Vec<Interval> =
            busy.iter().filter(|b| overlaps(&candidate, b)).copied().collect();

        prop_assert_eq!(check.is_available, expected.is_empty());
        prop_assert_eq!(check.conflicts, expected);
    }
}

// ---------------------------------------------------------------------------
// Slot search
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn slots_are_free_long_enough_and_inside_envelope(
        envelope in arb_envelope(),
        duration in arb_duration(),
        busy in arb_busy_set(),
    ) {
        let slots = find_available_slots(&envelope, duration, &busy).unwrap();

        for slot in &slots {
            prop_assert!(envelope.start() <= slot.start && slot.end <= envelope.end());
            prop_assert!(slot.duration_minutes >= duration);
            prop_assert_eq!(slot.duration_minutes, (slot.end - slot.start).num_minutes());

            let interval = slot.interval().unwrap();
            prop_assert!(check_availability(&interval, &busy).is_available);
        }
        for pair in slots.windows(2) {
            prop_assert!(pair[0].end < pair[1].start);
        }
    }

    #[test]
    fn slots_are_maximal(
        envelope in arb_envelope(),
        duration in arb_duration(),
        busy in arb_busy_set(),
    ) {
        // A slot cannot be extended: each edge is the envelope edge or busy time.
        let slots = find_available_slots(&envelope, duration, &busy).unwrap();
        let merged = normalize(&busy);

        for slot in &slots {
            prop_assert!(
                slot.start == envelope.start() || merged.iter().any(|b| b.end() == slot.start)
            );
            prop_assert!(
                slot.end == envelope.end() || merged.iter().any(|b| b.start() == slot.end)
            );
        }
    }

    #[test]
    fn empty_busy_set_yields_whole_envelope(envelope in arb_envelope()) {
        let minutes = envelope.interval().duration_minutes();
        let slots = find_available_slots(&envelope, minutes, &[]).unwrap();

        prop_assert_eq!(slots.len(), 1);
        prop_assert_eq!(slots[0].start, envelope.start());
        prop_assert_eq!(slots[0].end, envelope.end());
        prop_assert_eq!(slots[0].duration_minutes, minutes);
    }

    #[test]
    fn candidate_starts_fit_inside_slot(
        envelope in arb_envelope(),
        duration in arb_duration(),
        step in 5i64..=60,
        busy in arb_busy_set(),
    ) {
        for slot in find_available_slots(&envelope, duration, &busy).unwrap() {
            let starts = candidate_starts(&slot, duration, step).unwrap();
            prop_assert!(!starts.is_empty());
            prop_assert_eq!(starts[0], slot.start);
            for start in starts {
                prop_assert!(start + Duration::minutes(duration) <= slot.end);
            }
        }
    }
}
