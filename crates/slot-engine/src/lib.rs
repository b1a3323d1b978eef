//! # slot-engine
//!
//! Deterministic availability computation for calendar assistants.
//!
//! Given busy intervals that have already been fetched from a calendar service
//! and resolved to UTC, the engine answers two questions: does a proposed window
//! collide with anything, and which windows of a requested length are still open
//! inside a day's working hours. Every operation is a pure function of its
//! arguments; there is no I/O and no shared state.
//!
//! ## Modules
//!
//! - [`interval`] -- half-open `[start, end)` spans, overlap and ordering
//! - [`envelope`] -- validated working-hours window for one day
//! - [`conflict`] -- check a candidate window against busy intervals
//! - [`freebusy`] -- normalize busy sets and sweep for free slots
//! - [`availability`] -- merge several calendars into one availability view
//! - [`error`] -- Error types

pub mod availability;
pub mod conflict;
pub mod envelope;
pub mod error;
pub mod freebusy;
pub mod interval;

pub use conflict::{check_availability, check_availability_between, AvailabilityCheck};
pub use envelope::WorkingEnvelope;
pub use error::{AvailabilityError, Result};
pub use freebusy::{
    candidate_starts, find_available_slots, find_first_available_slot, normalize, FreeSlot,
};
pub use interval::{compare_by_start, overlaps, Interval};
