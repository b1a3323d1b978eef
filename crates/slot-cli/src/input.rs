//! Read exported calendar events into busy intervals.
//!
//! Accepts either a bare JSON array of events or a calendar listing shaped like
//! `{"items": [...]}`. Each event needs `start` and `end`; extra fields are
//! ignored. A bound is an RFC 3339 string, a naive `YYYY-MM-DDTHH:MM:SS` string
//! (read as UTC), or an object carrying `dateTime` or `date`. All-day events
//! (date-only bounds) do not block working hours and are skipped.

use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use slot_engine::Interval;
use tracing::{debug, warn};

#[derive(Deserialize)]
#[serde(untagged)]
enum EventDocument {
    List(Vec<RawEvent>),
    Listing { items: Vec<RawEvent> },
}

#[derive(Deserialize)]
struct RawEvent {
    #[serde(default)]
    id: Option<String>,
    start: RawBound,
    end: RawBound,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawBound {
    Text(String),
    Object {
        #[serde(rename = "dateTime", default)]
        date_time: Option<String>,
        #[serde(default)]
        date: Option<String>,
    },
}

impl RawBound {
    /// The timed instant, or `None` for a date-only (all-day) bound.
    fn instant(&self) -> Result<Option<DateTime<Utc>>> {
        match self {
            RawBound::Text(s) => parse_datetime(s).map(Some),
            RawBound::Object {
                date_time: Some(s), ..
            } => parse_datetime(s).map(Some),
            RawBound::Object {
                date_time: None,
                date: Some(_),
            } => Ok(None),
            RawBound::Object {
                date_time: None,
                date: None,
            } => bail!("bound has neither dateTime nor date"),
        }
    }
}

/// Parse an ISO 8601 datetime string into `DateTime<Utc>`.
///
/// Accepts RFC 3339 (with offset, e.g. "2026-02-17T14:00:00+05:30") and naive
/// datetimes (e.g. "2026-02-17T14:00:00"), which are interpreted as UTC.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|ndt| ndt.and_utc())
        .map_err(|e| anyhow!("Invalid datetime '{}': {}", s, e))
}

/// Parse an event document into busy intervals, in input order.
pub fn parse_busy(json: &str) -> Result<Vec<Interval>> {
    let document: EventDocument =
        serde_json::from_str(json).context("Expected a JSON array of events or {\"items\": [...]}")?;
    let events = match document {
        EventDocument::List(events) | EventDocument::Listing { items: events } => events,
    };

    let mut busy = Vec::with_capacity(events.len());
    for (index, event) in events.iter().enumerate() {
        let label = event
            .id
            .clone()
            .unwrap_or_else(|| format!("#{}", index));
        let start = event
            .start
            .instant()
            .with_context(|| format!("Event {}: bad start", label))?;
        let end = event
            .end
            .instant()
            .with_context(|| format!("Event {}: bad end", label))?;

        match (start, end) {
            (Some(start), Some(end)) => {
                let interval =
                    Interval::new(start, end).with_context(|| format!("Event {}", label))?;
                busy.push(interval);
            }
            _ => warn!(event = %label, "skipping all-day event"),
        }
    }

    debug!(events = events.len(), busy = busy.len(), "parsed busy intervals");
    Ok(busy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn offsets_are_resolved_to_utc() {
        let dt = parse_datetime("2026-03-02T14:30:00+05:30").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap());
    }

    #[test]
    fn naive_datetime_read_as_utc() {
        let dt = parse_datetime("2026-03-02T09:00:00").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap());
        assert!(parse_datetime("tomorrow at nine").is_err());
    }

    #[test]
    fn calendar_listing_skips_all_day_events() {
        let json = r#"{"items": [
            {"id": "standup", "summary": "Standup",
             "start": {"dateTime": "2026-03-02T09:00:00Z"},
             "end": {"dateTime": "2026-03-02T09:15:00Z"}},
            {"id": "holiday",
             "start": {"date": "2026-03-02"},
             "end": {"date": "2026-03-03"}}
        ]}"#;

        let busy = parse_busy(json).unwrap();
        assert_eq!(busy.len(), 1);
        assert_eq!(busy[0].duration_minutes(), 15);
    }

    #[test]
    fn reversed_event_is_an_error() {
        let json = r#"[{"start": "2026-03-02T11:00:00Z", "end": "2026-03-02T10:00:00Z"}]"#;
        let err = parse_busy(json).unwrap_err();
        assert!(format!("{:#}", err).contains("Invalid interval"));
    }
}
