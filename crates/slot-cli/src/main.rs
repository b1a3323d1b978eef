//! `slots` CLI -- conflict checks and free-slot search over exported calendar events.
//!
//! ## Usage
//!
//! ```sh
//! # Is 15:00-16:00 free? (events JSON on stdin)
//! slots check --start 2026-03-02T15:00:00Z --end 2026-03-02T16:00:00Z < events.json
//!
//! # Free 60-minute windows between 09:00 and 17:00
//! slots find --date 2026-03-02 --duration 60 -i events.json
//!
//! # Same, with suggested start times every 30 minutes
//! slots find --date 2026-03-02 --step 30 -i events.json
//!
//! # Merged busy blocks
//! slots normalize -i events.json
//!
//! # Unified availability across several calendars
//! slots merge --date 2026-03-02 -i work.json -i personal.json --privacy full
//! ```
//!
//! Results are written to stdout as JSON; logs go to stderr (`RUST_LOG` or
//! `--verbose`).

use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use slot_engine::availability::{merge_calendars, BusyCalendar, PrivacyLevel};
use slot_engine::{FreeSlot, WorkingEnvelope};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod config;
mod input;

use config::Settings;

#[derive(Parser)]
#[command(
    name = "slots",
    version,
    about = "Check calendar conflicts and find free time slots"
)]
struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// TOML settings file (working hours, default duration, step)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether a time window conflicts with any event
    Check {
        /// Window start (RFC 3339, or naive datetime read as UTC)
        #[arg(long, value_parser = parse_instant)]
        start: DateTime<Utc>,
        /// Window end (RFC 3339, or naive datetime read as UTC)
        #[arg(long, value_parser = parse_instant)]
        end: DateTime<Utc>,
        /// Events file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
    /// Find free slots within working hours on one day
    Find {
        #[command(flatten)]
        window: WindowArgs,
        /// Suggest start times every N minutes inside each slot
        #[arg(long)]
        step: Option<i64>,
        /// Events file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
    /// Print the merged, sorted busy blocks
    Normalize {
        /// Events file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
    /// Merge several calendars into one availability view
    Merge {
        #[command(flatten)]
        window: WindowArgs,
        /// Events file per calendar; the file stem is the calendar id
        #[arg(short, long = "input", required = true)]
        inputs: Vec<PathBuf>,
        /// How much per-block source information to reveal
        #[arg(long, value_enum, default_value_t = Privacy::Opaque)]
        privacy: Privacy,
    },
}

#[derive(clap::Args)]
struct WindowArgs {
    /// Day to search (YYYY-MM-DD, UTC)
    #[arg(long)]
    date: NaiveDate,
    /// First working hour (overrides config)
    #[arg(long)]
    start_hour: Option<u32>,
    /// End of working hours (overrides config)
    #[arg(long)]
    end_hour: Option<u32>,
    /// Minimum slot length in minutes (overrides config)
    #[arg(short, long)]
    duration: Option<i64>,
}

impl WindowArgs {
    fn resolve(&self, settings: &Settings) -> Result<(WorkingEnvelope, i64)> {
        let start_hour = self.start_hour.unwrap_or(settings.working_hours.start);
        let end_hour = self.end_hour.unwrap_or(settings.working_hours.end);
        let envelope = WorkingEnvelope::new(self.date, start_hour, end_hour)
            .context("Bad working hours")?;
        let duration = self.duration.unwrap_or(settings.default_duration_minutes);
        Ok((envelope, duration))
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Privacy {
    Full,
    Opaque,
}

impl From<Privacy> for PrivacyLevel {
    fn from(p: Privacy) -> Self {
        match p {
            Privacy::Full => PrivacyLevel::Full,
            Privacy::Opaque => PrivacyLevel::Opaque,
        }
    }
}

/// A free slot plus its suggested start times, when a step is configured.
#[derive(Serialize)]
struct SlotReport {
    #[serde(flatten)]
    slot: FreeSlot,
    #[serde(skip_serializing_if = "Option::is_none")]
    candidate_starts: Option<Vec<DateTime<Utc>>>,
}

fn parse_instant(s: &str) -> Result<DateTime<Utc>, String> {
    input::parse_datetime(s).map_err(|e| e.to_string())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = Settings::load(cli.config.as_deref())?;
    debug!(?settings, "settings loaded");

    match cli.command {
        Commands::Check { start, end, input } => {
            let busy = input::parse_busy(&read_input(input.as_deref())?)?;
            let check = slot_engine::check_availability_between(start, end, &busy)
                .context("Bad time window")?;
            if check.is_available {
                info!(%start, %end, "time slot is available");
            } else {
                info!(%start, %end, conflicts = check.conflicts.len(), "time slot has conflicts");
            }
            print_json(&check)?;
        }
        Commands::Find {
            window,
            step,
            input,
        } => {
            let (envelope, duration) = window.resolve(&settings)?;
            let busy = input::parse_busy(&read_input(input.as_deref())?)?;
            let slots = slot_engine::find_available_slots(&envelope, duration, &busy)
                .context("Slot search failed")?;
            info!(
                day = %envelope.day(),
                duration,
                found = slots.len(),
                "found available slots"
            );

            let step = step.or(settings.slot_step_minutes);
            let reports = slots
                .into_iter()
                .map(|slot| -> Result<SlotReport> {
                    let candidate_starts = step
                        .map(|step| slot_engine::candidate_starts(&slot, duration, step))
                        .transpose()
                        .context("Bad --step")?;
                    Ok(SlotReport {
                        slot,
                        candidate_starts,
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            print_json(&reports)?;
        }
        Commands::Normalize { input } => {
            let busy = input::parse_busy(&read_input(input.as_deref())?)?;
            print_json(&slot_engine::normalize(&busy))?;
        }
        Commands::Merge {
            window,
            inputs,
            privacy,
        } => {
            let (envelope, duration) = window.resolve(&settings)?;
            let calendars = inputs
                .iter()
                .map(|path| -> Result<BusyCalendar> {
                    Ok(BusyCalendar {
                        calendar_id: calendar_id(path),
                        busy: input::parse_busy(&read_input(Some(path))?)?,
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            let unified = merge_calendars(&calendars, &envelope, duration, privacy.into())
                .context("Merge failed")?;
            print_json(&unified)?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn calendar_id(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display())),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let pretty = serde_json::to_string_pretty(value)?;
    println!("{}", pretty);
    Ok(())
}
