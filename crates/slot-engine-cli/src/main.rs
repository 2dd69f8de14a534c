//! `slots` CLI — compute, resolve, and check bookable time slots from JSON.
//!
//! ## Usage
//!
//! ```sh
//! # Bookable slots for the date in the request (stdin → stdout)
//! cat request.json | slots slots
//!
//! # Same request, different date, written to a file
//! slots slots -i request.json --date 2026-03-17 -o slots.json
//!
//! # Availability windows a schedule resolves to on a date
//! slots windows -i schedule.json --date 2026-03-16
//!
//! # Check a booking start against freshly computed availability
//! slots check -i request.json --start 2026-03-16T13:30:00Z
//!
//! # Validate a schedule before storing it
//! slots validate -i schedule.json
//! ```
//!
//! A slot request is a JSON object:
//!
//! ```json
//! {
//!   "date": "2026-03-16",
//!   "eventType": {"duration": 30, "beforeBuffer": 10, "schedule": {...}},
//!   "bookings": [{"start": "2026-03-16T13:00:00Z", "end": "2026-03-16T13:30:00Z"}]
//! }
//! ```

mod config;

use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use slot_engine::validate::{validate_event_type, validate_schedule};
use slot_engine::{
    check_requested_start, day_slots, resolve_day_windows, AvailabilitySchedule, EventTypeConfig,
    ExistingBooking, TimeSlot,
};
use tracing_subscriber::EnvFilter;

use crate::config::Config;

#[derive(Parser)]
#[command(
    name = "slots",
    version,
    about = "Bookable time slot computation from availability schedules"
)]
struct Cli {
    /// Enable debug logging on stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to a TOML config file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute bookable slots for a slot request
    Slots {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Calendar date in the schedule's timezone (overrides the request's date)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Show the merged availability windows of a schedule on a date
    Windows {
        /// Schedule JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Calendar date in the schedule's timezone
        #[arg(long)]
        date: NaiveDate,
    },
    /// Check whether a booking may start at a given instant
    Check {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Requested start as an RFC 3339 timestamp
        #[arg(long)]
        start: DateTime<Utc>,
        /// Reference "now" as an RFC 3339 timestamp (defaults to the system clock)
        #[arg(long)]
        now: Option<DateTime<Utc>>,
    },
    /// Validate an availability schedule
    Validate {
        /// Schedule JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
}

/// A slot computation request as read from JSON.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SlotRequest {
    date: Option<NaiveDate>,
    event_type: EventTypeConfig,
    #[serde(default)]
    bookings: Vec<ExistingBooking>,
}

#[derive(Serialize)]
struct WindowsOutput {
    date: NaiveDate,
    day: String,
    windows: Vec<TimeSlot>,
}

#[derive(Serialize)]
struct CheckOutput {
    available: bool,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load_from(cli.config.as_deref()).context("Failed to load configuration")?;
    init_tracing(cli.verbose, &config);
    tracing::debug!(?config, "loaded configuration");

    match cli.command {
        Commands::Slots { input, output, date } => {
            let request = read_request(input.as_deref())?;
            validate_event_type(&request.event_type).context("Invalid event type")?;

            let date = date
                .or(request.date)
                .context("No date given: pass --date or set \"date\" in the request")?;
            let result = day_slots(&request.event_type, date, &request.bookings, config.dst_policy)
                .context("No availability schedule configured for this event type")?;

            write_output(output.as_deref(), &to_json(&result, config.pretty)?)?;
        }
        Commands::Windows { input, date } => {
            let schedule = read_schedule(input.as_deref())?;
            validate_schedule(&schedule).context("Invalid schedule")?;

            let result = WindowsOutput {
                date,
                day: slot_engine::DayName::of_date(date).to_string(),
                windows: resolve_day_windows(&schedule, date),
            };
            write_output(None, &to_json(&result, config.pretty)?)?;
        }
        Commands::Check { input, start, now } => {
            let request = read_request(input.as_deref())?;
            validate_event_type(&request.event_type).context("Invalid event type")?;

            let now = now.unwrap_or_else(Utc::now);
            let interval = check_requested_start(
                &request.event_type,
                start,
                &request.bookings,
                now,
                config.dst_policy,
            )?;

            let result = CheckOutput {
                available: true,
                start: interval.start,
                end: interval.end,
            };
            write_output(None, &to_json(&result, config.pretty)?)?;
        }
        Commands::Validate { input } => {
            let schedule = read_schedule(input.as_deref())?;
            validate_schedule(&schedule).context("Invalid schedule")?;
            println!("Schedule is valid");
        }
    }

    Ok(())
}

/// Install the stderr log subscriber. `RUST_LOG` wins over the config filter;
/// `--verbose` wins over both.
fn init_tracing(verbose: bool, config: &Config) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn read_request(path: Option<&str>) -> Result<SlotRequest> {
    let json = read_input(path)?;
    serde_json::from_str(&json).context("Failed to parse slot request JSON")
}

fn read_schedule(path: Option<&str>) -> Result<AvailabilitySchedule> {
    let json = read_input(path)?;
    serde_json::from_str(&json).context("Failed to parse schedule JSON")
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json + "\n")
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
