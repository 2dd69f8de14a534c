//! Input validation run before data reaches the engine.
//!
//! The engine assumes well-formed input. These checks are the typed
//! counterpart of the request rule lists a schedule or event type must pass
//! before it is stored or used:
//!
//! - the timezone is a known IANA identifier
//! - the weekly schedule has exactly seven entries, one per weekday
//! - every slot ends strictly after it starts
//! - at most one override per date
//! - `available` overrides carry slots, `unavailable` overrides carry none
//! - event durations and slot intervals are positive
//!
//! `HH:MM` syntax is enforced earlier, when a [`WallTime`](crate::schedule::WallTime)
//! is parsed.

use std::collections::HashSet;

use crate::engine::EventTypeConfig;
use crate::error::{EngineError, Result};
use crate::schedule::{AvailabilitySchedule, OverrideKind, TimeSlot};
use crate::tz::parse_timezone;

/// Validate a complete availability schedule.
pub fn validate_schedule(schedule: &AvailabilitySchedule) -> Result<()> {
    parse_timezone(&schedule.timezone)?;

    if schedule.schedule.len() != 7 {
        return Err(EngineError::InvalidInput(format!(
            "schedule must contain exactly 7 days, found {}",
            schedule.schedule.len()
        )));
    }

    let mut seen_days = HashSet::new();
    for entry in &schedule.schedule {
        if !seen_days.insert(entry.day) {
            return Err(EngineError::InvalidWeekday(format!(
                "{} appears more than once",
                entry.day
            )));
        }
        validate_slots(&entry.slots, entry.day.as_str())?;
    }

    let mut seen_dates = HashSet::new();
    for date_override in &schedule.date_overrides {
        if !seen_dates.insert(date_override.date) {
            return Err(EngineError::InvalidDate(format!(
                "more than one override for {}",
                date_override.date
            )));
        }

        let context = date_override.date.to_string();
        match date_override.kind {
            OverrideKind::Available if date_override.slots.is_empty() => {
                return Err(EngineError::InvalidInput(format!(
                    "available override for {} must list at least one slot",
                    context
                )));
            }
            OverrideKind::Unavailable if !date_override.slots.is_empty() => {
                return Err(EngineError::InvalidInput(format!(
                    "unavailable override for {} must not list slots",
                    context
                )));
            }
            _ => validate_slots(&date_override.slots, &context)?,
        }
    }

    Ok(())
}

/// Every slot must end strictly after it starts. `context` names the owning
/// day or date in the error message.
pub fn validate_slots(slots: &[TimeSlot], context: &str) -> Result<()> {
    match slots.iter().find(|slot| slot.start >= slot.end) {
        Some(slot) => Err(EngineError::InvalidTime(format!(
            "{}: slot {} must end after it starts",
            context, slot
        ))),
        None => Ok(()),
    }
}

/// Validate an event type's slot parameters and, when present, its schedule.
pub fn validate_event_type(config: &EventTypeConfig) -> Result<()> {
    if config.duration == 0 {
        return Err(EngineError::InvalidInput(
            "duration must be greater than 0 minutes".to_string(),
        ));
    }
    if config.slot_interval == 0 {
        return Err(EngineError::InvalidInput(
            "slot interval must be greater than 0 minutes".to_string(),
        ));
    }
    match &config.schedule {
        Some(schedule) => validate_schedule(schedule),
        None => Ok(()),
    }
}
