//! Bookable slot generation.
//!
//! For every availability window that applies to a date, a cursor steps forward
//! from the window start in `slot_interval` increments. Each position yields a
//! candidate `[t, t + duration)` that must fit inside the window. The candidate
//! is widened by the event type's buffers and dropped when the widened interval
//! overlaps an existing booking. Buffers never widen the stored bookings.
//!
//! The engine never fails on missing configuration: no schedule, a disabled
//! day, or an `unavailable` override all produce an empty slot list.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::booking::{first_conflict, ExistingBooking};
use crate::dst::DstPolicy;
use crate::error::{EngineError, Result};
use crate::resolve::resolve_day_windows;
use crate::schedule::{AvailabilitySchedule, TimeSlot, WallTime};
use crate::tz::{anchor_wall_time, local_date, local_wall_time, parse_timezone};

/// Step between candidate start times when an event type does not set one.
pub const DEFAULT_SLOT_INTERVAL: u32 = 15;

fn default_slot_interval() -> u32 {
    DEFAULT_SLOT_INTERVAL
}

/// The parts of an event type that shape its bookable slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTypeConfig {
    /// Length of one booking, in minutes.
    pub duration: u32,
    /// Idle minutes required before a booking.
    #[serde(default)]
    pub before_buffer: u32,
    /// Idle minutes required after a booking.
    #[serde(default)]
    pub after_buffer: u32,
    /// Minutes between consecutive candidate start times.
    #[serde(default = "default_slot_interval")]
    pub slot_interval: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<AvailabilitySchedule>,
}

impl EventTypeConfig {
    pub fn new(duration: u32) -> Self {
        Self {
            duration,
            before_buffer: 0,
            after_buffer: 0,
            slot_interval: DEFAULT_SLOT_INTERVAL,
            schedule: None,
        }
    }

    pub fn with_buffers(mut self, before: u32, after: u32) -> Self {
        self.before_buffer = before;
        self.after_buffer = after;
        self
    }

    pub fn with_slot_interval(mut self, interval: u32) -> Self {
        self.slot_interval = interval;
        self
    }

    pub fn with_schedule(mut self, schedule: AvailabilitySchedule) -> Self {
        self.schedule = Some(schedule);
        self
    }
}

/// Bookable slots for one date, shaped like the "available slots" response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySlots {
    pub date: NaiveDate,
    pub timezone: String,
    pub slots: Vec<TimeSlot>,
}

/// Compute the bookable slots for `date` using the default [`DstPolicy`].
///
/// `date` is a calendar date in the schedule's timezone. `existing` holds the
/// non-cancelled bookings covering that date, in UTC.
pub fn get_bookable_slots(
    config: &EventTypeConfig,
    date: NaiveDate,
    existing: &[ExistingBooking],
) -> Vec<TimeSlot> {
    get_bookable_slots_with_policy(config, date, existing, DstPolicy::default())
}

/// Compute the bookable slots for `date`, resolving DST gaps with `policy`.
///
/// Identical to [`get_bookable_slots`] but lets the caller choose how window
/// boundaries that do not exist on a spring-forward date are handled.
///
/// Slots come back in chronological order, formatted as wall-clock `HH:MM` in
/// the schedule's timezone. Each slot is exactly `duration` minutes long.
///
/// On a fall-back date a wall-clock start can occur twice. A candidate whose
/// local start is not after the last emitted start is dropped, so every start
/// label is offered at most once and the output is strictly increasing.
pub fn get_bookable_slots_with_policy(
    config: &EventTypeConfig,
    date: NaiveDate,
    existing: &[ExistingBooking],
    policy: DstPolicy,
) -> Vec<TimeSlot> {
    offered_slots(config, date, existing, policy)
        .into_iter()
        .map(|(_, slot)| slot)
        .collect()
}

/// Bookable slots paired with the absolute instant each one starts at.
fn offered_slots(
    config: &EventTypeConfig,
    date: NaiveDate,
    existing: &[ExistingBooking],
    policy: DstPolicy,
) -> Vec<(DateTime<Utc>, TimeSlot)> {
    let Some(schedule) = config.schedule.as_ref() else {
        tracing::debug!(%date, "event type has no availability schedule");
        return Vec::new();
    };

    // Validation rejects these; guard anyway so a zero step can never spin.
    if config.duration == 0 || config.slot_interval == 0 {
        tracing::warn!(
            duration = config.duration,
            slot_interval = config.slot_interval,
            "duration and slot interval must be positive; no slots generated"
        );
        return Vec::new();
    }

    let tz = match parse_timezone(&schedule.timezone) {
        Ok(tz) => tz,
        Err(err) => {
            tracing::warn!(error = %err, "schedule timezone not recognised; no slots generated");
            return Vec::new();
        }
    };

    let windows = resolve_day_windows(schedule, date);
    let duration = Duration::minutes(i64::from(config.duration));
    let step = Duration::minutes(i64::from(config.slot_interval));
    let before = Duration::minutes(i64::from(config.before_buffer));
    let after = Duration::minutes(i64::from(config.after_buffer));

    let mut slots = Vec::new();
    let mut last_start: Option<WallTime> = None;
    let mut rejected = 0usize;
    let mut repeated = 0usize;

    for window in &windows {
        let bounds = (
            anchor_wall_time(&tz, date, window.start, policy),
            anchor_wall_time(&tz, date, window.end, policy),
        );
        let (Some(window_start), Some(window_end)) = bounds else {
            tracing::debug!(%date, %window, "window boundary falls in a DST gap; skipped");
            continue;
        };

        let mut cursor: DateTime<Utc> = window_start;
        while cursor + duration <= window_end {
            let end = cursor + duration;
            let local_start = local_wall_time(&tz, cursor);

            if last_start.is_some_and(|last| local_start <= last) {
                tracing::trace!(
                    candidate = %cursor,
                    %local_start,
                    "wall-clock start repeats after a DST fall-back; skipped"
                );
                repeated += 1;
            } else if let Some(conflict) = first_conflict(existing, cursor - before, end + after) {
                tracing::trace!(
                    candidate = %cursor,
                    booking_start = %conflict.start,
                    booking_end = %conflict.end,
                    "candidate overlaps an existing booking"
                );
                rejected += 1;
            } else {
                slots.push((cursor, TimeSlot::new(local_start, local_wall_time(&tz, end))));
                last_start = Some(local_start);
            }

            cursor += step;
        }
    }

    tracing::debug!(
        %date,
        timezone = %schedule.timezone,
        windows = windows.len(),
        slots = slots.len(),
        rejected,
        repeated,
        "computed bookable slots"
    );

    slots
}

/// Bookable slots for `date` together with the date and schedule timezone.
///
/// Returns `None` when the event type has no schedule.
pub fn day_slots(
    config: &EventTypeConfig,
    date: NaiveDate,
    existing: &[ExistingBooking],
    policy: DstPolicy,
) -> Option<DaySlots> {
    let schedule = config.schedule.as_ref()?;
    Some(DaySlots {
        date,
        timezone: schedule.timezone.clone(),
        slots: get_bookable_slots_with_policy(config, date, existing, policy),
    })
}

/// Check that a booking may start at `requested_start`.
///
/// Re-runs slot generation on the schedule-local date of `requested_start` and
/// accepts the request only when a freshly computed slot starts at that exact
/// instant. Matching on instants rather than wall-clock labels keeps the two
/// occurrences of a fall-back hour apart. On success returns the interval the
/// new booking will occupy.
///
/// An event type without a schedule accepts any future start.
///
/// # Errors
/// Returns `EngineError::InvalidInput` if the start is not after `now` or is not
/// on a whole minute.
/// Returns `EngineError::InvalidTimezone` if the schedule's timezone is unknown.
/// Returns `EngineError::SlotConflict` if the requested slot is not offered.
pub fn check_requested_start(
    config: &EventTypeConfig,
    requested_start: DateTime<Utc>,
    existing: &[ExistingBooking],
    now: DateTime<Utc>,
    policy: DstPolicy,
) -> Result<ExistingBooking> {
    if requested_start <= now {
        return Err(EngineError::InvalidInput(
            "the booking time must be in the future".to_string(),
        ));
    }
    if requested_start.timestamp().rem_euclid(60) != 0
        || requested_start.timestamp_subsec_nanos() != 0
    {
        return Err(EngineError::InvalidInput(format!(
            "booking start {} must fall on a whole minute",
            requested_start.to_rfc3339()
        )));
    }

    let requested = ExistingBooking::new(
        requested_start,
        requested_start + Duration::minutes(i64::from(config.duration)),
    );

    let Some(schedule) = config.schedule.as_ref() else {
        tracing::debug!(
            start = %requested_start,
            "no schedule configured; availability not checked"
        );
        return Ok(requested);
    };

    let tz = parse_timezone(&schedule.timezone)?;
    let date = local_date(&tz, requested_start);
    let local_start = local_wall_time(&tz, requested_start);

    let offered = offered_slots(config, date, existing, policy);
    if offered.iter().any(|(start, _)| *start == requested_start) {
        Ok(requested)
    } else {
        tracing::info!(%date, start = %local_start, "requested slot is not available");
        Err(EngineError::SlotConflict {
            requested: format!("{} {}", date, local_start),
        })
    }
}
