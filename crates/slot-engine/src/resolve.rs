//! Resolve which availability windows apply to a calendar date.
//!
//! A date override always replaces the weekly pattern for its date; the two are
//! never blended. The windows returned are merged and sorted.

use chrono::NaiveDate;

use crate::merge::merge_overlapping_slots;
use crate::schedule::{
    AvailabilitySchedule, DateOverride, DayName, OverrideKind, TimeSlot, WeeklyDaySchedule,
};

/// Find the weekly entry for `day`, if the schedule has one.
pub fn find_day_schedule(
    schedule: &AvailabilitySchedule,
    day: DayName,
) -> Option<&WeeklyDaySchedule> {
    schedule.schedule.iter().find(|entry| entry.day == day)
}

/// Find the override for `date`. With duplicate overrides the first one wins.
pub fn find_date_override(
    schedule: &AvailabilitySchedule,
    date: NaiveDate,
) -> Option<&DateOverride> {
    schedule.date_overrides.iter().find(|o| o.date == date)
}

/// Availability windows for `date`, a calendar date in the schedule's timezone.
///
/// - An `unavailable` override yields no windows.
/// - An `available` override yields its own slots, merged.
/// - Otherwise the weekday's slots are used, merged, when that day is enabled.
pub fn resolve_day_windows(schedule: &AvailabilitySchedule, date: NaiveDate) -> Vec<TimeSlot> {
    if let Some(date_override) = find_date_override(schedule, date) {
        return match date_override.kind {
            OverrideKind::Unavailable => Vec::new(),
            OverrideKind::Available => merge_overlapping_slots(&date_override.slots),
        };
    }

    match find_day_schedule(schedule, DayName::of_date(date)) {
        Some(day) if day.enabled => merge_overlapping_slots(&day.slots),
        _ => Vec::new(),
    }
}
