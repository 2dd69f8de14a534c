//! Tests for resolving the availability windows of a calendar date.

use chrono::NaiveDate;
use slot_engine::resolve::{find_date_override, find_day_schedule, resolve_day_windows};
use slot_engine::schedule::{
    AvailabilitySchedule, DateOverride, DayName, TimeSlot, WeeklyDaySchedule,
};

fn slot(start: &str, end: &str) -> TimeSlot {
    TimeSlot::parse(start, end).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Weekdays 09:00-17:00, weekend off.
fn office_hours() -> AvailabilitySchedule {
    AvailabilitySchedule::weekdays("UTC", vec![slot("09:00", "17:00")])
}

fn monday() -> NaiveDate {
    date(2026, 3, 16)
}

fn saturday() -> NaiveDate {
    date(2026, 3, 21)
}

#[test]
fn enabled_weekday_uses_weekly_slots() {
    let windows = resolve_day_windows(&office_hours(), monday());
    assert_eq!(windows, vec![slot("09:00", "17:00")]);
}

#[test]
fn disabled_weekday_yields_no_windows() {
    assert!(resolve_day_windows(&office_hours(), saturday()).is_empty());
}

#[test]
fn missing_weekday_entry_yields_no_windows() {
    let schedule = AvailabilitySchedule::new(
        "UTC",
        vec![WeeklyDaySchedule::enabled(DayName::Tuesday, vec![slot("09:00", "10:00")])],
    );
    assert!(resolve_day_windows(&schedule, monday()).is_empty());
}

#[test]
fn unavailable_override_wins_over_enabled_weekday() {
    let schedule = office_hours().with_override(DateOverride::unavailable(monday()));
    assert!(resolve_day_windows(&schedule, monday()).is_empty());
}

#[test]
fn available_override_replaces_weekly_slots() {
    let schedule = office_hours().with_override(DateOverride::available(
        monday(),
        vec![slot("13:00", "15:00")],
    ));
    // No blending with the weekly 09:00-17:00.
    assert_eq!(
        resolve_day_windows(&schedule, monday()),
        vec![slot("13:00", "15:00")]
    );
}

#[test]
fn available_override_opens_disabled_day() {
    let schedule = office_hours().with_override(DateOverride::available(
        saturday(),
        vec![slot("10:00", "12:00")],
    ));
    assert_eq!(
        resolve_day_windows(&schedule, saturday()),
        vec![slot("10:00", "12:00")]
    );
}

#[test]
fn override_slots_are_merged() {
    let schedule = office_hours().with_override(DateOverride::available(
        monday(),
        vec![slot("09:30", "11:00"), slot("09:00", "10:00")],
    ));
    assert_eq!(
        resolve_day_windows(&schedule, monday()),
        vec![slot("09:00", "11:00")]
    );
}

#[test]
fn weekly_slots_are_merged() {
    let schedule = AvailabilitySchedule::weekdays(
        "UTC",
        vec![slot("13:00", "17:00"), slot("09:00", "12:00"), slot("12:00", "13:00")],
    );
    assert_eq!(
        resolve_day_windows(&schedule, monday()),
        vec![slot("09:00", "17:00")]
    );
}

#[test]
fn override_for_other_date_is_ignored() {
    let schedule = office_hours().with_override(DateOverride::unavailable(date(2026, 3, 17)));
    assert_eq!(
        resolve_day_windows(&schedule, monday()),
        vec![slot("09:00", "17:00")]
    );
}

#[test]
fn first_duplicate_override_wins() {
    let schedule = office_hours()
        .with_override(DateOverride::available(monday(), vec![slot("08:00", "09:00")]))
        .with_override(DateOverride::unavailable(monday()));
    assert_eq!(
        resolve_day_windows(&schedule, monday()),
        vec![slot("08:00", "09:00")]
    );
}

#[test]
fn lookups_find_entries() {
    let schedule = office_hours().with_override(DateOverride::unavailable(monday()));

    let monday_schedule = find_day_schedule(&schedule, DayName::Monday).unwrap();
    assert!(monday_schedule.enabled);
    assert!(find_date_override(&schedule, monday()).is_some());
    assert!(find_date_override(&schedule, date(2026, 3, 17)).is_none());
}
