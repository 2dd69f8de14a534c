//! Tests for booking overlap checks and the booking-creation availability check.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use slot_engine::booking::{first_conflict, BookingStatus, ExistingBooking, StoredBooking};
use slot_engine::schedule::{
    AvailabilitySchedule, DateOverride, DayName, TimeSlot, WeeklyDaySchedule,
};
use slot_engine::{check_requested_start, DstPolicy, EngineError, EventTypeConfig};

fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

fn slot(start: &str, end: &str) -> TimeSlot {
    TimeSlot::parse(start, end).unwrap()
}

fn now() -> DateTime<Utc> {
    utc(2026, 1, 1, 0, 0)
}

fn office_config(timezone: &str) -> EventTypeConfig {
    EventTypeConfig::new(30)
        .with_slot_interval(30)
        .with_schedule(AvailabilitySchedule::weekdays(timezone, vec![slot("09:00", "12:00")]))
}

// ── Overlap ─────────────────────────────────────────────────────────────────

#[test]
fn overlapping_intervals_detected() {
    let b = ExistingBooking::new(utc(2026, 3, 1, 9, 0), utc(2026, 3, 1, 10, 0));
    assert!(b.overlaps(utc(2026, 3, 1, 9, 30), utc(2026, 3, 1, 10, 30)));
    assert_eq!(
        b.overlap_minutes(utc(2026, 3, 1, 9, 30), utc(2026, 3, 1, 10, 30)),
        30
    );
}

#[test]
fn adjacent_intervals_do_not_overlap() {
    let b = ExistingBooking::new(utc(2026, 3, 1, 9, 0), utc(2026, 3, 1, 10, 0));
    assert!(!b.overlaps(utc(2026, 3, 1, 10, 0), utc(2026, 3, 1, 11, 0)));
    assert!(!b.overlaps(utc(2026, 3, 1, 8, 0), utc(2026, 3, 1, 9, 0)));
    assert_eq!(
        b.overlap_minutes(utc(2026, 3, 1, 10, 0), utc(2026, 3, 1, 11, 0)),
        0
    );
}

#[test]
fn contained_interval_overlaps() {
    let b = ExistingBooking::new(utc(2026, 3, 1, 9, 0), utc(2026, 3, 1, 12, 0));
    assert!(b.overlaps(utc(2026, 3, 1, 10, 0), utc(2026, 3, 1, 10, 15)));
    assert_eq!(
        b.overlap_minutes(utc(2026, 3, 1, 8, 0), utc(2026, 3, 1, 13, 0)),
        180
    );
}

#[test]
fn first_conflict_returns_earliest_listed_match() {
    let bookings = [
        ExistingBooking::new(utc(2026, 3, 1, 8, 0), utc(2026, 3, 1, 8, 30)),
        ExistingBooking::new(utc(2026, 3, 1, 9, 0), utc(2026, 3, 1, 9, 30)),
        ExistingBooking::new(utc(2026, 3, 1, 9, 15), utc(2026, 3, 1, 9, 45)),
    ];
    let hit = first_conflict(&bookings, utc(2026, 3, 1, 9, 10), utc(2026, 3, 1, 9, 20)).unwrap();
    assert_eq!(*hit, bookings[1]);
    assert!(first_conflict(&bookings, utc(2026, 3, 1, 10, 0), utc(2026, 3, 1, 11, 0)).is_none());
}

// ── Stored bookings ─────────────────────────────────────────────────────────

#[test]
fn only_cancelled_bookings_free_their_time() {
    assert!(BookingStatus::Upcoming.blocks_time());
    assert!(BookingStatus::Unconfirmed.blocks_time());
    assert!(BookingStatus::Recurring.blocks_time());
    assert!(BookingStatus::Past.blocks_time());
    assert!(!BookingStatus::Cancelled.blocks_time());
}

#[test]
fn stored_booking_touches_neighbouring_dates() {
    let stored = StoredBooking {
        owner_id: "trainer-1".to_string(),
        event_type_id: "intro".to_string(),
        start: utc(2026, 3, 16, 23, 0),
        end: utc(2026, 3, 16, 23, 30),
        status: BookingStatus::Upcoming,
    };
    let date = |d| NaiveDate::from_ymd_opt(2026, 3, d).unwrap();
    assert!(stored.touches_date(date(15)));
    assert!(stored.touches_date(date(16)));
    assert!(stored.touches_date(date(17)));
    assert!(!stored.touches_date(date(14)));
    assert!(!stored.touches_date(date(19)));
}

#[test]
fn stored_booking_json_shape() {
    let json = r#"{"ownerId": "t1", "eventTypeId": "e1",
                  "start": "2026-03-16T09:00:00Z", "end": "2026-03-16T09:30:00Z",
                  "status": "cancelled"}"#;
    let stored: StoredBooking = serde_json::from_str(json).unwrap();
    assert_eq!(stored.status, BookingStatus::Cancelled);
    assert_eq!(stored.interval().end - stored.interval().start, Duration::minutes(30));
}

// ── check_requested_start ───────────────────────────────────────────────────

#[test]
fn offered_start_is_accepted_and_returns_interval() {
    let cfg = office_config("UTC");
    let start = utc(2026, 3, 16, 9, 30);

    let interval = check_requested_start(&cfg, start, &[], now(), DstPolicy::default()).unwrap();

    assert_eq!(interval.start, start);
    assert_eq!(interval.end, utc(2026, 3, 16, 10, 0));
}

#[test]
fn booked_start_is_a_slot_conflict() {
    let cfg = office_config("UTC");
    let existing = [ExistingBooking::new(utc(2026, 3, 16, 9, 30), utc(2026, 3, 16, 10, 0))];

    let err = check_requested_start(
        &cfg,
        utc(2026, 3, 16, 9, 30),
        &existing,
        now(),
        DstPolicy::default(),
    )
    .unwrap_err();

    assert_eq!(
        err,
        EngineError::SlotConflict {
            requested: "2026-03-16 09:30".to_string()
        }
    );
}

#[test]
fn start_off_the_interval_grid_is_a_slot_conflict() {
    let cfg = office_config("UTC");
    let err = check_requested_start(&cfg, utc(2026, 3, 16, 9, 10), &[], now(), DstPolicy::default())
        .unwrap_err();
    assert!(matches!(err, EngineError::SlotConflict { .. }));
}

#[test]
fn start_outside_availability_is_a_slot_conflict() {
    let cfg = office_config("UTC");
    // 2026-03-21 is a Saturday.
    let err = check_requested_start(&cfg, utc(2026, 3, 21, 9, 0), &[], now(), DstPolicy::default())
        .unwrap_err();
    assert!(matches!(err, EngineError::SlotConflict { .. }));
}

#[test]
fn past_start_is_invalid_input() {
    let cfg = office_config("UTC");
    let start = utc(2026, 3, 16, 9, 0);

    let err = check_requested_start(&cfg, start, &[], start, DstPolicy::default()).unwrap_err();

    assert!(matches!(err, EngineError::InvalidInput(_)));
}

#[test]
fn start_with_seconds_is_invalid_input() {
    let cfg = office_config("UTC");
    let start = utc(2026, 3, 16, 9, 0) + Duration::seconds(30);

    let err = check_requested_start(&cfg, start, &[], now(), DstPolicy::default()).unwrap_err();

    assert!(matches!(err, EngineError::InvalidInput(_)));
}

#[test]
fn missing_schedule_accepts_any_future_start() {
    let cfg = EventTypeConfig::new(45);
    let start = utc(2026, 3, 21, 3, 17);

    let interval = check_requested_start(&cfg, start, &[], now(), DstPolicy::default()).unwrap();

    assert_eq!(interval.end - interval.start, Duration::minutes(45));
}

#[test]
fn requested_start_is_matched_in_schedule_local_time() {
    // 13:30Z is 09:30 in New York on 2026-03-16.
    let cfg = office_config("America/New_York");
    let policy = DstPolicy::default();
    assert!(check_requested_start(&cfg, utc(2026, 3, 16, 13, 30), &[], now(), policy).is_ok());
    // 09:30Z is 05:30 local, outside the window.
    assert!(check_requested_start(&cfg, utc(2026, 3, 16, 9, 30), &[], now(), policy).is_err());
}

#[test]
fn schedule_local_date_decides_the_weekday() {
    // Tuesdays only, Tokyo. 2026-03-16T23:00Z is Tuesday 2026-03-17 08:00 JST.
    let schedule = AvailabilitySchedule::new(
        "Asia/Tokyo",
        DayName::ALL
            .into_iter()
            .map(|day| match day {
                DayName::Tuesday => WeeklyDaySchedule::enabled(day, vec![slot("08:00", "10:00")]),
                _ => WeeklyDaySchedule::disabled(day),
            })
            .collect(),
    );
    let cfg = EventTypeConfig::new(60).with_schedule(schedule);

    let result =
        check_requested_start(&cfg, utc(2026, 3, 16, 23, 0), &[], now(), DstPolicy::default());

    assert!(result.is_ok(), "{:?}", result);
}

#[test]
fn unknown_schedule_timezone_is_reported() {
    let cfg = office_config("Nowhere/Special");
    let err = check_requested_start(&cfg, utc(2026, 3, 16, 9, 0), &[], now(), DstPolicy::default())
        .unwrap_err();
    assert_eq!(err, EngineError::InvalidTimezone("Nowhere/Special".to_string()));
}

// ── DST ─────────────────────────────────────────────────────────────────────

/// New York, 2026-11-01 (clocks fall back at 02:00 EDT), 00:00-03:00 local.
fn fall_back_config() -> EventTypeConfig {
    let date = NaiveDate::from_ymd_opt(2026, 11, 1).unwrap();
    let schedule = AvailabilitySchedule::new("America/New_York", Vec::new())
        .with_override(DateOverride::available(date, vec![slot("00:00", "03:00")]));
    EventTypeConfig::new(30)
        .with_slot_interval(30)
        .with_schedule(schedule)
}

#[test]
fn booked_second_occurrence_of_fall_back_hour_is_a_conflict() {
    // 06:00Z is 01:00 EST; 05:00Z is the free 01:00 EDT with the same label.
    let cfg = fall_back_config();
    let existing = [ExistingBooking::new(utc(2026, 11, 1, 6, 0), utc(2026, 11, 1, 6, 30))];
    let policy = DstPolicy::default();

    let err = check_requested_start(&cfg, utc(2026, 11, 1, 6, 0), &existing, now(), policy)
        .unwrap_err();

    assert_eq!(
        err,
        EngineError::SlotConflict {
            requested: "2026-11-01 01:00".to_string()
        }
    );
    let interval =
        check_requested_start(&cfg, utc(2026, 11, 1, 5, 0), &existing, now(), policy).unwrap();
    assert_eq!(interval.start, utc(2026, 11, 1, 5, 0));
}

#[test]
fn repeated_fall_back_label_is_only_bookable_at_its_offered_instant() {
    // 01:30 is offered as 05:30Z (EDT); 06:30Z (EST) carries the same label but
    // is not an offered slot.
    let cfg = fall_back_config();
    let policy = DstPolicy::default();

    assert!(check_requested_start(&cfg, utc(2026, 11, 1, 5, 30), &[], now(), policy).is_ok());
    let err =
        check_requested_start(&cfg, utc(2026, 11, 1, 6, 30), &[], now(), policy).unwrap_err();
    assert!(matches!(err, EngineError::SlotConflict { .. }));
}
