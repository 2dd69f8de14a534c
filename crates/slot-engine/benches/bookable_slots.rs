use std::hint::black_box;

use chrono::{NaiveDate, TimeZone, Utc};
use criterion::{criterion_group, criterion_main, Criterion};
use slot_engine::{
    get_bookable_slots, merge_overlapping_slots, AvailabilitySchedule, EventTypeConfig,
    ExistingBooking, TimeSlot,
};

fn busy_day() -> Vec<ExistingBooking> {
    (8..18)
        .step_by(2)
        .map(|hour| {
            ExistingBooking::new(
                Utc.with_ymd_and_hms(2026, 3, 16, hour, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2026, 3, 16, hour, 45, 0).unwrap(),
            )
        })
        .collect()
}

fn bench_bookable_slots(c: &mut Criterion) {
    let schedule = AvailabilitySchedule::weekdays(
        "America/New_York",
        vec![
            TimeSlot::parse("07:00", "12:00").unwrap(),
            TimeSlot::parse("11:30", "19:00").unwrap(),
        ],
    );
    let config = EventTypeConfig::new(30)
        .with_buffers(10, 10)
        .with_slot_interval(5)
        .with_schedule(schedule);
    let date = NaiveDate::from_ymd_opt(2026, 3, 16).unwrap();
    let bookings = busy_day();

    c.bench_function("bookable_slots_busy_weekday", |b| {
        b.iter(|| get_bookable_slots(black_box(&config), date, black_box(&bookings)))
    });
}

fn bench_merge(c: &mut Criterion) {
    let slots: Vec<TimeSlot> = (0..200u32)
        .map(|i| {
            let start = (i * 37) % 1380;
            TimeSlot::new(
                slot_engine::WallTime::from_hm(start / 60, start % 60).unwrap(),
                slot_engine::WallTime::from_hm((start + 45) / 60, (start + 45) % 60).unwrap(),
            )
        })
        .collect();

    c.bench_function("merge_200_slots", |b| {
        b.iter(|| merge_overlapping_slots(black_box(&slots)))
    });
}

criterion_group!(benches, bench_bookable_slots, bench_merge);
criterion_main!(benches);
