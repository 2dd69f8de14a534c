//! Store seams and the availability service built on them.
//!
//! The engine never loads anything itself. [`ScheduleStore`] and
//! [`BookingStore`] describe what a persistence layer must provide, and
//! [`AvailabilityService`] wires them to the two consumers of the engine: the
//! "available slots" read and the booking-creation check.
//!
//! [`MemoryStore`] implements both traits over in-process maps and is what the
//! CLI and tests use.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, NaiveDate, Utc};

use crate::booking::{BookingStatus, ExistingBooking, StoredBooking};
use crate::dst::DstPolicy;
use crate::engine::{check_requested_start, day_slots, DaySlots, EventTypeConfig};
use crate::error::{EngineError, Result};
use crate::schedule::AvailabilitySchedule;
use crate::tz::{local_date, parse_timezone};

/// Source of availability schedules, keyed by event type.
pub trait ScheduleStore {
    fn load_schedule(&self, event_type_id: &str) -> Option<AvailabilitySchedule>;
}

/// Source of the bookings that occupy an owner's calendar.
pub trait BookingStore {
    /// Non-cancelled bookings that may overlap `date` in any timezone.
    fn load_non_cancelled_bookings(
        &self,
        owner_id: &str,
        date: NaiveDate,
    ) -> Vec<ExistingBooking>;
}

impl<T: ScheduleStore + ?Sized> ScheduleStore for &T {
    fn load_schedule(&self, event_type_id: &str) -> Option<AvailabilitySchedule> {
        (**self).load_schedule(event_type_id)
    }
}

impl<T: ScheduleStore + ?Sized> ScheduleStore for Arc<T> {
    fn load_schedule(&self, event_type_id: &str) -> Option<AvailabilitySchedule> {
        (**self).load_schedule(event_type_id)
    }
}

impl<T: BookingStore + ?Sized> BookingStore for &T {
    fn load_non_cancelled_bookings(
        &self,
        owner_id: &str,
        date: NaiveDate,
    ) -> Vec<ExistingBooking> {
        (**self).load_non_cancelled_bookings(owner_id, date)
    }
}

impl<T: BookingStore + ?Sized> BookingStore for Arc<T> {
    fn load_non_cancelled_bookings(
        &self,
        owner_id: &str,
        date: NaiveDate,
    ) -> Vec<ExistingBooking> {
        (**self).load_non_cancelled_bookings(owner_id, date)
    }
}

// ── AvailabilityService ─────────────────────────────────────────────────────

/// Loads schedules and bookings, then runs the engine on them.
#[derive(Debug, Clone)]
pub struct AvailabilityService<S, B> {
    schedules: S,
    bookings: B,
    policy: DstPolicy,
}

impl<S: ScheduleStore, B: BookingStore> AvailabilityService<S, B> {
    pub fn new(schedules: S, bookings: B) -> Self {
        Self {
            schedules,
            bookings,
            policy: DstPolicy::default(),
        }
    }

    pub fn with_dst_policy(mut self, policy: DstPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Bookable slots of an event type on `date` (schedule-local calendar date).
    ///
    /// The schedule stored for `event_type_id` replaces whatever schedule
    /// `config` carries.
    ///
    /// # Errors
    /// Returns `EngineError::NoSchedule` if no schedule is configured for the
    /// event type.
    pub fn available_slots(
        &self,
        event_type_id: &str,
        owner_id: &str,
        config: &EventTypeConfig,
        date: NaiveDate,
    ) -> Result<DaySlots> {
        let config = self.config_with_schedule(event_type_id, config);
        let existing = self.bookings.load_non_cancelled_bookings(owner_id, date);

        day_slots(&config, date, &existing, self.policy)
            .ok_or_else(|| EngineError::NoSchedule(event_type_id.to_string()))
    }

    /// Check a booking request against freshly computed availability.
    ///
    /// Returns the interval the booking will occupy. This is a read-time check
    /// only; the caller must repeat it inside the write that stores the booking
    /// (see [`MemoryStore::insert_booking_checked`]).
    ///
    /// # Errors
    /// Returns `EngineError::SlotConflict` if the requested start is not offered,
    /// `EngineError::InvalidInput` if it is in the past or not minute-aligned.
    pub fn validate_booking(
        &self,
        event_type_id: &str,
        owner_id: &str,
        config: &EventTypeConfig,
        requested_start: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<ExistingBooking> {
        let config = self.config_with_schedule(event_type_id, config);
        let existing = match &config.schedule {
            Some(schedule) => {
                let tz = parse_timezone(&schedule.timezone)?;
                let date = local_date(&tz, requested_start);
                self.bookings.load_non_cancelled_bookings(owner_id, date)
            }
            None => Vec::new(),
        };

        check_requested_start(&config, requested_start, &existing, now, self.policy)
    }

    fn config_with_schedule(
        &self,
        event_type_id: &str,
        config: &EventTypeConfig,
    ) -> EventTypeConfig {
        EventTypeConfig {
            schedule: self.schedules.load_schedule(event_type_id),
            ..config.clone()
        }
    }
}

// ── MemoryStore ─────────────────────────────────────────────────────────────

/// In-process schedule and booking store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    schedules: RwLock<HashMap<String, AvailabilitySchedule>>,
    bookings: RwLock<Vec<StoredBooking>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_schedule(&self, event_type_id: impl Into<String>, schedule: AvailabilitySchedule) {
        self.schedules
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(event_type_id.into(), schedule);
    }

    /// Store a booking without any availability check.
    pub fn add_booking(&self, booking: StoredBooking) {
        self.bookings
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(booking);
    }

    /// Every stored booking, cancelled ones included.
    pub fn bookings(&self) -> Vec<StoredBooking> {
        self.bookings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Check availability and store the booking under one write lock.
    ///
    /// Holding the lock across check and insert closes the race between two
    /// requests for the same slot: the second one sees the first booking and
    /// gets `SlotConflict`. New bookings start out `unconfirmed`.
    pub fn insert_booking_checked(
        &self,
        event_type_id: &str,
        owner_id: &str,
        config: &EventTypeConfig,
        requested_start: DateTime<Utc>,
        now: DateTime<Utc>,
        policy: DstPolicy,
    ) -> Result<StoredBooking> {
        let mut bookings = self.bookings.write().unwrap_or_else(PoisonError::into_inner);

        let config = EventTypeConfig {
            schedule: self.load_schedule(event_type_id),
            ..config.clone()
        };
        // Every booking of the owner within a day of the request; a superset of
        // what the schedule-local date can overlap.
        let request_date = requested_start.date_naive();
        let existing: Vec<ExistingBooking> = bookings
            .iter()
            .filter(|b| b.owner_id == owner_id && b.status.blocks_time())
            .filter(|b| b.touches_date(request_date))
            .map(StoredBooking::interval)
            .collect();

        let interval = check_requested_start(&config, requested_start, &existing, now, policy)?;

        let stored = StoredBooking {
            owner_id: owner_id.to_string(),
            event_type_id: event_type_id.to_string(),
            start: interval.start,
            end: interval.end,
            status: BookingStatus::Unconfirmed,
        };
        bookings.push(stored.clone());
        tracing::info!(owner_id, event_type_id, start = %stored.start, "booking stored");

        Ok(stored)
    }
}

impl ScheduleStore for MemoryStore {
    fn load_schedule(&self, event_type_id: &str) -> Option<AvailabilitySchedule> {
        self.schedules
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(event_type_id)
            .cloned()
    }
}

impl BookingStore for MemoryStore {
    fn load_non_cancelled_bookings(
        &self,
        owner_id: &str,
        date: NaiveDate,
    ) -> Vec<ExistingBooking> {
        self.bookings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|b| b.owner_id == owner_id && b.status.blocks_time())
            .filter(|b| b.touches_date(date))
            .map(StoredBooking::interval)
            .collect()
    }
}
