//! Existing bookings and the interval overlap test used for conflict exclusion.
//!
//! Two intervals conflict when `a.start < b.end && b.start < a.end`.
//! Adjacent intervals (one ends exactly when the other starts) do NOT conflict.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// An occupied interval on the calendar, in absolute time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistingBooking {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ExistingBooking {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Whether `[start, end)` strictly intersects this booking.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        start < self.end && end > self.start
    }

    /// Minutes shared with `[start, end)`, or 0 when the intervals do not overlap.
    pub fn overlap_minutes(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
        if !self.overlaps(start, end) {
            return 0;
        }
        (self.end.min(end) - self.start.max(start)).num_minutes()
    }
}

/// Return the first booking that strictly overlaps `[start, end)`.
pub fn first_conflict(
    bookings: &[ExistingBooking],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Option<&ExistingBooking> {
    bookings.iter().find(|b| b.overlaps(start, end))
}

/// Lifecycle state of a stored booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    Upcoming,
    Unconfirmed,
    Recurring,
    Past,
    Cancelled,
}

impl BookingStatus {
    /// Cancelled bookings no longer occupy their interval.
    pub fn blocks_time(self) -> bool {
        self != BookingStatus::Cancelled
    }
}

/// A booking as a store keeps it: owner, event type, interval, status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredBooking {
    pub owner_id: String,
    pub event_type_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub status: BookingStatus,
}

impl StoredBooking {
    pub fn interval(&self) -> ExistingBooking {
        ExistingBooking::new(self.start, self.end)
    }

    /// Whether this booking can occupy any part of `date` in some timezone.
    ///
    /// Covers `[date - 1 day, date + 2 days)` in UTC, which spans every offset
    /// between UTC-14 and UTC+14.
    pub fn touches_date(&self, date: NaiveDate) -> bool {
        let day_start = date.and_time(NaiveTime::MIN).and_utc();
        let from = day_start - Duration::days(1);
        let until = day_start + Duration::days(2);
        self.interval().overlaps(from, until)
    }
}
