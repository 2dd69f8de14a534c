//! # slot-engine
//!
//! Bookable time slot computation for scheduling backends.
//!
//! Given a recurring weekly schedule, per-date overrides, an event type's
//! duration/buffer/interval configuration, and the bookings already on the
//! calendar, the engine computes which start/end slots can still be offered on
//! a calendar date. Every function is a pure computation over its arguments:
//! no I/O, no shared state, no ambient "current user".
//!
//! ## Modules
//!
//! - [`schedule`] — Wall-clock times, weekly day schedules, date overrides
//! - [`merge`] — Collapse overlapping availability windows
//! - [`resolve`] — Pick the availability windows that apply to one date
//! - [`engine`] — Step candidate slots through the windows and drop conflicts
//! - [`booking`] — Existing bookings and interval overlap tests
//! - [`validate`] — Input validation run before the engine
//! - [`store`] — Schedule/booking store seams and the availability service
//! - [`tz`] — IANA timezone anchoring of wall-clock times
//! - [`dst`] — Daylight-saving gap policies
//! - [`error`] — Error types

pub mod booking;
pub mod dst;
pub mod engine;
pub mod error;
pub mod merge;
pub mod resolve;
pub mod schedule;
pub mod store;
pub mod tz;
pub mod validate;

pub use booking::{BookingStatus, ExistingBooking, StoredBooking};
pub use dst::DstPolicy;
pub use engine::{
    check_requested_start, day_slots, get_bookable_slots, get_bookable_slots_with_policy,
    DaySlots, EventTypeConfig,
};
pub use error::{EngineError, Result};
pub use merge::merge_overlapping_slots;
pub use resolve::resolve_day_windows;
pub use schedule::{
    AvailabilitySchedule, DateOverride, DayName, OverrideKind, TimeSlot, WallTime,
    WeeklyDaySchedule,
};
pub use store::{AvailabilityService, BookingStore, MemoryStore, ScheduleStore};
