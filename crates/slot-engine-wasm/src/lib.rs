//! WASM bindings for slot-engine.
//!
//! Exposes bookable slot computation, window resolution, booking checks, and
//! schedule validation to JavaScript via `wasm-bindgen`. Schedules, event types,
//! and bookings cross the boundary as JSON strings in the same camelCase shape
//! the Rust types serialize to.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p slot-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target nodejs --out-dir packages/slot-engine-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/slot_engine_wasm.wasm
//! # Rename .js -> .cjs for ESM compatibility
//! mv packages/slot-engine-js/wasm/slot_engine_wasm.js \
//!    packages/slot-engine-js/wasm/slot_engine_wasm.cjs
//! ```

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use slot_engine::{AvailabilitySchedule, DstPolicy, EventTypeConfig, ExistingBooking, TimeSlot};
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

/// Input format for bookings passed from JavaScript.
#[derive(Deserialize)]
struct BookingInput {
    start: String,
    end: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BookingCheckDto {
    available: bool,
    start: String,
    end: String,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse an ISO 8601 datetime string into `DateTime<Utc>`.
///
/// Accepts RFC 3339 (e.g., "2026-03-16T13:00:00Z") and naive datetimes
/// (e.g., "2026-03-16T13:00:00"), which are interpreted as UTC.
fn parse_datetime(s: &str) -> Result<DateTime<Utc>, JsValue> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .map(|ndt| ndt.and_utc())
        .map_err(|e| JsValue::from_str(&format!("Invalid datetime '{}': {}", s, e)))
}

fn parse_date(s: &str) -> Result<NaiveDate, JsValue> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| JsValue::from_str(&format!("Invalid date '{}': {}", s, e)))
}

/// Convert a JSON array of `{start, end}` objects into `Vec<ExistingBooking>`.
fn parse_bookings_json(json: &str) -> Result<Vec<ExistingBooking>, JsValue> {
    let inputs: Vec<BookingInput> = serde_json::from_str(json)
        .map_err(|e| JsValue::from_str(&format!("Invalid bookings JSON: {}", e)))?;

    inputs
        .into_iter()
        .map(|input| {
            let start = parse_datetime(&input.start)?;
            let end = parse_datetime(&input.end)?;
            Ok(ExistingBooking::new(start, end))
        })
        .collect()
}

fn parse_event_type_json(json: &str) -> Result<EventTypeConfig, JsValue> {
    serde_json::from_str(json)
        .map_err(|e| JsValue::from_str(&format!("Invalid event type JSON: {}", e)))
}

fn parse_schedule_json(json: &str) -> Result<AvailabilitySchedule, JsValue> {
    serde_json::from_str(json)
        .map_err(|e| JsValue::from_str(&format!("Invalid schedule JSON: {}", e)))
}

/// `"shift-forward"` (the default when omitted) or `"skip"`.
fn parse_dst_policy(policy: Option<String>) -> Result<DstPolicy, JsValue> {
    match policy {
        None => Ok(DstPolicy::default()),
        Some(name) => serde_json::from_value(serde_json::Value::String(name.clone()))
            .map_err(|_| JsValue::from_str(&format!("Unknown DST policy '{}'", name))),
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

fn engine_error(e: slot_engine::EngineError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Compute the bookable slots of an event type on one date.
///
/// Returns a JSON string `{date, timezone, slots}` where `slots` is an array of
/// `{start, end}` wall-clock `HH:MM` pairs in the schedule's timezone.
///
/// # Arguments
/// - `event_type_json` -- `{duration, beforeBuffer?, afterBuffer?, slotInterval?, schedule}`
/// - `date` -- calendar date in the schedule's timezone (e.g., "2026-03-16")
/// - `bookings_json` -- JSON array of non-cancelled `{start, end}` bookings
/// - `dst_policy` -- optional `"shift-forward"` or `"skip"`
#[wasm_bindgen(js_name = "getBookableSlots")]
pub fn get_bookable_slots(
    event_type_json: &str,
    date: &str,
    bookings_json: &str,
    dst_policy: Option<String>,
) -> Result<String, JsValue> {
    let config = parse_event_type_json(event_type_json)?;
    slot_engine::validate::validate_event_type(&config).map_err(engine_error)?;
    let date = parse_date(date)?;
    let bookings = parse_bookings_json(bookings_json)?;
    let policy = parse_dst_policy(dst_policy)?;

    let result = slot_engine::day_slots(&config, date, &bookings, policy).ok_or_else(|| {
        engine_error(slot_engine::EngineError::NoSchedule(
            "event type has no schedule".to_string(),
        ))
    })?;

    to_json(&result)
}

/// Resolve the merged availability windows a schedule offers on a date.
///
/// Returns a JSON array of `{start, end}` objects; empty for a disabled day or
/// an `unavailable` override.
#[wasm_bindgen(js_name = "resolveDayWindows")]
pub fn resolve_day_windows(schedule_json: &str, date: &str) -> Result<String, JsValue> {
    let schedule = parse_schedule_json(schedule_json)?;
    let date = parse_date(date)?;

    to_json(&slot_engine::resolve_day_windows(&schedule, date))
}

/// Merge overlapping or touching `{start, end}` slots.
///
/// Returns the merged slots as a JSON array sorted by start.
#[wasm_bindgen(js_name = "mergeOverlappingSlots")]
pub fn merge_overlapping_slots(slots_json: &str) -> Result<String, JsValue> {
    let slots: Vec<TimeSlot> = serde_json::from_str(slots_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid slots JSON: {}", e)))?;

    to_json(&slot_engine::merge_overlapping_slots(&slots))
}

/// Check that a booking may start at `requested_start`.
///
/// Returns `{available: true, start, end}` with RFC 3339 datetimes, or throws
/// when the start is in the past or no longer offered.
#[wasm_bindgen(js_name = "checkRequestedStart")]
pub fn check_requested_start(
    event_type_json: &str,
    requested_start: &str,
    bookings_json: &str,
    now: &str,
    dst_policy: Option<String>,
) -> Result<String, JsValue> {
    let config = parse_event_type_json(event_type_json)?;
    let start = parse_datetime(requested_start)?;
    let bookings = parse_bookings_json(bookings_json)?;
    let now = parse_datetime(now)?;
    let policy = parse_dst_policy(dst_policy)?;

    let interval = slot_engine::check_requested_start(&config, start, &bookings, now, policy)
        .map_err(engine_error)?;

    to_json(&BookingCheckDto {
        available: true,
        start: interval.start.to_rfc3339(),
        end: interval.end.to_rfc3339(),
    })
}

/// Validate an availability schedule.
///
/// Returns `true` when valid, or throws with the first problem found.
#[wasm_bindgen(js_name = "validateSchedule")]
pub fn validate_schedule(schedule_json: &str) -> Result<bool, JsValue> {
    let schedule = parse_schedule_json(schedule_json)?;
    slot_engine::validate::validate_schedule(&schedule).map_err(engine_error)?;
    Ok(true)
}
