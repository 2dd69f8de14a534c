//! Availability schedule data model.
//!
//! Wall-clock times are `HH:MM` strings on the wire and minutes-since-midnight
//! in memory. Because the string form is zero-padded, ordering by minutes is the
//! same as ordering the strings lexicographically.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

// ── WallTime ────────────────────────────────────────────────────────────────

/// A 24-hour wall-clock time with minute precision (`00:00` ..= `23:59`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WallTime(u16);

impl WallTime {
    /// Build a wall-clock time from an hour (0-23) and minute (0-59).
    pub fn from_hm(hour: u32, minute: u32) -> Result<Self> {
        if hour > 23 || minute > 59 {
            return Err(EngineError::InvalidTime(format!(
                "{:02}:{:02} is outside 00:00-23:59",
                hour, minute
            )));
        }
        Ok(Self((hour * 60 + minute) as u16))
    }

    /// Minutes since midnight.
    pub fn minutes(self) -> u16 {
        self.0
    }

    pub fn hour(self) -> u32 {
        u32::from(self.0 / 60)
    }

    pub fn minute(self) -> u32 {
        u32::from(self.0 % 60)
    }

    pub fn to_naive_time(self) -> NaiveTime {
        // Always in range: the constructor bounds the value below 24:00.
        NaiveTime::from_hms_opt(self.hour(), self.minute(), 0).unwrap_or(NaiveTime::MIN)
    }

    /// Truncate a `NaiveTime` to minute precision.
    pub fn from_naive_time(time: NaiveTime) -> Self {
        Self((time.hour() * 60 + time.minute()) as u16)
    }
}

impl FromStr for WallTime {
    type Err = EngineError;

    /// Accepts exactly `^([0-1][0-9]|2[0-3]):[0-5][0-9]$`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || EngineError::InvalidTime(format!("'{}' is not in HH:MM format", s));

        let bytes = s.as_bytes();
        if bytes.len() != 5 || bytes[2] != b':' {
            return Err(invalid());
        }
        let digit = |b: u8| -> Result<u32> {
            if b.is_ascii_digit() {
                Ok(u32::from(b - b'0'))
            } else {
                Err(invalid())
            }
        };
        let hour = digit(bytes[0])? * 10 + digit(bytes[1])?;
        let minute = digit(bytes[3])? * 10 + digit(bytes[4])?;
        Self::from_hm(hour, minute).map_err(|_| invalid())
    }
}

impl TryFrom<String> for WallTime {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<WallTime> for String {
    fn from(value: WallTime) -> Self {
        value.to_string()
    }
}

impl fmt::Display for WallTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

// ── TimeSlot ────────────────────────────────────────────────────────────────

/// A `{start, end}` wall-clock interval.
///
/// Used for the availability windows of a schedule and for the bookable slots
/// the engine returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start: WallTime,
    pub end: WallTime,
}

impl TimeSlot {
    pub fn new(start: WallTime, end: WallTime) -> Self {
        Self { start, end }
    }

    /// Parse a slot from two `HH:MM` strings.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Ok(Self {
            start: start.parse()?,
            end: end.parse()?,
        })
    }

    pub fn duration_minutes(&self) -> i64 {
        i64::from(self.end.minutes()) - i64::from(self.start.minutes())
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

// ── DayName ─────────────────────────────────────────────────────────────────

/// Weekday names as they appear in stored schedules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayName {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl DayName {
    /// All seven days, Sunday first.
    pub const ALL: [DayName; 7] = [
        DayName::Sunday,
        DayName::Monday,
        DayName::Tuesday,
        DayName::Wednesday,
        DayName::Thursday,
        DayName::Friday,
        DayName::Saturday,
    ];

    pub fn of_date(date: NaiveDate) -> Self {
        date.weekday().into()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DayName::Sunday => "Sunday",
            DayName::Monday => "Monday",
            DayName::Tuesday => "Tuesday",
            DayName::Wednesday => "Wednesday",
            DayName::Thursday => "Thursday",
            DayName::Friday => "Friday",
            DayName::Saturday => "Saturday",
        }
    }
}

impl From<Weekday> for DayName {
    fn from(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Sun => DayName::Sunday,
            Weekday::Mon => DayName::Monday,
            Weekday::Tue => DayName::Tuesday,
            Weekday::Wed => DayName::Wednesday,
            Weekday::Thu => DayName::Thursday,
            Weekday::Fri => DayName::Friday,
            Weekday::Sat => DayName::Saturday,
        }
    }
}

impl FromStr for DayName {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        DayName::ALL
            .into_iter()
            .find(|day| day.as_str() == s)
            .ok_or_else(|| EngineError::InvalidWeekday(s.to_string()))
    }
}

impl fmt::Display for DayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Weekly schedule ─────────────────────────────────────────────────────────

/// One weekday's recurring availability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyDaySchedule {
    pub day: DayName,
    pub enabled: bool,
    #[serde(default)]
    pub slots: Vec<TimeSlot>,
}

impl WeeklyDaySchedule {
    pub fn enabled(day: DayName, slots: Vec<TimeSlot>) -> Self {
        Self {
            day,
            enabled: true,
            slots,
        }
    }

    pub fn disabled(day: DayName) -> Self {
        Self {
            day,
            enabled: false,
            slots: Vec::new(),
        }
    }
}

// ── Date overrides ──────────────────────────────────────────────────────────

/// Whether a date override opens specific windows or closes the whole day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverrideKind {
    Available,
    Unavailable,
}

/// Availability for one specific calendar date, replacing the weekly pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateOverride {
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: OverrideKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub slots: Vec<TimeSlot>,
}

impl DateOverride {
    pub fn available(date: NaiveDate, slots: Vec<TimeSlot>) -> Self {
        Self {
            date,
            kind: OverrideKind::Available,
            slots,
        }
    }

    pub fn unavailable(date: NaiveDate) -> Self {
        Self {
            date,
            kind: OverrideKind::Unavailable,
            slots: Vec::new(),
        }
    }
}

// ── AvailabilitySchedule ────────────────────────────────────────────────────

/// A named weekly availability pattern plus date overrides, in one timezone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilitySchedule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub is_default: bool,
    /// IANA timezone identifier every wall-clock time is interpreted in.
    pub timezone: String,
    pub schedule: Vec<WeeklyDaySchedule>,
    #[serde(default)]
    pub date_overrides: Vec<DateOverride>,
}

impl AvailabilitySchedule {
    pub fn new(timezone: impl Into<String>, schedule: Vec<WeeklyDaySchedule>) -> Self {
        Self {
            name: None,
            is_default: false,
            timezone: timezone.into(),
            schedule,
            date_overrides: Vec::new(),
        }
    }

    /// Monday to Friday share `slots`; Saturday and Sunday are disabled.
    pub fn weekdays(timezone: impl Into<String>, slots: Vec<TimeSlot>) -> Self {
        let schedule = DayName::ALL
            .into_iter()
            .map(|day| match day {
                DayName::Saturday | DayName::Sunday => WeeklyDaySchedule::disabled(day),
                _ => WeeklyDaySchedule::enabled(day, slots.clone()),
            })
            .collect();
        Self::new(timezone, schedule)
    }

    pub fn with_override(mut self, date_override: DateOverride) -> Self {
        self.date_overrides.push(date_override);
        self
    }
}
