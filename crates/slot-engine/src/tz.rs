//! Timezone conversion between schedule-local wall-clock times and UTC instants.

use chrono::{DateTime, Duration, LocalResult, NaiveDate, Offset, TimeZone, Utc};
use chrono_tz::Tz;

use crate::dst::DstPolicy;
use crate::error::{EngineError, Result};
use crate::schedule::WallTime;

/// Parse an IANA timezone identifier (e.g., "America/New_York").
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse()
        .map_err(|_| EngineError::InvalidTimezone(name.to_string()))
}

/// Anchor a wall-clock time on `date` in `tz` to an absolute instant.
///
/// Returns `None` only when the time falls in a DST gap and `policy` is
/// [`DstPolicy::Skip`].
pub fn anchor_wall_time(
    tz: &Tz,
    date: NaiveDate,
    time: WallTime,
    policy: DstPolicy,
) -> Option<DateTime<Utc>> {
    let naive = date.and_time(time.to_naive_time());

    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
        LocalResult::None => match policy {
            DstPolicy::Skip => None,
            DstPolicy::ShiftForward => {
                // Interpret the missing time with the offset in force before the gap.
                let before = tz
                    .offset_from_utc_datetime(&(naive - Duration::days(1)))
                    .fix();
                let utc = naive - Duration::seconds(i64::from(before.local_minus_utc()));
                Some(Utc.from_utc_datetime(&utc))
            }
        },
    }
}

/// Wall-clock time of `instant` in `tz`, truncated to the minute.
pub fn local_wall_time(tz: &Tz, instant: DateTime<Utc>) -> WallTime {
    WallTime::from_naive_time(instant.with_timezone(tz).time())
}

/// Calendar date of `instant` in `tz`.
pub fn local_date(tz: &Tz, instant: DateTime<Utc>) -> NaiveDate {
    instant.with_timezone(tz).date_naive()
}
