//! DST transition policies for anchoring wall-clock windows.

use serde::{Deserialize, Serialize};

/// Policy for window boundaries that fall inside a spring-forward gap
/// (e.g., 02:30 on the night clocks jump from 02:00 to 03:00).
///
/// Times that occur twice on a fall-back night always resolve to the earlier
/// instant; the policy only decides what happens to times that never occur.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DstPolicy {
    /// Move the time forward by the length of the gap (02:30 becomes 03:30).
    #[default]
    ShiftForward,
    /// Drop any window whose start or end does not exist on that date.
    Skip,
}
