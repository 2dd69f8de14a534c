//! Collapse overlapping availability windows.
//!
//! Sorts windows by start time, then sweeps once, folding each window into the
//! running block when it starts at or before the block's end. Adjacent windows
//! (one ends exactly when the next starts) collapse into one continuous block.

use crate::schedule::TimeSlot;

/// Merge overlapping or adjacent wall-clock slots.
///
/// Returns a sorted, non-overlapping list covering exactly the same minutes as
/// the input. A slot contained in an earlier one is absorbed without shrinking
/// the block. O(n log n).
pub fn merge_overlapping_slots(slots: &[TimeSlot]) -> Vec<TimeSlot> {
    let mut sorted = slots.to_vec();
    sorted.sort_by_key(|slot| slot.start);

    let mut merged: Vec<TimeSlot> = Vec::with_capacity(sorted.len());
    for slot in sorted {
        if let Some(last) = merged.last_mut() {
            if slot.start <= last.end {
                last.end = last.end.max(slot.end);
                continue;
            }
        }
        merged.push(slot);
    }

    merged
}
