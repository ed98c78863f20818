//! Overlap checks between a candidate placement and already-placed items.
//!
//! Intervals are half-open: `[start, start + duration)`. Two intervals that only
//! touch (one ends exactly when the other starts) do not conflict.

use chrono::{DateTime, Duration, Utc};

use crate::task::ScheduledItem;

pub fn overlaps(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && a_end > b_start
}

/// True if `[candidate_start, candidate_start + duration)` overlaps any active item.
pub fn conflicts(
    candidate_start: DateTime<Utc>,
    duration_minutes: u32,
    existing: &[ScheduledItem],
) -> bool {
    conflicting_items(candidate_start, duration_minutes, existing)
        .next()
        .is_some()
}

/// Items blocking the candidate interval. Completed and unplaced items never block.
pub fn conflicting_items<'a>(
    candidate_start: DateTime<Utc>,
    duration_minutes: u32,
    existing: &'a [ScheduledItem],
) -> impl Iterator<Item = &'a ScheduledItem> + 'a {
    let candidate_end = candidate_start + Duration::minutes(duration_minutes as i64);
    existing.iter().filter(move |item| {
        item.active_interval()
            .is_some_and(|(start, end)| overlaps(candidate_start, candidate_end, start, end))
    })
}
