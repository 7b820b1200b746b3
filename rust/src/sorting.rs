//! Timeline ordering.
//!
//! Entries are ordered by earliest start; entries starting together keep the
//! order in which their tasks were declared in the manifest.

use std::cmp::Ordering;

use crate::models::ScheduleEntry;

/// Sort key for a timeline entry.
///
/// Implements `Ord` so entries can be sorted (lower = earlier in the timeline).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineKey {
    pub earliest_start: i64,
    /// Position of the task in the manifest.
    pub manifest_index: usize,
}

impl Ord for TimelineKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.earliest_start
            .cmp(&other.earliest_start)
            .then(self.manifest_index.cmp(&other.manifest_index))
    }
}

impl PartialOrd for TimelineKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Sort entries paired with their manifest index into timeline order.
pub fn sort_timeline(entries: Vec<(usize, ScheduleEntry)>) -> Vec<ScheduleEntry> {
    let mut keyed: Vec<(TimelineKey, ScheduleEntry)> = entries
        .into_iter()
        .map(|(manifest_index, entry)| {
            (
                TimelineKey {
                    earliest_start: entry.earliest_start,
                    manifest_index,
                },
                entry,
            )
        })
        .collect();

    keyed.sort_by(|a, b| a.0.cmp(&b.0));
    keyed.into_iter().map(|(_, entry)| entry).collect()
}
