use crate::model::{EndIndexEntry, EventOccurrence};

/// One entry per occurrence, sorted by end time.
pub fn build_end_index(occurrences: &[EventOccurrence]) -> Vec<EndIndexEntry> {
    let mut entries: Vec<EndIndexEntry> = occurrences
        .iter()
        .enumerate()
        .map(|(start_index, o)| EndIndexEntry {
            start_index,
            end_time: o.end_time(),
        })
        .collect();
    entries.sort_by_key(|e| e.end_time);
    entries
}

/// Start index of the leftmost end-index entry ending at or after `time`.
pub fn first_ending_at_or_after(entries: &[EndIndexEntry], time: i64) -> Option<usize> {
    let pos = entries.partition_point(|e| e.end_time < time);
    entries.get(pos).map(|e| e.start_index)
}

/// Index of the rightmost occurrence starting strictly before `time`.
pub fn last_starting_before(occurrences: &[EventOccurrence], time: i64) -> Option<usize> {
    occurrences
        .partition_point(|o| o.start_time < time)
        .checked_sub(1)
}
