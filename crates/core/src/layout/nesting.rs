use tracelane_protocol::EventCategory;
use tracing::debug;

use crate::model::{CategorySpans, EventDictionary, EventOccurrence};

/// End time of the most recent occurrence placed at each depth, plus the
/// current depth.
#[derive(Debug)]
struct LevelStack {
    level: u32,
    min_level: u32,
    ends: Vec<i64>,
}

impl LevelStack {
    fn new(min_level: u32) -> Self {
        Self {
            level: min_level,
            min_level,
            ends: Vec::new(),
        }
    }

    /// Slots that were never used are free.
    fn end_at(&self, level: u32) -> i64 {
        self.ends.get(level as usize).copied().unwrap_or(i64::MIN)
    }

    /// Place an occurrence spanning `[start, end)` and return its depth.
    ///
    /// If the current slot is still occupied the occurrence nests one level
    /// deeper; otherwise it rises to the shallowest level whose slot above
    /// is free.
    fn place(&mut self, start: i64, end: i64) -> u32 {
        if self.end_at(self.level) > start {
            self.level += 1;
        } else {
            while self.level > self.min_level && self.end_at(self.level - 1) <= start {
                self.level -= 1;
            }
        }

        let slot = self.level as usize;
        if self.ends.len() <= slot {
            self.ends.resize(slot + 1, i64::MIN);
        }
        self.ends[slot] = end;
        self.level
    }
}

/// Assign collapsed (per-category, temporal) rows and base events.
///
/// `occurrences` must be sorted by start time. `trace_start` seeds the base
/// event tracking: an occurrence only becomes a new base event once it
/// starts after the previous base event ended.
pub fn compute_collapsed(
    occurrences: &mut [EventOccurrence],
    dictionary: &EventDictionary,
    spans: &mut CategorySpans,
    min_level: u32,
    trace_start: i64,
) {
    let mut global = LevelStack::new(min_level);
    let mut per_category: Vec<LevelStack> = (0..EventCategory::COUNT)
        .map(|_| LevelStack::new(min_level))
        .collect();

    let mut base_event = 0;
    let mut base_event_end = trace_start;

    for (i, occurrence) in occurrences.iter_mut().enumerate() {
        let start = occurrence.start_time;
        let end = occurrence.end_time();
        let category = dictionary.get(occurrence.identity).category;

        let level = global.place(start, end);
        let row = per_category[category.index()].place(start, end);
        occurrence.row_collapsed = row;
        spans.fit_collapsed_row(category, row);

        if level == min_level && base_event_end < start {
            base_event = i;
            base_event_end = end;
        }
        occurrence.base_event = base_event;
    }

    debug!(
        occurrences = occurrences.len(),
        levels_used = global.ends.len(),
        "computed collapsed nesting"
    );
}
