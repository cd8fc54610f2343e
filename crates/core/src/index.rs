use std::ops::Range;

use tracelane_protocol::{EventCategory, TraceTime};
use tracing::{debug, info};

use crate::config::TimelineConfig;
use crate::layout::{self, end_index, expanded, loops, nesting};
use crate::model::{CategorySpans, EndIndexEntry, EventDictionary, EventIdentity, EventOccurrence};
use crate::source::TraceSource;

/// Fully built, read-only index over one trace snapshot.
///
/// Built off to the side by [`TimelineIndex::build`] and only published once
/// every pass has run, so a reader never sees a partially built index.
#[derive(Debug, Clone)]
pub struct TimelineIndex {
    dictionary: EventDictionary,
    occurrences: Vec<EventOccurrence>,
    end_index: Vec<EndIndexEntry>,
    spans: CategorySpans,
    trace_time: TraceTime,
    loop_count: usize,
}

impl TimelineIndex {
    /// Index with no events.
    pub fn empty(config: &TimelineConfig) -> Self {
        let mut spans = CategorySpans::new(config.min_level);
        spans.finish();
        Self {
            dictionary: EventDictionary::new(),
            occurrences: Vec::new(),
            end_index: Vec::new(),
            spans,
            trace_time: TraceTime::default(),
            loop_count: 0,
        }
    }

    /// Run the whole pipeline over the supplier's current events.
    pub fn build(source: &dyn TraceSource, config: &TimelineConfig) -> Self {
        let trace_time = source.trace_time();
        if source.is_empty() {
            debug!("trace source is empty");
            return Self {
                trace_time,
                ..Self::empty(config)
            };
        }

        let min_level = config.min_level;
        let (dictionary, mut occurrences) = layout::ingest(source.events(), min_level);
        debug!(
            occurrences = occurrences.len(),
            identities = dictionary.len(),
            "ingested events"
        );

        let mut spans = CategorySpans::new(min_level);
        nesting::compute_collapsed(
            &mut occurrences,
            &dictionary,
            &mut spans,
            min_level,
            trace_time.start_time,
        );
        expanded::compute_expanded(&mut occurrences, &dictionary, &mut spans);
        spans.finish();

        let end_index = end_index::build_end_index(&occurrences);
        let loop_count = loops::find_binding_loops(&mut occurrences, &dictionary);

        info!(
            occurrences = occurrences.len(),
            identities = dictionary.len(),
            binding_loops = loop_count,
            "timeline index rebuilt"
        );

        Self {
            dictionary,
            occurrences,
            end_index,
            spans,
            trace_time,
            loop_count,
        }
    }

    pub fn len(&self) -> usize {
        self.occurrences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occurrences.is_empty()
    }

    /// Occurrences sorted by start time.
    pub fn occurrences(&self) -> &[EventOccurrence] {
        &self.occurrences
    }

    /// Panics if `index` is out of range.
    pub fn occurrence(&self, index: usize) -> &EventOccurrence {
        &self.occurrences[index]
    }

    pub fn end_index(&self) -> &[EndIndexEntry] {
        &self.end_index
    }

    pub fn dictionary(&self) -> &EventDictionary {
        &self.dictionary
    }

    /// Identity record of the occurrence at `index`.
    pub fn identity(&self, index: usize) -> &EventIdentity {
        self.dictionary.get(self.occurrences[index].identity)
    }

    pub fn category(&self, index: usize) -> EventCategory {
        self.identity(index).category
    }

    /// Row counts as computed by the build; every span is collapsed.
    pub fn spans(&self) -> &CategorySpans {
        &self.spans
    }

    pub fn trace_time(&self) -> TraceTime {
        self.trace_time
    }

    pub fn loop_count(&self) -> usize {
        self.loop_count
    }

    /// Base event of the first occurrence ending at or after `start_time`,
    /// so that a partially visible ancestor is included. Returns 0 when
    /// nothing qualifies.
    pub fn find_first_index(&self, start_time: i64) -> usize {
        self.first_visible(start_time)
            .map_or(0, |i| self.occurrences[i].base_event)
    }

    /// First occurrence ending at or after `start_time`, without walking up
    /// to its base event. Returns 0 when nothing qualifies.
    pub fn find_first_index_no_parents(&self, start_time: i64) -> usize {
        self.first_visible(start_time).unwrap_or(0)
    }

    /// Last occurrence starting before `end_time`. Returns 0 when nothing
    /// qualifies.
    pub fn find_last_index(&self, end_time: i64) -> usize {
        end_index::last_starting_before(&self.occurrences, end_time).unwrap_or(0)
    }

    fn first_visible(&self, start_time: i64) -> Option<usize> {
        end_index::first_ending_at_or_after(&self.end_index, start_time)
    }

    /// Contiguous run of occurrences visible in `[from_time, to_time]`,
    /// widened on the left to the base event of the first visible one.
    pub fn range(&self, from_time: i64, to_time: i64) -> &[EventOccurrence] {
        &self.occurrences[self.range_indices(from_time, to_time)]
    }

    /// Start-index positions of [`TimelineIndex::range`]; empty when nothing
    /// is visible.
    pub fn range_indices(&self, from_time: i64, to_time: i64) -> Range<usize> {
        let Some(first) = self.first_visible(from_time) else {
            return 0..0;
        };
        let Some(last) = end_index::last_starting_before(&self.occurrences, to_time) else {
            return 0..0;
        };

        let first = self.occurrences[first].base_event;
        if first <= last { first..last + 1 } else { 0..0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::test_util::event;
    use crate::source::TraceSnapshot;
    use tracelane_protocol::EventCategory::{Binding, Creating};

    fn build(events: Vec<tracelane_protocol::RawEvent>) -> TimelineIndex {
        let snapshot = TraceSnapshot::from_events(events);
        TimelineIndex::build(&snapshot, &TimelineConfig::default())
    }

    fn three_events() -> TimelineIndex {
        build(vec![
            event("E1", Creating, 0, 100),
            event("E2", Creating, 10, 20),
            event("E3", Binding, 200, 5),
        ])
    }

    #[test]
    fn empty_source_gives_sentinels() {
        let index = build(Vec::new());
        assert!(index.is_empty());
        assert_eq!(index.find_first_index(10), 0);
        assert_eq!(index.find_first_index_no_parents(10), 0);
        assert_eq!(index.find_last_index(10), 0);
        assert!(index.range(0, 100).is_empty());
        for (_, span) in index.spans().iter() {
            assert_eq!(span.collapsed_rows, 1);
            assert_eq!(span.expanded_rows, 1);
        }
    }

    #[test]
    fn three_event_scenario() {
        let index = three_events();
        let e1 = index.occurrence(0);
        let e2 = index.occurrence(1);
        let e3 = index.occurrence(2);

        assert_eq!(e2.row_collapsed, e1.row_collapsed + 1);
        assert_eq!(e3.base_event, 2);

        let range = index.range(150, 210);
        assert_eq!(index.range_indices(150, 210), 2..3);
        assert_eq!(range.len(), 1);
        assert_eq!(range[0], *e3);
    }

    #[test]
    fn first_index_walks_up_to_base_event() {
        let index = three_events();
        // E2 is the first to end after 25, and it sits under E1
        assert_eq!(index.find_first_index_no_parents(25), 1);
        assert_eq!(index.find_first_index(25), 0);
        assert_eq!(index.range(25, 50).len(), 2);
    }

    #[test]
    fn range_outside_trace_is_empty() {
        let index = three_events();
        assert!(index.range(300, 400).is_empty());
        assert!(index.range(-50, 0).is_empty());
        assert_eq!(index.find_last_index(0), 0);
        assert_eq!(index.find_first_index(1000), 0);
    }

    #[test]
    fn range_members_start_before_window_end() {
        let index = build(
            (0..30)
                .map(|i| event(&format!("e{}", i % 4), Binding, i * 25, (i % 5) * 20 + 5))
                .collect(),
        );
        for (from, to) in [(0, 50), (100, 260), (333, 340), (700, 900)] {
            let range = index.range(from, to);
            for o in range {
                assert!(o.start_time < to);
            }
            // everything visible in the window is included
            for o in index.occurrences() {
                if o.start_time < to && o.end_time() >= from {
                    assert!(range.contains(o), "{o:?} missing from [{from}, {to}]");
                }
            }
        }
    }

    #[test]
    fn indices_are_sorted() {
        let index = build(
            (0..50)
                .map(|i| event("x", Creating, (i * 7919) % 500, (i * 31) % 60))
                .collect(),
        );
        assert!(
            index
                .occurrences()
                .windows(2)
                .all(|w| w[0].start_time <= w[1].start_time)
        );
        assert!(index.end_index().windows(2).all(|w| w[0].end_time <= w[1].end_time));
        assert_eq!(index.end_index().len(), index.len());
    }

    #[test]
    fn rebuild_is_deterministic() {
        let events: Vec<_> = (0..25)
            .map(|i| event(&format!("n{}", i % 3), Binding, (i * 17) % 90, (i % 4) * 9))
            .collect();
        let a = build(events.clone());
        let b = build(events);
        assert_eq!(a.occurrences(), b.occurrences());
        assert_eq!(a.end_index(), b.end_index());
        assert_eq!(a.dictionary().identities(), b.dictionary().identities());
        assert_eq!(a.spans(), b.spans());
    }
}
