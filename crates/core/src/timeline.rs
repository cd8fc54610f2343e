use std::sync::Arc;

use serde::Serialize;
use tracelane_protocol::{EventCategory, TraceTime};
use tracing::debug;

use crate::config::TimelineConfig;
use crate::format::{display_time, truncate_details};
use crate::index::TimelineIndex;
use crate::model::{CategorySpan, CategorySpans, EventIdentity, EventOccurrence};
use crate::source::TraceSource;

/// Change notification sent to subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelEvent {
    CountChanged,
    StateChanged,
    DataAvailable,
    EmptyChanged,
    ExpandedChanged(EventCategory),
}

pub type Listener = Box<dyn FnMut(&ModelEvent) + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Row header entry for an expanded category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryLabel {
    pub display_name: String,
    pub description: String,
    pub id: usize,
}

/// One labelled line of the event tooltip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventDetail {
    pub label: &'static str,
    pub value: String,
}

impl EventDetail {
    fn new(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
        }
    }
}

/// Query surface of the timeline over the most recently built index.
///
/// The index itself is immutable and shared through an [`Arc`]; a reload
/// builds a fresh one and swaps it in. Only the per-category expansion flags
/// change between reloads.
pub struct TimelineModel {
    config: TimelineConfig,
    index: Arc<TimelineIndex>,
    spans: CategorySpans,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: u64,
    version: u64,
}

impl std::fmt::Debug for TimelineModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimelineModel")
            .field("config", &self.config)
            .field("count", &self.index.len())
            .field("spans", &self.spans)
            .field("listeners", &self.listeners.len())
            .field("version", &self.version)
            .finish()
    }
}

impl TimelineModel {
    pub fn new(config: TimelineConfig) -> Self {
        let index = TimelineIndex::empty(&config);
        let spans = *index.spans();
        Self {
            config,
            index: Arc::new(index),
            spans,
            listeners: Vec::new(),
            next_listener: 0,
            version: 0,
        }
    }

    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    /// Rebuild everything from the source's current events.
    ///
    /// Expansion flags reset to collapsed.
    pub fn reload(&mut self, source: &dyn TraceSource) {
        let index = TimelineIndex::build(source, &self.config);
        self.publish(index);
    }

    /// Drop all data.
    pub fn clear(&mut self) {
        let index = TimelineIndex::empty(&self.config);
        self.publish(index);
    }

    fn publish(&mut self, index: TimelineIndex) {
        self.spans = *index.spans();
        self.index = Arc::new(index);
        self.notify(&[
            ModelEvent::CountChanged,
            ModelEvent::StateChanged,
            ModelEvent::DataAvailable,
            ModelEvent::EmptyChanged,
        ]);
    }

    /// The current index. Stays valid and unchanged across later reloads.
    pub fn snapshot(&self) -> Arc<TimelineIndex> {
        Arc::clone(&self.index)
    }

    /// Bumped once per notification burst; lets consumers poll for changes.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn subscribe(&mut self, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, listener));
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(other, _)| *other != id);
        self.listeners.len() != before
    }

    fn notify(&mut self, events: &[ModelEvent]) {
        self.version += 1;
        for event in events {
            for (_, listener) in &mut self.listeners {
                listener(event);
            }
        }
    }

    // --- Whole-trace queries ---

    pub fn count(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// All occurrences sorted by start time.
    pub fn data(&self) -> &[EventOccurrence] {
        self.index.occurrences()
    }

    /// Occurrences visible between `from_time` and `to_time`, including the
    /// top-level ancestor of the first visible one.
    pub fn data_range(&self, from_time: i64, to_time: i64) -> &[EventOccurrence] {
        self.index.range(from_time, to_time)
    }

    /// Start-index positions of [`TimelineModel::data_range`].
    pub fn data_range_indices(&self, from_time: i64, to_time: i64) -> std::ops::Range<usize> {
        self.index.range_indices(from_time, to_time)
    }

    /// End of the last occurrence in start order, 0 when empty.
    pub fn last_time_mark(&self) -> i64 {
        self.data().last().map_or(0, EventOccurrence::end_time)
    }

    pub fn trace_time(&self) -> TraceTime {
        self.index.trace_time()
    }

    pub fn trace_start_time(&self) -> i64 {
        self.trace_time().start_time
    }

    pub fn trace_end_time(&self) -> i64 {
        self.trace_time().end_time
    }

    pub fn trace_duration(&self) -> i64 {
        self.trace_time().duration()
    }

    pub fn find_first_index(&self, start_time: i64) -> usize {
        self.index.find_first_index(start_time)
    }

    pub fn find_first_index_no_parents(&self, start_time: i64) -> usize {
        self.index.find_first_index_no_parents(start_time)
    }

    pub fn find_last_index(&self, end_time: i64) -> usize {
        self.index.find_last_index(end_time)
    }

    // --- Categories ---

    pub fn set_expanded(&mut self, category: EventCategory, expanded: bool) {
        debug!(%category, expanded, "category expansion toggled");
        self.spans.get_mut(category).expanded = expanded;
        self.notify(&[ModelEvent::ExpandedChanged(category)]);
    }

    pub fn is_expanded(&self, category: EventCategory) -> bool {
        self.spans.get(category).expanded
    }

    pub fn category_span(&self, category: EventCategory) -> CategorySpan {
        *self.spans.get(category)
    }

    /// Rows the category occupies in its current layout mode.
    pub fn category_depth(&self, category: EventCategory) -> u32 {
        self.spans.get(category).depth()
    }

    pub fn category_count(&self) -> usize {
        EventCategory::COUNT
    }

    pub fn category_label(&self, category: EventCategory) -> &'static str {
        category.label()
    }

    /// Identities of `category` in id order; empty unless it is expanded.
    pub fn labels_for_category(&self, category: EventCategory) -> Vec<CategoryLabel> {
        if !self.is_expanded(category) {
            return Vec::new();
        }
        self.index
            .dictionary()
            .identities()
            .iter()
            .filter(|identity| identity.category == category)
            .map(|identity| CategoryLabel {
                display_name: identity.display_name.clone(),
                description: identity.details.clone(),
                id: identity.id,
            })
            .collect()
    }

    // --- Per-occurrence accessors; all panic on an out-of-range index ---

    pub fn event_type(&self, index: usize) -> EventCategory {
        self.index.category(index)
    }

    /// Row in the current layout mode of the occurrence's category.
    pub fn event_row(&self, index: usize) -> u32 {
        let occurrence = self.index.occurrence(index);
        if self.is_expanded(self.event_type(index)) {
            occurrence.row_expanded
        } else {
            occurrence.row_collapsed
        }
    }

    pub fn duration(&self, index: usize) -> i64 {
        self.index.occurrence(index).duration
    }

    pub fn start_time(&self, index: usize) -> i64 {
        self.index.occurrence(index).start_time
    }

    pub fn end_time(&self, index: usize) -> i64 {
        self.index.occurrence(index).end_time()
    }

    pub fn event_id(&self, index: usize) -> usize {
        self.index.occurrence(index).identity
    }

    /// Start of the binding loop this occurrence re-enters, if any.
    pub fn binding_loop_dest(&self, index: usize) -> Option<usize> {
        self.index.occurrence(index).loop_head
    }

    pub fn range_event(&self, index: usize) -> &EventIdentity {
        self.index.identity(index)
    }

    /// Tooltip lines: category, duration, details, location and, for
    /// binding loops, the identity being re-entered.
    pub fn event_details(&self, index: usize) -> Vec<EventDetail> {
        let occurrence = self.index.occurrence(index);
        let identity = self.index.identity(index);

        let location = if identity.location.filename.is_empty() {
            identity.display_name.clone()
        } else {
            identity.location.to_string()
        };

        let mut details = vec![
            EventDetail::new("title", identity.category.label()),
            EventDetail::new("Duration:", display_time(occurrence.duration as f64)),
            EventDetail::new(
                "Details:",
                truncate_details(&identity.details, self.config.details_max_chars),
            ),
            EventDetail::new("Location:", location),
        ];

        if let Some(head) = occurrence.loop_head {
            let head_name = &self.index.identity(head).display_name;
            details.push(EventDetail::new(
                "Binding loop:",
                format!("re-enters {head_name} (event {head})"),
            ));
        }

        details
    }
}

impl Default for TimelineModel {
    fn default() -> Self {
        Self::new(TimelineConfig::default())
    }
}
