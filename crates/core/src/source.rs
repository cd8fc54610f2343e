use serde::{Deserialize, Serialize};
use tracelane_protocol::{RawEvent, TraceTime};

/// Supplier of raw trace events.
///
/// The timeline pulls a complete snapshot from the source on every reload.
pub trait TraceSource {
    fn is_empty(&self) -> bool {
        self.events().is_empty()
    }

    /// Events in arrival order.
    fn events(&self) -> &[RawEvent];

    fn trace_time(&self) -> TraceTime;
}

/// Owned in-memory trace snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceSnapshot {
    pub trace_time: TraceTime,
    pub events: Vec<RawEvent>,
}

impl TraceSnapshot {
    pub fn new(trace_time: TraceTime, events: Vec<RawEvent>) -> Self {
        Self { trace_time, events }
    }

    /// Snapshot whose trace time spans exactly the given events.
    pub fn from_events(events: Vec<RawEvent>) -> Self {
        let trace_time = Self::covering(&events);
        Self { trace_time, events }
    }

    /// Earliest start to latest end of `events`; zero when empty.
    pub fn covering(events: &[RawEvent]) -> TraceTime {
        let start = events.iter().map(|e| e.start_time).min();
        let end = events.iter().map(RawEvent::end_time).max();
        match (start, end) {
            (Some(start), Some(end)) => TraceTime::new(start, end),
            _ => TraceTime::default(),
        }
    }
}

impl TraceSource for TraceSnapshot {
    fn events(&self) -> &[RawEvent] {
        &self.events
    }

    fn trace_time(&self) -> TraceTime {
        self.trace_time
    }
}
