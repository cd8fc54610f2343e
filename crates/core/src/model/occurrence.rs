use serde::{Deserialize, Serialize};

/// One timestamped instance of an identity.
///
/// Row, base and loop fields are written once by the layout passes and are
/// read-only afterwards. Cross references are indices into the start index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventOccurrence {
    pub start_time: i64,
    pub duration: i64,
    /// Id into the event dictionary.
    pub identity: usize,
    pub row_expanded: u32,
    pub row_collapsed: u32,
    /// Top-level occurrence this one falls under.
    pub base_event: usize,
    /// Earlier open occurrence of the same identity, if this one re-enters it.
    pub loop_head: Option<usize>,
}

impl EventOccurrence {
    /// Fresh occurrence with layout fields at their sentinels: rows at the
    /// floor, its own index as base event, no loop head.
    pub fn new(
        start_time: i64,
        duration: i64,
        identity: usize,
        min_level: u32,
        index: usize,
    ) -> Self {
        Self {
            start_time,
            duration,
            identity,
            row_expanded: min_level,
            row_collapsed: min_level,
            base_event: index,
            loop_head: None,
        }
    }

    pub fn end_time(&self) -> i64 {
        self.start_time.saturating_add(self.duration)
    }
}

/// Entry of the end-time index: points back into the start index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndIndexEntry {
    pub start_index: usize,
    pub end_time: i64,
}
