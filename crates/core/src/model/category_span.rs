use serde::{Deserialize, Serialize};
use tracelane_protocol::EventCategory;

/// Layout summary for one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySpan {
    pub expanded: bool,
    /// Rows needed when every identity gets its own row.
    pub expanded_rows: u32,
    /// Rows needed when events stack by temporal nesting.
    pub collapsed_rows: u32,
}

impl CategorySpan {
    pub fn new(min_level: u32) -> Self {
        Self {
            expanded: false,
            expanded_rows: min_level,
            collapsed_rows: min_level.max(1),
        }
    }

    /// Row count for the current layout mode.
    pub fn depth(&self) -> u32 {
        if self.expanded {
            self.expanded_rows
        } else {
            self.collapsed_rows
        }
    }
}

/// Fixed-size table with one span per [`EventCategory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySpans([CategorySpan; EventCategory::COUNT]);

impl CategorySpans {
    pub fn new(min_level: u32) -> Self {
        Self([CategorySpan::new(min_level); EventCategory::COUNT])
    }

    pub fn get(&self, category: EventCategory) -> &CategorySpan {
        &self.0[category.index()]
    }

    pub fn get_mut(&mut self, category: EventCategory) -> &mut CategorySpan {
        &mut self.0[category.index()]
    }

    /// Raise `collapsed_rows` so that `row` fits.
    pub fn fit_collapsed_row(&mut self, category: EventCategory, row: u32) {
        let span = self.get_mut(category);
        span.collapsed_rows = span.collapsed_rows.max(row + 1);
    }

    /// Hand out the next free expanded row for `category`.
    pub fn next_expanded_row(&mut self, category: EventCategory) -> u32 {
        let span = self.get_mut(category);
        let row = span.expanded_rows;
        span.expanded_rows += 1;
        row
    }

    /// Every category needs at least one row even when it has no events.
    pub(crate) fn finish(&mut self) {
        for span in &mut self.0 {
            span.expanded_rows = span.expanded_rows.max(1);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (EventCategory, &CategorySpan)> {
        EventCategory::ALL.into_iter().zip(self.0.iter())
    }
}
