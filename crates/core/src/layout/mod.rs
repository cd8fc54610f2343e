//! Layout passes run over the start index once it is sorted by start time.
//!
//! ```text
//!   ingest ─▶ sort ─▶ collapsed nesting ─▶ expanded rows ─▶ end index ─▶ binding loops
//!                      (+ base events)
//! ```

pub mod end_index;
pub mod expanded;
pub mod loops;
pub mod nesting;

use tracelane_protocol::RawEvent;

use crate::model::{EventDictionary, EventOccurrence};

/// Deduplicate `events` into a dictionary and produce the start index,
/// sorted by start time. Ties keep arrival order.
pub fn ingest(events: &[RawEvent], min_level: u32) -> (EventDictionary, Vec<EventOccurrence>) {
    let mut dictionary = EventDictionary::new();
    let mut occurrences = Vec::with_capacity(events.len());

    for (i, event) in events.iter().enumerate() {
        let identity = dictionary.intern(event);
        occurrences.push(EventOccurrence::new(
            event.start_time,
            event.duration,
            identity,
            min_level,
            i,
        ));
    }

    // `sort_by_key` is stable, which the nesting passes rely on.
    occurrences.sort_by_key(|o| o.start_time);
    (dictionary, occurrences)
}

#[cfg(test)]
pub(crate) mod test_util {
    use tracelane_protocol::{EventCategory, EventLocation, RawEvent};

    /// Event whose identity is determined by `name` and `category` only.
    pub fn event(name: &str, category: EventCategory, start_time: i64, duration: i64) -> RawEvent {
        RawEvent {
            display_name: name.into(),
            data: vec![format!("{name} details")],
            location: EventLocation::new("Main.qml", 1, 1),
            category,
            start_time,
            duration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_util::event;
    use super::*;
    use tracelane_protocol::EventCategory::{Binding, Creating};

    #[test]
    fn ingest_sorts_stably_by_start() {
        let events = vec![
            event("late", Binding, 50, 1),
            event("tie-a", Binding, 10, 1),
            event("early", Creating, 0, 1),
            event("tie-b", Binding, 10, 1),
        ];
        let (dict, occurrences) = ingest(&events, 1);

        let names: Vec<_> = occurrences
            .iter()
            .map(|o| dict.get(o.identity).display_name.as_str())
            .collect();
        assert_eq!(names, ["early", "tie-a", "tie-b", "late"]);
        // ids follow arrival order, not time order
        assert_eq!(dict.get(0).display_name, "late");
        assert!(occurrences.iter().all(|o| o.loop_head.is_none()));
        assert!(occurrences.iter().all(|o| o.row_collapsed == 1));
    }

    #[test]
    fn ingest_empty() {
        let (dict, occurrences) = ingest(&[], 1);
        assert!(dict.is_empty());
        assert!(occurrences.is_empty());
    }
}
