use tracing::trace;

use crate::model::{EventDictionary, EventOccurrence};

/// Mark occurrences that re-enter an identity which is still open on the
/// ancestor stack. Returns how many loop occurrences were found.
///
/// Only structural categories take part; everything else is skipped.
/// `occurrences` must be sorted by start time.
pub fn find_binding_loops(
    occurrences: &mut [EventOccurrence],
    dictionary: &EventDictionary,
) -> usize {
    // (identity, start index) of the currently open ancestors
    let mut call_stack: Vec<(usize, usize)> = Vec::new();
    let mut loops = 0;

    for i in 0..occurrences.len() {
        let current = occurrences[i];
        if !dictionary.get(current.identity).category.is_structural() {
            continue;
        }

        while let Some(&(_, parent)) = call_stack.last() {
            if occurrences[parent].end_time() > current.start_time {
                break;
            }
            call_stack.pop();
        }

        if let Some(&(_, head)) = call_stack
            .iter()
            .find(|(identity, _)| *identity == current.identity)
        {
            trace!(
                occurrence = i,
                loop_head = head,
                name = %dictionary.get(current.identity).display_name,
                "binding loop"
            );
            occurrences[i].loop_head = Some(head);
            loops += 1;
        }

        call_stack.push((current.identity, i));
    }

    loops
}
