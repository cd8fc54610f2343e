use std::collections::HashMap;

use crate::model::{CategorySpans, EventDictionary, EventOccurrence};

/// Give every identity its own row within its category.
///
/// Rows are handed out in the order identities are first met in time; all
/// later occurrences of the same identity reuse that row.
pub fn compute_expanded(
    occurrences: &mut [EventOccurrence],
    dictionary: &EventDictionary,
    spans: &mut CategorySpans,
) {
    let mut rows: HashMap<usize, u32> = HashMap::with_capacity(dictionary.len());

    for occurrence in occurrences.iter_mut() {
        let identity = occurrence.identity;
        let row = *rows.entry(identity).or_insert_with(|| {
            spans.next_expanded_row(dictionary.get(identity).category)
        });
        occurrence.row_expanded = row;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::ingest;
    use crate::layout::nesting::compute_collapsed;
    use crate::layout::test_util::event;
    use tracelane_protocol::EventCategory::{Binding, Creating};

    #[test]
    fn one_row_per_identity() {
        let events = vec![
            event("a", Binding, 0, 100),
            event("b", Binding, 10, 10),
            event("a", Binding, 20, 5),
            event("c", Creating, 30, 5),
            event("b", Binding, 300, 10),
        ];
        let (dict, mut occ) = ingest(&events, 1);
        let mut spans = CategorySpans::new(1);
        compute_expanded(&mut occ, &dict, &mut spans);

        let rows: Vec<_> = occ.iter().map(|o| o.row_expanded).collect();
        assert_eq!(rows, [1, 2, 1, 1, 2]);
        assert_eq!(spans.get(Binding).expanded_rows, 3);
        assert_eq!(spans.get(Creating).expanded_rows, 2);
    }

    #[test]
    fn disjoint_occurrences_share_expanded_row_only() {
        let events = vec![
            event("x", Binding, 0, 10),
            event("outer", Binding, 100, 100),
            event("x", Binding, 120, 10),
        ];
        let (dict, mut occ) = ingest(&events, 1);
        let mut spans = CategorySpans::new(1);
        compute_collapsed(&mut occ, &dict, &mut spans, 1, 0);
        compute_expanded(&mut occ, &dict, &mut spans);

        assert_eq!(occ[0].row_expanded, occ[2].row_expanded);
        assert_eq!(occ[0].row_collapsed, 1);
        assert_eq!(occ[2].row_collapsed, 2);
    }
}
