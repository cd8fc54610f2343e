use std::io::{self, Write};

use tracelane_core::TimelineModel;
use tracelane_core::format::display_time;

/// Trace overview followed by one line per category.
pub fn write_summary(out: &mut impl Write, model: &TimelineModel) -> io::Result<()> {
    let snapshot = model.snapshot();
    writeln!(
        out,
        "trace {}..{} ns ({}), {} events, {} distinct, {} binding loops",
        model.trace_start_time(),
        model.trace_end_time(),
        display_time(model.trace_duration() as f64),
        model.count(),
        snapshot.dictionary().len(),
        snapshot.loop_count(),
    )?;

    for (category, span) in snapshot.spans().iter() {
        let expanded = model.is_expanded(category);
        writeln!(
            out,
            "  {:<16} {:>4} rows  (collapsed {}, expanded {}){}",
            model.category_label(category),
            model.category_depth(category),
            span.collapsed_rows,
            span.expanded_rows,
            if expanded { "  [expanded]" } else { "" },
        )?;
        for label in model.labels_for_category(category) {
            writeln!(
                out,
                "      #{:<4} {}  {}",
                label.id, label.display_name, label.description
            )?;
        }
    }
    Ok(())
}

/// Occurrences visible in `[from, to]`, optionally with tooltip details.
pub fn write_range(
    out: &mut impl Write,
    model: &TimelineModel,
    from: i64,
    to: i64,
    details: bool,
) -> io::Result<()> {
    let indices = model.data_range_indices(from, to);
    writeln!(out, "events in [{from}, {to}]: {}", indices.len())?;

    for index in indices {
        let identity = model.range_event(index);
        let marker = if model.binding_loop_dest(index).is_some() {
            " (loop)"
        } else {
            ""
        };
        writeln!(
            out,
            "  [{index:>6}] {:>12} +{:<12} {:<16} row {:<3} {}{marker}",
            model.start_time(index),
            model.duration(index),
            model.category_label(identity.category),
            model.event_row(index),
            identity.display_name,
        )?;

        if details {
            for line in model.event_details(index).iter().skip(1) {
                writeln!(out, "           {} {}", line.label, line.value)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracelane_core::TraceSnapshot;
    use tracelane_protocol::{EventCategory, EventLocation, RawEvent};

    fn binding(name: &str, start_time: i64, duration: i64) -> RawEvent {
        RawEvent {
            display_name: name.into(),
            data: vec![format!("{name}: 1")],
            location: EventLocation::new("Main.qml", 3, 1),
            category: EventCategory::Binding,
            start_time,
            duration,
        }
    }

    fn model() -> TimelineModel {
        let mut model = TimelineModel::default();
        model.reload(&TraceSnapshot::from_events(vec![
            binding("a", 0, 100),
            binding("b", 10, 50),
            binding("a", 20, 10),
        ]));
        model
    }

    fn render(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut out = Vec::new();
        f(&mut out).expect("write to Vec");
        String::from_utf8(out).expect("utf-8 output")
    }

    #[test]
    fn summary_lists_all_categories() {
        let mut model = model();
        model.set_expanded(EventCategory::Binding, true);
        let text = render(|out| write_summary(out, &model));

        assert!(text.starts_with(
            "trace 0..100 ns (0.100 µs), 3 events, 2 distinct, 1 binding loops"
        ));
        for category in EventCategory::ALL {
            assert!(text.contains(category.label()), "{category} missing");
        }
        assert!(text.contains("[expanded]"));
        assert!(text.contains("a: 1"));
    }

    #[test]
    fn range_marks_loops_and_details() {
        let model = model();
        let text = render(|out| write_range(out, &model, 0, 50, true));

        assert!(text.starts_with("events in [0, 50]: 3"));
        assert_eq!(text.matches("(loop)").count(), 1);
        assert!(text.contains("Binding loop: re-enters a (event 0)"));
        assert!(text.contains("Location: Main.qml:3:1"));
    }
}
