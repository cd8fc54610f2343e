/// Format a duration in nanoseconds for display, e.g. `1.500 ms`.
pub fn display_time(nanos: f64) -> String {
    if nanos < 1e6 {
        format!("{:.3} µs", nanos / 1e3)
    } else if nanos < 1e9 {
        format!("{:.3} ms", nanos / 1e6)
    } else {
        format!("{:.3} s", nanos / 1e9)
    }
}

/// Cut `text` to `max_chars` characters, appending `...` when cut.
pub fn truncate_details(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => format!("{}...", &text[..byte_index]),
        None => text.to_string(),
    }
}
