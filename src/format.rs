//! Formatting helpers shared by the projection layer and the presentation
//! surfaces (TUI, list printer, HTML export).

/// Format a harness timestamp (`YYYYMMDD_HHMMSS`) as `MM/DD HH:MM`.
///
/// Total on every input: an empty string formats to an empty string, and
/// anything that is not exactly 15 characters containing an underscore is
/// passed through unchanged. No calendar validation is performed; the
/// characters at the month/day/hour/minute offsets are used as-is.
pub fn format_timestamp(ts: &str) -> String {
    if ts.is_empty() {
        return String::new();
    }
    if ts.len() == 15 && ts.contains('_') {
        let mut parts = ts.split('_');
        let date = parts.next().unwrap_or("");
        let time = parts.next().unwrap_or("");
        return format!(
            "{}/{} {}:{}",
            clamped(date, 4, 6),
            clamped(date, 6, 8),
            clamped(time, 0, 2),
            clamped(time, 2, 4)
        );
    }
    ts.to_string()
}

/// Slice `s` by byte offsets, clamping out-of-range bounds to the string
/// length instead of panicking. Returns "" if the range is not valid UTF-8.
fn clamped(s: &str, start: usize, end: usize) -> &str {
    let end = end.min(s.len());
    let start = start.min(end);
    s.get(start..end).unwrap_or("")
}

/// Escape the five HTML-significant characters (`&`, `<`, `>`, `"`, `'`).
///
/// Applied to transcript content before it reaches any rendered surface,
/// whether or not the text looks like markup.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#039;")
}

/// Display form of a run's total score: the number when positive, a dash
/// placeholder when zero or below (ungraded runs carry a zero score).
pub fn format_score(score: f64) -> String {
    if score > 0.0 {
        format!("{}", score)
    } else {
        "-".to_string()
    }
}

/// Truncate a string to `max_chars`, appending `...` when cut.
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
