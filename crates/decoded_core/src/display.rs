//! crates/decoded_core/src/display.rs
//!
//! Pure display helpers derived from a fetched summary. Deterministic by
//! construction; the pages call these at render time.

use crate::domain::EpisodeSummary;

/// Formats a duration in minutes as `"3h 5m"`, `"1h"` or `"45m"`.
///
/// Returns `None` for zero or absent durations, in which case no duration
/// label is rendered at all.
pub fn format_duration(minutes: Option<u32>) -> Option<String> {
    let minutes = minutes.filter(|m| *m > 0)?;
    let hours = minutes / 60;
    let remainder = minutes % 60;
    Some(match (hours, remainder) {
        (0, m) => format!("{m}m"),
        (h, 0) => format!("{h}h"),
        (h, m) => format!("{h}h {m}m"),
    })
}

/// Truncates a summary to a bounded preview, cutting on a char boundary and
/// appending an ellipsis only when something was dropped.
pub fn truncate_preview(text: &str, max_chars: usize) -> String {
    let mut chars = text.char_indices();
    match chars.nth(max_chars) {
        None => text.to_owned(),
        Some((byte_index, _)) => {
            let mut preview = text[..byte_index].trim_end().to_owned();
            preview.push('…');
            preview
        }
    }
}

/// Picks up to `limit` related episodes from `candidates`, excluding the
/// episode currently on screen.
pub fn related_episodes(
    candidates: Vec<EpisodeSummary>,
    current_id: &str,
    limit: usize,
) -> Vec<EpisodeSummary> {
    candidates
        .into_iter()
        .filter(|episode| episode.id != current_id)
        .take(limit)
        .collect()
}
