//! Cell and number formatting.

use std::time::Duration;

use sortbench_core::NOT_AVAILABLE;

/// Elapsed seconds with four decimals, or the "not available" marker.
#[must_use]
pub fn format_seconds(value: Option<f64>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| format!("{v:.4}"))
}

/// Speedup ratio with two decimals, or the "not available" marker.
#[must_use]
pub fn format_speedup(value: Option<f64>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| format!("{v:.2}"))
}

/// Format a wall-clock duration for progress lines.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 1.0 {
        format!("{:.0}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{secs:.1}s")
    } else {
        let mins = (secs / 60.0).floor() as u64;
        let remaining = secs - (mins as f64 * 60.0);
        format!("{mins}m{remaining:.0}s")
    }
}

/// First non-empty line of captured output, for one-line summaries.
#[must_use]
pub fn first_line(text: &str) -> &str {
    text.lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or("")
}
