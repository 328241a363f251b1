//! Human-readable formatting helpers for panel content.

use bytesize::ByteSize;

/// Render a percentage bar split into filled and empty portions.
///
/// Returns `(filled, empty)` strings of `█` and `░` characters that together
/// span `width` character positions. Caller applies styling per segment.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::as_conversions
)]
pub fn fmt_pct_bar(pct: f64, width: u16) -> (String, String) {
    let clamped = if pct.is_nan() { 0.0 } else { pct.clamp(0.0, 100.0) };
    let filled_count = ((clamped / 100.0) * f64::from(width)).round() as u16;
    let empty_count = width.saturating_sub(filled_count);
    (
        "█".repeat(usize::from(filled_count)),
        "░".repeat(usize::from(empty_count)),
    )
}

/// Seconds as "3d 4h 12m", "4h 23m" or "12m", rounded to the minute.
pub fn fmt_uptime(secs: u64) -> String {
    let minutes_total = (secs + 30) / 60;
    let days = minutes_total / (24 * 60);
    let hours = (minutes_total / 60) % 24;
    let minutes = minutes_total % 60;

    if days > 0 {
        format!("{days}d {hours}h {minutes}m")
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

/// Throughput as "12.3 KB/s".
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::as_conversions
)]
pub fn fmt_rate(bytes_per_sec: f64) -> String {
    let bytes = if bytes_per_sec.is_finite() && bytes_per_sec > 0.0 {
        bytes_per_sec.round() as u64
    } else {
        0
    };
    format!("{}/s", ByteSize::b(bytes))
}

/// Shorten to `max` characters, marking the cut with an ellipsis.
pub fn truncate_name(name: &str, max: usize) -> String {
    if name.chars().count() <= max {
        return name.to_owned();
    }
    let mut short: String = name.chars().take(max.saturating_sub(1)).collect();
    short.push('…');
    short
}

/// One block character per value, scaled between 0 and 100.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::as_conversions
)]
pub fn fmt_sparkline(values: &[f64], width: usize) -> String {
    const LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

    let start = values.len().saturating_sub(width);
    values
        .get(start..)
        .unwrap_or_default()
        .iter()
        .map(|v| {
            let clamped = if v.is_nan() { 0.0 } else { v.clamp(0.0, 100.0) };
            let level = ((clamped / 100.0) * 7.0).round() as usize;
            LEVELS.get(level).copied().unwrap_or('▁')
        })
        .collect()
}
