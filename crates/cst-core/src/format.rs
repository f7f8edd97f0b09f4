//! Human-readable duration formatting.

/// Formats a solve time in milliseconds the way the timer UI renders it.
///
/// A zero whole-second component yields `"0"`; under a minute the form is
/// seconds plus zero-padded hundredths (`"7s42"`); from a minute up it is
/// minutes plus zero-padded seconds (`"2m05s"`). Pure integer arithmetic, no
/// calendar semantics.
#[must_use]
pub fn format_duration(ms: i64) -> String {
    let total_seconds = ms / 1000;
    if total_seconds <= 0 {
        return "0".to_string();
    }
    if total_seconds < 60 {
        let hundredths = ms % 1000 / 10;
        format!("{total_seconds}s{hundredths:02}")
    } else {
        format!("{}m{:02}s", total_seconds / 60, total_seconds % 60)
    }
}
