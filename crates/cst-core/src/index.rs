//! Unified timestamp index across sessions and the best-single statistic.

use indexmap::IndexMap;

use crate::format::format_duration;
use crate::model::Session;

/// Ordered mapping from solve `created_at` (seconds) to solve time (ms).
///
/// Key order is the order timestamps were first encountered while folding
/// sessions left to right; downstream time-series consumers use it as the
/// x-axis ordering.
pub type TimestampIndex = IndexMap<i64, i64>;

/// Folds every session's solves into one timestamp-keyed index.
///
/// Insertion is unconditional: a timestamp shared by two sessions keeps the
/// later-folded session's time (last write wins) at the position the
/// timestamp was first seen. DNF zeros are retained; statistics filter them
/// at consumption time, not here.
#[must_use]
pub fn build_timestamp_index(sessions: &[Session]) -> TimestampIndex {
    sessions
        .iter()
        .fold(TimestampIndex::new(), |mut index, session| {
            for solve in &session.solves {
                index.insert(solve.created_at, solve.time);
            }
            index
        })
}

/// The minimum non-zero solve time in the index, in milliseconds.
#[must_use]
pub fn best_single_ms(index: &TimestampIndex) -> Option<i64> {
    index.values().copied().filter(|&time| time != 0).min()
}

/// The best single formatted for display.
///
/// An index with no non-zero times (all DNF, or empty) yields `"0"`.
#[must_use]
pub fn best_single(index: &TimestampIndex) -> String {
    best_single_ms(index).map_or_else(|| "0".to_string(), format_duration)
}
