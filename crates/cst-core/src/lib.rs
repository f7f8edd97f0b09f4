//! Core domain logic for the csTimer export analyzer.
//!
//! This crate contains the conversion-and-aggregation pipeline:
//! - Normalization: decoding a raw export plus its double-encoded session
//!   metadata into typed sessions and solves
//! - Aggregation: the unified timestamp index and the best-single statistic
//! - Duration formatting for human-readable solve times
//!
//! The crate performs no I/O; callers hand in already-acquired text and get
//! back a fresh immutable model.

mod format;
mod index;
mod model;
mod normalize;

pub use format::format_duration;
pub use index::{TimestampIndex, best_single, best_single_ms, build_timestamp_index};
pub use model::{NormalizedData, Session, SessionMeta, SessionName, Solve};
pub use normalize::{
    NormalizeError, NormalizeOutcome, NormalizeWarning, normalize, normalize_export,
};
