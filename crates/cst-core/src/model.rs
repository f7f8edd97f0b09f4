//! Core type definitions for the normalized solve model.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A session display name as the timer stores it: either a string or a bare
/// number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SessionName {
    Text(String),
    Number(i64),
}

impl fmt::Display for SessionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for SessionName {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// Metadata for one raw session key, decoded from the double-encoded
/// `properties.sessionData` blob.
///
/// Consumed once during normalization to resolve display names; not retained
/// in the output model.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionMeta {
    /// Display name shown by the timer UI.
    pub name: SessionName,
    /// 1-based ordinal correlating this entry with a raw session key's
    /// position among the export's top-level keys.
    pub rank: usize,
    /// Per-session timer options, opaque to this tool.
    #[serde(default)]
    pub opt: serde_json::Value,
    /// Solve-count statistics as recorded by the timer.
    #[serde(default)]
    pub stat: Option<[i64; 3]>,
    /// First/last solve date pair as recorded by the timer.
    #[serde(default)]
    pub date: Option<[i64; 2]>,
}

/// One timed cubing attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solve {
    /// Elapsed time in milliseconds. Zero is the reserved DNF/invalid
    /// sentinel, never a real elapsed time.
    pub time: i64,
    /// Scramble string, passed through unchanged.
    pub scramble: String,
    /// Seconds since epoch when the solve was recorded. Unique within a
    /// session.
    pub created_at: i64,
}

impl Solve {
    /// Whether this solve carries the DNF/invalid sentinel.
    #[must_use]
    pub const fn is_dnf(&self) -> bool {
        self.time == 0
    }

    /// The recording instant as a UTC datetime.
    ///
    /// Returns `None` for timestamps outside chrono's representable range.
    #[must_use]
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.created_at, 0)
    }
}

/// A named, ordered list of solves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Display name resolved from session metadata by positional rank.
    /// `None` when no metadata rank matched the session's position.
    pub name: Option<SessionName>,
    /// Solves in source encounter order.
    pub solves: Vec<Solve>,
}

/// The normalized export: typed sessions plus the raw `properties` object
/// retained verbatim for pass-through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedData {
    pub sessions: Vec<Session>,
    /// Top-level `properties` of the export, unprocessed. Downstream
    /// consumers (charting, UI) read tool lists and UI config from here.
    pub properties: serde_json::Map<String, serde_json::Value>,
}
