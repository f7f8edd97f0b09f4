//! Conversion of a raw timer export into the normalized model.
//!
//! The export is a JSON object whose keys are opaque session identifiers,
//! except for the reserved `properties` key. Display names live in a second,
//! double-encoded JSON blob under `properties.sessionData` and are matched to
//! sessions by positional rank: a metadata entry with `rank` N names the
//! session key found at 1-based position N among ALL top-level keys, the
//! `properties` key included.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::model::{NormalizedData, Session, SessionMeta, SessionName, Solve};

/// Reserved top-level key holding export metadata rather than solves.
const PROPERTIES_KEY: &str = "properties";

/// Fatal conversion errors. Warnings never take this path.
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// The export body is not valid JSON.
    #[error("malformed export: {0}")]
    MalformedExport(#[source] serde_json::Error),

    /// The export decoded, but its top level is not a JSON object.
    #[error("export root must be a JSON object")]
    NotAnObject,

    /// The embedded session metadata blob is not valid JSON.
    #[error("malformed session metadata: {0}")]
    MalformedMetadata(#[source] serde_json::Error),

    /// `properties.sessionData` is absent or not a string.
    #[error("export has no properties.sessionData entry")]
    MissingSessionData,

    /// A solve record does not match the `[[flag, ms], scramble, _, ts]`
    /// shape.
    #[error("malformed solve record {index} in session {session_key:?}: {source}")]
    MalformedSolve {
        session_key: String,
        index: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Non-fatal anomalies collected during conversion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeWarning {
    /// A solve's penalty flag was outside `{0, -1}`.
    #[error("anomalous penalty flag {flag} on solve {index} in session {session_key:?}")]
    AnomalousFlag {
        session_key: String,
        index: usize,
        flag: i64,
    },

    /// A session's position had no matching metadata rank.
    #[error("no metadata rank matches session {session_key:?} at position {position}")]
    UnresolvedSessionName {
        session_key: String,
        position: usize,
    },
}

/// Result of a successful conversion: the normalized model plus any
/// non-fatal warnings encountered along the way.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizeOutcome {
    pub data: NormalizedData,
    pub warnings: Vec<NormalizeWarning>,
}

/// Raw solve record shape: `[[flag, time_ms], scramble, comment, created_at]`.
/// The comment slot is carried by the timer but has no counterpart in the
/// normalized model.
type RawSolve = ((i64, i64), String, serde::de::IgnoredAny, i64);

/// Normalizes a raw export against a separately supplied metadata blob.
///
/// `raw_session_metadata` is the JSON-encoded string normally found under
/// `properties.sessionData`; [`normalize_export`] extracts it from the export
/// itself, which is the usual call path. Keeping the two-argument form
/// separates the outer decode failure domain from the inner one.
pub fn normalize(
    raw_export: &str,
    raw_session_metadata: &str,
) -> Result<NormalizeOutcome, NormalizeError> {
    let root = decode_root(raw_export)?;
    let names = rank_lookup(raw_session_metadata)?;
    convert(&root, &names)
}

/// Normalizes a raw export, reading the metadata blob from the export's own
/// `properties.sessionData` string.
pub fn normalize_export(raw_export: &str) -> Result<NormalizeOutcome, NormalizeError> {
    let root = decode_root(raw_export)?;
    let raw_session_metadata = root
        .get(PROPERTIES_KEY)
        .and_then(|properties| properties.get("sessionData"))
        .and_then(Value::as_str)
        .ok_or(NormalizeError::MissingSessionData)?;

    let names = rank_lookup(raw_session_metadata)?;
    convert(&root, &names)
}

/// Decodes the export body into its top-level object, key order preserved.
fn decode_root(raw_export: &str) -> Result<serde_json::Map<String, Value>, NormalizeError> {
    let root: Value = serde_json::from_str(raw_export).map_err(NormalizeError::MalformedExport)?;
    match root {
        Value::Object(map) => Ok(map),
        _ => Err(NormalizeError::NotAnObject),
    }
}

/// Decodes the metadata blob and inverts it into a rank -> name lookup.
///
/// Entries are folded in blob encounter order, so a duplicated rank
/// deterministically keeps the last entry.
fn rank_lookup(raw: &str) -> Result<HashMap<usize, SessionName>, NormalizeError> {
    let metadata: IndexMap<String, SessionMeta> =
        serde_json::from_str(raw).map_err(NormalizeError::MalformedMetadata)?;
    Ok(metadata
        .into_values()
        .map(|meta| (meta.rank, meta.name))
        .collect())
}

/// Walks the top-level keys and builds the session list.
fn convert(
    root: &serde_json::Map<String, Value>,
    names: &HashMap<usize, SessionName>,
) -> Result<NormalizeOutcome, NormalizeError> {
    let mut sessions = Vec::new();
    let mut warnings = Vec::new();

    for (idx, (key, value)) in root.iter().enumerate() {
        // Positions are 1-based over ALL top-level keys: the timer assigns
        // ranks by full object key order, so a `properties` key that is not
        // first still shifts every later session's position.
        let position = idx + 1;

        if key == PROPERTIES_KEY {
            continue;
        }
        let Some(records) = value.as_array() else {
            continue;
        };
        if records.is_empty() {
            continue;
        }

        let name = names.get(&position).cloned();
        if name.is_none() {
            tracing::warn!(
                session = %key,
                position,
                "no metadata rank matches session position"
            );
            warnings.push(NormalizeWarning::UnresolvedSessionName {
                session_key: key.clone(),
                position,
            });
        }

        let mut solves = Vec::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            let ((flag, raw_ms), scramble, _, created_at) = RawSolve::deserialize(record)
                .map_err(|source| NormalizeError::MalformedSolve {
                    session_key: key.clone(),
                    index,
                    source,
                })?;

            if flag != 0 && flag != -1 {
                tracing::warn!(session = %key, index, flag, "anomalous penalty flag on solve");
                warnings.push(NormalizeWarning::AnomalousFlag {
                    session_key: key.clone(),
                    index,
                    flag,
                });
            }

            solves.push(Solve {
                time: if flag == -1 { 0 } else { raw_ms },
                scramble,
                created_at,
            });
        }

        sessions.push(Session { name, solves });
    }

    let properties = root
        .get(PROPERTIES_KEY)
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();

    Ok(NormalizeOutcome {
        data: NormalizedData {
            sessions,
            properties,
        },
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Export with `properties` first: session keys sit at positions 2 and 3.
    const EXPORT: &str = r#"{
        "properties": {
            "sessionData": "{\"1\":{\"name\":\"3x3\",\"opt\":{},\"rank\":2},\"2\":{\"name\":\"OH\",\"opt\":{},\"rank\":3}}",
            "session": 2,
            "toolsfunc": ["cross"],
            "uidesign": "dark"
        },
        "session1": [
            [[0, 7420], "R U R' U' F2", "", 1700000000],
            [[-1, 9000], "F R U R' U' F'", "", 1700000060]
        ],
        "session2": [
            [[0, 61230], "L D L' D2 B", "", 1700000120]
        ]
    }"#;

    #[test]
    fn converts_sessions_with_positional_names() {
        let outcome = normalize_export(EXPORT).unwrap();
        let sessions = &outcome.data.sessions;

        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].name, Some(SessionName::from("3x3")));
        assert_eq!(sessions[1].name, Some(SessionName::from("OH")));
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn solve_counts_match_raw_array_lengths() {
        let outcome = normalize_export(EXPORT).unwrap();
        assert_eq!(outcome.data.sessions[0].solves.len(), 2);
        assert_eq!(outcome.data.sessions[1].solves.len(), 1);
    }

    #[test]
    fn scramble_and_timestamp_pass_through() {
        let outcome = normalize_export(EXPORT).unwrap();
        let solve = &outcome.data.sessions[0].solves[0];
        assert_eq!(solve.time, 7420);
        assert_eq!(solve.scramble, "R U R' U' F2");
        assert_eq!(solve.created_at, 1_700_000_000);
    }

    #[test]
    fn dnf_flag_forces_zero_time() {
        let outcome = normalize_export(EXPORT).unwrap();
        let dnf = &outcome.data.sessions[0].solves[1];
        assert_eq!(dnf.time, 0);
        assert!(dnf.is_dnf());
    }

    #[test]
    fn session_key_before_properties_resolves_rank_one() {
        // Pins the positional-correlation contract: a session key that comes
        // first takes position 1, and `properties` consumes slot 2.
        let raw = r#"{
            "only": [[[0, 5000], "scr", "", 1700000000]],
            "properties": {"sessionData": "{\"k\":{\"name\":\"Session A\",\"opt\":{},\"rank\":1}}"}
        }"#;
        let outcome = normalize_export(raw).unwrap();
        assert_eq!(
            outcome.data.sessions[0].name,
            Some(SessionName::from("Session A"))
        );
    }

    #[test]
    fn properties_first_shifts_positions() {
        // Same metadata, but `properties` now occupies position 1, so the
        // session sits at position 2 and rank 1 no longer matches it.
        let raw = r#"{
            "properties": {"sessionData": "{\"k\":{\"name\":\"Session A\",\"opt\":{},\"rank\":1}}"},
            "only": [[[0, 5000], "scr", "", 1700000000]]
        }"#;
        let outcome = normalize_export(raw).unwrap();
        assert_eq!(outcome.data.sessions[0].name, None);
        assert_eq!(
            outcome.warnings,
            vec![NormalizeWarning::UnresolvedSessionName {
                session_key: "only".to_string(),
                position: 2,
            }]
        );
    }

    #[test]
    fn empty_session_arrays_are_dropped_but_keep_their_slot() {
        let raw = r#"{
            "empty": [],
            "full": [[[0, 5000], "scr", "", 1700000000]],
            "properties": {"sessionData": "{\"k\":{\"name\":\"Kept\",\"opt\":{},\"rank\":2}}"}
        }"#;
        let outcome = normalize_export(raw).unwrap();

        // The empty key produces no session yet still consumed position 1.
        assert_eq!(outcome.data.sessions.len(), 1);
        assert_eq!(outcome.data.sessions[0].name, Some(SessionName::from("Kept")));
    }

    #[test]
    fn anomalous_flag_warns_and_keeps_raw_time() {
        let raw = r#"{
            "s": [[[2000, 8111], "scr", "", 1700000000]],
            "properties": {"sessionData": "{\"k\":{\"name\":\"A\",\"opt\":{},\"rank\":1}}"}
        }"#;
        let outcome = normalize_export(raw).unwrap();

        assert_eq!(outcome.data.sessions[0].solves[0].time, 8111);
        assert_eq!(
            outcome.warnings,
            vec![NormalizeWarning::AnomalousFlag {
                session_key: "s".to_string(),
                index: 0,
                flag: 2000,
            }]
        );
    }

    #[test]
    fn numeric_session_names_resolve() {
        let raw = r#"{
            "s": [[[0, 5000], "scr", "", 1700000000]],
            "properties": {"sessionData": "{\"k\":{\"name\":4,\"opt\":{},\"rank\":1}}"}
        }"#;
        let outcome = normalize_export(raw).unwrap();
        assert_eq!(outcome.data.sessions[0].name, Some(SessionName::Number(4)));
    }

    #[test]
    fn properties_retained_verbatim() {
        let outcome = normalize_export(EXPORT).unwrap();
        let properties = &outcome.data.properties;
        assert_eq!(properties["session"], 2);
        assert_eq!(properties["uidesign"], "dark");
        assert_eq!(properties["toolsfunc"][0], "cross");
    }

    #[test]
    fn malformed_export_is_the_outer_failure_domain() {
        let err = normalize("not json", "{}").unwrap_err();
        assert!(matches!(err, NormalizeError::MalformedExport(_)));
    }

    #[test]
    fn malformed_metadata_is_the_inner_failure_domain() {
        let err = normalize(r#"{"s": []}"#, "not json").unwrap_err();
        assert!(matches!(err, NormalizeError::MalformedMetadata(_)));
    }

    #[test]
    fn non_object_root_is_rejected() {
        let err = normalize("[1, 2, 3]", "{}").unwrap_err();
        assert!(matches!(err, NormalizeError::NotAnObject));
    }

    #[test]
    fn missing_session_data_is_fatal_for_embedded_path() {
        let err = normalize_export(r#"{"s": [], "properties": {}}"#).unwrap_err();
        assert!(matches!(err, NormalizeError::MissingSessionData));
    }

    #[test]
    fn malformed_solve_record_is_fatal() {
        let raw = r#"{
            "s": [["not", "a", "solve"]],
            "properties": {"sessionData": "{\"k\":{\"name\":\"A\",\"opt\":{},\"rank\":1}}"}
        }"#;
        let err = normalize_export(raw).unwrap_err();
        assert!(matches!(
            err,
            NormalizeError::MalformedSolve { index: 0, .. }
        ));
    }

    #[test]
    fn normalization_is_deterministic() {
        let first = normalize_export(EXPORT).unwrap();
        let second = normalize_export(EXPORT).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn two_argument_form_matches_embedded_metadata() {
        let metadata =
            r#"{"1":{"name":"3x3","opt":{},"rank":2},"2":{"name":"OH","opt":{},"rank":3}}"#;
        let explicit = normalize(EXPORT, metadata).unwrap();
        let embedded = normalize_export(EXPORT).unwrap();
        assert_eq!(explicit, embedded);
    }

    #[test]
    fn duplicate_ranks_keep_the_last_metadata_entry() {
        let raw = r#"{
            "s": [[[0, 5000], "scr", "", 1700000000]],
            "properties": {"sessionData": "{\"a\":{\"name\":\"First\",\"opt\":{},\"rank\":1},\"b\":{\"name\":\"Second\",\"opt\":{},\"rank\":1}}"}
        }"#;
        let outcome = normalize_export(raw).unwrap();
        assert_eq!(
            outcome.data.sessions[0].name,
            Some(SessionName::from("Second"))
        );
    }
}
