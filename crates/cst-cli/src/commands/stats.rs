//! Stats command for summary statistics across the whole export.

use std::io::Write;

use anyhow::Result;
use serde::Serialize;

use cst_core::{NormalizedData, best_single, best_single_ms, build_timestamp_index};

/// Summary values derived from the unified timestamp index.
#[derive(Debug, Serialize)]
struct StatsReport {
    sessions: usize,
    solves: usize,
    dnf_solves: usize,
    distinct_timestamps: usize,
    best_single_ms: Option<i64>,
    best_single: String,
}

impl StatsReport {
    fn from_data(data: &NormalizedData) -> Self {
        let index = build_timestamp_index(&data.sessions);
        Self {
            sessions: data.sessions.len(),
            solves: data.sessions.iter().map(|s| s.solves.len()).sum(),
            dnf_solves: data
                .sessions
                .iter()
                .flat_map(|s| &s.solves)
                .filter(|solve| solve.is_dnf())
                .count(),
            distinct_timestamps: index.len(),
            best_single_ms: best_single_ms(&index),
            best_single: best_single(&index),
        }
    }
}

pub fn run<W: Write>(writer: &mut W, data: &NormalizedData, json: bool) -> Result<()> {
    let report = StatsReport::from_data(data);

    if json {
        serde_json::to_writer_pretty(&mut *writer, &report)?;
        writeln!(writer)?;
        return Ok(());
    }

    writeln!(writer, "Sessions: {}", report.sessions)?;
    writeln!(writer, "Solves: {} ({} DNF)", report.solves, report.dnf_solves)?;
    writeln!(writer, "Distinct timestamps: {}", report.distinct_timestamps)?;
    writeln!(writer, "Best single: {}", report.best_single)?;
    Ok(())
}
