//! Sessions command for listing the sessions in an export.

use std::io::Write;

use anyhow::Result;
use serde::Serialize;

use cst_core::{NormalizedData, Session, Solve, format_duration};

/// One row of the session listing.
#[derive(Debug, Serialize)]
struct SessionRow {
    name: Option<String>,
    solves: usize,
    best: String,
    first: Option<String>,
    last: Option<String>,
}

impl SessionRow {
    fn from_session(session: &Session) -> Self {
        let best = session
            .solves
            .iter()
            .map(|solve| solve.time)
            .filter(|&time| time != 0)
            .min()
            .map_or_else(|| "0".to_string(), format_duration);

        Self {
            name: session.name.as_ref().map(ToString::to_string),
            solves: session.solves.len(),
            best,
            first: session.solves.first().and_then(solve_date),
            last: session.solves.last().and_then(solve_date),
        }
    }
}

/// The solve's recording date (UTC) for display.
fn solve_date(solve: &Solve) -> Option<String> {
    solve
        .created_at_utc()
        .map(|dt| dt.format("%Y-%m-%d").to_string())
}

pub fn run<W: Write>(writer: &mut W, data: &NormalizedData, json: bool) -> Result<()> {
    let rows: Vec<SessionRow> = data.sessions.iter().map(SessionRow::from_session).collect();

    if json {
        serde_json::to_writer_pretty(&mut *writer, &rows)?;
        writeln!(writer)?;
        return Ok(());
    }

    writeln!(writer, "Sessions: {}", rows.len())?;
    for row in &rows {
        let name = row.name.as_deref().unwrap_or("(unnamed)");
        let noun = if row.solves == 1 { "solve" } else { "solves" };
        write!(writer, "- {name}: {} {noun}, best {}", row.solves, row.best)?;
        match (&row.first, &row.last) {
            (Some(first), Some(last)) if first != last => {
                write!(writer, ", {first} to {last}")?;
            }
            (Some(first), _) => write!(writer, ", {first}")?,
            _ => {}
        }
        writeln!(writer)?;
    }
    Ok(())
}
