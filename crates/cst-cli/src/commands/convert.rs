//! Convert command writing the normalized model as JSON.
//!
//! The output is the plain data contract downstream consumers (charting,
//! UI) read; nothing here depends on any rendering technology.

use std::io::Write;

use anyhow::{Context, Result};
use serde::Serialize;

use cst_core::{NormalizedData, TimestampIndex, build_timestamp_index};

/// Output payload: the normalized model, optionally with the unified
/// timestamp index embedded for time-series consumers.
#[derive(Debug, Serialize)]
struct ConvertOutput<'a> {
    #[serde(flatten)]
    data: &'a NormalizedData,
    #[serde(skip_serializing_if = "Option::is_none")]
    timestamps: Option<TimestampIndex>,
}

pub fn run<W: Write>(writer: &mut W, data: &NormalizedData, with_index: bool) -> Result<()> {
    let output = ConvertOutput {
        data,
        timestamps: with_index.then(|| build_timestamp_index(&data.sessions)),
    };
    serde_json::to_writer_pretty(&mut *writer, &output).context("failed to serialize output")?;
    writeln!(writer)?;
    Ok(())
}
