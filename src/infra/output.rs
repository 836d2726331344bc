//! Report sinks: CSV file or JSON on stdout.

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use clap::ValueEnum;
use serde::Serialize;
use thiserror::Error;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use tracing::info;

use crate::domain::ProspectRecord;

/// Columns written to the CSV report.
pub const CSV_FIELDS: [&str; 5] = ["product", "profit", "price", "cost", "margin"];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    #[default]
    Csv,
    Json,
}

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("timestamp error: {0}")]
    Timestamp(#[from] time::error::Format),
}

pub fn write_csv<W: Write>(writer: W, records: &[ProspectRecord]) -> Result<(), OutputError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(CSV_FIELDS)?;
    for record in records {
        wtr.write_record([
            record.product.clone(),
            record.profit.to_string(),
            record.price.to_string(),
            record.cost.to_string(),
            record.margin.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: String,
    count: usize,
    prospects: &'a [ProspectRecord],
}

pub fn write_json<W: Write>(
    writer: W,
    records: &[ProspectRecord],
    generated_at: OffsetDateTime,
) -> Result<(), OutputError> {
    let report = JsonReport {
        generated_at: generated_at.format(&Rfc3339)?,
        count: records.len(),
        prospects: records,
    };
    let mut writer = writer;
    serde_json::to_writer_pretty(&mut writer, &report)?;
    writeln!(writer)?;
    Ok(())
}

/// Writes the report in the chosen format: CSV to `path`, JSON to stdout.
pub fn emit(
    format: ReportFormat,
    path: &Path,
    records: &[ProspectRecord],
) -> Result<(), OutputError> {
    match format {
        ReportFormat::Csv => {
            let file = BufWriter::new(File::create(path)?);
            write_csv(file, records)?;
            info!(count = records.len(), path = %path.display(), "wrote csv report");
        }
        ReportFormat::Json => {
            let stdout = io::stdout();
            write_json(stdout.lock(), records, OffsetDateTime::now_utc())?;
            info!(count = records.len(), "wrote json report");
        }
    }
    Ok(())
}
