//! CSV export for per-row assessments.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::grid::types::Assessment;

/// Column header for the assessment CSV.
const HEADER: &str = "line,timestamp,hour,threshold,deficit,adjusted_deficit,trigger,load_shedding";

/// Timestamp layout written to the `timestamp` column.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Exports assessments to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(assessments: &[Assessment], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(assessments, buf)
}

/// Writes assessments as CSV to any writer.
///
/// One header row, then one row per assessment in input order. Cells for an
/// absent timestamp or hour are left empty. Output is deterministic.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(assessments: &[Assessment], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(','))?;

    for a in assessments {
        wtr.write_record(&[
            a.line.to_string(),
            a.timestamp
                .map(|ts| ts.format(TIMESTAMP_FORMAT).to_string())
                .unwrap_or_default(),
            a.hour.map(|h| h.get().to_string()).unwrap_or_default(),
            format!("{:.1}", a.threshold),
            format!("{:.1}", a.deficit),
            format!("{:.1}", a.adjusted_deficit),
            a.trigger.to_string(),
            a.load_shedding.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
