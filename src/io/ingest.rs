//! CSV ingest of hourly grid metrics.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use chrono::NaiveDateTime;
use thiserror::Error;
use tracing::{error, info};

use crate::config::InputConfig;
use crate::grid::error::EstimateError;
use crate::grid::pipeline::ThresholdSource;
use crate::grid::types::{Field, GridMetricsRow, HourlyRecord};

/// Errors raised while reading a grid-metrics table.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("cannot open \"{path}\": {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("no data rows after the header")]
    EmptyInput,
    #[error("line {line}: column `{column}` has invalid value \"{value}\"")]
    InvalidValue {
        line: usize,
        column: String,
        value: String,
    },
    #[error("line {line}: timestamp \"{value}\" does not match \"{format}\": {source}")]
    Timestamp {
        line: usize,
        value: String,
        format: String,
        #[source]
        source: chrono::ParseError,
    },
    #[error("line {line}: {source}")]
    Row {
        line: usize,
        #[source]
        source: EstimateError,
    },
}

/// Positions of the known columns within the header row.
struct Columns {
    fields: [Option<usize>; Field::COUNT],
    timestamp: Option<usize>,
}

impl Columns {
    fn locate(headers: &csv::StringRecord, timestamp_column: &str) -> Self {
        let find = |pred: &dyn Fn(&str) -> bool| headers.iter().position(|h| pred(h));
        let mut fields = [None; Field::COUNT];
        for (slot, field) in fields.iter_mut().zip(Field::ALL) {
            *slot = find(&|h| field.matches(h));
        }
        Self {
            fields,
            timestamp: find(&|h| h.trim() == timestamp_column),
        }
    }
}

/// Non-empty, trimmed cell at `index`.
fn cell(record: &csv::StringRecord, index: Option<usize>) -> Option<&str> {
    index
        .and_then(|i| record.get(i))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Reads hourly records from CSV with a header row.
///
/// Columns are matched by canonical field name or dataset alias. The
/// `total_uclf_oclf` column never feeds the decision and defaults to `0.0`
/// when absent. With [`ThresholdSource::Hour`] the `load_shedding_threshold`
/// column may also be absent, as it is filled in later from the timestamp.
///
/// # Errors
///
/// Returns an [`IngestError`] for malformed CSV, empty input, missing
/// required cells, non-numeric or non-finite values, and bad timestamps.
pub fn read_records<R: Read>(
    reader: R,
    input: &InputConfig,
    source: ThresholdSource,
) -> Result<Vec<HourlyRecord>, IngestError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::Headers).from_reader(reader);
    let columns = Columns::locate(rdr.headers()?, &input.timestamp_column);
    let optional: &[Field] = match source {
        ThresholdSource::Hour => &[Field::TotalUclfOclf, Field::LoadSheddingThreshold],
        ThresholdSource::Column => &[Field::TotalUclfOclf],
    };

    let mut out = Vec::new();
    for (index, result) in rdr.records().enumerate() {
        let record = result?;
        let line = record
            .position()
            .map_or(index + 2, |p| p.line() as usize);

        let mut values = [None; Field::COUNT];
        for ((value, field), column) in values.iter_mut().zip(Field::ALL).zip(columns.fields) {
            if let Some(raw) = cell(&record, column) {
                let parsed = raw
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| IngestError::InvalidValue {
                        line,
                        column: field.name().to_string(),
                        value: raw.to_string(),
                    })?;
                *value = Some(parsed);
            }
        }

        let row = GridMetricsRow::from_lookup(
            |field| {
                Field::ALL
                    .iter()
                    .position(|f| *f == field)
                    .and_then(|i| values[i])
            },
            optional,
        )
        .map_err(|source| IngestError::Row { line, source })?;

        let timestamp = cell(&record, columns.timestamp)
            .map(|raw| {
                NaiveDateTime::parse_from_str(raw, &input.timestamp_format).map_err(|source| {
                    IngestError::Timestamp {
                        line,
                        value: raw.to_string(),
                        format: input.timestamp_format.clone(),
                        source,
                    }
                })
            })
            .transpose()?;

        out.push(HourlyRecord {
            line,
            timestamp,
            row,
        });
    }

    if out.is_empty() {
        return Err(IngestError::EmptyInput);
    }
    Ok(out)
}

/// Reads hourly records from a CSV file, logging the outcome.
///
/// # Errors
///
/// See [`read_records`]; also fails with [`IngestError::Io`] if the file
/// cannot be opened.
pub fn read_records_from_path(
    path: &Path,
    input: &InputConfig,
    source: ThresholdSource,
) -> Result<Vec<HourlyRecord>, IngestError> {
    let result = File::open(path)
        .map_err(|source| IngestError::Io {
            path: path.display().to_string(),
            source,
        })
        .and_then(|file| read_records(io::BufReader::new(file), input, source));

    match &result {
        Ok(records) => info!(path = %path.display(), rows = records.len(), "read CSV"),
        Err(e) => error!(path = %path.display(), "failed to read CSV: {e}"),
    }
    result
}
