//! Reading and writing experiment records as CSV
//!
//! The input is a CSV file with a header row. Column names are configured by
//! [`ColumnMapping`]; the subject, arm and outcome columns are required, the
//! timestamp and auxiliary counter columns are optional. Cells are trimmed
//! before parsing.

use std::io::{Read, Write};

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::record::{ExperimentRecord, MalformedInputError};

const TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum IngestError {
    #[display("failed to parse CSV: {_0}")]
    Csv(#[error(source)] csv::Error),
    #[display("failed to write CSV: {_0}")]
    Io(#[error(source)] std::io::Error),
    #[display("{_0}")]
    Malformed(#[error(source)] MalformedInputError),
}

/// Names of the CSV columns holding each record field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    pub subject_id: String,
    pub arm: String,
    pub outcome: String,
    pub timestamp: String,
    /// Auxiliary counter columns, read when present.
    pub counters: Vec<String>,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            subject_id: "user_id".to_owned(),
            arm: "group".to_owned(),
            outcome: "converted".to_owned(),
            timestamp: "timestamp".to_owned(),
            counters: vec!["clicks".to_owned(), "views".to_owned()],
        }
    }
}

#[derive(Debug)]
struct ColumnIndices {
    subject_id: usize,
    arm: usize,
    outcome: usize,
    timestamp: Option<usize>,
    counters: Vec<(String, usize)>,
}

impl ColumnIndices {
    fn resolve(
        headers: &csv::StringRecord,
        mapping: &ColumnMapping,
    ) -> Result<Self, MalformedInputError> {
        let find = |name: &str| headers.iter().position(|h| h == name);
        let require = |name: &str| {
            find(name).ok_or_else(|| MalformedInputError::MissingColumn {
                column: name.to_owned(),
            })
        };
        Ok(Self {
            subject_id: require(&mapping.subject_id)?,
            arm: require(&mapping.arm)?,
            outcome: require(&mapping.outcome)?,
            timestamp: find(&mapping.timestamp),
            counters: mapping
                .counters
                .iter()
                .filter_map(|name| find(name).map(|index| (name.clone(), index)))
                .collect(),
        })
    }
}

#[expect(clippy::float_cmp)]
fn parse_outcome(row: usize, value: &str) -> Result<bool, MalformedInputError> {
    if value.eq_ignore_ascii_case("true") {
        return Ok(true);
    }
    if value.eq_ignore_ascii_case("false") {
        return Ok(false);
    }
    match value.parse::<f64>() {
        Ok(v) if v == 1.0 => Ok(true),
        Ok(v) if v == 0.0 => Ok(false),
        _ => Err(MalformedInputError::NonBinaryOutcome {
            row,
            value: value.to_owned(),
        }),
    }
}

fn parse_timestamp(row: usize, value: &str) -> Result<NaiveDateTime, MalformedInputError> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.naive_utc())
        })
        .or_else(|| {
            NaiveDate::parse_from_str(value, DATE_FORMAT)
                .ok()
                .map(|date| date.and_time(NaiveTime::MIN))
        })
        .ok_or_else(|| MalformedInputError::InvalidTimestamp {
            row,
            value: value.to_owned(),
        })
}

fn parse_counter(row: usize, counter: &str, value: &str) -> Result<f64, MalformedInputError> {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| MalformedInputError::InvalidCounter {
            row,
            counter: counter.to_owned(),
            value: value.to_owned(),
        })
}

/// Reads experiment records from CSV.
///
/// Rows are numbered from 1, excluding the header. Empty timestamp or counter
/// cells are treated as absent.
///
/// # Examples
///
/// ```
/// use splitstat_analysis::ingest::{self, ColumnMapping};
///
/// let data = "\
/// user_id,group,converted,clicks
/// 1,control,0,3
/// 2,test,1,
/// ";
/// let records = ingest::read_csv(data.as_bytes(), &ColumnMapping::default()).unwrap();
/// assert_eq!(records.len(), 2);
/// assert_eq!(records[0].counters["clicks"], 3.0);
/// assert!(records[1].counters.is_empty());
/// ```
pub fn read_csv<R: Read>(
    reader: R,
    mapping: &ColumnMapping,
) -> Result<Vec<ExperimentRecord>, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let columns = ColumnIndices::resolve(reader.headers()?, mapping)?;
    tracing::debug!(?columns, "resolved CSV columns");

    let mut records = vec![];
    for (index, row) in reader.records().enumerate() {
        let row_number = index + 1;
        let row = row?;
        let cell = |column: usize| row.get(column).unwrap_or_default();

        let mut record = ExperimentRecord::new(
            cell(columns.subject_id),
            cell(columns.arm),
            parse_outcome(row_number, cell(columns.outcome))?,
        );
        if let Some(column) = columns.timestamp {
            let value = cell(column);
            if !value.is_empty() {
                record.timestamp = Some(parse_timestamp(row_number, value)?);
            }
        }
        for (name, column) in &columns.counters {
            let value = cell(*column);
            if !value.is_empty() {
                let parsed = parse_counter(row_number, name, value)?;
                record.counters.insert(name.clone(), parsed);
            }
        }
        records.push(record);
    }

    tracing::debug!(rows = records.len(), "read CSV records");
    Ok(records)
}

/// Writes experiment records as CSV readable by [`read_csv`].
///
/// Outcomes are written as `0`/`1`; absent timestamps and counters as empty
/// cells.
pub fn write_csv<W: Write>(
    writer: W,
    records: &[ExperimentRecord],
    mapping: &ColumnMapping,
) -> Result<(), IngestError> {
    let mut writer = csv::Writer::from_writer(writer);

    let mut header = vec![
        mapping.subject_id.as_str(),
        mapping.arm.as_str(),
        mapping.outcome.as_str(),
        mapping.timestamp.as_str(),
    ];
    header.extend(mapping.counters.iter().map(String::as_str));
    writer.write_record(&header)?;

    for record in records {
        let mut row = vec![
            record.subject_id.clone(),
            record.arm.clone(),
            u8::from(record.converted).to_string(),
            record
                .timestamp
                .map(|ts| ts.format(TIMESTAMP_FORMATS[0]).to_string())
                .unwrap_or_default(),
        ];
        row.extend(mapping.counters.iter().map(|name| {
            record
                .counters
                .get(name)
                .map(ToString::to_string)
                .unwrap_or_default()
        }));
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}
