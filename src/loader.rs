use crate::error::PipelineError;
use crate::types::{RawIncidentRow, RawOffenseRow};
use csv::{ByteRecord, ReaderBuilder, StringRecord};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};

pub const CRIME_FILE: &str = "crime.csv";
pub const OFFENSE_FILE: &str = "offense_codes.csv";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub total_rows: usize,
    pub parse_errors: usize,
}

/// Where the two input tables come from.
///
/// The pipeline only sees rows; the filesystem layout is owned by the
/// implementation.
pub trait IncidentSource {
    fn incidents(&self) -> Result<(Vec<RawIncidentRow>, LoadReport), PipelineError>;

    fn offense_codes(&self) -> Result<(Vec<RawOffenseRow>, LoadReport), PipelineError>;
}

/// A directory holding `crime.csv` and `offense_codes.csv`.
#[derive(Debug, Clone)]
pub struct CsvDirectory {
    root: PathBuf,
}

impl CsvDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl IncidentSource for CsvDirectory {
    fn incidents(&self) -> Result<(Vec<RawIncidentRow>, LoadReport), PipelineError> {
        load_rows(&self.root.join(CRIME_FILE))
    }

    fn offense_codes(&self) -> Result<(Vec<RawOffenseRow>, LoadReport), PipelineError> {
        load_rows(&self.root.join(OFFENSE_FILE))
    }
}

/// Read every row of a headed CSV file into `T`.
///
/// Bytes that are not UTF-8 are decoded lossily (the offense-code export is
/// Latin-1). Rows that cannot be read or deserialized are counted and
/// skipped; only a missing or unreadable file is fatal.
pub fn load_rows<T: DeserializeOwned>(path: &Path) -> Result<(Vec<T>, LoadReport), PipelineError> {
    let ingest = |source: csv::Error| PipelineError::Ingest {
        path: path.to_path_buf(),
        source,
    };
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(ingest)?;
    let headers = lossy(rdr.byte_headers().map_err(ingest)?);

    let mut rows = Vec::new();
    let mut report = LoadReport::default();
    let mut record = ByteRecord::new();
    loop {
        match rdr.read_byte_record(&mut record) {
            Ok(false) => break,
            Ok(true) => {
                report.total_rows += 1;
                match lossy(&record).deserialize::<T>(Some(&headers)) {
                    Ok(row) => rows.push(row),
                    Err(e) => {
                        log::debug!("{}: skipping row {}: {e}", path.display(), report.total_rows);
                        report.parse_errors += 1;
                    }
                }
            }
            Err(e) if e.is_io_error() => return Err(ingest(e)),
            Err(e) => {
                report.total_rows += 1;
                log::debug!("{}: skipping row {}: {e}", path.display(), report.total_rows);
                report.parse_errors += 1;
            }
        }
    }
    Ok((rows, report))
}

fn lossy(record: &ByteRecord) -> StringRecord {
    record
        .iter()
        .map(|field| String::from_utf8_lossy(field).into_owned())
        .collect::<Vec<_>>()
        .into()
}
