use crate::error::PipelineError;
use crate::types::DistrictSummary;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};

pub const SUMMARY_FILE: &str = "district_summary.csv";
pub const RUN_SUMMARY_FILE: &str = "run_summary.json";

fn write_err(path: &Path) -> impl FnOnce(std::io::Error) -> PipelineError + '_ {
    move |source| PipelineError::Write {
        path: path.to_path_buf(),
        source,
    }
}

/// Write `header` and then one record per row.
///
/// The header is written explicitly so an empty table still carries its
/// columns. I/O failures surface as `Write` with the file path.
pub fn write_csv<T: Serialize>(path: &Path, header: &[&str], rows: &[T]) -> Result<(), PipelineError> {
    let csv_err = |e: csv::Error| {
        if e.is_io_error() {
            write_err(path)(e.into())
        } else {
            PipelineError::Serialize(e.to_string())
        }
    };
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(csv_err)?;
    wtr.write_record(header).map_err(csv_err)?;
    for r in rows {
        wtr.serialize(r).map_err(csv_err)?;
    }
    wtr.flush().map_err(write_err(path))?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), PipelineError> {
    let s = serde_json::to_string_pretty(value)?;
    fs::write(path, s).map_err(write_err(path))?;
    Ok(())
}

/// Replace `out_dir` with a directory holding the summary table and the run
/// statistics.
///
/// Everything is written to a sibling staging directory first and moved into
/// place at the end, so a failed run leaves no partial output behind.
pub fn write_result_dir<S: Serialize>(
    out_dir: &Path,
    rows: &[DistrictSummary],
    run: &S,
) -> Result<PathBuf, PipelineError> {
    let out_dir: PathBuf = out_dir.components().collect();
    let staging = PathBuf::from(format!("{}.staging", out_dir.display()));

    if staging.exists() {
        fs::remove_dir_all(&staging).map_err(write_err(&staging))?;
    }
    fs::create_dir_all(&staging).map_err(write_err(&staging))?;

    let staged = write_csv(&staging.join(SUMMARY_FILE), &DistrictSummary::COLUMNS, rows)
        .and_then(|()| write_json(&staging.join(RUN_SUMMARY_FILE), run));
    if let Err(e) = staged {
        let _ = fs::remove_dir_all(&staging);
        return Err(e);
    }

    if out_dir.exists() {
        fs::remove_dir_all(&out_dir).map_err(write_err(&out_dir))?;
    }
    fs::rename(&staging, &out_dir).map_err(write_err(&out_dir))?;
    Ok(out_dir.join(SUMMARY_FILE))
}

/// Print the first `max_rows` rows as a markdown table.
pub fn preview_table_rows<T: Tabled + Clone>(rows: &[T], max_rows: usize) {
    if rows.is_empty() {
        println!("(no districts)\n");
        return;
    }
    let head = rows[..rows.len().min(max_rows)].to_vec();
    let mut table = Table::new(head);
    table.with(Style::markdown());
    println!("{table}\n");
}
