//! Read survey rows from a workbook's first sheet

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use calamine::{Data, Reader, open_workbook_auto};
use chrono::NaiveDate;

use crate::config::CampaignProfile;
use crate::error::{ImportError, ImportResult};
use crate::ingest::types::{CellValue, RawRow};

/// Header used for blank header cells (suffixed `_1`, `_2`, ... when repeated)
const EMPTY_HEADER: &str = "__EMPTY";

/// Find the campaign's source workbook under `data_dir`
///
/// Candidates are tried in profile order; the first existing file wins.
pub fn resolve_source_file(data_dir: &Path, profile: &CampaignProfile) -> ImportResult<PathBuf> {
    let candidates = profile.source_candidates(data_dir);
    for candidate in &candidates {
        if candidate.is_file() {
            return Ok(candidate.clone());
        }
    }
    Err(ImportError::UnresolvedFile {
        campaign: profile.name.clone(),
        candidates,
    })
}

/// Read all data rows of the first sheet, keyed by the header row
///
/// Fully blank rows are skipped. Every returned row carries every header,
/// with `CellValue::Empty` for missing cells.
pub fn read_first_sheet(path: &Path) -> ImportResult<Vec<RawRow>> {
    let workbook_error = |message: String| ImportError::Workbook {
        path: path.to_path_buf(),
        message,
    };

    let mut workbook = open_workbook_auto(path).map_err(|e| workbook_error(e.to_string()))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| workbook_error("workbook has no sheets".to_string()))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| workbook_error(format!("failed to read sheet '{}': {}", sheet_name, e)))?;

    // Absolute sheet row of the header (0-based)
    let first_row = range.start().map(|(r, _)| r as usize).unwrap_or(0);

    let mut rows_iter = range.rows();
    let Some(header_row) = rows_iter.next() else {
        return Ok(Vec::new());
    };
    let headers = build_headers(header_row);

    let mut rows = Vec::new();
    for (idx, cells) in rows_iter.enumerate() {
        // header is sheet row first_row + 1 (1-based), data starts right below
        let mut row = RawRow::at_sheet_row(first_row + idx + 2);
        for (col, header) in headers.iter().enumerate() {
            let value = cells.get(col).map(convert_cell).unwrap_or_default();
            row.push(header.clone(), value);
        }
        if !row.is_empty() {
            rows.push(row);
        }
    }

    log::debug!(
        "Read {} data rows with {} columns from sheet '{}' of {}",
        rows.len(),
        headers.len(),
        sheet_name,
        path.display()
    );

    Ok(rows)
}

/// Turn the header row into unique header names
fn build_headers(header_row: &[Data]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    header_row
        .iter()
        .map(|cell| {
            let base = header_text(cell).unwrap_or_else(|| EMPTY_HEADER.to_string());
            let count = seen.entry(base.clone()).or_insert(0);
            let name = if *count == 0 {
                base.clone()
            } else {
                format!("{}_{}", base, count)
            };
            *count += 1;
            name
        })
        .collect()
}

fn header_text(cell: &Data) -> Option<String> {
    match cell {
        // Keep surrounding whitespace: exact header lookups depend on it
        Data::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) => {
            if f.fract() == 0.0 {
                Some((*f as i64).to_string())
            } else {
                Some(f.to_string())
            }
        }
        Data::Bool(b) => Some(b.to_string()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(s.clone()),
        _ => None,
    }
}

fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) if s.is_empty() => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) if dt.is_datetime() => {
            // calamine applies the workbook's date system (1900 or 1904)
            let (year, month, day, ..) = dt.to_ymd_hms_milli();
            match NaiveDate::from_ymd_opt(i32::from(year), u32::from(month), u32::from(day)) {
                Some(date) => CellValue::Date(date),
                None => CellValue::Number(dt.as_f64()),
            }
        }
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) => match s.get(..10).and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()) {
            Some(date) => CellValue::Date(date),
            None => CellValue::Text(s.clone()),
        },
        Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}
