//! Spreadsheet workbook reader (xlsx, xls, xlsb, ods).

use std::fs;
use std::path::Path;

use calamine::{Data, Reader, Sheets, open_workbook_auto};

use super::parser::hash_bytes;
use super::source::{DataTable, SourceMetadata};
use crate::error::{Result, RollcallError};

/// Extensions handled by [`read_sheet`].
pub const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xls", "xlsb", "ods"];

/// Read one named worksheet into a table. The first row is the header.
pub fn read_sheet(path: impl AsRef<Path>, sheet: &str) -> Result<(DataTable, SourceMetadata)> {
    let path = path.as_ref();
    let workbook_error = |message: String| RollcallError::Workbook {
        path: path.to_path_buf(),
        message,
    };

    let contents = fs::read(path).map_err(|e| RollcallError::io(path, e))?;

    let mut workbook: Sheets<_> = open_workbook_auto(path)
        .map_err(|e| workbook_error(format!("failed to open workbook: {}", e)))?;

    if !workbook.sheet_names().iter().any(|name| name == sheet) {
        return Err(RollcallError::InputSourceInvalid(format!(
            "sheet '{}' not found in '{}' (available: {})",
            sheet,
            path.display(),
            workbook.sheet_names().join(", ")
        )));
    }

    let range = workbook
        .worksheet_range(sheet)
        .map_err(|e| workbook_error(format!("failed to read sheet '{}': {}", sheet, e)))?;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row
            .iter()
            .map(|cell| cell_to_string(cell).trim().to_string())
            .collect(),
        None => {
            return Err(RollcallError::EmptyData(format!(
                "sheet '{}' is empty",
                sheet
            )));
        }
    };

    let rows: Vec<Vec<String>> = rows
        .map(|row| {
            let mut values: Vec<String> = row.iter().map(cell_to_string).collect();
            values.resize(headers.len(), String::new());
            values
        })
        .filter(|row| row.iter().any(|v| !v.is_empty()))
        .collect();

    if rows.is_empty() {
        return Err(RollcallError::EmptyData(format!(
            "sheet '{}' has no data rows",
            sheet
        )));
    }

    let format = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_else(|| "workbook".to_string());

    let table = DataTable::new(headers, rows);
    let metadata = SourceMetadata::new(
        path.to_path_buf(),
        hash_bytes(&contents),
        contents.len() as u64,
        format,
        table.row_count(),
        table.column_count(),
    );

    Ok((table, metadata))
}

/// Render a cell the way it reads on screen.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(n) => {
            // Integers without decimals (phone numbers, staff ids)
            if n.fract() == 0.0 && n.abs() < 1e15 {
                format!("{}", *n as i64)
            } else {
                format!("{}", n)
            }
        }
        Data::Int(n) => n.to_string(),
        Data::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        Data::Error(_) => String::new(),
        Data::DateTime(dt) => format!("{}", dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
    }
}
