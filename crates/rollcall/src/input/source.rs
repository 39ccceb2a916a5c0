//! Tabular data, source metadata, and the input record contract.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::InputColumns;
use crate::error::{Result, RollcallError};
use crate::record::InputRecord;

/// Metadata about a file that was read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without path.
    pub file: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// SHA-256 hash of the file contents.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Detected format (csv, tsv, xlsx, etc.).
    pub format: String,
    /// Number of data rows (excluding header).
    pub row_count: usize,
    /// Number of columns.
    pub column_count: usize,
    /// When the file was read.
    pub loaded_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Create metadata for a file that has been read.
    pub fn new(
        path: PathBuf,
        hash: String,
        size_bytes: u64,
        format: String,
        row_count: usize,
        column_count: usize,
    ) -> Self {
        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            file,
            path,
            hash,
            size_bytes,
            format,
            row_count,
            column_count,
            loaded_at: Utc::now(),
        }
    }
}

/// Represents parsed tabular data.
#[derive(Debug, Clone)]
pub struct DataTable {
    /// Column headers.
    pub headers: Vec<String>,
    /// Row data as strings (row-major order).
    pub rows: Vec<Vec<String>>,
}

impl DataTable {
    /// Create a new data table.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Get the number of rows (excluding header).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Position of a column by exact header name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.trim() == name.trim())
    }

    /// Get a specific cell value.
    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.get(col).map(|s| s.as_str()))
    }

    /// Get a cell as an optional value; null-like cells are absent.
    pub fn value(&self, row: usize, col: usize) -> Option<String> {
        self.get(row, col)
            .filter(|v| !Self::is_null_value(v))
            .map(str::to_string)
    }

    /// Check if a value represents a missing/null value.
    pub fn is_null_value(value: &str) -> bool {
        let trimmed = value.trim();
        trimmed.is_empty()
            || trimmed.eq_ignore_ascii_case("na")
            || trimmed.eq_ignore_ascii_case("n/a")
            || trimmed.eq_ignore_ascii_case("#n/a")
            || trimmed.eq_ignore_ascii_case("nan")
            || trimmed.eq_ignore_ascii_case("null")
            || trimmed.eq_ignore_ascii_case("none")
            || trimmed.eq_ignore_ascii_case("<na>")
    }
}

/// Anything that can yield input records in their original order.
pub trait InputRecordSource {
    fn records(&self) -> Result<Vec<InputRecord>>;
}

impl InputRecordSource for [InputRecord] {
    fn records(&self) -> Result<Vec<InputRecord>> {
        Ok(self.to_vec())
    }
}

impl InputRecordSource for Vec<InputRecord> {
    fn records(&self) -> Result<Vec<InputRecord>> {
        Ok(self.clone())
    }
}

/// Input records read from a table through the configured column names.
///
/// Configured columns that the table lacks read as absent for every row.
#[derive(Debug)]
pub struct TableInput<'a> {
    table: &'a DataTable,
    name: Option<usize>,
    email: Option<usize>,
    position: Option<usize>,
    category_hint: Option<usize>,
    missing: Vec<String>,
}

impl<'a> TableInput<'a> {
    /// Bind a table to the configured columns.
    ///
    /// Fails with [`RollcallError::InputSourceInvalid`] when none of the
    /// configured columns is present.
    pub fn new(table: &'a DataTable, columns: &InputColumns) -> Result<Self> {
        let name = table.column_index(&columns.name);
        let email = table.column_index(&columns.email);
        let position = table.column_index(&columns.position);
        let category_hint = table.column_index(&columns.category_hint);

        let missing: Vec<String> = columns
            .headers()
            .into_iter()
            .filter(|h| table.column_index(h).is_none())
            .map(str::to_string)
            .collect();

        if missing.len() == columns.headers().len() {
            return Err(RollcallError::InputSourceInvalid(format!(
                "no usable columns found; expected any of: {}",
                columns.headers().join(", ")
            )));
        }

        Ok(Self {
            table,
            name,
            email,
            position,
            category_hint,
            missing,
        })
    }

    /// Configured columns that the table does not have.
    pub fn missing_columns(&self) -> &[String] {
        &self.missing
    }

    fn cell(&self, row: usize, col: Option<usize>) -> Option<String> {
        col.and_then(|c| self.table.value(row, c))
    }
}

impl InputRecordSource for TableInput<'_> {
    fn records(&self) -> Result<Vec<InputRecord>> {
        Ok((0..self.table.row_count())
            .map(|row| InputRecord {
                raw_name: self.cell(row, self.name),
                raw_email: self.cell(row, self.email),
                raw_position: self.cell(row, self.position),
                raw_category_hint: self.cell(row, self.category_hint),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> DataTable {
        DataTable::new(
            vec![
                "Full Name (as per NRIC/Passport)".to_string(),
                "Work Email Address".to_string(),
            ],
            vec![
                vec!["Jane Doe".to_string(), "jane@co.com".to_string()],
                vec!["N/A".to_string(), "".to_string()],
            ],
        )
    }

    #[test]
    fn test_is_null_value() {
        assert!(DataTable::is_null_value(""));
        assert!(DataTable::is_null_value("NA"));
        assert!(DataTable::is_null_value("n/a"));
        assert!(DataTable::is_null_value("#N/A"));
        assert!(DataTable::is_null_value("NaN"));
        assert!(DataTable::is_null_value("None"));
        assert!(!DataTable::is_null_value("value"));
        assert!(!DataTable::is_null_value("0"));
    }

    #[test]
    fn test_table_input_missing_columns_are_absent() {
        let table = table();
        let input = TableInput::new(&table, &InputColumns::default()).unwrap();

        assert_eq!(
            input.missing_columns(),
            &["Position / Job Title", "Department / Business Unit"]
        );

        let records = input.records().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].raw_name.as_deref(), Some("Jane Doe"));
        assert_eq!(records[0].raw_position, None);
        assert_eq!(records[1], InputRecord::default());
    }

    #[test]
    fn test_table_input_without_configured_columns_is_invalid() {
        let table = DataTable::new(vec!["foo".to_string()], vec![vec!["x".to_string()]]);
        let err = TableInput::new(&table, &InputColumns::default()).unwrap_err();
        assert!(matches!(err, RollcallError::InputSourceInvalid(_)));
    }
}
