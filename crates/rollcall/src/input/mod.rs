//! Input parsing and data source handling.

mod parser;
mod source;
mod workbook;

use std::path::Path;

pub use parser::{Parser, ParserConfig};
pub use source::{DataTable, InputRecordSource, SourceMetadata, TableInput};
pub use workbook::{WORKBOOK_EXTENSIONS, read_sheet};

use crate::config::InputColumns;
use crate::error::{Result, RollcallError};
use crate::record::InputRecord;

/// Extensions read as delimited text. Files without an extension are too.
pub const DELIMITED_EXTENSIONS: &[&str] = &["csv", "tsv", "txt", "tab", "psv"];

/// Input records read from a file, with what was learned while reading.
#[derive(Debug, Clone)]
pub struct LoadedInput {
    pub records: Vec<InputRecord>,
    pub source: SourceMetadata,
    /// Configured columns the file did not have; read as absent.
    pub missing_columns: Vec<String>,
}

/// Read a table from a delimited text file or a workbook sheet.
///
/// `sheet` is only consulted for workbook formats.
pub fn read_table(path: impl AsRef<Path>, sheet: &str) -> Result<(DataTable, SourceMetadata)> {
    let path = path.as_ref();
    match extension(path).as_deref() {
        Some(ext) if WORKBOOK_EXTENSIONS.contains(&ext) => read_sheet(path, sheet),
        None => Parser::new().parse_file(path),
        Some(ext) if DELIMITED_EXTENSIONS.contains(&ext) => Parser::new().parse_file(path),
        Some(ext) => Err(RollcallError::UnsupportedFormat(format!(
            "'{}' files are not supported; use a workbook or delimited text",
            ext
        ))),
    }
}

/// Load input records from `path` using the configured columns.
pub fn load_input(path: impl AsRef<Path>, columns: &InputColumns) -> Result<LoadedInput> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(RollcallError::InputSourceNotFound {
            path: path.to_path_buf(),
        });
    }

    let (table, source) = read_table(path, &columns.sheet)?;
    let input = TableInput::new(&table, columns)?;

    if !input.missing_columns().is_empty() {
        tracing::warn!(
            file = %source.file,
            missing = ?input.missing_columns(),
            "configured input columns not found; treating them as empty"
        );
    }

    Ok(LoadedInput {
        records: input.records()?,
        missing_columns: input.missing_columns().to_vec(),
        source,
    })
}

fn extension(path: &Path) -> Option<String> {
    path.extension().map(|e| e.to_string_lossy().to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_is_lowercased() {
        assert_eq!(extension(Path::new("ROSTER.XLSX")).as_deref(), Some("xlsx"));
        assert_eq!(extension(Path::new("roster")), None);
    }

    #[test]
    fn test_unsupported_format() {
        let err = read_table("responses.parquet", "Sheet1").unwrap_err();
        assert!(matches!(err, RollcallError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_reads_delimited_text() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("responses.tsv");
        std::fs::write(&path, "Work Email Address\tFull Name (as per NRIC/Passport)\nann@co.com\tAnn\n")
            .unwrap();

        let loaded = load_input(&path, &InputColumns::default()).unwrap();
        assert_eq!(loaded.source.format, "tsv");
        assert_eq!(loaded.records.len(), 1);
        assert_eq!(loaded.records[0].raw_name.as_deref(), Some("Ann"));
        assert_eq!(loaded.missing_columns.len(), 2);
    }

    #[test]
    fn test_missing_input_file() {
        let err = load_input("/nonexistent/input.csv", &InputColumns::default()).unwrap_err();
        assert!(matches!(err, RollcallError::InputSourceNotFound { .. }));
    }
}
