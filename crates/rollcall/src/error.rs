//! Error types for the rollcall library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for rollcall operations.
#[derive(Debug, Error)]
pub enum RollcallError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Error reading a spreadsheet workbook.
    #[error("Workbook error for '{path}': {message}")]
    Workbook { path: PathBuf, message: String },

    /// Error writing an xlsx workbook.
    #[error("Xlsx write error: {0}")]
    XlsxWrite(#[from] rust_xlsxwriter::XlsxError),

    /// The reference directory does not exist.
    #[error("Reference directory '{path}' not found")]
    ReferenceSourceNotFound { path: PathBuf },

    /// A reference source lacks one or more required columns.
    #[error("Reference source '{source_name}' is missing required columns: {}", .missing.join(", "))]
    ReferenceSourceInvalid {
        source_name: String,
        missing: Vec<String>,
    },

    /// No reference source yielded a single record.
    #[error("No valid reference data found in '{location}'. Check the directory and file contents")]
    NoReferenceData { location: String },

    /// The input file does not exist.
    #[error("Input file '{path}' not found")]
    InputSourceNotFound { path: PathBuf },

    /// The input has none of the configured identifying columns.
    #[error("Invalid input: {0}")]
    InputSourceInvalid(String),

    /// Empty file or no rows to read.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Two reference records normalized to the same key under the reject policy.
    #[error("Reference key collision on {field} '{key}': '{first}' and '{second}'")]
    KeyCollision {
        field: &'static str,
        key: String,
        first: String,
        second: String,
    },

    /// File format not supported.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RollcallError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RollcallError::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether a failure while loading one reference source can be skipped.
    ///
    /// Failures that concern a single source are recovered locally; anything
    /// that says the whole run lacks data, or that a configured policy was
    /// violated, is fatal.
    pub fn is_source_recoverable(&self) -> bool {
        !matches!(
            self,
            RollcallError::ReferenceSourceNotFound { .. }
                | RollcallError::NoReferenceData { .. }
                | RollcallError::InputSourceNotFound { .. }
                | RollcallError::InputSourceInvalid(_)
                | RollcallError::KeyCollision { .. }
                | RollcallError::Config(_)
        )
    }
}

/// Result type alias for rollcall operations.
pub type Result<T> = std::result::Result<T, RollcallError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_source_message_lists_columns() {
        let err = RollcallError::ReferenceSourceInvalid {
            source_name: "Sales.csv".to_string(),
            missing: vec!["Email".to_string(), "Company".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Reference source 'Sales.csv' is missing required columns: Email, Company"
        );
    }

    #[test]
    fn test_recoverable_classification() {
        assert!(RollcallError::EmptyData("x".into()).is_source_recoverable());
        assert!(
            RollcallError::ReferenceSourceInvalid {
                source_name: "a".into(),
                missing: vec![],
            }
            .is_source_recoverable()
        );
        assert!(
            !RollcallError::NoReferenceData {
                location: "dir".into()
            }
            .is_source_recoverable()
        );
    }
}
