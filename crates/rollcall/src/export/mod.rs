//! Output sinks for partitioned records.
//!
//! The core hands each non-empty partition to a [`PartitionSink`] under its
//! canonical name; the sink adapts the name to its own constraints.

mod csv;
mod xlsx;

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Serialize;

pub use self::csv::CsvDirectorySink;
pub use self::xlsx::XlsxSink;

use crate::config::OutputLabels;
use crate::error::Result;
use crate::partition::{Partition, PartitionTable};

/// Maximum worksheet name length accepted by spreadsheet applications.
pub const MAX_SHEET_NAME_LEN: usize = 31;

/// Worksheet name Excel keeps for itself.
const RESERVED_SHEET_NAME: &str = "History";

/// Receives rendered partitions.
pub trait PartitionSink {
    /// Write one partition. Returns the name actually used.
    fn write_partition(&mut self, name: &str, table: &PartitionTable) -> Result<String>;

    /// Flush everything written so far.
    fn finish(&mut self) -> Result<()>;
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One workbook, one worksheet per partition.
    #[default]
    Xlsx,
    /// One directory, one CSV file per partition.
    Csv,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "xlsx" | "excel" => Ok(OutputFormat::Xlsx),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown format: {}. Use xlsx or csv.", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Xlsx => write!(f, "xlsx"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

impl OutputFormat {
    /// Default output location derived from the input file:
    /// `filtered-<stem>.xlsx` or the directory `filtered-<stem>`.
    pub fn default_output(&self, input: &Path) -> PathBuf {
        let stem = input.file_stem().unwrap_or_default().to_string_lossy();
        match self {
            OutputFormat::Xlsx => PathBuf::from(format!("filtered-{}.xlsx", stem)),
            OutputFormat::Csv => PathBuf::from(format!("filtered-{}", stem)),
        }
    }

    /// Open a sink of this format writing to `path`.
    pub fn open_sink(&self, path: impl Into<PathBuf>) -> Result<Box<dyn PartitionSink>> {
        let sink: Box<dyn PartitionSink> = match self {
            OutputFormat::Xlsx => Box::new(XlsxSink::new(path)),
            OutputFormat::Csv => Box::new(CsvDirectorySink::create(path)?),
        };
        Ok(sink)
    }
}

/// One partition as it landed in a sink.
#[derive(Debug, Clone, Serialize)]
pub struct WrittenPartition {
    pub name: String,
    pub written_as: String,
    pub rows: usize,
}

/// Render and write every non-empty partition, then finish the sink.
pub fn write_partitions(
    partitions: &[Partition],
    labels: &OutputLabels,
    sink: &mut dyn PartitionSink,
) -> Result<Vec<WrittenPartition>> {
    let mut written = Vec::new();

    for partition in partitions.iter().filter(|p| !p.records.is_empty()) {
        let table = partition.to_table(labels);
        let written_as = sink.write_partition(&partition.name, &table)?;
        tracing::info!(
            partition = %partition.name,
            sheet = %written_as,
            rows = table.rows.len(),
            "wrote partition"
        );
        written.push(WrittenPartition {
            name: partition.name.clone(),
            written_as,
            rows: table.rows.len(),
        });
    }

    sink.finish()?;
    Ok(written)
}

/// Adapt a canonical partition name to worksheet naming rules.
///
/// Slashes become dashes, `: * ? [ ]` are dropped, surrounding apostrophes
/// are trimmed, and the result is cut to 31 characters. Excel reserves
/// `History`, which gets a trailing underscore.
pub fn sanitize_sheet_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter_map(|c| match c {
            '/' | '\\' => Some('-'),
            ':' | '*' | '?' | '[' | ']' => None,
            c => Some(c),
        })
        .collect();

    let truncated: String = cleaned
        .trim_matches('\'')
        .chars()
        .take(MAX_SHEET_NAME_LEN)
        .collect();
    let truncated = truncated.trim_end_matches('\'');

    if truncated.trim().is_empty() {
        "Sheet".to_string()
    } else if truncated.eq_ignore_ascii_case(RESERVED_SHEET_NAME) {
        format!("{}_", truncated)
    } else {
        truncated.to_string()
    }
}

/// Hands out names that are unique ignoring case, suffixing `~2`, `~3`, …
/// and trimming the base so the result stays within `max_len` characters.
#[derive(Debug, Default)]
pub(crate) struct UniqueNames {
    taken: HashSet<String>,
}

impl UniqueNames {
    pub(crate) fn claim(&mut self, base: &str, max_len: usize) -> String {
        if self.taken.insert(base.to_lowercase()) {
            return base.to_string();
        }

        let mut n = 2;
        loop {
            let suffix = format!("~{}", n);
            let keep = max_len.saturating_sub(suffix.chars().count());
            let candidate: String = base.chars().take(keep).chain(suffix.chars()).collect();
            if self.taken.insert(candidate.to_lowercase()) {
                return candidate;
            }
            n += 1;
        }
    }
}
