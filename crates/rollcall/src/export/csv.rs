//! Directory sink: one CSV file per partition.

use std::fs;
use std::path::{Path, PathBuf};

use super::{MAX_SHEET_NAME_LEN, PartitionSink, UniqueNames, sanitize_sheet_name};
use crate::error::{Result, RollcallError};
use crate::partition::PartitionTable;

/// Writes each partition to `<dir>/<name>.csv`.
pub struct CsvDirectorySink {
    dir: PathBuf,
    names: UniqueNames,
    written: Vec<PathBuf>,
}

impl CsvDirectorySink {
    /// Create the output directory (and parents) if needed.
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| RollcallError::io(&dir, e))?;
        Ok(Self {
            dir,
            names: UniqueNames::default(),
            written: Vec::new(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Files written so far.
    pub fn files(&self) -> &[PathBuf] {
        &self.written
    }
}

impl PartitionSink for CsvDirectorySink {
    fn write_partition(&mut self, name: &str, table: &PartitionTable) -> Result<String> {
        let file_stem = self
            .names
            .claim(&sanitize_sheet_name(name), MAX_SHEET_NAME_LEN);
        let path = self.dir.join(format!("{}.csv", file_stem));

        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record(&table.headers)?;
        for row in &table.rows {
            writer.write_record(row)?;
        }
        writer.flush().map_err(|e| RollcallError::io(&path, e))?;

        self.written.push(path);
        Ok(file_stem)
    }

    fn finish(&mut self) -> Result<()> {
        tracing::debug!(
            dir = %self.dir.display(),
            files = self.written.len(),
            "wrote csv partitions"
        );
        Ok(())
    }
}
