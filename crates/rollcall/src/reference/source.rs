//! Reference sources: where canonical records come from.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::ReferenceColumns;
use crate::error::{Result, RollcallError};
use crate::input::Parser;
use crate::record::ReferenceRecord;

/// Extensions picked up when scanning a reference directory.
pub const REFERENCE_EXTENSIONS: &[&str] = &["csv", "tsv"];

/// One authoritative dataset. Its identity names the category every record
/// in it belongs to.
pub trait ReferenceRecordSource {
    /// Identity used in logs and reports, e.g. the file name.
    fn name(&self) -> String;

    /// Category label applied to every record of this source.
    fn category(&self) -> String;

    /// Read the records. Fields absent in the dataset stay absent.
    fn load(&self) -> Result<Vec<ReferenceRecord>>;
}

impl<T: ReferenceRecordSource + ?Sized> ReferenceRecordSource for Box<T> {
    fn name(&self) -> String {
        (**self).name()
    }

    fn category(&self) -> String {
        (**self).category()
    }

    fn load(&self) -> Result<Vec<ReferenceRecord>> {
        (**self).load()
    }
}

/// A reference roster stored as a delimited text file.
///
/// The category is the file stem: `Sales.csv` holds category `Sales`.
#[derive(Debug, Clone)]
pub struct CsvReferenceSource {
    path: PathBuf,
    columns: ReferenceColumns,
}

impl CsvReferenceSource {
    pub fn new(path: impl Into<PathBuf>, columns: ReferenceColumns) -> Self {
        Self {
            path: path.into(),
            columns,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReferenceRecordSource for CsvReferenceSource {
    fn name(&self) -> String {
        self.path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    fn category(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    fn load(&self) -> Result<Vec<ReferenceRecord>> {
        let (table, _) = Parser::new().parse_file(&self.path)?;

        let indices: Vec<Option<usize>> = self
            .columns
            .headers()
            .iter()
            .map(|h| table.column_index(h))
            .collect();

        let missing: Vec<String> = self
            .columns
            .headers()
            .iter()
            .zip(&indices)
            .filter(|(_, idx)| idx.is_none())
            .map(|(h, _)| h.to_string())
            .collect();

        if !missing.is_empty() {
            return Err(RollcallError::ReferenceSourceInvalid {
                source_name: self.name(),
                missing,
            });
        }

        let category = self.category();
        let cell = |row: usize, idx: Option<usize>| idx.and_then(|c| table.value(row, c));

        Ok((0..table.row_count())
            .map(|row| ReferenceRecord {
                name: cell(row, indices[0]),
                email: cell(row, indices[1]),
                position: cell(row, indices[2]),
                company: cell(row, indices[3]),
                category: category.clone(),
            })
            .collect())
    }
}

/// A reference source held in memory.
#[derive(Debug, Clone)]
pub struct MemoryReferenceSource {
    category: String,
    records: Vec<ReferenceRecord>,
}

impl MemoryReferenceSource {
    /// Records keep their attributes; their category is replaced by the
    /// source's.
    pub fn new(category: impl Into<String>, records: Vec<ReferenceRecord>) -> Self {
        let category = category.into();
        let records = records
            .into_iter()
            .map(|mut r| {
                r.category = category.clone();
                r
            })
            .collect();
        Self { category, records }
    }
}

impl ReferenceRecordSource for MemoryReferenceSource {
    fn name(&self) -> String {
        self.category.clone()
    }

    fn category(&self) -> String {
        self.category.clone()
    }

    fn load(&self) -> Result<Vec<ReferenceRecord>> {
        Ok(self.records.clone())
    }
}

/// List the reference files in `dir`, sorted by file name.
///
/// Sorting fixes the load order, which decides which record wins a key
/// collision.
pub fn discover_reference_sources(
    dir: impl AsRef<Path>,
    columns: &ReferenceColumns,
) -> Result<Vec<CsvReferenceSource>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(RollcallError::ReferenceSourceNotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(|e| RollcallError::io(dir, e))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && has_reference_extension(p))
        .collect();

    paths.sort_by_key(|p| p.file_name().map(|n| n.to_os_string()));

    Ok(paths
        .into_iter()
        .map(|p| CsvReferenceSource::new(p, columns.clone()))
        .collect())
}

fn has_reference_extension(path: &Path) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .is_some_and(|ext| REFERENCE_EXTENSIONS.contains(&ext.as_str()))
}
