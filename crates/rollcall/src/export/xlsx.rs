//! Workbook sink: one worksheet per partition.

use std::path::PathBuf;

use rust_xlsxwriter::{Format, Workbook};

use super::{MAX_SHEET_NAME_LEN, PartitionSink, UniqueNames, sanitize_sheet_name};
use crate::error::Result;
use crate::partition::PartitionTable;

/// Writes partitions as worksheets of a single `.xlsx` file, saved on
/// [`PartitionSink::finish`].
pub struct XlsxSink {
    path: PathBuf,
    workbook: Workbook,
    names: UniqueNames,
    header_format: Format,
}

impl XlsxSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            workbook: Workbook::new(),
            names: UniqueNames::default(),
            header_format: Format::new().set_bold(),
        }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl PartitionSink for XlsxSink {
    fn write_partition(&mut self, name: &str, table: &PartitionTable) -> Result<String> {
        let sheet_name = self
            .names
            .claim(&sanitize_sheet_name(name), MAX_SHEET_NAME_LEN);

        let worksheet = self.workbook.add_worksheet().set_name(&sheet_name)?;

        for (col, header) in table.headers.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, header, &self.header_format)?;
        }

        for (row_idx, row) in table.rows.iter().enumerate() {
            let row32 = (row_idx + 1) as u32;
            for (col, value) in row.iter().enumerate() {
                // Leave absent values as truly empty cells
                if value.is_empty() {
                    continue;
                }
                worksheet.write_string(row32, col as u16, value)?;
            }
        }

        Ok(sheet_name)
    }

    fn finish(&mut self) -> Result<()> {
        self.workbook.save(&self.path)?;
        tracing::debug!(path = %self.path.display(), "saved workbook");
        Ok(())
    }
}
