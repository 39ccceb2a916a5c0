//! The reconciliation pipeline and its public facade.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::RollcallConfig;
use crate::dedup::flag_duplicates;
use crate::enrich::enrich;
use crate::error::Result;
use crate::export::{PartitionSink, WrittenPartition, write_partitions};
use crate::input::{InputRecordSource, SourceMetadata, load_input};
use crate::matching::{MatchResult, match_record};
use crate::normalize::normalize;
use crate::partition::{Partition, PartitionKind, partition_records};
use crate::record::{DuplicateFlag, EnrichedRecord, InputRecord, ValidationStatus};
use crate::reference::{
    IndexStats, LoadedSource, ReferenceIndex, ReferenceIndexBuilder, ReferenceRecordSource,
    SkippedSource, discover_reference_sources,
};

/// A record matched by email whose name was replaced by the canonical one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameCorrection {
    /// Zero-based input row.
    pub row: usize,
    /// The email the record was matched on, as given.
    pub email: Option<String>,
    pub from: String,
    pub to: String,
}

/// Records per validation status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub matched_by_email: usize,
    pub matched_by_name: usize,
    pub matched_by_name_email_corrected: usize,
    pub unmatched: usize,
}

impl StatusCounts {
    fn add(&mut self, status: ValidationStatus) {
        match status {
            ValidationStatus::MatchedByEmail => self.matched_by_email += 1,
            ValidationStatus::MatchedByName => self.matched_by_name += 1,
            ValidationStatus::MatchedByNameEmailCorrected => {
                self.matched_by_name_email_corrected += 1
            }
            ValidationStatus::Unmatched => self.unmatched += 1,
        }
    }

    pub fn get(&self, status: ValidationStatus) -> usize {
        match status {
            ValidationStatus::MatchedByEmail => self.matched_by_email,
            ValidationStatus::MatchedByName => self.matched_by_name,
            ValidationStatus::MatchedByNameEmailCorrected => self.matched_by_name_email_corrected,
            ValidationStatus::Unmatched => self.unmatched,
        }
    }

    pub fn matched(&self) -> usize {
        self.matched_by_email + self.matched_by_name + self.matched_by_name_email_corrected
    }
}

/// Records per duplicate flag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateCounts {
    pub unique: usize,
    pub consolidated_duplicate: usize,
}

/// Row counts for one output partition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionSummary {
    pub name: String,
    pub kind: PartitionKind,
    /// Rows that will be exported.
    pub rows: usize,
    /// Rows collapsed into an earlier identical row.
    pub dropped: usize,
}

/// Summary of a reconciliation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconciliationSummary {
    pub total_records: usize,
    pub status_counts: StatusCounts,
    pub duplicate_counts: DuplicateCounts,
    pub partitions: Vec<PartitionSummary>,
    pub loaded_sources: Vec<LoadedSource>,
    pub skipped_sources: Vec<SkippedSource>,
    pub index: IndexStats,
    pub name_corrections: usize,
    /// Configured input columns that were absent from the input file.
    pub missing_columns: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

impl ReconciliationSummary {
    /// Pretty-printed JSON form of the summary.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Everything a reconciliation run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconciliationResult {
    /// Metadata about the input file, when the input came from one.
    pub input: Option<SourceMetadata>,
    /// One enriched record per input record, in input order.
    pub records: Vec<EnrichedRecord>,
    /// Output partitions in first-seen order.
    pub partitions: Vec<Partition>,
    pub corrections: Vec<NameCorrection>,
    pub summary: ReconciliationSummary,
}

/// Reconciles input records against reference data.
///
/// ```no_run
/// use rollcall::Reconciler;
///
/// let reconciler = Reconciler::new();
/// let result = reconciler.run_files("responses.xlsx", "references/").unwrap();
/// println!("{} matched", result.summary.status_counts.matched());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Reconciler {
    config: RollcallConfig,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RollcallConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RollcallConfig {
        &self.config
    }

    /// Build the reference index from `sources` using the configured
    /// collision policy. `location` names where the sources came from in
    /// error messages.
    pub fn build_index<S: ReferenceRecordSource>(
        &self,
        sources: &[S],
        location: &str,
    ) -> Result<ReferenceIndex> {
        ReferenceIndexBuilder::new()
            .with_policy(self.config.collision)
            .with_location(location)
            .build(sources)
    }

    /// Discover and index the reference files in `dir`.
    pub fn build_index_from_dir(&self, dir: impl AsRef<Path>) -> Result<ReferenceIndex> {
        let dir = dir.as_ref();
        let sources = discover_reference_sources(dir, &self.config.reference)?;
        self.build_index(&sources, &dir.display().to_string())
    }

    /// Run the pipeline over `input` against a built index.
    pub fn reconcile<I>(&self, input: &I, index: &ReferenceIndex) -> Result<ReconciliationResult>
    where
        I: InputRecordSource + ?Sized,
    {
        Ok(self.reconcile_records(input.records()?, index))
    }

    /// Read the input file and reference directory, then reconcile.
    pub fn run_files(
        &self,
        input_path: impl AsRef<Path>,
        reference_dir: impl AsRef<Path>,
    ) -> Result<ReconciliationResult> {
        let loaded = load_input(input_path, &self.config.input)?;
        let index = self.build_index_from_dir(reference_dir)?;

        let mut result = self.reconcile_records(loaded.records, &index);
        result.summary.missing_columns = loaded.missing_columns;
        result.input = Some(loaded.source);
        Ok(result)
    }

    /// Hand every non-empty partition of `result` to `sink`.
    pub fn export(
        &self,
        result: &ReconciliationResult,
        sink: &mut dyn PartitionSink,
    ) -> Result<Vec<WrittenPartition>> {
        write_partitions(&result.partitions, &self.config.output, sink)
    }

    fn reconcile_records(
        &self,
        inputs: Vec<InputRecord>,
        index: &ReferenceIndex,
    ) -> ReconciliationResult {
        let mut corrections = Vec::new();

        let mut records: Vec<EnrichedRecord> = inputs
            .into_iter()
            .enumerate()
            .map(|(row, input)| {
                let result = match_record(&input, index);
                if let Some(correction) = name_correction(row, &input, &result) {
                    tracing::info!(
                        row = correction.row,
                        from = %correction.from,
                        to = %correction.to,
                        "corrected name from email match"
                    );
                    corrections.push(correction);
                }
                enrich(row, input, &result)
            })
            .collect();

        flag_duplicates(&mut records);
        let partitions = partition_records(&records, &self.config.output.uncategorized);
        let summary = summarize(&records, &partitions, index, corrections.len());

        ReconciliationResult {
            input: None,
            records,
            partitions,
            corrections,
            summary,
        }
    }
}

fn name_correction(
    row: usize,
    input: &InputRecord,
    result: &MatchResult<'_>,
) -> Option<NameCorrection> {
    let MatchResult::MatchedByEmail { record } = result else {
        return None;
    };

    let (Some(from), Some(to)) = (input.raw_name.as_deref(), record.name.as_deref()) else {
        return None;
    };
    let (Some(from_key), Some(to_key)) = (normalize(Some(from)), normalize(Some(to))) else {
        return None;
    };
    if from_key == to_key {
        return None;
    }

    Some(NameCorrection {
        row,
        email: input.raw_email.clone(),
        from: from.to_string(),
        to: to.to_string(),
    })
}

fn summarize(
    records: &[EnrichedRecord],
    partitions: &[Partition],
    index: &ReferenceIndex,
    name_corrections: usize,
) -> ReconciliationSummary {
    let mut status_counts = StatusCounts::default();
    let mut duplicate_counts = DuplicateCounts::default();

    for record in records {
        status_counts.add(record.validation_status);
        match record.duplicate_flag {
            DuplicateFlag::Unique => duplicate_counts.unique += 1,
            DuplicateFlag::ConsolidatedDuplicate => duplicate_counts.consolidated_duplicate += 1,
        }
    }

    ReconciliationSummary {
        total_records: records.len(),
        status_counts,
        duplicate_counts,
        partitions: partitions
            .iter()
            .map(|p| PartitionSummary {
                name: p.name.clone(),
                kind: p.kind.clone(),
                rows: p.records.len(),
                dropped: p.dropped,
            })
            .collect(),
        loaded_sources: index.loaded_sources().to_vec(),
        skipped_sources: index.skipped_sources().to_vec(),
        index: index.stats(),
        name_corrections,
        missing_columns: Vec::new(),
        generated_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ReferenceRecord;
    use crate::reference::MemoryReferenceSource;

    fn index() -> ReferenceIndex {
        let sales = MemoryReferenceSource::new(
            "Sales",
            vec![
                ReferenceRecord::new("")
                    .with_name("Jane Doe")
                    .with_email("jane.doe@co.com")
                    .with_position("Account Manager")
                    .with_company("Acme"),
                ReferenceRecord::new("")
                    .with_name("Bob Lee")
                    .with_email("bob@co.com")
                    .with_company("Acme"),
            ],
        );
        Reconciler::new()
            .build_index(&[sales], "memory")
            .unwrap()
    }

    #[test]
    fn test_one_output_per_input_in_order() {
        let inputs = vec![
            InputRecord::new(Some("Unknown"), Some("nobody@co.com")),
            InputRecord::new(Some("jane doe"), Some("JANE.DOE@CO.COM")),
            InputRecord::new(Some("Bob Lee"), Some("bob.lee@co.com")),
        ];

        let result = Reconciler::new().reconcile(&inputs, &index()).unwrap();

        assert_eq!(result.records.len(), 3);
        let rows: Vec<usize> = result.records.iter().map(|r| r.row).collect();
        assert_eq!(rows, vec![0, 1, 2]);
        assert_eq!(result.records[0].validation_status, ValidationStatus::Unmatched);
        assert_eq!(result.records[1].validation_status, ValidationStatus::MatchedByEmail);
        assert_eq!(
            result.records[2].validation_status,
            ValidationStatus::MatchedByNameEmailCorrected
        );
        assert_eq!(result.records[2].corrected_email.as_deref(), Some("bob@co.com"));
    }

    #[test]
    fn test_summary_counts() {
        let inputs = vec![
            InputRecord::new(Some("Jane Doe"), Some("jane.doe@co.com")),
            InputRecord::new(Some("Jane Doe"), Some("jane.doe@co.com")),
            InputRecord::new(Some("Bob Lee"), None),
            InputRecord::new(Some("Ghost"), None),
        ];

        let result = Reconciler::new().reconcile(&inputs, &index()).unwrap();
        let summary = &result.summary;

        assert_eq!(summary.total_records, 4);
        assert_eq!(summary.status_counts.matched_by_email, 2);
        assert_eq!(summary.status_counts.matched_by_name, 1);
        assert_eq!(summary.status_counts.unmatched, 1);
        assert_eq!(summary.status_counts.matched(), 3);
        assert_eq!(summary.duplicate_counts.consolidated_duplicate, 2);
        assert_eq!(summary.duplicate_counts.unique, 2);

        let sales = summary.partitions.iter().find(|p| p.name == "Sales").unwrap();
        assert_eq!(sales.rows, 2);
        assert_eq!(sales.dropped, 1);
        assert_eq!(summary.loaded_sources.len(), 1);
        assert_eq!(summary.index.records, 2);

        let json: serde_json::Value = serde_json::from_str(&summary.to_json().unwrap()).unwrap();
        assert_eq!(json["total_records"], 4);
        assert_eq!(json["status_counts"]["matched_by_email"], 2);
        assert_eq!(json["partitions"][0]["name"], "Sales");
    }

    #[test]
    fn test_name_correction_notice() {
        let inputs = vec![
            InputRecord::new(Some("J. Doe"), Some("jane.doe@co.com")),
            InputRecord::new(Some("jane  doe"), Some("jane.doe@co.com")),
        ];

        let result = Reconciler::new().reconcile(&inputs, &index()).unwrap();

        assert_eq!(result.corrections.len(), 1);
        let correction = &result.corrections[0];
        assert_eq!(correction.row, 0);
        assert_eq!(correction.from, "J. Doe");
        assert_eq!(correction.to, "Jane Doe");
        assert_eq!(result.summary.name_corrections, 1);
    }

    #[test]
    fn test_no_name_correction_without_both_names() {
        let nameless = MemoryReferenceSource::new(
            "Support",
            vec![ReferenceRecord::new("").with_email("help@co.com")],
        );
        let sales = MemoryReferenceSource::new(
            "Sales",
            vec![ReferenceRecord::new("")
                .with_name("Jane Doe")
                .with_email("jane.doe@co.com")],
        );
        let index = Reconciler::new()
            .build_index(&[nameless, sales], "memory")
            .unwrap();

        let inputs = vec![
            InputRecord::new(None, Some("jane.doe@co.com")),
            InputRecord::new(Some("  "), Some("jane.doe@co.com")),
            InputRecord::new(Some("Helpdesk"), Some("help@co.com")),
        ];
        let result = Reconciler::new().reconcile(&inputs, &index).unwrap();

        assert!(result
            .records
            .iter()
            .all(|r| r.validation_status == ValidationStatus::MatchedByEmail));
        assert!(result.corrections.is_empty());
        assert_eq!(result.summary.name_corrections, 0);
    }

    #[test]
    fn test_uncategorized_partition_uses_configured_name() {
        let mut config = RollcallConfig::default();
        config.output.uncategorized = "Unmatched".to_string();

        let inputs = vec![InputRecord::new(Some("Ghost"), None)];
        let result = Reconciler::with_config(config)
            .reconcile(&inputs, &index())
            .unwrap();

        assert_eq!(result.partitions.len(), 1);
        assert_eq!(result.partitions[0].name, "Unmatched");
        assert_eq!(result.partitions[0].kind, PartitionKind::Uncategorized);
    }

    #[test]
    fn test_empty_input() {
        let inputs: Vec<InputRecord> = Vec::new();
        let result = Reconciler::new().reconcile(&inputs, &index()).unwrap();
        assert!(result.records.is_empty());
        assert!(result.partitions.is_empty());
        assert_eq!(result.summary.total_records, 0);
    }
}
