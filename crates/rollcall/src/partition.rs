//! Grouping enriched records into named output partitions.
//!
//! One partition per assigned category, plus one for records with no
//! category. Category partitions keep only the first record of each dedup
//! key; the uncategorized partition keeps every row, identical or not.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::config::OutputLabels;
use crate::dedup::DedupKey;
use crate::record::EnrichedRecord;

/// A column that can appear in an output partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    RawName,
    RawEmail,
    RawPosition,
    RawCategoryHint,
    CorrectedName,
    CorrectedPosition,
    AssignedCompany,
    CorrectedEmail,
    AssignedCategory,
    ValidationStatus,
    DuplicateFlag,
}

impl Field {
    /// Cell value for `record`; absent values are `None`.
    pub fn value<'a>(&self, record: &'a EnrichedRecord) -> Option<&'a str> {
        match self {
            Field::RawName => record.input.raw_name.as_deref(),
            Field::RawEmail => record.input.raw_email.as_deref(),
            Field::RawPosition => record.input.raw_position.as_deref(),
            Field::RawCategoryHint => record.input.raw_category_hint.as_deref(),
            Field::CorrectedName => record.corrected_name.as_deref(),
            Field::CorrectedPosition => record.corrected_position.as_deref(),
            Field::AssignedCompany => record.assigned_company.as_deref(),
            Field::CorrectedEmail => record.corrected_email.as_deref(),
            Field::AssignedCategory => record.assigned_category.as_deref(),
            Field::ValidationStatus => Some(record.validation_status.label()),
            Field::DuplicateFlag => Some(record.duplicate_flag.label()),
        }
    }
}

/// Column order of the uncategorized partition: raw input first, then
/// whatever was (not) corrected.
pub const UNCATEGORIZED_COLUMNS: &[Field] = &[
    Field::RawName,
    Field::RawEmail,
    Field::RawPosition,
    Field::RawCategoryHint,
    Field::CorrectedName,
    Field::CorrectedPosition,
    Field::AssignedCompany,
    Field::CorrectedEmail,
    Field::AssignedCategory,
    Field::ValidationStatus,
];

/// Column order of every category partition.
pub const CATEGORY_COLUMNS: &[Field] = &[
    Field::CorrectedName,
    Field::CorrectedPosition,
    Field::AssignedCompany,
    Field::CorrectedEmail,
    Field::RawCategoryHint,
    Field::AssignedCategory,
    Field::ValidationStatus,
    Field::DuplicateFlag,
];

/// Kind of partition; decides columns and dedup policy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "category", rename_all = "snake_case")]
pub enum PartitionKind {
    Category(String),
    Uncategorized,
}

impl PartitionKind {
    pub fn columns(&self) -> &'static [Field] {
        match self {
            PartitionKind::Category(_) => CATEGORY_COLUMNS,
            PartitionKind::Uncategorized => UNCATEGORIZED_COLUMNS,
        }
    }

    pub fn deduplicates(&self) -> bool {
        matches!(self, PartitionKind::Category(_))
    }
}

/// One named group of output records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Partition {
    pub kind: PartitionKind,
    /// Canonical name; sinks adapt it to their own naming rules.
    pub name: String,
    /// Records in first-seen input order, after deduplication.
    pub records: Vec<EnrichedRecord>,
    /// Records dropped as duplicates of an earlier record.
    pub dropped: usize,
}

impl Partition {
    /// Number of records assigned to this partition before deduplication.
    pub fn assigned(&self) -> usize {
        self.records.len() + self.dropped
    }

    /// Render the partition as header labels plus string rows.
    pub fn to_table(&self, labels: &OutputLabels) -> PartitionTable {
        let columns = self.kind.columns();
        PartitionTable {
            headers: columns.iter().map(|f| labels.label(*f).to_string()).collect(),
            rows: self
                .records
                .iter()
                .map(|record| {
                    columns
                        .iter()
                        .map(|f| f.value(record).unwrap_or_default().to_string())
                        .collect()
                })
                .collect(),
        }
    }
}

/// A partition laid out for a sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Split records by assigned category, in order of first appearance.
///
/// `uncategorized_name` names the partition of records with no category.
pub fn partition_records(records: &[EnrichedRecord], uncategorized_name: &str) -> Vec<Partition> {
    let mut groups: IndexMap<Option<&str>, Vec<&EnrichedRecord>> = IndexMap::new();
    for record in records {
        groups
            .entry(record.assigned_category.as_deref())
            .or_default()
            .push(record);
    }

    groups
        .into_iter()
        .map(|(category, members)| {
            let (kind, name) = match category {
                Some(c) => (PartitionKind::Category(c.to_string()), c.to_string()),
                None => (PartitionKind::Uncategorized, uncategorized_name.to_string()),
            };
            build_partition(kind, name, members)
        })
        .collect()
}

fn build_partition(kind: PartitionKind, name: String, members: Vec<&EnrichedRecord>) -> Partition {
    let total = members.len();

    let records: Vec<EnrichedRecord> = if kind.deduplicates() {
        let mut seen = HashSet::new();
        members
            .into_iter()
            .filter(|r| seen.insert(DedupKey::of(*r)))
            .cloned()
            .collect()
    } else {
        members.into_iter().cloned().collect()
    };

    let dropped = total - records.len();
    if dropped > 0 {
        tracing::debug!(partition = %name, dropped, "deduplicated partition");
    }

    Partition {
        kind,
        name,
        records,
        dropped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{DuplicateFlag, InputRecord, ValidationStatus};

    fn matched(row: usize, category: &str, email: &str) -> EnrichedRecord {
        let mut record = EnrichedRecord::pending(row, InputRecord::new(Some("x"), Some(email)));
        record.assigned_category = Some(category.to_string());
        record.corrected_email = Some(email.to_string());
        record.corrected_name = Some(format!("name of {email}"));
        record.validation_status = ValidationStatus::MatchedByEmail;
        record
    }

    fn unmatched(row: usize) -> EnrichedRecord {
        EnrichedRecord::pending(row, InputRecord::new(Some("Nobody"), None))
    }

    #[test]
    fn test_partitions_in_first_seen_order() {
        let records = vec![
            matched(0, "Support", "a@co.com"),
            unmatched(1),
            matched(2, "Sales", "b@co.com"),
            matched(3, "Support", "c@co.com"),
        ];

        let partitions = partition_records(&records, "Invalid_Uncategorized");
        let names: Vec<&str> = partitions.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Support", "Invalid_Uncategorized", "Sales"]);
        assert_eq!(partitions[0].records.len(), 2);
        assert_eq!(partitions[1].kind, PartitionKind::Uncategorized);
    }

    #[test]
    fn test_category_partition_keeps_first_duplicate() {
        let records = vec![
            matched(0, "Sales", "jane@co.com"),
            matched(1, "Sales", "bob@co.com"),
            matched(2, "Sales", "jane@co.com"),
        ];

        let partitions = partition_records(&records, "Invalid_Uncategorized");
        assert_eq!(partitions.len(), 1);
        let rows: Vec<usize> = partitions[0].records.iter().map(|r| r.row).collect();
        assert_eq!(rows, vec![0, 1]);
        assert_eq!(partitions[0].dropped, 1);
        assert_eq!(partitions[0].assigned(), 3);
    }

    #[test]
    fn test_uncategorized_keeps_every_row() {
        let records = vec![unmatched(0), unmatched(1), unmatched(2)];

        let partitions = partition_records(&records, "Invalid_Uncategorized");
        assert_eq!(partitions[0].records.len(), 3);
        assert_eq!(partitions[0].dropped, 0);
    }

    #[test]
    fn test_category_table_layout() {
        let mut record = matched(0, "Sales", "jane@co.com");
        record.input.raw_category_hint = Some("sales dept".to_string());
        record.duplicate_flag = DuplicateFlag::ConsolidatedDuplicate;

        let partitions = partition_records(&[record], "Invalid_Uncategorized");
        let table = partitions[0].to_table(&OutputLabels::default());

        assert_eq!(
            table.headers,
            vec![
                "Full Name",
                "Position",
                "Company",
                "Email",
                "Original Department/BU",
                "Assigned Business Unit",
                "Validation Status",
                "Duplicate Status",
            ]
        );
        assert_eq!(
            table.rows[0],
            vec![
                "name of jane@co.com",
                "",
                "",
                "jane@co.com",
                "sales dept",
                "Sales",
                "Matched by Email",
                "Consolidated Duplicate",
            ]
        );
    }

    #[test]
    fn test_uncategorized_table_layout() {
        let record = unmatched(0);
        let partitions = partition_records(&[record], "Invalid_Uncategorized");
        let table = partitions[0].to_table(&OutputLabels::default());

        assert_eq!(table.headers.len(), UNCATEGORIZED_COLUMNS.len());
        assert_eq!(table.headers[0], "Original Input Name");
        assert!(!table.headers.contains(&"Duplicate Status".to_string()));
        assert_eq!(table.rows[0][0], "Nobody");
        assert_eq!(table.rows[0][9], "Invalid/Unmatched");
    }
}
