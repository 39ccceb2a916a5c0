//! Duplicate flagging over corrected values.
//!
//! Flagging is informational: no record is removed here. Partitions decide
//! later whether duplicates collapse.

use std::collections::HashMap;

use crate::record::{DuplicateFlag, EnrichedRecord};

/// The corrected fields whose joint equality means "same person".
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey<'a> {
    pub category: Option<&'a str>,
    pub email: Option<&'a str>,
    pub name: Option<&'a str>,
    pub position: Option<&'a str>,
}

impl<'a> DedupKey<'a> {
    pub fn of(record: &'a EnrichedRecord) -> Self {
        Self {
            category: record.assigned_category.as_deref(),
            email: record.corrected_email.as_deref(),
            name: record.corrected_name.as_deref(),
            position: record.corrected_position.as_deref(),
        }
    }
}

/// Flag every record whose dedup key is shared with at least one other
/// record. Absent fields compare equal to each other, so unmatched records
/// all share one key.
///
/// Returns the number of records flagged.
pub fn flag_duplicates(records: &mut [EnrichedRecord]) -> usize {
    let flags: Vec<DuplicateFlag> = {
        let mut group_sizes: HashMap<DedupKey<'_>, usize> = HashMap::new();
        for record in records.iter() {
            *group_sizes.entry(DedupKey::of(record)).or_insert(0) += 1;
        }

        records
            .iter()
            .map(|record| {
                if group_sizes[&DedupKey::of(record)] >= 2 {
                    DuplicateFlag::ConsolidatedDuplicate
                } else {
                    DuplicateFlag::Unique
                }
            })
            .collect()
    };

    for (record, flag) in records.iter_mut().zip(flags) {
        record.duplicate_flag = flag;
    }

    records
        .iter()
        .filter(|r| r.duplicate_flag == DuplicateFlag::ConsolidatedDuplicate)
        .count()
}
