//! Fuzz target for the reconciliation pipeline.
//!
//! Arbitrary reference and input records must always produce exactly one
//! output record per input.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use rollcall::{InputRecord, MemoryReferenceSource, Reconciler, ReferenceRecord};

#[derive(Debug, Arbitrary)]
struct Person {
    name: Option<String>,
    email: Option<String>,
}

#[derive(Debug, Arbitrary)]
struct Case {
    references: Vec<(u8, Person)>,
    inputs: Vec<Person>,
}

fuzz_target!(|case: Case| {
    let sources: Vec<MemoryReferenceSource> = (0u8..4)
        .map(|c| {
            let records = case
                .references
                .iter()
                .filter(|(category, _)| category % 4 == c)
                .map(|(_, person)| {
                    let mut record = ReferenceRecord::new("");
                    record.name = person.name.clone();
                    record.email = person.email.clone();
                    record
                })
                .collect();
            MemoryReferenceSource::new(format!("Category {}", c), records)
        })
        .collect();

    // Sources with no records are skipped; no records at all is an error
    let Ok(index) = Reconciler::new().build_index(&sources, "fuzz") else {
        return;
    };

    let inputs: Vec<InputRecord> = case
        .inputs
        .iter()
        .map(|p| InputRecord::new(p.name.as_deref(), p.email.as_deref()))
        .collect();

    if let Ok(result) = Reconciler::new().reconcile(&inputs, &index) {
        assert_eq!(result.records.len(), inputs.len());
        let assigned: usize = result.partitions.iter().map(|p| p.assigned()).sum();
        assert_eq!(assigned, inputs.len());
    }
});
