//! Applying match results to input records.

use crate::matching::MatchResult;
use crate::record::{EnrichedRecord, InputRecord};

/// Build the enriched form of `input` from its match result.
///
/// Matched records receive the reference record's attributes verbatim, not
/// their normalized keys. Unmatched records keep every assigned and
/// corrected field absent.
pub fn enrich(row: usize, input: InputRecord, result: &MatchResult<'_>) -> EnrichedRecord {
    let mut enriched = EnrichedRecord::pending(row, input);
    enriched.validation_status = result.status();

    if let Some(reference) = result.record() {
        enriched.assigned_company = reference.company.clone();
        enriched.assigned_category = Some(reference.category.clone());
        enriched.corrected_name = reference.name.clone();
        enriched.corrected_email = reference.email.clone();
        enriched.corrected_position = reference.position.clone();
    }

    enriched
}
