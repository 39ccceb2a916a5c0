//! Matching input records against the reference index.
//!
//! Email is looked up first; name is a fallback for records whose email is
//! missing or garbled. Position and category hint never take part.

use serde::Serialize;

use crate::normalize::{normalize, normalize_field};
use crate::record::{InputRecord, ReferenceRecord, ValidationStatus};
use crate::reference::ReferenceIndex;

/// Result of looking up one input record in the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchResult<'a> {
    MatchedByEmail {
        record: &'a ReferenceRecord,
    },
    MatchedByName {
        record: &'a ReferenceRecord,
        email_was_corrected: bool,
    },
    Unmatched,
}

impl<'a> MatchResult<'a> {
    pub fn status(&self) -> ValidationStatus {
        match self {
            MatchResult::MatchedByEmail { .. } => ValidationStatus::MatchedByEmail,
            MatchResult::MatchedByName {
                email_was_corrected: true,
                ..
            } => ValidationStatus::MatchedByNameEmailCorrected,
            MatchResult::MatchedByName { .. } => ValidationStatus::MatchedByName,
            MatchResult::Unmatched => ValidationStatus::Unmatched,
        }
    }

    /// The matched reference record, if any.
    pub fn record(&self) -> Option<&'a ReferenceRecord> {
        match self {
            MatchResult::MatchedByEmail { record } | MatchResult::MatchedByName { record, .. } => {
                Some(*record)
            }
            MatchResult::Unmatched => None,
        }
    }
}

/// Look up `input` in the index.
pub fn match_record<'a>(input: &InputRecord, index: &'a ReferenceIndex) -> MatchResult<'a> {
    let email_key = normalize_field(&input.raw_email);

    if let Some(record) = email_key.as_ref().and_then(|k| index.by_email(k)) {
        return MatchResult::MatchedByEmail { record };
    }

    let Some(record) = normalize_field(&input.raw_name).and_then(|k| index.by_name(&k)) else {
        return MatchResult::Unmatched;
    };

    let email_was_corrected = match (email_key, normalize(record.email.as_deref())) {
        (Some(given), Some(canonical)) => given != canonical,
        _ => false,
    };

    MatchResult::MatchedByName {
        record,
        email_was_corrected,
    }
}
