//! Record types flowing through the reconciliation pipeline.

use serde::{Deserialize, Serialize};

/// One self-reported entry as read from the input source.
///
/// Never mutated after it is read; enrichment wraps it in an
/// [`EnrichedRecord`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputRecord {
    pub raw_name: Option<String>,
    pub raw_email: Option<String>,
    pub raw_position: Option<String>,
    pub raw_category_hint: Option<String>,
}

impl InputRecord {
    /// Create a record from name and email only.
    pub fn new(name: Option<&str>, email: Option<&str>) -> Self {
        Self {
            raw_name: name.map(str::to_string),
            raw_email: email.map(str::to_string),
            ..Self::default()
        }
    }

    pub fn with_position(mut self, position: impl Into<String>) -> Self {
        self.raw_position = Some(position.into());
        self
    }

    pub fn with_category_hint(mut self, hint: impl Into<String>) -> Self {
        self.raw_category_hint = Some(hint.into());
        self
    }
}

/// One canonical entry from a reference source.
///
/// `category` comes from the identity of the source (its file stem), not
/// from a column in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceRecord {
    pub name: Option<String>,
    pub email: Option<String>,
    pub position: Option<String>,
    pub company: Option<String>,
    pub category: String,
}

impl ReferenceRecord {
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            name: None,
            email: None,
            position: None,
            company: None,
            category: category.into(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_position(mut self, position: impl Into<String>) -> Self {
        self.position = Some(position.into());
        self
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    /// Short description used in logs and collision reports.
    pub fn describe(&self) -> String {
        format!(
            "{} <{}> ({})",
            self.name.as_deref().unwrap_or("-"),
            self.email.as_deref().unwrap_or("-"),
            self.category
        )
    }
}

/// Outcome of validating a record against the reference index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    MatchedByEmail,
    MatchedByName,
    MatchedByNameEmailCorrected,
    #[default]
    Unmatched,
}

impl ValidationStatus {
    /// Label written to output sheets.
    pub fn label(&self) -> &'static str {
        match self {
            ValidationStatus::MatchedByEmail => "Matched by Email",
            ValidationStatus::MatchedByName => "Matched by Name",
            ValidationStatus::MatchedByNameEmailCorrected => "Matched by Name (Email Corrected)",
            ValidationStatus::Unmatched => "Invalid/Unmatched",
        }
    }

    pub fn is_matched(&self) -> bool {
        !matches!(self, ValidationStatus::Unmatched)
    }

    pub const ALL: [ValidationStatus; 4] = [
        ValidationStatus::MatchedByEmail,
        ValidationStatus::MatchedByName,
        ValidationStatus::MatchedByNameEmailCorrected,
        ValidationStatus::Unmatched,
    ];
}

/// Whether a record shares its corrected values with another record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateFlag {
    #[default]
    Unique,
    ConsolidatedDuplicate,
}

impl DuplicateFlag {
    pub fn label(&self) -> &'static str {
        match self {
            DuplicateFlag::Unique => "Unique",
            DuplicateFlag::ConsolidatedDuplicate => "Consolidated Duplicate",
        }
    }
}

/// An input record together with everything reconciliation learned about it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedRecord {
    /// Position of the record in the input, zero-based.
    pub row: usize,
    pub input: InputRecord,
    pub assigned_company: Option<String>,
    pub assigned_category: Option<String>,
    pub corrected_name: Option<String>,
    pub corrected_email: Option<String>,
    pub corrected_position: Option<String>,
    pub validation_status: ValidationStatus,
    pub duplicate_flag: DuplicateFlag,
}

impl EnrichedRecord {
    /// Wrap an input record with no reconciliation applied yet.
    pub fn pending(row: usize, input: InputRecord) -> Self {
        Self {
            row,
            input,
            assigned_company: None,
            assigned_category: None,
            corrected_name: None,
            corrected_email: None,
            corrected_position: None,
            validation_status: ValidationStatus::Unmatched,
            duplicate_flag: DuplicateFlag::Unique,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_labels() {
        assert_eq!(ValidationStatus::MatchedByEmail.label(), "Matched by Email");
        assert_eq!(
            ValidationStatus::MatchedByNameEmailCorrected.label(),
            "Matched by Name (Email Corrected)"
        );
        assert_eq!(ValidationStatus::Unmatched.label(), "Invalid/Unmatched");
        assert!(!ValidationStatus::Unmatched.is_matched());
    }

    #[test]
    fn test_pending_defaults_to_unmatched() {
        let record = EnrichedRecord::pending(0, InputRecord::new(Some("A"), None));
        assert_eq!(record.validation_status, ValidationStatus::Unmatched);
        assert_eq!(record.duplicate_flag, DuplicateFlag::Unique);
        assert!(record.assigned_category.is_none());
    }
}
