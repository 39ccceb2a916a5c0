//! Run configuration: column names, output labels, and policies.
//!
//! Everything has a default matching the stock roster layout, so a config
//! file only needs to name what differs:
//!
//! ```toml
//! collision = "first_write_wins"
//!
//! [input]
//! sheet = "Responses"
//! email = "Email"
//!
//! [output]
//! duplicate_flag = "Duplicate?"
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RollcallError};
use crate::partition::Field;
use crate::reference::CollisionPolicy;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RollcallConfig {
    pub input: InputColumns,
    pub reference: ReferenceColumns,
    pub output: OutputLabels,
    pub collision: CollisionPolicy,
}

impl RollcallConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| RollcallError::io(path, e))?;
        Self::from_toml(&text)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| RollcallError::Config(e.to_string()))
    }
}

/// Column headers in the self-reported input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputColumns {
    /// Worksheet to read when the input is a workbook.
    pub sheet: String,
    pub name: String,
    pub email: String,
    pub position: String,
    pub category_hint: String,
}

impl Default for InputColumns {
    fn default() -> Self {
        Self {
            sheet: "Sheet1".to_string(),
            name: "Full Name (as per NRIC/Passport)".to_string(),
            email: "Work Email Address".to_string(),
            position: "Position / Job Title".to_string(),
            category_hint: "Department / Business Unit".to_string(),
        }
    }
}

impl InputColumns {
    /// Configured headers in declaration order.
    pub fn headers(&self) -> [&str; 4] {
        [&self.name, &self.email, &self.position, &self.category_hint]
    }
}

/// Column headers every reference source must carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceColumns {
    pub name: String,
    pub email: String,
    pub position: String,
    pub company: String,
}

impl Default for ReferenceColumns {
    fn default() -> Self {
        Self {
            name: "First Name".to_string(),
            email: "Email".to_string(),
            position: "Position".to_string(),
            company: "Company".to_string(),
        }
    }
}

impl ReferenceColumns {
    pub fn headers(&self) -> [&str; 4] {
        [&self.name, &self.email, &self.position, &self.company]
    }
}

/// Header labels written to output partitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputLabels {
    pub raw_name: String,
    pub raw_email: String,
    pub raw_position: String,
    pub raw_category_hint: String,
    pub corrected_name: String,
    pub corrected_position: String,
    pub assigned_company: String,
    pub corrected_email: String,
    pub assigned_category: String,
    pub validation_status: String,
    pub duplicate_flag: String,
    /// Canonical name of the partition holding unmatched records.
    pub uncategorized: String,
}

impl Default for OutputLabels {
    fn default() -> Self {
        Self {
            raw_name: "Original Input Name".to_string(),
            raw_email: "Original Input Email".to_string(),
            raw_position: "Original Input Position".to_string(),
            raw_category_hint: "Original Department/BU".to_string(),
            corrected_name: "Full Name".to_string(),
            corrected_position: "Position".to_string(),
            assigned_company: "Company".to_string(),
            corrected_email: "Email".to_string(),
            assigned_category: "Assigned Business Unit".to_string(),
            validation_status: "Validation Status".to_string(),
            duplicate_flag: "Duplicate Status".to_string(),
            uncategorized: "Invalid_Uncategorized".to_string(),
        }
    }
}

impl OutputLabels {
    /// Header label for an output field.
    pub fn label(&self, field: Field) -> &str {
        match field {
            Field::RawName => &self.raw_name,
            Field::RawEmail => &self.raw_email,
            Field::RawPosition => &self.raw_position,
            Field::RawCategoryHint => &self.raw_category_hint,
            Field::CorrectedName => &self.corrected_name,
            Field::CorrectedPosition => &self.corrected_position,
            Field::AssignedCompany => &self.assigned_company,
            Field::CorrectedEmail => &self.corrected_email,
            Field::AssignedCategory => &self.assigned_category,
            Field::ValidationStatus => &self.validation_status,
            Field::DuplicateFlag => &self.duplicate_flag,
        }
    }
}
