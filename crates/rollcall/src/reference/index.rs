//! Lookup index over all reference records.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::source::ReferenceRecordSource;
use crate::error::{Result, RollcallError};
use crate::normalize::{NormalizedKey, normalize_field};
use crate::record::ReferenceRecord;

/// What to do when two reference records normalize to the same key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// The record loaded later replaces the earlier one.
    #[default]
    LastWriteWins,
    /// The record loaded first is kept.
    FirstWriteWins,
    /// Fail the build.
    Reject,
}

impl FromStr for CollisionPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "last" | "last_write_wins" => Ok(CollisionPolicy::LastWriteWins),
            "first" | "first_write_wins" => Ok(CollisionPolicy::FirstWriteWins),
            "reject" => Ok(CollisionPolicy::Reject),
            _ => Err(format!(
                "Unknown collision policy: {}. Use: last, first, or reject.",
                s
            )),
        }
    }
}

impl fmt::Display for CollisionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollisionPolicy::LastWriteWins => write!(f, "last"),
            CollisionPolicy::FirstWriteWins => write!(f, "first"),
            CollisionPolicy::Reject => write!(f, "reject"),
        }
    }
}

/// Which index a key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyField {
    Email,
    Name,
}

impl KeyField {
    pub fn label(&self) -> &'static str {
        match self {
            KeyField::Email => "email",
            KeyField::Name => "name",
        }
    }
}

/// Two differing reference records that share a normalized key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyCollision {
    pub field: KeyField,
    pub key: String,
    /// The record that was already indexed.
    pub existing: ReferenceRecord,
    /// The record that arrived later.
    pub incoming: ReferenceRecord,
}

/// A reference source that was loaded into the index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadedSource {
    pub name: String,
    pub category: String,
    pub records: usize,
}

/// A reference source that was skipped, and why.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedSource {
    pub name: String,
    pub reason: String,
}

/// Counters describing a built index.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexStats {
    pub records: usize,
    pub email_keys: usize,
    pub name_keys: usize,
    pub email_collisions: usize,
    pub name_collisions: usize,
}

/// Immutable lookup maps from normalized email and name to canonical records.
///
/// Keys are normalized; the records keep their original attribute values.
#[derive(Debug, Clone)]
pub struct ReferenceIndex {
    records: Vec<ReferenceRecord>,
    by_email: HashMap<NormalizedKey, usize>,
    by_name: HashMap<NormalizedKey, usize>,
    loaded: Vec<LoadedSource>,
    skipped: Vec<SkippedSource>,
    collisions: Vec<KeyCollision>,
    policy: CollisionPolicy,
}

impl ReferenceIndex {
    /// Build an index with the default (last-write-wins) policy.
    pub fn build<S: ReferenceRecordSource>(sources: &[S]) -> Result<Self> {
        ReferenceIndexBuilder::new().build(sources)
    }

    /// Look up a record by normalized email.
    pub fn by_email(&self, key: &NormalizedKey) -> Option<&ReferenceRecord> {
        self.by_email.get(key).map(|&i| &self.records[i])
    }

    /// Look up a record by normalized name.
    pub fn by_name(&self, key: &NormalizedKey) -> Option<&ReferenceRecord> {
        self.by_name.get(key).map(|&i| &self.records[i])
    }

    pub fn email_keys(&self) -> usize {
        self.by_email.len()
    }

    pub fn name_keys(&self) -> usize {
        self.by_name.len()
    }

    /// Every record that was loaded, in load order.
    pub fn records(&self) -> &[ReferenceRecord] {
        &self.records
    }

    pub fn loaded_sources(&self) -> &[LoadedSource] {
        &self.loaded
    }

    pub fn skipped_sources(&self) -> &[SkippedSource] {
        &self.skipped
    }

    pub fn collisions(&self) -> &[KeyCollision] {
        &self.collisions
    }

    pub fn policy(&self) -> CollisionPolicy {
        self.policy
    }

    pub fn stats(&self) -> IndexStats {
        let count = |field: KeyField| self.collisions.iter().filter(|c| c.field == field).count();
        IndexStats {
            records: self.records.len(),
            email_keys: self.by_email.len(),
            name_keys: self.by_name.len(),
            email_collisions: count(KeyField::Email),
            name_collisions: count(KeyField::Name),
        }
    }
}

/// Builds a [`ReferenceIndex`] from reference sources.
///
/// Sources that fail to load or hold no records are skipped with a
/// warning. The build fails only when no source contributes a record.
#[derive(Debug, Clone)]
pub struct ReferenceIndexBuilder {
    policy: CollisionPolicy,
    location: String,
}

impl ReferenceIndexBuilder {
    pub fn new() -> Self {
        Self {
            policy: CollisionPolicy::default(),
            location: "reference sources".to_string(),
        }
    }

    pub fn with_policy(mut self, policy: CollisionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Where the sources came from, used in the no-data error.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// Load every source and index its records, in order.
    pub fn build<S: ReferenceRecordSource>(&self, sources: &[S]) -> Result<ReferenceIndex> {
        let mut index = ReferenceIndex {
            records: Vec::new(),
            by_email: HashMap::new(),
            by_name: HashMap::new(),
            loaded: Vec::new(),
            skipped: Vec::new(),
            collisions: Vec::new(),
            policy: self.policy,
        };

        for source in sources {
            let name = source.name();
            let records = match source.load() {
                Ok(records) if records.is_empty() => {
                    let reason = RollcallError::EmptyData(format!("'{}' has no rows", name));
                    tracing::warn!(source = %name, "skipping empty reference source");
                    index.skipped.push(SkippedSource {
                        name,
                        reason: reason.to_string(),
                    });
                    continue;
                }
                Ok(records) => records,
                Err(e) if e.is_source_recoverable() => {
                    tracing::warn!(source = %name, error = %e, "skipping reference source");
                    index.skipped.push(SkippedSource {
                        name,
                        reason: e.to_string(),
                    });
                    continue;
                }
                Err(e) => return Err(e),
            };

            tracing::info!(
                source = %name,
                category = %source.category(),
                rows = records.len(),
                "loaded reference source"
            );
            index.loaded.push(LoadedSource {
                name,
                category: source.category(),
                records: records.len(),
            });

            for record in records {
                self.insert(&mut index, record)?;
            }
        }

        if index.records.is_empty() {
            return Err(RollcallError::NoReferenceData {
                location: self.location.clone(),
            });
        }

        Ok(index)
    }

    fn insert(&self, index: &mut ReferenceIndex, record: ReferenceRecord) -> Result<()> {
        let email_key = normalize_field(&record.email);
        let name_key = normalize_field(&record.name);

        let position = index.records.len();
        index.records.push(record);

        if let Some(key) = email_key {
            self.insert_key(index, KeyField::Email, key, position)?;
        }
        if let Some(key) = name_key {
            self.insert_key(index, KeyField::Name, key, position)?;
        }
        Ok(())
    }

    fn insert_key(
        &self,
        index: &mut ReferenceIndex,
        field: KeyField,
        key: NormalizedKey,
        position: usize,
    ) -> Result<()> {
        let map = match field {
            KeyField::Email => &mut index.by_email,
            KeyField::Name => &mut index.by_name,
        };

        let mut slot = match map.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(position);
                return Ok(());
            }
            Entry::Occupied(slot) => slot,
        };

        let existing = &index.records[*slot.get()];
        let incoming = &index.records[position];
        if existing == incoming {
            return Ok(());
        }

        tracing::debug!(
            field = field.label(),
            key = %slot.key(),
            existing = %existing.describe(),
            incoming = %incoming.describe(),
            policy = %self.policy,
            "reference key collision"
        );

        let collision = KeyCollision {
            field,
            key: slot.key().to_string(),
            existing: existing.clone(),
            incoming: incoming.clone(),
        };

        match self.policy {
            CollisionPolicy::LastWriteWins => {
                slot.insert(position);
            }
            CollisionPolicy::FirstWriteWins => {}
            CollisionPolicy::Reject => {
                return Err(RollcallError::KeyCollision {
                    field: field.label(),
                    key: collision.key,
                    first: collision.existing.describe(),
                    second: collision.incoming.describe(),
                });
            }
        }

        index.collisions.push(collision);
        Ok(())
    }
}

impl Default for ReferenceIndexBuilder {
    fn default() -> Self {
        Self::new()
    }
}
