//! Rollcall: reconcile self-reported personnel records against reference rosters.
//!
//! Input records (name, email, position, department as people typed them) are
//! matched against canonical records loaded from per-category reference
//! files. Matched records take on the canonical values; every record is
//! flagged for duplicates and grouped into one output partition per category.
//!
//! # Core Principles
//!
//! - **Email first**: email is the primary key, name only a fallback
//! - **Non-destructive**: raw input values are kept beside the corrections
//! - **Nothing dropped silently**: every input record yields one output record
//!
//! # Example
//!
//! ```no_run
//! use rollcall::{Reconciler, XlsxSink};
//!
//! let reconciler = Reconciler::new();
//! let result = reconciler.run_files("responses.xlsx", "references/").unwrap();
//!
//! let mut sink = XlsxSink::new("filtered-responses.xlsx");
//! reconciler.export(&result, &mut sink).unwrap();
//!
//! println!("Matched: {}", result.summary.status_counts.matched());
//! println!("Unmatched: {}", result.summary.status_counts.unmatched);
//! ```

pub mod config;
pub mod dedup;
pub mod enrich;
pub mod error;
pub mod export;
pub mod input;
pub mod matching;
pub mod normalize;
pub mod partition;
pub mod record;
pub mod reference;

mod reconcile;

pub use crate::reconcile::{
    DuplicateCounts, NameCorrection, PartitionSummary, ReconciliationResult,
    ReconciliationSummary, Reconciler, StatusCounts,
};
pub use config::{InputColumns, OutputLabels, ReferenceColumns, RollcallConfig};
pub use dedup::{DedupKey, flag_duplicates};
pub use enrich::enrich;
pub use error::{Result, RollcallError};
pub use export::{CsvDirectorySink, OutputFormat, PartitionSink, XlsxSink, sanitize_sheet_name};
pub use input::{DataTable, InputRecordSource, SourceMetadata};
pub use matching::{MatchResult, match_record};
pub use normalize::{NormalizedKey, normalize};
pub use partition::{Partition, PartitionKind, PartitionTable, partition_records};
pub use record::{DuplicateFlag, EnrichedRecord, InputRecord, ReferenceRecord, ValidationStatus};
pub use reference::{
    CollisionPolicy, CsvReferenceSource, IndexStats, MemoryReferenceSource, ReferenceIndex,
    ReferenceIndexBuilder, ReferenceRecordSource, discover_reference_sources,
};
