//! Reference data: sources of canonical records and the lookup index
//! built from them.

mod index;
mod source;

pub use index::{
    CollisionPolicy, IndexStats, KeyCollision, KeyField, LoadedSource, ReferenceIndex,
    ReferenceIndexBuilder, SkippedSource,
};
pub use source::{
    CsvReferenceSource, MemoryReferenceSource, REFERENCE_EXTENSIONS, ReferenceRecordSource,
    discover_reference_sources,
};
