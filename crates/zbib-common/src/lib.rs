//! zbib-common: shared types and errors used across all zbib crates.

pub mod error;
pub mod dimensions;
pub mod records;
pub mod identity;
pub mod journals;
pub mod quality;

// Re-export commonly used types
pub use error::{Result, ZbibError};
pub use dimensions::{CombinationSet, DimensionDefinitions, DimensionGroup, PatternPair};
pub use records::{Author, Record, RecordRow, Source};
pub use identity::{normalize_name, ApplicantIdentity};
pub use journals::{JournalCatalog, JournalTier};

/// Calendar year used when the caller does not pin a reference year.
pub fn current_year() -> i32 {
    use chrono::Datelike;
    chrono::Local::now().year()
}
