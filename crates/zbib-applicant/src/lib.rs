//! zbib-applicant: Individual-level analysis of an applicant's publication record.
//!
//! Authorship attribution, the co-authorship hypergraph and the
//! [`ApplicantProfile`] that combines them with scores and benchmark ranks.

pub mod authorship;
pub mod collaboration;
pub mod profile;
pub mod analyzer;

pub use authorship::{ApplicantMatcher, Authorship, AuthorshipCounts};
pub use collaboration::{
    CollaborationAnalyzer, CollaborationEdge, CollaborationNetwork, CollaborationParams,
    CollaborationStats,
};
pub use profile::{ApplicantProfile, IfStats, KeyPaper};
pub use analyzer::{AnalyzerConfig, ApplicantAnalyzer};
