//! zbib-classify: Dimension registry and lexical multi-label classifier.
//!
//! Matching is purely regex based: a record carries a dimension when the
//! dimension's English or Chinese rule matches anywhere in its title,
//! abstract or keywords.

pub mod registry;
pub mod classifier;

pub use registry::{Dimension, DimensionRegistry};
pub use classifier::{ClassificationResult, ClassificationTable, PatternClassifier};
