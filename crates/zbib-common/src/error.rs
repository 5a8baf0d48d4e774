use thiserror::Error;

use crate::dimensions::DimensionGroup;

#[derive(Debug, Error)]
pub enum ZbibError {
    #[error("Invalid pattern for dimension {group}/{name}: {reason}")]
    InvalidPattern {
        group: DimensionGroup,
        name: String,
        reason: String,
    },

    #[error("Combination '{combination}' references unknown dimension '{dimension}'")]
    UnknownDimension {
        combination: String,
        dimension: String,
    },

    #[error("Combination '{combination}' needs at least 2 dimensions, got {size}")]
    InvalidCombination { combination: String, size: usize },

    #[error("No reference sample for metric '{0}'")]
    UnknownMetric(String),

    #[error("Invalid record {id}: {reason}")]
    InvalidRecord { id: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ZbibError>;
