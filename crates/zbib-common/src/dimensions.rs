//! Dimension and gap-combination definitions as they arrive from configuration.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ZbibError;

/// Semantic group a dimension belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DimensionGroup {
    Symptom,
    Target,
    Disease,
    Technique,
}

impl DimensionGroup {
    pub const ALL: [DimensionGroup; 4] = [
        DimensionGroup::Symptom,
        DimensionGroup::Target,
        DimensionGroup::Disease,
        DimensionGroup::Technique,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DimensionGroup::Symptom   => "symptom",
            DimensionGroup::Target    => "target",
            DimensionGroup::Disease   => "disease",
            DimensionGroup::Technique => "technique",
        }
    }
}

impl fmt::Display for DimensionGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DimensionGroup {
    type Err = ZbibError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "symptom" | "symptoms"     => Ok(DimensionGroup::Symptom),
            "target" | "targets"       => Ok(DimensionGroup::Target),
            "disease" | "diseases"     => Ok(DimensionGroup::Disease),
            "technique" | "techniques" => Ok(DimensionGroup::Technique),
            other => Err(ZbibError::Config(format!("unknown dimension group '{other}'"))),
        }
    }
}

/// Raw bilingual regex pair for one dimension.
///
/// An empty string means the dimension has no rule in that language.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternPair {
    #[serde(default)]
    pub en: String,
    #[serde(default)]
    pub cn: String,
}

impl PatternPair {
    pub fn new(en: impl Into<String>, cn: impl Into<String>) -> Self {
        Self { en: en.into(), cn: cn.into() }
    }
}

/// `group → {dimension_name → patterns}`
pub type DimensionDefinitions = BTreeMap<DimensionGroup, BTreeMap<String, PatternPair>>;

/// `combination_name → [dimension_name, ...]`, AND semantics.
pub type CombinationSet = BTreeMap<String, Vec<String>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_parse_accepts_plural() {
        assert_eq!("Symptoms".parse::<DimensionGroup>().unwrap(), DimensionGroup::Symptom);
        assert_eq!("technique".parse::<DimensionGroup>().unwrap(), DimensionGroup::Technique);
        assert!("anatomy".parse::<DimensionGroup>().is_err());
    }

    #[test]
    fn test_definitions_yaml_shape() {
        let yaml = r#"
symptom:
  Negative:
    en: 'negative symptom|anhedonia'
    cn: '阴性症状'
target:
  OFC:
    en: 'orbitofrontal|\bOFC\b'
"#;
        let defs: DimensionDefinitions = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(defs[&DimensionGroup::Symptom]["Negative"].cn, "阴性症状");
        assert_eq!(defs[&DimensionGroup::Target]["OFC"].cn, "");
    }
}
