//! Dimension registry: named bilingual regex rules grouped by semantic group.

use std::collections::{BTreeMap, BTreeSet};

use regex::{Regex, RegexBuilder};
use tracing::debug;
use zbib_common::{DimensionDefinitions, DimensionGroup, Result, ZbibError};

/// One semantic dimension with its compiled matching rules.
#[derive(Debug, Clone)]
pub struct Dimension {
    pub name: String,
    pub group: DimensionGroup,
    pattern_en: Option<Regex>,
    pattern_cn: Option<Regex>,
}

impl Dimension {
    /// True if either language rule finds a match anywhere in `text`.
    pub fn is_match(&self, text: &str) -> bool {
        self.pattern_en.as_ref().is_some_and(|re| re.is_match(text))
            || self.pattern_cn.as_ref().is_some_and(|re| re.is_match(text))
    }

    pub fn pattern_en(&self) -> Option<&str> {
        self.pattern_en.as_ref().map(Regex::as_str)
    }

    pub fn pattern_cn(&self) -> Option<&str> {
        self.pattern_cn.as_ref().map(Regex::as_str)
    }
}

#[derive(Debug, Clone, Default)]
pub struct DimensionRegistry {
    groups: BTreeMap<DimensionGroup, Vec<Dimension>>,
}

impl DimensionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from `group → {name → {en, cn}}` definitions.
    pub fn from_definitions(definitions: &DimensionDefinitions) -> Result<Self> {
        let mut registry = Self::new();
        for (group, dims) in definitions {
            for (name, patterns) in dims {
                registry.register(name, *group, &patterns.en, &patterns.cn)?;
            }
        }
        debug!("Dimension registry built with {} dimensions", registry.len());
        Ok(registry)
    }

    /// Add a dimension. Fails if a pattern does not compile or the
    /// `(group, name)` pair is already registered.
    pub fn register(
        &mut self,
        name: &str,
        group: DimensionGroup,
        pattern_en: &str,
        pattern_cn: &str,
    ) -> Result<()> {
        if self.contains(group, name) {
            return Err(ZbibError::InvalidPattern {
                group,
                name: name.to_string(),
                reason: "dimension already registered in this group".to_string(),
            });
        }

        let dimension = Dimension {
            name: name.to_string(),
            group,
            pattern_en: compile(group, name, pattern_en)?,
            pattern_cn: compile(group, name, pattern_cn)?,
        };
        self.groups.entry(group).or_default().push(dimension);
        Ok(())
    }

    /// Names of every dimension in `group` matching `text`.
    pub fn matches(&self, text: &str, group: DimensionGroup) -> BTreeSet<String> {
        if text.is_empty() {
            return BTreeSet::new();
        }
        self.dimensions(group)
            .iter()
            .filter(|d| d.is_match(text))
            .map(|d| d.name.clone())
            .collect()
    }

    pub fn dimensions(&self, group: DimensionGroup) -> &[Dimension] {
        self.groups.get(&group).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn names(&self, group: DimensionGroup) -> impl Iterator<Item = &str> {
        self.dimensions(group).iter().map(|d| d.name.as_str())
    }

    pub fn contains(&self, group: DimensionGroup, name: &str) -> bool {
        self.dimensions(group).iter().any(|d| d.name == name)
    }

    /// True if `name` is registered in any group.
    pub fn contains_name(&self, name: &str) -> bool {
        self.groups.values().flatten().any(|d| d.name == name)
    }

    /// Groups with at least one registered dimension.
    pub fn groups(&self) -> impl Iterator<Item = DimensionGroup> + '_ {
        self.groups.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn compile(group: DimensionGroup, name: &str, pattern: &str) -> Result<Option<Regex>> {
    if pattern.trim().is_empty() {
        return Ok(None);
    }
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map(Some)
        .map_err(|e| ZbibError::InvalidPattern {
            group,
            name: name.to_string(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> DimensionRegistry {
        let mut r = DimensionRegistry::new();
        r.register("Negative", DimensionGroup::Symptom, r"negative symptom|anhedonia", "阴性症状").unwrap();
        r.register("Cognitive", DimensionGroup::Symptom, r"cogniti", "认知").unwrap();
        r.register("OFC", DimensionGroup::Target, r"orbitofrontal|\bOFC\b", "眶额").unwrap();
        r
    }

    #[test]
    fn test_match_is_case_insensitive_substring() {
        let r = registry();
        let hits = r.matches("ANHEDONIA and cognitive deficits", DimensionGroup::Symptom);
        assert_eq!(hits, BTreeSet::from(["Negative".to_string(), "Cognitive".to_string()]));
        assert!(r.matches("anhedonia", DimensionGroup::Target).is_empty());
    }

    #[test]
    fn test_chinese_pattern_matches() {
        let r = registry();
        let hits = r.matches("经颅磁刺激眶额皮层治疗阴性症状", DimensionGroup::Target);
        assert!(hits.contains("OFC"));
        let hits = r.matches("经颅磁刺激眶额皮层治疗阴性症状", DimensionGroup::Symptom);
        assert!(hits.contains("Negative"));
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let mut r = DimensionRegistry::new();
        let err = r.register("Broken", DimensionGroup::Target, r"(unclosed", "").unwrap_err();
        assert!(matches!(err, ZbibError::InvalidPattern { .. }));
        let err = r.register("Broken", DimensionGroup::Target, "ok", r"[z-a]").unwrap_err();
        assert!(matches!(err, ZbibError::InvalidPattern { .. }));
        assert!(r.is_empty());
    }

    #[test]
    fn test_duplicate_name_within_group_rejected() {
        let mut r = registry();
        assert!(r.register("OFC", DimensionGroup::Target, "x", "").is_err());
        // same name in another group is allowed
        assert!(r.register("OFC", DimensionGroup::Technique, "x", "").is_ok());
        assert!(r.contains_name("OFC"));
    }

    #[test]
    fn test_empty_pattern_matches_nothing() {
        let mut r = DimensionRegistry::new();
        r.register("EnglishOnly", DimensionGroup::Disease, "schizophren", "").unwrap();
        assert!(r.matches("精神分裂症", DimensionGroup::Disease).is_empty());
        assert!(r.matches("", DimensionGroup::Disease).is_empty());
        assert_eq!(r.dimensions(DimensionGroup::Disease)[0].pattern_cn(), None);
    }
}
