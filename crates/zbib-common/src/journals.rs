//! Journal tiers and impact factors used for journal-quality statistics.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// ISO abbreviations of top-tier journals.
const TIER1: &[&str] = &[
    // general medicine
    "N Engl J Med", "Lancet", "JAMA", "BMJ",
    // psychiatry
    "JAMA Psychiatry", "Lancet Psychiatry", "Am J Psychiatry", "Biol Psychiatry",
    "World Psychiatry", "Schizophr Bull", "Br J Psychiatry",
    // neurology
    "Ann Neurol", "Brain", "Neurology", "JAMA Neurol", "Lancet Neurol",
    // general science
    "Nature", "Science", "Cell", "Mol Psychiatry", "Nat Neurosci", "Nat Med",
    "Nat Rev Neurosci", "Neuron", "Nat Commun", "Proc Natl Acad Sci U S A",
    "Curr Biol", "eLife", "Sci Transl Med", "J Neurosci",
];

const TIER2: &[&str] = &[
    "Neuroimage", "Hum Brain Mapp", "Cereb Cortex", "J Neurosci",
    "Neuropsychopharmacology", "Transl Psychiatry", "Brain Stimul",
    "Cortex", "Addiction", "Drug Alcohol Depend", "Psychol Med",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JournalTier {
    Tier1,
    Tier2,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalCatalog {
    #[serde(default = "default_tier1")]
    pub tier1: BTreeSet<String>,
    #[serde(default = "default_tier2")]
    pub tier2: BTreeSet<String>,
    /// Journal → impact factor. Empty when no IF data is available.
    #[serde(default)]
    pub impact_factors: BTreeMap<String, f64>,
}

fn default_tier1() -> BTreeSet<String> { TIER1.iter().map(|s| s.to_string()).collect() }
fn default_tier2() -> BTreeSet<String> { TIER2.iter().map(|s| s.to_string()).collect() }

impl Default for JournalCatalog {
    fn default() -> Self {
        Self {
            tier1: default_tier1(),
            tier2: default_tier2(),
            impact_factors: BTreeMap::new(),
        }
    }
}

impl JournalCatalog {
    /// Tier of a journal. A journal listed in both tiers counts as tier 1.
    pub fn tier(&self, journal: &str) -> Option<JournalTier> {
        if self.tier1.contains(journal) {
            Some(JournalTier::Tier1)
        } else if self.tier2.contains(journal) {
            Some(JournalTier::Tier2)
        } else {
            None
        }
    }

    pub fn impact_factor(&self, journal: &str) -> Option<f64> {
        self.impact_factors.get(journal).copied().filter(|v| v.is_finite() && *v >= 0.0)
    }

    pub fn has_impact_data(&self) -> bool {
        !self.impact_factors.is_empty()
    }

    pub fn with_impact_factor(mut self, journal: impl Into<String>, value: f64) -> Self {
        self.impact_factors.insert(journal.into(), value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_lookup() {
        let catalog = JournalCatalog::default();
        assert_eq!(catalog.tier("Biol Psychiatry"), Some(JournalTier::Tier1));
        assert_eq!(catalog.tier("Brain Stimul"), Some(JournalTier::Tier2));
        // listed in both
        assert_eq!(catalog.tier("J Neurosci"), Some(JournalTier::Tier1));
        assert_eq!(catalog.tier("Unknown J"), None);
    }

    #[test]
    fn test_impact_factor_rejects_garbage() {
        let catalog = JournalCatalog::default()
            .with_impact_factor("Brain Stimul", 7.7)
            .with_impact_factor("Bad", f64::NAN);
        assert_eq!(catalog.impact_factor("Brain Stimul"), Some(7.7));
        assert_eq!(catalog.impact_factor("Bad"), None);
        assert!(catalog.has_impact_data());
        assert!(!JournalCatalog::default().has_impact_data());
    }
}
