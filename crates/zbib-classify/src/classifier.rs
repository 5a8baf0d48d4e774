//! Applies the dimension registry to record text.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use zbib_common::{DimensionGroup, Record, Source};

use crate::registry::DimensionRegistry;

/// Labels of a single record: group → matched dimension names.
pub type ClassificationResult = BTreeMap<DimensionGroup, BTreeSet<String>>;

/// Classification side table keyed by source, then record id. Ids are only
/// unique within a source (a PMID and an NSFC approval number can coincide).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassificationTable {
    rows: BTreeMap<Source, BTreeMap<String, ClassificationResult>>,
}

impl ClassificationTable {
    pub fn get(&self, source: Source, record_id: &str) -> Option<&ClassificationResult> {
        self.rows.get(&source).and_then(|ids| ids.get(record_id))
    }

    /// Labels of `record` in `group`; empty when the record or group is absent.
    pub fn labels(&self, record: &Record, group: DimensionGroup) -> BTreeSet<String> {
        self.get(record.source, &record.id)
            .and_then(|r| r.get(&group))
            .cloned()
            .unwrap_or_default()
    }

    /// Union of a record's labels across every group.
    pub fn all_labels(&self, record: &Record) -> BTreeSet<&str> {
        self.get(record.source, &record.id)
            .map(|r| r.values().flatten().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Source, &str, &ClassificationResult)> {
        self.rows
            .iter()
            .flat_map(|(&source, ids)| ids.iter().map(move |(id, r)| (source, id.as_str(), r)))
    }

    pub fn len(&self) -> usize {
        self.rows.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FromIterator<(Source, String, ClassificationResult)> for ClassificationTable {
    fn from_iter<I: IntoIterator<Item = (Source, String, ClassificationResult)>>(iter: I) -> Self {
        let mut rows: BTreeMap<Source, BTreeMap<String, ClassificationResult>> = BTreeMap::new();
        for (source, id, result) in iter {
            rows.entry(source).or_default().insert(id, result);
        }
        Self { rows }
    }
}

#[derive(Debug, Clone)]
pub struct PatternClassifier {
    registry: Arc<DimensionRegistry>,
}

impl PatternClassifier {
    pub fn new(registry: Arc<DimensionRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &DimensionRegistry {
        &self.registry
    }

    /// Multi-label classification of one record for the requested groups.
    ///
    /// Every requested group is present in the result, possibly with an empty set.
    pub fn classify(&self, record: &Record, groups: &[DimensionGroup]) -> ClassificationResult {
        let text = record.search_text();
        groups
            .iter()
            .map(|&g| (g, self.registry.matches(&text, g)))
            .collect()
    }

    /// Classify a whole snapshot. Records sharing both source and id keep the
    /// labels of the last occurrence.
    pub fn classify_all(&self, records: &[Record], groups: &[DimensionGroup]) -> ClassificationTable {
        #[cfg(feature = "parallel")]
        let rows: Vec<(Source, String, ClassificationResult)> = records
            .par_iter()
            .map(|r| (r.source, r.id.clone(), self.classify(r, groups)))
            .collect();

        #[cfg(not(feature = "parallel"))]
        let rows: Vec<(Source, String, ClassificationResult)> = records
            .iter()
            .map(|r| (r.source, r.id.clone(), self.classify(r, groups)))
            .collect();

        let table: ClassificationTable = rows.into_iter().collect();
        info!(records = records.len(), groups = groups.len(), "Classified records");
        table
    }

    /// Number of records carrying each dimension of `group`. Every registered
    /// dimension appears, including those with zero hits.
    pub fn coverage(&self, table: &ClassificationTable, group: DimensionGroup) -> BTreeMap<String, usize> {
        let mut counts: BTreeMap<String, usize> =
            self.registry.names(group).map(|n| (n.to_string(), 0)).collect();
        for (_, _, result) in table.iter() {
            for name in result.get(&group).into_iter().flatten() {
                *counts.entry(name.clone()).or_default() += 1;
            }
        }
        debug!(%group, dimensions = counts.len(), "Computed coverage");
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zbib_test_utils::{sample_definitions, RecordBuilder};

    fn classifier() -> PatternClassifier {
        let registry = DimensionRegistry::from_definitions(&sample_definitions()).unwrap();
        PatternClassifier::new(Arc::new(registry))
    }

    #[test]
    fn test_classify_uses_title_abstract_and_keywords() {
        let c = classifier();
        let record = RecordBuilder::new("p1")
            .title("TMS in schizophrenia")
            .abstract_text("We targeted the orbitofrontal cortex.")
            .keywords(&["anhedonia"])
            .build();
        let result = c.classify(&record, &DimensionGroup::ALL);

        assert!(result[&DimensionGroup::Target].contains("OFC"));
        assert!(result[&DimensionGroup::Symptom].contains("Negative"));
        assert!(result[&DimensionGroup::Disease].contains("Schizophrenia"));
        assert!(result[&DimensionGroup::Technique].contains("TMS"));
    }

    #[test]
    fn test_classify_missing_fields_yields_empty_sets() {
        let c = classifier();
        let record = RecordBuilder::new("p2").title("").build();
        let result = c.classify(&record, &[DimensionGroup::Symptom, DimensionGroup::Target]);
        assert_eq!(result.len(), 2);
        assert!(result.values().all(BTreeSet::is_empty));
    }

    #[test]
    fn test_phrase_does_not_span_title_and_abstract() {
        let c = classifier();
        let record = RecordBuilder::new("p4")
            .title("Effects of stimulation on positive and negative")
            .abstract_text("symptom scales were not collected.")
            .build();
        let result = c.classify(&record, &[DimensionGroup::Symptom]);
        assert!(!result[&DimensionGroup::Symptom].contains("Negative"));
    }

    #[test]
    fn test_labels_are_subset_of_registry() {
        let c = classifier();
        let record = RecordBuilder::new("p3")
            .title("Orbitofrontal and dorsolateral prefrontal TMS for negative symptoms and cognition")
            .build();
        let result = c.classify(&record, &DimensionGroup::ALL);
        for (group, names) in &result {
            for name in names {
                assert!(c.registry().contains(*group, name));
            }
        }
    }

    #[test]
    fn test_classify_all_is_deterministic() {
        let c = classifier();
        let records: Vec<Record> = (0..50)
            .map(|i| {
                let title = if i % 3 == 0 { "OFC and anhedonia" } else { "motor cortex" };
                RecordBuilder::new(&format!("r{i}")).title(title).build()
            })
            .collect();
        let a = c.classify_all(&records, &DimensionGroup::ALL);
        let b = c.classify_all(&records, &DimensionGroup::ALL);
        assert_eq!(a, b);
        assert_eq!(a.len(), 50);
        assert!(a.all_labels(&records[0]).contains("OFC"));
        assert!(a.labels(&records[1], DimensionGroup::Target).is_empty());

        let coverage = c.coverage(&a, DimensionGroup::Target);
        assert_eq!(coverage["OFC"], 17);
        assert_eq!(coverage["DLPFC"], 0);
    }

    #[test]
    fn test_same_id_in_two_sources_is_kept_apart() {
        let c = classifier();
        let records = vec![
            RecordBuilder::new("1").title("Orbitofrontal TMS for anhedonia").source(Source::PubMed).build(),
            RecordBuilder::new("1").title("Motor cortex plasticity").source(Source::Nih).build(),
        ];
        let table = c.classify_all(&records, &DimensionGroup::ALL);

        assert_eq!(table.len(), 2);
        assert!(table.all_labels(&records[0]).contains("OFC"));
        assert!(table.all_labels(&records[1]).is_empty());
        assert!(table.get(Source::Nsfc, "1").is_none());

        let json = serde_json::to_string(&table).unwrap();
        let back: ClassificationTable = serde_json::from_str(&json).unwrap();
        assert_eq!(back, table);
    }
}
