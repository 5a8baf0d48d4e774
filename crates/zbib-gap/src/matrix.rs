//! Gap matrix: how many records of each source carry every dimension of a
//! declared combination.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use zbib_classify::{ClassificationTable, DimensionRegistry};
use zbib_common::{CombinationSet, Record, Result, Source, ZbibError};

/// Counts at or below this are gaps unless the caller says otherwise.
pub const DEFAULT_GAP_THRESHOLD: usize = 0;

/// A validated combination: two or more distinct dimension names, AND semantics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Combination {
    pub name: String,
    pub dimensions: BTreeSet<String>,
}

impl Combination {
    fn matches(&self, labels: &BTreeSet<&str>) -> bool {
        self.dimensions.iter().all(|d| labels.contains(d.as_str()))
    }
}

/// `(source, combination) → count`, plus the number of records seen per source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapMatrix {
    pub counts: BTreeMap<Source, BTreeMap<String, usize>>,
    pub totals: BTreeMap<Source, usize>,
}

impl GapMatrix {
    /// Count for a cell; 0 for a source or combination not in the matrix.
    pub fn get(&self, source: Source, combination: &str) -> usize {
        self.counts
            .get(&source)
            .and_then(|row| row.get(combination))
            .copied()
            .unwrap_or(0)
    }

    pub fn total(&self, source: Source) -> usize {
        self.totals.get(&source).copied().unwrap_or(0)
    }

    pub fn sources(&self) -> impl Iterator<Item = Source> + '_ {
        self.counts.keys().copied()
    }
}

#[derive(Debug, Clone)]
pub struct GapDetector {
    combinations: Vec<Combination>,
    declared_sources: BTreeSet<Source>,
}

impl GapDetector {
    /// Validate `combinations` against the registry.
    ///
    /// Every name must be registered in some group, and each combination needs
    /// at least two distinct names.
    pub fn new(registry: &DimensionRegistry, combinations: &CombinationSet) -> Result<Self> {
        let mut validated = Vec::with_capacity(combinations.len());
        for (name, dims) in combinations {
            let dimensions: BTreeSet<String> = dims.iter().map(|d| d.trim().to_string()).collect();
            if dimensions.len() < 2 {
                return Err(ZbibError::InvalidCombination {
                    combination: name.clone(),
                    size: dimensions.len(),
                });
            }
            if let Some(unknown) = dimensions.iter().find(|d| !registry.contains_name(d)) {
                return Err(ZbibError::UnknownDimension {
                    combination: name.clone(),
                    dimension: unknown.clone(),
                });
            }
            validated.push(Combination { name: name.clone(), dimensions });
        }
        debug!("Gap detector ready with {} combinations", validated.len());
        Ok(Self { combinations: validated, declared_sources: BTreeSet::new() })
    }

    /// Always tabulate these sources, even when no record comes from them.
    pub fn with_sources(mut self, sources: impl IntoIterator<Item = Source>) -> Self {
        self.declared_sources.extend(sources);
        self
    }

    pub fn combinations(&self) -> &[Combination] {
        &self.combinations
    }

    /// Tabulate per source. A record counts toward a combination when the
    /// union of its labels over all groups contains every dimension of it.
    /// Records absent from `table` carry no labels.
    pub fn build_matrix(&self, records: &[Record], table: &ClassificationTable) -> GapMatrix {
        let mut matrix = GapMatrix::default();

        let sources = self
            .declared_sources
            .iter()
            .copied()
            .chain(records.iter().map(|r| r.source));
        for source in sources {
            matrix.totals.entry(source).or_insert(0);
            let row = matrix.counts.entry(source).or_default();
            for combo in &self.combinations {
                row.entry(combo.name.clone()).or_insert(0);
            }
        }

        for record in records {
            *matrix.totals.entry(record.source).or_insert(0) += 1;
            let labels = table.all_labels(record);
            if labels.is_empty() {
                continue;
            }
            let row = matrix.counts.entry(record.source).or_default();
            for combo in self.combinations.iter().filter(|c| c.matches(&labels)) {
                *row.entry(combo.name.clone()).or_insert(0) += 1;
            }
        }

        info!(
            records = records.len(),
            sources = matrix.counts.len(),
            combinations = self.combinations.len(),
            "Built gap matrix"
        );
        matrix
    }

    /// Matrix plus its gaps at `threshold`.
    pub fn report(&self, records: &[Record], table: &ClassificationTable, threshold: usize) -> GapReport {
        let matrix = self.build_matrix(records, table);
        let gaps = find_gaps(&matrix, threshold);
        GapReport { threshold, matrix, gaps }
    }
}

/// Combinations whose count is `<= threshold`, per source. Every source of
/// the matrix is present in the result.
pub fn find_gaps(matrix: &GapMatrix, threshold: usize) -> BTreeMap<Source, BTreeSet<String>> {
    matrix
        .counts
        .iter()
        .map(|(source, row)| {
            let gaps = row
                .iter()
                .filter(|(_, count)| **count <= threshold)
                .map(|(name, _)| name.clone())
                .collect();
            (*source, gaps)
        })
        .collect()
}

/// Serializable output of one gap run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapReport {
    pub threshold: usize,
    pub matrix: GapMatrix,
    pub gaps: BTreeMap<Source, BTreeSet<String>>,
}
