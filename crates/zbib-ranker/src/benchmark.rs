//! Field benchmarks: reference samples of researcher metrics and percentile lookup.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;
use zbib_common::{Result, ZbibError};

/// Metric names understood by the built-in benchmarks.
pub mod metrics {
    pub const N_TOTAL: &str = "n_total";
    pub const RECENT: &str = "recent_5yr";
    pub const INFLUENCE_INDEX: &str = "influence_index";
    /// first/corresponding-author share, in percent
    pub const INDEPENDENCE: &str = "independence";
    pub const TIER1: &str = "tier1";
    pub const TOTAL_IF: &str = "total_if";
    pub const AVG_IF: &str = "avg_if";
    pub const FIT: &str = "fit";
    pub const COMPETENCY: &str = "competency";
    pub const TOTAL_SCORE: &str = "total_score";
}

/// Reference distribution per metric. Samples are sorted ascending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBenchmark")]
pub struct FieldBenchmark {
    pub name: String,
    samples: BTreeMap<String, Vec<f64>>,
}

#[derive(Deserialize)]
struct RawBenchmark {
    name: String,
    samples: BTreeMap<String, Vec<f64>>,
}

impl TryFrom<RawBenchmark> for FieldBenchmark {
    type Error = ZbibError;

    fn try_from(raw: RawBenchmark) -> Result<Self> {
        FieldBenchmark::new(raw.name, raw.samples)
    }
}

impl FieldBenchmark {
    /// Fails when any sample is empty or holds a non-finite value.
    pub fn new(name: impl Into<String>, samples: BTreeMap<String, Vec<f64>>) -> Result<Self> {
        let name = name.into();
        let mut sorted = BTreeMap::new();
        for (metric, mut values) in samples {
            if values.is_empty() {
                return Err(ZbibError::Config(format!(
                    "benchmark '{name}': sample for '{metric}' is empty"
                )));
            }
            if values.iter().any(|v| !v.is_finite()) {
                return Err(ZbibError::Config(format!(
                    "benchmark '{name}': sample for '{metric}' has a non-finite value"
                )));
            }
            values.sort_by(f64::total_cmp);
            sorted.insert(metric, values);
        }
        Ok(Self { name, samples: sorted })
    }

    /// Built-in benchmark by name (`NIBS-Psychiatry`/`nibs`,
    /// `Neuroscience-General`/`neuro`).
    pub fn by_name(name: &str) -> Result<Self> {
        match name {
            "NIBS-Psychiatry" | "nibs"      => Ok(Self::nibs_psychiatry()),
            "Neuroscience-General" | "neuro" => Ok(Self::neuroscience_general()),
            other => Err(ZbibError::Config(format!(
                "unknown benchmark '{other}' (available: NIBS-Psychiatry, Neuroscience-General)"
            ))),
        }
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let benchmark = Self::from_yaml(&content)?;
        info!(name = %benchmark.name, metrics = benchmark.samples.len(), "Loaded benchmark from {}", path.display());
        Ok(benchmark)
    }

    /// Active NIBS researchers in psychiatry.
    pub fn nibs_psychiatry() -> Self {
        builtin("NIBS-Psychiatry", &[
            (metrics::N_TOTAL,         &[15.0, 30.0, 60.0, 120.0, 250.0]),
            (metrics::RECENT,          &[5.0, 12.0, 25.0, 50.0, 100.0]),
            (metrics::INFLUENCE_INDEX, &[3.0, 6.0, 12.0, 22.0, 40.0]),
            (metrics::INDEPENDENCE,    &[10.0, 20.0, 30.0, 45.0, 60.0]),
            (metrics::TIER1,           &[0.0, 1.0, 3.0, 8.0, 20.0]),
            (metrics::TOTAL_IF,        &[20.0, 50.0, 120.0, 300.0, 800.0]),
            (metrics::AVG_IF,          &[1.5, 2.5, 3.8, 5.5, 8.0]),
            (metrics::FIT,             &[15.0, 30.0, 50.0, 70.0, 85.0]),
            (metrics::COMPETENCY,      &[15.0, 30.0, 50.0, 70.0, 85.0]),
            (metrics::TOTAL_SCORE,     &[15.0, 30.0, 50.0, 70.0, 85.0]),
        ])
    }

    pub fn neuroscience_general() -> Self {
        builtin("Neuroscience-General", &[
            (metrics::N_TOTAL,         &[20.0, 40.0, 80.0, 160.0, 350.0]),
            (metrics::RECENT,          &[8.0, 18.0, 35.0, 70.0, 140.0]),
            (metrics::INFLUENCE_INDEX, &[4.0, 8.0, 16.0, 30.0, 55.0]),
            (metrics::INDEPENDENCE,    &[10.0, 18.0, 28.0, 40.0, 55.0]),
            (metrics::TIER1,           &[0.0, 2.0, 5.0, 12.0, 30.0]),
            (metrics::TOTAL_IF,        &[30.0, 80.0, 200.0, 500.0, 1200.0]),
            (metrics::AVG_IF,          &[2.0, 3.0, 4.5, 6.5, 10.0]),
            (metrics::FIT,             &[15.0, 30.0, 50.0, 70.0, 85.0]),
            (metrics::COMPETENCY,      &[15.0, 30.0, 50.0, 70.0, 85.0]),
            (metrics::TOTAL_SCORE,     &[15.0, 30.0, 50.0, 70.0, 85.0]),
        ])
    }

    pub fn has_metric(&self, metric: &str) -> bool {
        self.samples.contains_key(metric)
    }

    pub fn metrics(&self) -> impl Iterator<Item = &str> {
        self.samples.keys().map(String::as_str)
    }

    /// Share of the reference sample at or below `value`, as 0..=100.
    pub fn percentile(&self, metric: &str, value: f64) -> Result<u8> {
        let sample = self
            .samples
            .get(metric)
            .ok_or_else(|| ZbibError::UnknownMetric(metric.to_string()))?;
        let at_or_below = sample.partition_point(|s| *s <= value);
        let pct = (at_or_below as f64 / sample.len() as f64 * 100.0).round();
        Ok(pct.clamp(0.0, 100.0) as u8)
    }
}

fn builtin(name: &str, table: &[(&str, &[f64])]) -> FieldBenchmark {
    FieldBenchmark {
        name: name.to_string(),
        samples: table.iter().map(|(m, v)| (m.to_string(), v.to_vec())).collect(),
    }
}
