//! Configuration loading for zbib.
//! The run file (TOML) is read from zbib.toml or the path in the ZBIB_CONFIG env var;
//! it points at a topic file (YAML or JSON) describing what to analyse.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use zbib_applicant::{AnalyzerConfig, CollaborationParams};
use zbib_common::{
    ApplicantIdentity, CombinationSet, DimensionDefinitions, DimensionGroup, JournalCatalog, Source,
};
use zbib_gap::DEFAULT_GAP_THRESHOLD;
use zbib_ranker::{ScoreWeights, ScoringParams};

// ── Run file ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Topic file, relative paths resolved against the run file's directory
    pub topic: PathBuf,
    /// Population record snapshots (CSV) for gap analysis
    #[serde(default)]
    pub records: Vec<PathBuf>,
    /// The applicant's own publications (CSV)
    #[serde(default)]
    pub applicant_records: Option<PathBuf>,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_output_dir() -> PathBuf { PathBuf::from("./output") }

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
    /// Used when RUST_LOG is unset
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String { "info".to_string() }

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { format: LogFormat::default(), filter: default_log_filter() }
    }
}

impl Config {
    /// Load the run file.
    /// Checks ZBIB_CONFIG env var first, then zbib.toml in the current directory.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("ZBIB_CONFIG").unwrap_or_else(|_| "zbib.toml".to_string());
        Self::from_file(Path::new(&path))
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            anyhow::bail!(
                "Config file not found: {}\n\
                 Copy zbib.example.toml to zbib.toml and edit it.",
                path.display()
            );
        }
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        Ok(config)
    }

    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    fn resolve_paths(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        resolve(&mut self.topic);
        self.records.iter_mut().for_each(resolve);
        if let Some(p) = self.applicant_records.as_mut() {
            resolve(p);
        }
        resolve(&mut self.output_dir);
    }
}

// ── Topic file ──────────────────────────────────────────────────────────────

/// Everything that defines one research topic. Only `dimensions` is required.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicConfig {
    #[serde(default = "default_topic_name")]
    pub name: String,
    pub dimensions: DimensionDefinitions,
    #[serde(default)]
    pub gap_combinations: CombinationSet,
    #[serde(default = "default_gap_threshold")]
    pub gap_threshold: usize,
    /// Sources reported in the gap matrix even when they contributed no records
    #[serde(default = "default_sources")]
    pub sources: Vec<Source>,
    #[serde(default)]
    pub trends: TrendConfig,
    #[serde(default)]
    pub cross_tab: Option<CrossTabConfig>,
    #[serde(default)]
    pub applicant: Option<ApplicantIdentity>,
    #[serde(default)]
    pub journals: JournalCatalog,
    #[serde(default)]
    pub weights: ScoreWeights,
    #[serde(default)]
    pub scoring: ScoringParams,
    #[serde(default)]
    pub collaboration: CollaborationParams,
    #[serde(default)]
    pub analyzer: AnalyzerConfig,
    #[serde(default)]
    pub benchmark: BenchmarkConfig,
}

fn default_topic_name()    -> String      { "topic".to_string() }
fn default_gap_threshold() -> usize       { DEFAULT_GAP_THRESHOLD }
fn default_sources()       -> Vec<Source> { Source::ALL.to_vec() }

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendConfig {
    #[serde(default = "default_trend_group")]
    pub group: DimensionGroup,
    /// Years in the "recent" window of the emerging/declining comparison
    #[serde(default = "default_recent_years")]
    pub recent_years: usize,
    /// Minimum change in year-over-year growth to report an inflection
    #[serde(default = "default_inflection_threshold")]
    pub inflection_threshold: f64,
}

fn default_trend_group()           -> DimensionGroup { DimensionGroup::Technique }
fn default_recent_years()          -> usize          { 5 }
fn default_inflection_threshold()  -> f64            { 0.5 }

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            group: default_trend_group(),
            recent_years: default_recent_years(),
            inflection_threshold: default_inflection_threshold(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrossTabConfig {
    pub rows: DimensionGroup,
    pub columns: DimensionGroup,
    #[serde(default = "bool_true")]
    pub include_other: bool,
}

fn bool_true() -> bool { true }

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkConfig {
    /// Built-in benchmark, ignored when `path` is set
    #[serde(default = "default_benchmark_name")]
    pub name: String,
    /// YAML benchmark file
    #[serde(default)]
    pub path: Option<PathBuf>,
}

fn default_benchmark_name() -> String { "NIBS-Psychiatry".to_string() }

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self { name: default_benchmark_name(), path: None }
    }
}

impl TopicConfig {
    pub fn from_yaml(content: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_json(content: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// `.json` files are parsed as JSON, anything else as YAML.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read topic file {}", path.display()))?;
        let is_json = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let mut topic = if is_json { Self::from_json(&content) } else { Self::from_yaml(&content) }
            .with_context(|| format!("Failed to parse topic file {}", path.display()))?;
        if let (Some(base), Some(p)) = (path.parent(), topic.benchmark.path.as_mut()) {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        }
        Ok(topic)
    }
}
