//! Run stages: load record snapshots, classify, detect gaps, profile the applicant.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use serde::Serialize;
use tracing::{debug, info, warn};
use zbib_applicant::{ApplicantAnalyzer, ApplicantProfile};
use zbib_classify::{ClassificationTable, PatternClassifier};
use zbib_common::{ApplicantIdentity, DimensionGroup, Record, RecordRow};
use zbib_gap::{
    cross_tab, detect_inflections, emerging_declining, growth_rates, year_series, CrossTab,
    GapDetector, GapReport, GrowthRate, Inflection, TrendSummary, YearSeries,
};
use zbib_ranker::{FieldBenchmark, ScoreEngine};

use crate::config::TopicConfig;

// ── Record loading ──────────────────────────────────────────────────────────

pub fn load_records(path: &Path) -> anyhow::Result<Vec<Record>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open record file {}", path.display()))?;
    read_records(file, &path.display().to_string())
}

/// Parse a CSV snapshot. Rows that parse as CSV but fail validation are
/// skipped with a warning; malformed CSV aborts.
pub fn read_records<R: Read>(input: R, label: &str) -> anyhow::Result<Vec<Record>> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(input);
    let mut records = Vec::new();
    let mut skipped = 0usize;

    for (line, row) in reader.deserialize::<RecordRow>().enumerate() {
        let row = row.with_context(|| format!("{label}: malformed row {}", line + 1))?;
        match Record::try_from(row) {
            Ok(record) => records.push(record),
            Err(e) => {
                warn!("{label}: skipping row {}: {e}", line + 1);
                skipped += 1;
            }
        }
    }

    info!(records = records.len(), skipped, "Loaded {label}");
    Ok(records)
}

// ── Population analysis ─────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct TrendReport {
    pub group: DimensionGroup,
    pub series: BTreeMap<String, YearSeries>,
    pub inflections: BTreeMap<String, Vec<Inflection>>,
    pub growth: Vec<GrowthRate>,
    pub shifts: TrendSummary,
}

pub struct PopulationAnalysis {
    pub classification: ClassificationTable,
    pub gaps: Option<GapReport>,
    pub cross_tab: Option<CrossTab>,
    pub trends: TrendReport,
}

pub fn analyze_population(
    topic: &TopicConfig,
    classifier: &PatternClassifier,
    records: &[Record],
) -> anyhow::Result<PopulationAnalysis> {
    let classification = classifier.classify_all(records, &DimensionGroup::ALL);
    info!(records = records.len(), classified = classification.len(), "Classification complete");

    let gaps = if topic.gap_combinations.is_empty() {
        info!("No gap combinations configured; skipping gap detection");
        None
    } else {
        let detector = GapDetector::new(classifier.registry(), &topic.gap_combinations)?
            .with_sources(topic.sources.iter().copied());
        let report = detector.report(records, &classification, topic.gap_threshold);
        for (source, names) in &report.gaps {
            info!(
                %source,
                gaps = names.len(),
                combinations = detector.combinations().len(),
                "Gap detection"
            );
        }
        Some(report)
    };

    let cross_tab = topic.cross_tab.as_ref().map(|ct| {
        cross_tab(classifier.registry(), &classification, ct.rows, ct.columns, ct.include_other)
    });

    let trends = trend_report(topic, records, &classification);
    debug!(
        emerging = trends.shifts.emerging.len(),
        declining = trends.shifts.declining.len(),
        "Trend analysis complete"
    );

    Ok(PopulationAnalysis { classification, gaps, cross_tab, trends })
}

fn trend_report(topic: &TopicConfig, records: &[Record], table: &ClassificationTable) -> TrendReport {
    let group = topic.trends.group;
    let series = year_series(records, table, group);
    let inflections = series
        .iter()
        .map(|(name, s)| (name.clone(), detect_inflections(s, topic.trends.inflection_threshold)))
        .filter(|(_, found)| !found.is_empty())
        .collect();
    TrendReport {
        group,
        growth: growth_rates(&series),
        shifts: emerging_declining(&series, topic.trends.recent_years),
        inflections,
        series,
    }
}

// ── Applicant analysis ──────────────────────────────────────────────────────

pub fn load_benchmark(topic: &TopicConfig) -> anyhow::Result<FieldBenchmark> {
    let benchmark = match &topic.benchmark.path {
        Some(path) => FieldBenchmark::from_yaml_file(path)
            .with_context(|| format!("Failed to load benchmark {}", path.display()))?,
        None => FieldBenchmark::by_name(&topic.benchmark.name)?,
    };
    Ok(benchmark)
}

pub fn analyze_applicant(
    topic: &TopicConfig,
    identity: ApplicantIdentity,
    classifier: &PatternClassifier,
    benchmark: Arc<FieldBenchmark>,
    records: &[Record],
) -> anyhow::Result<ApplicantProfile> {
    let engine = ScoreEngine::new(topic.weights.clone(), topic.scoring.clone())?;
    let analyzer = ApplicantAnalyzer::new(identity, classifier.clone(), benchmark)
        .with_catalog(topic.journals.clone())
        .with_engine(engine)
        .with_collaboration(topic.collaboration.clone())
        .with_config(topic.analyzer.clone());

    Ok(analyzer.analyze(records))
}

// ── Output ──────────────────────────────────────────────────────────────────

pub fn write_json<T: Serialize>(dir: &Path, name: &str, value: &T) -> anyhow::Result<()> {
    let path = dir.join(name);
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    debug!("Wrote {}", path.display());
    Ok(())
}
