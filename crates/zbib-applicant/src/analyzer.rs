//! Builds an [`ApplicantProfile`] from an applicant's publication records.

use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use zbib_classify::{ClassificationTable, PatternClassifier};
use zbib_common::quality::check_records;
use zbib_common::{current_year, ApplicantIdentity, DimensionGroup, JournalCatalog, JournalTier, Record};
use zbib_ranker::{influence_index, metrics, ApplicantRawStats, FieldBenchmark, PaperImpact, ScoreCard, ScoreEngine};

use crate::authorship::{ApplicantMatcher, Authorship, AuthorshipCounts};
use crate::collaboration::{CollaborationAnalyzer, CollaborationParams};
use crate::profile::{ApplicantProfile, IfStats, KeyPaper};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Year that "recent" and paper age are measured from. Defaults to the current year.
    #[serde(default)]
    pub reference_year: Option<i32>,
    #[serde(default = "default_key_papers")]
    pub key_papers: usize,
    #[serde(default = "default_trajectory_keywords")]
    pub trajectory_keywords: usize,
    #[serde(default = "default_top_journals")]
    pub top_journals: usize,
    #[serde(default = "default_tier1_titles")]
    pub tier1_titles: usize,
}

fn default_key_papers() -> usize { 5 }
fn default_trajectory_keywords() -> usize { 5 }
fn default_top_journals() -> usize { 15 }
fn default_tier1_titles() -> usize { 5 }

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            reference_year: None,
            key_papers: default_key_papers(),
            trajectory_keywords: default_trajectory_keywords(),
            top_journals: default_top_journals(),
            tier1_titles: default_tier1_titles(),
        }
    }
}

pub struct ApplicantAnalyzer {
    identity: ApplicantIdentity,
    matcher: ApplicantMatcher,
    classifier: PatternClassifier,
    catalog: JournalCatalog,
    engine: ScoreEngine,
    collaboration: CollaborationAnalyzer,
    benchmark: Arc<FieldBenchmark>,
    config: AnalyzerConfig,
}

impl ApplicantAnalyzer {
    pub fn new(identity: ApplicantIdentity, classifier: PatternClassifier, benchmark: Arc<FieldBenchmark>) -> Self {
        let matcher = ApplicantMatcher::new(&identity);
        let collaboration = CollaborationAnalyzer::new(matcher.clone(), CollaborationParams::default());
        Self {
            identity,
            matcher,
            classifier,
            catalog: JournalCatalog::default(),
            engine: ScoreEngine::default(),
            collaboration,
            benchmark,
            config: AnalyzerConfig::default(),
        }
    }

    pub fn with_catalog(mut self, catalog: JournalCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_engine(mut self, engine: ScoreEngine) -> Self {
        self.engine = engine;
        self
    }

    pub fn with_collaboration(mut self, params: CollaborationParams) -> Self {
        self.collaboration = CollaborationAnalyzer::new(self.matcher.clone(), params);
        self
    }

    pub fn with_config(mut self, config: AnalyzerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn analyze(&self, records: &[Record]) -> ApplicantProfile {
        let reference_year = self.config.reference_year.unwrap_or_else(current_year);
        let (records, quality) = check_records(records, reference_year, "applicant");
        let table = self.classifier.classify_all(&records, &DimensionGroup::ALL);

        let has = |r: &Record, g: DimensionGroup| !table.labels(r, g).is_empty();
        let n_disease = records.iter().filter(|r| has(r, DimensionGroup::Disease)).count();
        let n_technique = records.iter().filter(|r| has(r, DimensionGroup::Technique)).count();
        let n_crossover = records
            .iter()
            .filter(|r| has(r, DimensionGroup::Disease) && has(r, DimensionGroup::Technique))
            .count();

        let authorship = AuthorshipCounts::tally(&records, &self.matcher);

        // ── Time ─────────────────────────────────────────────────────────
        let mut year_counts: BTreeMap<i32, usize> = BTreeMap::new();
        for year in records.iter().filter_map(|r| r.year) {
            *year_counts.entry(year).or_insert(0) += 1;
        }
        let year_range = year_counts
            .keys()
            .next()
            .zip(year_counts.keys().next_back())
            .map(|(a, b)| (*a, *b));
        let window = self.engine.params().recent_window_years.max(1);
        let recent_from = reference_year - (window - 1);
        let recent_count = records
            .iter()
            .filter(|r| r.year.is_some_and(|y| y >= recent_from))
            .count();

        // ── Journals ─────────────────────────────────────────────────────
        let journal_counts = self.journal_counts(&records);
        let tier = |r: &Record| r.journal_name().and_then(|j| self.catalog.tier(j));
        let tier1: Vec<&Record> = records.iter().filter(|r| tier(r) == Some(JournalTier::Tier1)).collect();
        let tier2_count = records.iter().filter(|r| tier(r) == Some(JournalTier::Tier2)).count();

        let impacts: Vec<PaperImpact> = records
            .iter()
            .map(|r| PaperImpact {
                year: r.year,
                impact_factor: r.journal_name().and_then(|j| self.catalog.impact_factor(j)),
            })
            .collect();
        let if_values: Vec<f64> = impacts.iter().filter_map(|p| p.impact_factor).collect();
        let if_stats = IfStats::from_values(&if_values);
        let influence = influence_index(&impacts, reference_year);

        // ── Collaboration ────────────────────────────────────────────────
        let network = self.collaboration.build_network(&records);

        // ── Scores ───────────────────────────────────────────────────────
        let raw_stats = ApplicantRawStats {
            total: records.len(),
            disease: n_disease,
            technique: n_technique,
            crossover: n_crossover,
            first_or_corresponding: authorship.first_or_corresponding,
            top_journal_count: (!self.catalog.tier1.is_empty()).then_some(tier1.len()),
            influence_index: influence,
            recent: recent_count,
        };
        let card = self.engine.score(&raw_stats);
        if card.insufficient_data {
            warn!(applicant = %self.identity.display_name(), "No usable publications; profile marked insufficient");
        }
        let percentile_ranks = self.percentile_ranks(&raw_stats, if_stats.as_ref(), &card);

        let profile = ApplicantProfile {
            name_en: self.identity.name_en.clone(),
            name_cn: self.identity.name_cn.clone(),
            reference_year,
            n_total: records.len(),
            n_disease,
            n_technique,
            n_crossover,
            n_first_author: authorship.first_author,
            n_corresponding: authorship.corresponding,
            n_first_or_corresponding: authorship.first_or_corresponding,
            year_counts,
            year_range,
            recent_count,
            recent_window_years: window,
            journal_counts,
            tier1_count: tier1.len(),
            tier2_count,
            tier1_titles: tier1.iter().take(self.config.tier1_titles).map(|r| r.title.clone()).collect(),
            if_stats,
            influence_index: influence,
            symptom_coverage: self.coverage(&table, DimensionGroup::Symptom),
            target_coverage: self.coverage(&table, DimensionGroup::Target),
            research_trajectory: research_trajectory(&records, self.config.trajectory_keywords),
            key_papers: self.key_papers(&records, &table, reference_year),
            collaboration: network.stats,
            stable_teams: network.stable_teams,
            raw_stats,
            sub_scores: card.sub_scores,
            fit_score: card.fit_score,
            competency_score: card.competency_score,
            overall_score: card.overall_score,
            quadrant: card.quadrant,
            weaknesses: card.weaknesses,
            benchmark: self.benchmark.name.clone(),
            percentile_ranks,
            insufficient_data: card.insufficient_data,
            quality,
        };

        info!(
            applicant = %profile.display_name(),
            papers = profile.n_total,
            fit = profile.fit_score,
            competency = profile.competency_score,
            quadrant = %profile.quadrant,
            "Applicant profile built"
        );
        profile
    }

    fn journal_counts(&self, records: &[Record]) -> Vec<(String, usize)> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for journal in records.iter().filter_map(Record::journal_name) {
            *counts.entry(journal).or_insert(0) += 1;
        }
        let mut ranked: Vec<(String, usize)> = counts.into_iter().map(|(j, c)| (j.to_string(), c)).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(self.config.top_journals);
        ranked
    }

    /// Dimensions with at least one matching paper.
    fn coverage(&self, table: &ClassificationTable, group: DimensionGroup) -> BTreeMap<String, usize> {
        self.classifier
            .coverage(table, group)
            .into_iter()
            .filter(|(_, n)| *n > 0)
            .collect()
    }

    /// Ratio-based ranks are left out when there is no publication to take a
    /// ratio of; IF-based ranks when no IF data was available.
    fn percentile_ranks(
        &self,
        stats: &ApplicantRawStats,
        if_stats: Option<&IfStats>,
        card: &ScoreCard,
    ) -> BTreeMap<String, u8> {
        let sufficient = !card.insufficient_data;
        let independence = sufficient
            .then(|| stats.first_or_corresponding as f64 / stats.total as f64 * 100.0);

        let candidates: [(&str, Option<f64>); 10] = [
            (metrics::N_TOTAL,         Some(stats.total as f64)),
            (metrics::RECENT,          Some(stats.recent as f64)),
            (metrics::INFLUENCE_INDEX, stats.influence_index.map(f64::from)),
            (metrics::INDEPENDENCE,    independence),
            (metrics::TIER1,           stats.top_journal_count.map(|n| n as f64)),
            (metrics::TOTAL_IF,        if_stats.map(|s| s.total_if)),
            (metrics::AVG_IF,          if_stats.map(|s| s.avg_if)),
            (metrics::FIT,             sufficient.then_some(card.fit_score)),
            (metrics::COMPETENCY,      sufficient.then_some(card.competency_score)),
            (metrics::TOTAL_SCORE,     sufficient.then_some(card.overall_score)),
        ];

        let mut ranks = BTreeMap::new();
        for (metric, value) in candidates {
            let Some(value) = value else { continue };
            match self.benchmark.percentile(metric, value) {
                Ok(pct) => {
                    ranks.insert(metric.to_string(), pct);
                }
                Err(e) => debug!(benchmark = %self.benchmark.name, "Skipping rank: {e}"),
            }
        }
        ranks
    }

    /// Top papers by relevance points: tier-1 journal +5, first author +4
    /// (else corresponding +3), published within 2 years +3 (else within 4
    /// years +2). Drawn from technique papers, else disease papers, else all.
    fn key_papers(&self, records: &[Record], table: &ClassificationTable, reference_year: i32) -> Vec<KeyPaper> {
        let in_group = |g: DimensionGroup| -> Vec<&Record> {
            records.iter().filter(|r| !table.labels(r, g).is_empty()).collect()
        };
        let mut pool = in_group(DimensionGroup::Technique);
        if pool.is_empty() {
            pool = in_group(DimensionGroup::Disease);
        }
        if pool.is_empty() {
            pool = records.iter().collect();
        }

        let mut scored: Vec<KeyPaper> = pool
            .into_iter()
            .map(|r| {
                let mut score = 0;
                if r.journal_name().and_then(|j| self.catalog.tier(j)) == Some(JournalTier::Tier1) {
                    score += 5;
                }
                let authorship = Authorship::of(r, &self.matcher);
                if authorship.first {
                    score += 4;
                } else if authorship.corresponding {
                    score += 3;
                }
                match r.year {
                    Some(y) if y >= reference_year - 2 => score += 3,
                    Some(y) if y >= reference_year - 4 => score += 2,
                    _ => {}
                }
                KeyPaper {
                    id: r.id.clone(),
                    title: r.title.clone(),
                    journal: r.journal_name().map(str::to_string),
                    year: r.year,
                    score,
                }
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| Reverse(a.year).cmp(&Reverse(b.year)))
                .then_with(|| a.id.cmp(&b.id))
        });
        scored.truncate(self.config.key_papers);
        scored
    }
}

/// Split the publication span into up to three periods and list the most
/// frequent keywords of each.
fn research_trajectory(records: &[Record], top_n: usize) -> BTreeMap<String, Vec<String>> {
    let mut trajectory = BTreeMap::new();
    let (Some(min), Some(max)) = (
        records.iter().filter_map(|r| r.year).min(),
        records.iter().filter_map(|r| r.year).max(),
    ) else {
        return trajectory;
    };

    let span = max - min;
    let periods = if span <= 5 {
        vec![(min, max)]
    } else if span <= 10 {
        let mid = (min + max) / 2;
        vec![(min, mid), (mid + 1, max)]
    } else {
        let step = span / 3;
        vec![(min, min + step), (min + step + 1, min + 2 * step), (min + 2 * step + 1, max)]
    };

    for (start, end) in periods {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for record in records.iter().filter(|r| r.year.is_some_and(|y| (start..=end).contains(&y))) {
            for keyword in &record.keywords {
                let keyword = keyword.trim().to_lowercase();
                if !keyword.is_empty() {
                    *counts.entry(keyword).or_insert(0) += 1;
                }
            }
        }
        if counts.is_empty() {
            continue;
        }
        let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        trajectory.insert(
            format!("{start}-{end}"),
            ranked.into_iter().take(top_n).map(|(k, _)| k).collect(),
        );
    }
    trajectory
}
