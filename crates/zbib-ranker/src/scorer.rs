//! Fit / competency score computation.
//!
//! fit        = (w_d·disease + w_t·technique + w_c·crossover) × 100 / Σw
//! competency = (w_i·independence + w_m·impact + w_a·activity) × 100 / Σw
//!
//! Σw only covers sub-metrics that could be computed.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use zbib_common::{Result, ZbibError};

use crate::assessment::{find_weaknesses, Quadrant, SubMetric, Weakness, WeaknessThresholds};
use crate::normalise::{clamp_ratio, mean_present, round1, saturating_ratio, weighted_score};
use crate::weights::ScoreWeights;

/// Tunable constants of the score. All have serde defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringParams {
    /// Recent papers needed for a full activity sub-score
    #[serde(default = "default_activity_target")]
    pub activity_target: f64,
    /// Fit and competency at or above this are "high"
    #[serde(default = "default_quadrant_threshold")]
    pub quadrant_threshold: f64,
    /// Top-tier papers needed for a full top-journal part
    #[serde(default = "default_top_journal_target")]
    pub top_journal_target: f64,
    /// Influence index needed for a full influence part
    #[serde(default = "default_influence_target")]
    pub influence_target: f64,
    /// Length of the "recent output" window in years, reference year included
    #[serde(default = "default_recent_window_years")]
    pub recent_window_years: i32,
    #[serde(default)]
    pub weakness: WeaknessThresholds,
}

fn default_activity_target() -> f64 { 10.0 }
fn default_quadrant_threshold() -> f64 { 50.0 }
fn default_top_journal_target() -> f64 { 5.0 }
fn default_influence_target() -> f64 { 10.0 }
fn default_recent_window_years() -> i32 { 5 }

impl Default for ScoringParams {
    fn default() -> Self {
        Self {
            activity_target: default_activity_target(),
            quadrant_threshold: default_quadrant_threshold(),
            top_journal_target: default_top_journal_target(),
            influence_target: default_influence_target(),
            recent_window_years: default_recent_window_years(),
            weakness: WeaknessThresholds::default(),
        }
    }
}

/// Counts the score is computed from. Paper counts are unique papers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantRawStats {
    pub total: usize,
    pub disease: usize,
    pub technique: usize,
    pub crossover: usize,
    pub first_or_corresponding: usize,
    /// `None` when no journal catalog was available
    pub top_journal_count: Option<usize>,
    /// `None` when no impact-factor data was available
    pub influence_index: Option<u32>,
    pub recent: usize,
}

/// Sub-metrics in [0, 1].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubScores {
    pub disease: f64,
    pub technique: f64,
    pub crossover: f64,
    pub independence: f64,
    /// `None` when neither impact part could be computed
    pub impact: Option<f64>,
    pub activity: f64,
}

impl SubScores {
    pub fn get(&self, metric: SubMetric) -> Option<f64> {
        match metric {
            SubMetric::Disease      => Some(self.disease),
            SubMetric::Technique    => Some(self.technique),
            SubMetric::Crossover    => Some(self.crossover),
            SubMetric::Independence => Some(self.independence),
            SubMetric::Impact       => self.impact,
            SubMetric::Activity     => Some(self.activity),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreCard {
    pub sub_scores: SubScores,
    pub fit_score: f64,
    pub competency_score: f64,
    /// All six sub-metrics combined
    pub overall_score: f64,
    pub quadrant: Quadrant,
    pub weaknesses: Vec<Weakness>,
    pub insufficient_data: bool,
}

#[derive(Debug, Clone)]
pub struct ScoreEngine {
    weights: ScoreWeights,
    params: ScoringParams,
}

impl ScoreEngine {
    /// Weights that do not sum to 1 are renormalised; weights that cannot be
    /// normalised are rejected.
    pub fn new(mut weights: ScoreWeights, params: ScoringParams) -> Result<Self> {
        if !weights.is_usable() {
            return Err(ZbibError::Config(format!(
                "score weights must be finite, non-negative and not all zero: {:?}",
                weights.as_array()
            )));
        }
        if !weights.validate() {
            warn!("Score weights do not sum to 1.0; renormalising");
            weights.normalise();
        }
        Ok(Self { weights, params })
    }

    pub fn weights(&self) -> &ScoreWeights {
        &self.weights
    }

    pub fn params(&self) -> &ScoringParams {
        &self.params
    }

    pub fn sub_scores(&self, stats: &ApplicantRawStats) -> SubScores {
        let total = stats.total;
        let top_journal = stats
            .top_journal_count
            .map(|n| saturating_ratio(n as f64, self.params.top_journal_target));
        let influence = stats
            .influence_index
            .map(|h| saturating_ratio(h as f64, self.params.influence_target));

        SubScores {
            disease: clamp_ratio(stats.disease, total),
            technique: clamp_ratio(stats.technique, total),
            crossover: clamp_ratio(stats.crossover, total),
            independence: clamp_ratio(stats.first_or_corresponding, total),
            impact: mean_present(&[top_journal, influence]),
            activity: saturating_ratio(stats.recent as f64, self.params.activity_target),
        }
    }

    pub fn score(&self, stats: &ApplicantRawStats) -> ScoreCard {
        let insufficient_data = stats.total == 0;
        if insufficient_data {
            debug!("No publications to score; reporting zero scores");
        }

        let sub = if insufficient_data { SubScores::default() } else { self.sub_scores(stats) };
        let w = &self.weights;

        let fit = weighted_score(&[
            (Some(sub.disease), w.disease),
            (Some(sub.technique), w.technique),
            (Some(sub.crossover), w.crossover),
        ]);
        let competency = weighted_score(&[
            (Some(sub.independence), w.independence),
            (sub.impact, w.impact),
            (Some(sub.activity), w.activity),
        ]);
        let overall = weighted_score(&[
            (Some(sub.disease), w.disease),
            (Some(sub.technique), w.technique),
            (Some(sub.crossover), w.crossover),
            (Some(sub.independence), w.independence),
            (sub.impact, w.impact),
            (Some(sub.activity), w.activity),
        ]);

        let (fit, competency, overall) = (round1(fit), round1(competency), round1(overall));
        let quadrant = Quadrant::locate(fit, competency, self.params.quadrant_threshold);
        let weaknesses = find_weaknesses(&sub, &self.params.weakness);

        debug!(fit, competency, overall, %quadrant, "Scored applicant");

        ScoreCard {
            sub_scores: sub,
            fit_score: fit,
            competency_score: competency,
            overall_score: overall,
            quadrant,
            weaknesses,
            insufficient_data,
        }
    }
}

impl Default for ScoreEngine {
    fn default() -> Self {
        Self { weights: ScoreWeights::default(), params: ScoringParams::default() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats() -> ApplicantRawStats {
        ApplicantRawStats {
            total: 20,
            disease: 10,
            technique: 10,
            crossover: 5,
            first_or_corresponding: 8,
            top_journal_count: Some(2),
            influence_index: Some(5),
            recent: 5,
        }
    }

    #[test]
    fn test_score_formula() {
        let card = ScoreEngine::default().score(&stats());
        // fit = (0.2·0.5 + 0.2·0.5 + 0.1·0.25) × 100 / 0.5 = 45
        assert_eq!(card.fit_score, 45.0);
        // impact = mean(2/5, 5/10) = 0.45
        // competency = (0.2·0.4 + 0.15·0.45 + 0.15·0.5) × 100 / 0.5 = 44.5
        assert_eq!(card.competency_score, 44.5);
        assert_eq!(card.quadrant, Quadrant::Novice);
        assert!(!card.insufficient_data);
    }

    #[test]
    fn test_zero_publications() {
        let card = ScoreEngine::default().score(&ApplicantRawStats::default());
        assert!(card.insufficient_data);
        assert_eq!(card.fit_score, 0.0);
        assert_eq!(card.competency_score, 0.0);
        assert_eq!(card.overall_score, 0.0);
    }

    #[test]
    fn test_unavailable_impact_is_excluded() {
        let mut s = stats();
        s.top_journal_count = None;
        s.influence_index = None;
        let card = ScoreEngine::default().score(&s);
        assert_eq!(card.sub_scores.impact, None);
        // (0.2·0.4 + 0.15·0.5) × 100 / 0.35
        assert!((card.competency_score - 44.3).abs() < 1e-9);
    }

    #[test]
    fn test_scores_stay_in_range() {
        let s = ApplicantRawStats {
            total: 3,
            disease: 9,
            technique: 9,
            crossover: 9,
            first_or_corresponding: 9,
            top_journal_count: Some(100),
            influence_index: Some(100),
            recent: 100,
        };
        let card = ScoreEngine::default().score(&s);
        assert_eq!(card.fit_score, 100.0);
        assert_eq!(card.competency_score, 100.0);
        assert_eq!(card.quadrant, Quadrant::Star);
        assert!(card.weaknesses.is_empty());
    }

    #[test]
    fn test_invalid_weights_rejected() {
        let weights = ScoreWeights { disease: f64::NAN, ..Default::default() };
        assert!(ScoreEngine::new(weights, ScoringParams::default()).is_err());

        let skewed = ScoreWeights { disease: 0.5, ..Default::default() };
        let engine = ScoreEngine::new(skewed, ScoringParams::default()).unwrap();
        assert!(engine.weights().validate());
    }
}
