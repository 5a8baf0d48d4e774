//! Weight vector for applicant scoring.

use serde::{Deserialize, Serialize};

/// The six sub-metric weights. Fit uses the first three, competency the last three.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    /// Share of papers on the target disease
    #[serde(default = "default_disease")]
    pub disease: f64,
    /// Share of papers using the target technique
    #[serde(default = "default_technique")]
    pub technique: f64,
    /// Share of papers on disease AND technique
    #[serde(default = "default_crossover")]
    pub crossover: f64,
    /// Share of first- or corresponding-author papers
    #[serde(default = "default_independence")]
    pub independence: f64,
    /// Top-journal output and influence index
    #[serde(default = "default_impact")]
    pub impact: f64,
    /// Recent output
    #[serde(default = "default_activity")]
    pub activity: f64,
}

fn default_disease() -> f64 { 0.20 }
fn default_technique() -> f64 { 0.20 }
fn default_crossover() -> f64 { 0.10 }
fn default_independence() -> f64 { 0.20 }
fn default_impact() -> f64 { 0.15 }
fn default_activity() -> f64 { 0.15 }

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            disease:      default_disease(),
            technique:    default_technique(),
            crossover:    default_crossover(),
            independence: default_independence(),
            impact:       default_impact(),
            activity:     default_activity(),
        }
    }
}

impl ScoreWeights {
    fn sum(&self) -> f64 {
        self.as_array().iter().sum()
    }

    /// Validate that all weights sum to ~1.0
    pub fn validate(&self) -> bool {
        self.is_usable() && (self.sum() - 1.0).abs() < 1e-6
    }

    /// Every weight finite and non-negative, and at least one positive.
    pub fn is_usable(&self) -> bool {
        self.as_array().iter().all(|w| w.is_finite() && *w >= 0.0) && self.sum() > 0.0
    }

    /// Renormalise weights so they sum to 1.0
    pub fn normalise(&mut self) {
        let sum = self.sum();
        if sum > 0.0 && sum.is_finite() {
            self.disease      /= sum;
            self.technique    /= sum;
            self.crossover    /= sum;
            self.independence /= sum;
            self.impact       /= sum;
            self.activity     /= sum;
        }
    }

    /// `[disease, technique, crossover, independence, impact, activity]`
    pub fn as_array(&self) -> [f64; 6] {
        [
            self.disease,
            self.technique,
            self.crossover,
            self.independence,
            self.impact,
            self.activity,
        ]
    }
}
