//! Quadrant placement and weakness assessment.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::scorer::SubScores;

/// Position on the fit × competency plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quadrant {
    /// High fit, high competency
    Star,
    /// High fit, competency still developing
    Potential,
    /// Strong researcher from a neighbouring field
    Crossover,
    Novice,
}

impl Quadrant {
    /// Boundaries are inclusive: a score equal to `threshold` counts as high.
    pub fn locate(fit: f64, competency: f64, threshold: f64) -> Self {
        match (fit >= threshold, competency >= threshold) {
            (true, true)   => Quadrant::Star,
            (true, false)  => Quadrant::Potential,
            (false, true)  => Quadrant::Crossover,
            (false, false) => Quadrant::Novice,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Quadrant::Star      => "star",
            Quadrant::Potential => "potential",
            Quadrant::Crossover => "crossover",
            Quadrant::Novice    => "novice",
        }
    }
}

impl fmt::Display for Quadrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubMetric {
    Disease,
    Technique,
    Crossover,
    Independence,
    Impact,
    Activity,
}

impl SubMetric {
    pub const ALL: [SubMetric; 6] = [
        SubMetric::Disease,
        SubMetric::Technique,
        SubMetric::Crossover,
        SubMetric::Independence,
        SubMetric::Impact,
        SubMetric::Activity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SubMetric::Disease      => "disease",
            SubMetric::Technique    => "technique",
            SubMetric::Crossover    => "crossover",
            SubMetric::Independence => "independence",
            SubMetric::Impact       => "impact",
            SubMetric::Activity     => "activity",
        }
    }

    fn issue(&self) -> &'static str {
        match self {
            SubMetric::Disease      => "little prior work on the target disease",
            SubMetric::Technique    => "limited experience with the target technique",
            SubMetric::Crossover    => "few papers combining disease and technique",
            SubMetric::Independence => "low share of first/corresponding-author papers",
            SubMetric::Impact       => "few high-impact publications",
            SubMetric::Activity     => "low recent output",
        }
    }
}

/// Sub-metric values (in [0, 1]) below which a weakness is reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaknessThresholds {
    #[serde(default = "default_060")]
    pub disease: f64,
    #[serde(default = "default_060")]
    pub technique: f64,
    #[serde(default = "default_040")]
    pub crossover: f64,
    #[serde(default = "default_050")]
    pub independence: f64,
    #[serde(default = "default_050")]
    pub impact: f64,
    #[serde(default = "default_050")]
    pub activity: f64,
}

fn default_060() -> f64 { 0.6 }
fn default_050() -> f64 { 0.5 }
fn default_040() -> f64 { 0.4 }

impl Default for WeaknessThresholds {
    fn default() -> Self {
        Self {
            disease:      default_060(),
            technique:    default_060(),
            crossover:    default_040(),
            independence: default_050(),
            impact:       default_050(),
            activity:     default_050(),
        }
    }
}

impl WeaknessThresholds {
    pub fn get(&self, metric: SubMetric) -> f64 {
        match metric {
            SubMetric::Disease      => self.disease,
            SubMetric::Technique    => self.technique,
            SubMetric::Crossover    => self.crossover,
            SubMetric::Independence => self.independence,
            SubMetric::Impact       => self.impact,
            SubMetric::Activity     => self.activity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weakness {
    pub metric: SubMetric,
    pub value: f64,
    pub threshold: f64,
    pub issue: String,
}

/// Sub-metrics below their threshold, weakest first. Unavailable sub-metrics
/// are not assessed.
pub fn find_weaknesses(sub: &SubScores, thresholds: &WeaknessThresholds) -> Vec<Weakness> {
    let mut found: Vec<Weakness> = SubMetric::ALL
        .iter()
        .filter_map(|&metric| {
            let value = sub.get(metric)?;
            let threshold = thresholds.get(metric);
            (value < threshold).then(|| Weakness {
                metric,
                value,
                threshold,
                issue: metric.issue().to_string(),
            })
        })
        .collect();
    found.sort_by(|a, b| a.value.total_cmp(&b.value).then(a.metric.cmp(&b.metric)));
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quadrant_boundaries_inclusive() {
        assert_eq!(Quadrant::locate(50.0, 50.0, 50.0), Quadrant::Star);
        assert_eq!(Quadrant::locate(50.0, 49.9, 50.0), Quadrant::Potential);
        assert_eq!(Quadrant::locate(10.0, 90.0, 50.0), Quadrant::Crossover);
        assert_eq!(Quadrant::locate(0.0, 0.0, 50.0), Quadrant::Novice);
    }

    #[test]
    fn test_weaknesses_sorted_weakest_first() {
        let sub = SubScores {
            disease: 0.9,
            technique: 0.3,
            crossover: 0.1,
            independence: 0.5,
            impact: None,
            activity: 0.2,
        };
        let found = find_weaknesses(&sub, &WeaknessThresholds::default());
        let metrics: Vec<SubMetric> = found.iter().map(|w| w.metric).collect();
        // independence sits exactly on its threshold; impact is unavailable
        assert_eq!(metrics, vec![SubMetric::Crossover, SubMetric::Activity, SubMetric::Technique]);
    }
}
