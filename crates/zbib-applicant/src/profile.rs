//! Applicant profile: the immutable result of one applicant analysis.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use zbib_common::quality::QualityReport;
use zbib_ranker::{ApplicantRawStats, Quadrant, SubScores, Weakness};

use crate::collaboration::{CollaborationEdge, CollaborationStats};

/// Impact-factor statistics over papers whose journal has a known IF.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfStats {
    pub papers: usize,
    pub total_if: f64,
    pub avg_if: f64,
    pub max_if: f64,
    pub median_if: f64,
}

impl IfStats {
    /// `None` for an empty slice.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        let total: f64 = sorted.iter().sum();
        Some(Self {
            papers: sorted.len(),
            total_if: total,
            avg_if: total / sorted.len() as f64,
            max_if: sorted[sorted.len() - 1],
            median_if: sorted[sorted.len() / 2],
        })
    }
}

/// A representative paper and the relevance points it earned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPaper {
    pub id: String,
    pub title: String,
    pub journal: Option<String>,
    pub year: Option<i32>,
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicantProfile {
    pub name_en: String,
    pub name_cn: String,
    pub reference_year: i32,

    // ── Publication counts ───────────────────────────────────────────────
    pub n_total: usize,
    pub n_disease: usize,
    pub n_technique: usize,
    pub n_crossover: usize,
    pub n_first_author: usize,
    pub n_corresponding: usize,
    pub n_first_or_corresponding: usize,

    // ── Time ─────────────────────────────────────────────────────────────
    pub year_counts: BTreeMap<i32, usize>,
    pub year_range: Option<(i32, i32)>,
    pub recent_count: usize,
    pub recent_window_years: i32,

    // ── Journals ─────────────────────────────────────────────────────────
    /// Most frequent journals, most papers first
    pub journal_counts: Vec<(String, usize)>,
    pub tier1_count: usize,
    pub tier2_count: usize,
    pub tier1_titles: Vec<String>,
    pub if_stats: Option<IfStats>,
    /// Estimated from impact factors; `None` without IF data
    pub influence_index: Option<u32>,

    // ── Content ──────────────────────────────────────────────────────────
    pub symptom_coverage: BTreeMap<String, usize>,
    pub target_coverage: BTreeMap<String, usize>,
    /// `"start-end"` → most frequent keywords of that period
    pub research_trajectory: BTreeMap<String, Vec<String>>,
    pub key_papers: Vec<KeyPaper>,

    // ── Collaboration ────────────────────────────────────────────────────
    pub collaboration: CollaborationStats,
    pub stable_teams: Vec<CollaborationEdge>,

    // ── Scores ───────────────────────────────────────────────────────────
    pub raw_stats: ApplicantRawStats,
    pub sub_scores: SubScores,
    pub fit_score: f64,
    pub competency_score: f64,
    pub overall_score: f64,
    pub quadrant: Quadrant,
    pub weaknesses: Vec<Weakness>,
    pub benchmark: String,
    /// metric → percentile in the benchmark sample
    pub percentile_ranks: BTreeMap<String, u8>,
    pub insufficient_data: bool,

    pub quality: QualityReport,
}

impl ApplicantProfile {
    pub fn display_name(&self) -> &str {
        if self.name_cn.trim().is_empty() { &self.name_en } else { &self.name_cn }
    }

    /// First- or corresponding-author share in [0, 1].
    pub fn independence_ratio(&self) -> f64 {
        if self.n_total == 0 {
            0.0
        } else {
            self.n_first_or_corresponding as f64 / self.n_total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_if_stats() {
        let stats = IfStats::from_values(&[3.0, 1.0, 8.0, 4.0]).unwrap();
        assert_eq!(stats.total_if, 16.0);
        assert_eq!(stats.avg_if, 4.0);
        assert_eq!(stats.max_if, 8.0);
        // upper median for even counts
        assert_eq!(stats.median_if, 4.0);
        assert!(IfStats::from_values(&[]).is_none());
    }
}
