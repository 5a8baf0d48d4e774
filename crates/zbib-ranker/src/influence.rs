//! Influence index: an H-index stand-in estimated from journal impact factors
//! when citation counts are unavailable.
//!
//! Each paper is credited `IF × √(years since publication) × 0.8` estimated
//! citations; the index is the largest h with h papers at or above h,
//! capped at twice the career length. This is an approximation and
//! should be reported as such.

use serde::{Deserialize, Serialize};

const CITATION_FACTOR: f64 = 0.8;
const MAX_INDEX_PER_CAREER_YEAR: u32 = 2;

/// What the estimate needs to know about one paper.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaperImpact {
    pub year: Option<i32>,
    pub impact_factor: Option<f64>,
}

/// Estimated citations of one paper; 0 without an impact factor.
/// An undated paper is treated as published in the reference year.
fn estimated_citations(paper: &PaperImpact, reference_year: i32) -> f64 {
    let Some(impact) = paper.impact_factor.filter(|v| v.is_finite() && *v > 0.0) else {
        return 0.0;
    };
    let year = paper.year.unwrap_or(reference_year);
    let years_since = (reference_year - year + 1).max(1) as f64;
    impact * years_since.sqrt() * CITATION_FACTOR
}

/// `None` when no paper has impact-factor data.
pub fn influence_index(papers: &[PaperImpact], reference_year: i32) -> Option<u32> {
    if !papers.iter().any(|p| p.impact_factor.is_some()) {
        return None;
    }

    let mut citations: Vec<f64> = papers
        .iter()
        .map(|p| estimated_citations(p, reference_year))
        .collect();
    citations.sort_by(|a, b| b.total_cmp(a));

    let h = citations
        .iter()
        .enumerate()
        .take_while(|(i, c)| **c >= (*i + 1) as f64)
        .count() as u32;

    let cap = papers
        .iter()
        .filter_map(|p| p.year)
        .min()
        .map(|first| ((reference_year - first + 1).max(1) as u32) * MAX_INDEX_PER_CAREER_YEAR);

    Some(match cap {
        Some(cap) => h.min(cap),
        None => h,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paper(year: i32, impact: f64) -> PaperImpact {
        PaperImpact { year: Some(year), impact_factor: Some(impact) }
    }

    #[test]
    fn test_no_impact_data_is_none() {
        let papers = vec![PaperImpact { year: Some(2020), impact_factor: None }];
        assert_eq!(influence_index(&papers, 2025), None);
        assert_eq!(influence_index(&[], 2025), None);
    }

    #[test]
    fn test_index_counts_papers_above_rank() {
        // citations: 10·√4·0.8 = 16, 4·√4·0.8 = 6.4, 1·1·0.8 = 0.8
        let papers = vec![paper(2022, 10.0), paper(2022, 4.0), paper(2025, 1.0)];
        assert_eq!(influence_index(&papers, 2025), Some(2));
    }

    #[test]
    fn test_index_capped_by_career_length() {
        // one-year career caps the index at 2
        let papers: Vec<PaperImpact> = (0..10).map(|_| paper(2025, 50.0)).collect();
        assert_eq!(influence_index(&papers, 2025), Some(2));
    }
}
