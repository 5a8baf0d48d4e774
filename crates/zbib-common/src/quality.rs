//! Record clean-up applied before an applicant's publications are profiled.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::records::{Record, Source};

/// Earliest publication year accepted as plausible.
pub const MIN_PLAUSIBLE_YEAR: i32 = 1950;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityReport {
    pub original: usize,
    pub cleaned: usize,
    pub duplicate_ids: usize,
    pub implausible_years: usize,
    pub empty_titles: usize,
    /// field → number of kept records missing it
    pub missing_fields: BTreeMap<String, usize>,
}

impl QualityReport {
    pub fn removed(&self) -> usize {
        self.original - self.cleaned
    }

    pub fn has_issues(&self) -> bool {
        self.duplicate_ids + self.implausible_years + self.empty_titles > 0
    }
}

/// Drop duplicate ids within a source (first wins), clear years outside
/// `[1950, reference_year + 1]` and drop records without a title.
/// Returns new records; the input is left untouched.
pub fn check_records(records: &[Record], reference_year: i32, label: &str) -> (Vec<Record>, QualityReport) {
    let mut report = QualityReport { original: records.len(), ..Default::default() };
    let mut seen: HashSet<(Source, &str)> = HashSet::with_capacity(records.len());
    let mut cleaned = Vec::with_capacity(records.len());

    for record in records {
        if !seen.insert((record.source, record.id.as_str())) {
            report.duplicate_ids += 1;
            continue;
        }
        if record.title.trim().is_empty() {
            report.empty_titles += 1;
            continue;
        }

        let mut record = record.clone();
        if let Some(year) = record.year {
            if !(MIN_PLAUSIBLE_YEAR..=reference_year + 1).contains(&year) {
                record.year = None;
                report.implausible_years += 1;
            }
        }
        cleaned.push(record);
    }

    for record in &cleaned {
        let missing = [
            ("journal", record.journal.is_none()),
            ("authors", record.authors.is_empty()),
            ("abstract", record.abstract_text.is_none()),
            ("year", record.year.is_none()),
        ];
        for (field, is_missing) in missing {
            if is_missing {
                *report.missing_fields.entry(field.to_string()).or_default() += 1;
            }
        }
    }

    report.cleaned = cleaned.len();
    if report.has_issues() {
        warn!(
            label,
            duplicates = report.duplicate_ids,
            bad_years = report.implausible_years,
            empty_titles = report.empty_titles,
            "Cleaned records ({} -> {})",
            report.original,
            report.cleaned
        );
    }

    (cleaned, report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, title: &str, year: Option<i32>) -> Record {
        Record {
            id: id.to_string(),
            title: title.to_string(),
            abstract_text: None,
            keywords: vec![],
            year,
            journal: Some("Cortex".to_string()),
            authors: vec![],
            source: Source::PubMed,
            first_author_flag: None,
            corresponding_author_flag: None,
        }
    }

    #[test]
    fn test_check_records() {
        let records = vec![
            record("1", "A", Some(2020)),
            record("1", "A again", Some(2021)),
            record("2", "  ", Some(2020)),
            record("3", "C", Some(1890)),
            record("4", "D", Some(2031)),
            record("5", "E", None),
        ];
        let (cleaned, report) = check_records(&records, 2025, "test");

        assert_eq!(report.original, 6);
        assert_eq!(report.cleaned, 4);
        assert_eq!(report.removed(), 2);
        assert_eq!(report.duplicate_ids, 1);
        assert_eq!(report.empty_titles, 1);
        assert_eq!(report.implausible_years, 2);
        assert_eq!(report.missing_fields["year"], 3);
        assert_eq!(cleaned[0].title, "A");
        assert_eq!(cleaned[1].year, None);
        // input untouched
        assert_eq!(records[3].year, Some(1890));
    }

    #[test]
    fn test_same_id_from_another_source_is_kept() {
        let mut grant = record("1", "Grant", Some(2022));
        grant.source = Source::Nsfc;
        let records = vec![record("1", "Paper", Some(2020)), grant];
        let (cleaned, report) = check_records(&records, 2025, "test");

        assert_eq!(report.duplicate_ids, 0);
        assert_eq!(cleaned.len(), 2);
        assert_eq!(cleaned[1].source, Source::Nsfc);
    }
}
