//! Bibliographic record model shared by every analysis stage.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Result, ZbibError};

/// Where a record was fetched from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Source {
    PubMed,
    #[serde(rename = "NIH")]
    Nih,
    #[serde(rename = "NSFC")]
    Nsfc,
}

impl Source {
    pub const ALL: [Source; 3] = [Source::PubMed, Source::Nih, Source::Nsfc];

    pub fn as_str(&self) -> &'static str {
        match self {
            Source::PubMed => "PubMed",
            Source::Nih    => "NIH",
            Source::Nsfc   => "NSFC",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Source {
    type Err = ZbibError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pubmed"                  => Ok(Source::PubMed),
            "nih" | "nih_reporter"    => Ok(Source::Nih),
            "nsfc" | "letpub"         => Ok(Source::Nsfc),
            other => Err(ZbibError::Config(format!("unknown record source '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub display_name: String,
    /// 0 = first author
    pub position: usize,
    #[serde(default)]
    pub is_corresponding: bool,
}

impl Author {
    pub fn new(display_name: impl Into<String>, position: usize) -> Self {
        Self { display_name: display_name.into(), position, is_corresponding: false }
    }
}

/// A paper or funded project. Never mutated after ingestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub abstract_text: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub journal: Option<String>,
    #[serde(default)]
    pub authors: Vec<Author>,
    pub source: Source,
    /// Upstream flag: the applicant is first author of this record.
    #[serde(default)]
    pub first_author_flag: Option<bool>,
    /// Upstream flag: the applicant is corresponding author of this record.
    #[serde(default)]
    pub corresponding_author_flag: Option<bool>,
}

impl Record {
    /// Title, abstract and keywords joined into the text that dimension
    /// patterns are searched against. Fields are separated by newlines so a
    /// phrase never spans two of them. Missing fields contribute nothing.
    pub fn search_text(&self) -> String {
        let mut text = String::with_capacity(
            self.title.len() + self.abstract_text.as_ref().map_or(0, String::len) + 64,
        );
        text.push_str(&self.title);
        if let Some(abs) = &self.abstract_text {
            text.push('\n');
            text.push_str(abs);
        }
        if !self.keywords.is_empty() {
            text.push('\n');
            text.push_str(&self.keywords.join("; "));
        }
        text
    }

    pub fn author_names(&self) -> impl Iterator<Item = &str> {
        self.authors.iter().map(|a| a.display_name.as_str())
    }

    /// Journal name with surrounding whitespace and a trailing period removed.
    pub fn journal_name(&self) -> Option<&str> {
        self.journal
            .as_deref()
            .map(|j| j.trim().trim_end_matches('.').trim())
            .filter(|j| !j.is_empty())
    }
}

/// Flat tabular row as produced by the fetch collaborators (CSV export).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordRow {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, rename = "abstract")]
    pub abstract_text: Option<String>,
    #[serde(default)]
    pub keywords: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub journal: Option<String>,
    /// `"Name;Name;..."` in author order
    #[serde(default)]
    pub authors: Option<String>,
    #[serde(default)]
    pub first_author_flag: Option<String>,
    #[serde(default)]
    pub corresponding_author_flag: Option<String>,
    pub source: String,
}

impl TryFrom<RecordRow> for Record {
    type Error = ZbibError;

    fn try_from(row: RecordRow) -> Result<Self> {
        let id = row.id.trim().to_string();
        if id.is_empty() {
            return Err(ZbibError::InvalidRecord {
                id: "<empty>".to_string(),
                reason: "missing id".to_string(),
            });
        }

        let source = row.source.parse::<Source>().map_err(|_| ZbibError::InvalidRecord {
            id: id.clone(),
            reason: format!("unknown source '{}'", row.source),
        })?;

        let year = non_empty(row.year).and_then(|y| {
            let parsed = parse_year(&y);
            if parsed.is_none() {
                warn!(id = %id, "Unparseable year '{y}'; treating as missing");
            }
            parsed
        });

        Ok(Record {
            title: row.title.unwrap_or_default().trim().to_string(),
            abstract_text: non_empty(row.abstract_text),
            keywords: split_list(row.keywords.as_deref().unwrap_or_default()),
            year,
            journal: non_empty(row.journal),
            authors: parse_author_list(row.authors.as_deref().unwrap_or_default()),
            source,
            first_author_flag: parse_flag(row.first_author_flag.as_deref()),
            corresponding_author_flag: parse_flag(row.corresponding_author_flag.as_deref()),
            id,
        })
    }
}

/// Split a `"Name;Name;..."` cell into ordered authors.
pub fn parse_author_list(raw: &str) -> Vec<Author> {
    split_list(raw)
        .into_iter()
        .enumerate()
        .map(|(position, name)| Author::new(name, position))
        .collect()
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

// Exports often carry years as floats ("2021.0").
fn parse_year(raw: &str) -> Option<i32> {
    let raw = raw.trim();
    raw.parse::<i32>()
        .ok()
        .or_else(|| raw.parse::<f64>().ok().filter(|y| y.fract() == 0.0).map(|y| y as i32))
}

fn parse_flag(raw: Option<&str>) -> Option<bool> {
    match raw?.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str) -> RecordRow {
        RecordRow {
            id: id.to_string(),
            title: Some(" OFC stimulation ".to_string()),
            authors: Some("Hu Qiang; Li W ;; Chen Y".to_string()),
            keywords: Some("TMS; negative symptoms".to_string()),
            year: Some("2021.0".to_string()),
            first_author_flag: Some("1".to_string()),
            source: "pubmed".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_row_conversion() {
        let record = Record::try_from(row("123")).unwrap();
        assert_eq!(record.title, "OFC stimulation");
        assert_eq!(record.year, Some(2021));
        assert_eq!(record.source, Source::PubMed);
        assert_eq!(record.first_author_flag, Some(true));
        assert_eq!(record.corresponding_author_flag, None);
        let names: Vec<&str> = record.author_names().collect();
        assert_eq!(names, vec!["Hu Qiang", "Li W", "Chen Y"]);
        assert_eq!(record.authors[2].position, 2);
    }

    #[test]
    fn test_row_rejects_bad_source() {
        let mut bad = row("1");
        bad.source = "scopus".to_string();
        assert!(matches!(Record::try_from(bad), Err(ZbibError::InvalidRecord { .. })));
    }

    #[test]
    fn test_unparseable_year_becomes_missing() {
        for raw in ["circa 2010", "2021 Mar", "2020.5"] {
            let mut odd = row("2");
            odd.year = Some(raw.to_string());
            let record = Record::try_from(odd).unwrap();
            assert_eq!(record.id, "2");
            assert_eq!(record.year, None);
        }
    }

    #[test]
    fn test_search_text_skips_missing_fields() {
        let mut record = Record::try_from(row("1")).unwrap();
        record.keywords.clear();
        assert_eq!(record.search_text(), "OFC stimulation");
        record.abstract_text = Some("anhedonia".to_string());
        assert_eq!(record.search_text(), "OFC stimulation\nanhedonia");
        record.keywords = vec!["TMS".to_string(), "OFC".to_string()];
        assert_eq!(record.search_text(), "OFC stimulation\nanhedonia\nTMS; OFC");
    }

    #[test]
    fn test_journal_name_trims_period() {
        let mut record = Record::try_from(row("1")).unwrap();
        record.journal = Some("Brain Stimul. ".to_string());
        assert_eq!(record.journal_name(), Some("Brain Stimul"));
    }
}
