//! Shared fixtures for zbib tests: record builders and a small bilingual
//! dimension vocabulary.

use std::collections::BTreeMap;

pub use pretty_assertions;

use zbib_common::{
    ApplicantIdentity, Author, CombinationSet, DimensionDefinitions, DimensionGroup, PatternPair,
    Record, Source,
};

/// Fluent builder for [`Record`] values.
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    record: Record,
}

impl RecordBuilder {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            record: Record {
                title: format!("Record {id}"),
                id,
                abstract_text: None,
                keywords: Vec::new(),
                year: None,
                journal: None,
                authors: Vec::new(),
                source: Source::PubMed,
                first_author_flag: None,
                corresponding_author_flag: None,
            },
        }
    }

    pub fn title(mut self, title: &str) -> Self {
        self.record.title = title.to_string();
        self
    }

    pub fn abstract_text(mut self, text: &str) -> Self {
        self.record.abstract_text = Some(text.to_string());
        self
    }

    pub fn keywords(mut self, keywords: &[&str]) -> Self {
        self.record.keywords = keywords.iter().map(|k| k.to_string()).collect();
        self
    }

    pub fn year(mut self, year: i32) -> Self {
        self.record.year = Some(year);
        self
    }

    pub fn journal(mut self, journal: &str) -> Self {
        self.record.journal = Some(journal.to_string());
        self
    }

    pub fn source(mut self, source: Source) -> Self {
        self.record.source = source;
        self
    }

    /// Author list in order; positions are assigned from 0.
    pub fn authors(mut self, names: &[&str]) -> Self {
        self.record.authors = names
            .iter()
            .enumerate()
            .map(|(i, n)| Author::new(*n, i))
            .collect();
        self
    }

    /// Mark the author at `position` as corresponding.
    pub fn corresponding(mut self, position: usize) -> Self {
        if let Some(author) = self.record.authors.get_mut(position) {
            author.is_corresponding = true;
        }
        self
    }

    pub fn first_author_flag(mut self, flag: bool) -> Self {
        self.record.first_author_flag = Some(flag);
        self
    }

    pub fn corresponding_author_flag(mut self, flag: bool) -> Self {
        self.record.corresponding_author_flag = Some(flag);
        self
    }

    pub fn build(self) -> Record {
        self.record
    }
}

fn pair(en: &str, cn: &str) -> PatternPair {
    PatternPair::new(en, cn)
}

/// Small NIBS/psychiatry vocabulary covering all four groups.
pub fn sample_definitions() -> DimensionDefinitions {
    let mut defs = DimensionDefinitions::new();

    defs.insert(
        DimensionGroup::Symptom,
        BTreeMap::from([
            ("Negative".to_string(), pair(r"negative symptom|anhedonia|avolition|apathy", "阴性症状|快感缺失")),
            ("Cognitive".to_string(), pair(r"cogniti|working memory", "认知")),
            ("Positive".to_string(), pair(r"hallucinat|delusion|positive symptom", "幻觉|妄想|阳性症状")),
        ]),
    );
    defs.insert(
        DimensionGroup::Target,
        BTreeMap::from([
            ("OFC".to_string(), pair(r"orbitofrontal|\bOFC\b", "眶额")),
            ("DLPFC".to_string(), pair(r"dorsolateral prefrontal|\bDLPFC\b", "背外侧前额叶")),
        ]),
    );
    defs.insert(
        DimensionGroup::Disease,
        BTreeMap::from([
            ("Schizophrenia".to_string(), pair(r"schizophren|psychosis", "精神分裂")),
            ("Depression".to_string(), pair(r"depressi", "抑郁")),
        ]),
    );
    defs.insert(
        DimensionGroup::Technique,
        BTreeMap::from([
            ("TMS".to_string(), pair(r"transcranial magnetic|\br?TMS\b|theta.burst", "经颅磁刺激")),
            ("tDCS".to_string(), pair(r"transcranial direct current|\btDCS\b", "经颅直流电")),
        ]),
    );

    defs
}

/// `OFC+Negative` and `DLPFC+Cognitive`.
pub fn sample_combinations() -> CombinationSet {
    CombinationSet::from([
        ("OFC+Negative".to_string(), vec!["OFC".to_string(), "Negative".to_string()]),
        ("DLPFC+Cognitive".to_string(), vec!["DLPFC".to_string(), "Cognitive".to_string()]),
    ])
}

pub fn sample_applicant() -> ApplicantIdentity {
    ApplicantIdentity::new("Wei Zhang")
        .with_name_cn("张伟")
        .with_alias("Zhang W")
}
