//! Which records the applicant led, as first or corresponding author.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};
use zbib_common::{normalize_name, ApplicantIdentity, Record};

/// Exact, case-insensitive match against the applicant's known names.
#[derive(Debug, Clone, Default)]
pub struct ApplicantMatcher {
    names: BTreeSet<String>,
}

impl ApplicantMatcher {
    pub fn new(identity: &ApplicantIdentity) -> Self {
        Self { names: identity.known_names().map(normalize_name).collect() }
    }

    pub fn matches(&self, name: &str) -> bool {
        self.names.contains(&normalize_name(name))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Authorship {
    pub first: bool,
    pub corresponding: bool,
}

impl Authorship {
    /// Upstream flags win. Otherwise the first author is position 0 and the
    /// corresponding author is any author marked so, or the last author
    /// when nobody is marked.
    pub fn of(record: &Record, matcher: &ApplicantMatcher) -> Self {
        let first = record.first_author_flag.unwrap_or_else(|| {
            record
                .authors
                .iter()
                .min_by_key(|a| a.position)
                .is_some_and(|a| matcher.matches(&a.display_name))
        });

        let corresponding = record.corresponding_author_flag.unwrap_or_else(|| {
            if record.authors.iter().any(|a| a.is_corresponding) {
                record
                    .authors
                    .iter()
                    .filter(|a| a.is_corresponding)
                    .any(|a| matcher.matches(&a.display_name))
            } else {
                record
                    .authors
                    .iter()
                    .max_by_key(|a| a.position)
                    .is_some_and(|a| matcher.matches(&a.display_name))
            }
        });

        Self { first, corresponding }
    }

    pub fn leads(&self) -> bool {
        self.first || self.corresponding
    }
}

/// Unique-paper authorship counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorshipCounts {
    pub first_author: usize,
    pub corresponding: usize,
    pub first_or_corresponding: usize,
}

impl AuthorshipCounts {
    /// Records sharing an id are counted once.
    pub fn tally(records: &[Record], matcher: &ApplicantMatcher) -> Self {
        let mut seen = HashSet::with_capacity(records.len());
        let mut counts = Self::default();
        for record in records {
            if !seen.insert(record.id.as_str()) {
                continue;
            }
            let a = Authorship::of(record, matcher);
            counts.first_author += usize::from(a.first);
            counts.corresponding += usize::from(a.corresponding);
            counts.first_or_corresponding += usize::from(a.leads());
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zbib_test_utils::{sample_applicant, RecordBuilder};

    #[test]
    fn test_position_based_attribution() {
        let m = ApplicantMatcher::new(&sample_applicant());
        let first = RecordBuilder::new("1").authors(&["Wei Zhang", "A B", "C D"]).build();
        let last = RecordBuilder::new("2").authors(&["A B", "C D", "zhang  w"]).build();
        let middle = RecordBuilder::new("3").authors(&["A B", "Wei Zhang", "C D"]).build();

        assert_eq!(Authorship::of(&first, &m), Authorship { first: true, corresponding: false });
        assert_eq!(Authorship::of(&last, &m), Authorship { first: false, corresponding: true });
        assert!(!Authorship::of(&middle, &m).leads());
    }

    #[test]
    fn test_marked_corresponding_replaces_last_author_rule() {
        let m = ApplicantMatcher::new(&sample_applicant());
        let marked = RecordBuilder::new("1")
            .authors(&["A B", "Wei Zhang", "C D"])
            .corresponding(1)
            .build();
        assert!(Authorship::of(&marked, &m).corresponding);

        let marked_other = RecordBuilder::new("2")
            .authors(&["A B", "C D", "Wei Zhang"])
            .corresponding(0)
            .build();
        assert!(!Authorship::of(&marked_other, &m).corresponding);
    }

    #[test]
    fn test_flags_override_positions() {
        let m = ApplicantMatcher::new(&sample_applicant());
        let r = RecordBuilder::new("1")
            .authors(&["Wei Zhang", "A B"])
            .first_author_flag(false)
            .corresponding_author_flag(true)
            .build();
        assert_eq!(Authorship::of(&r, &m), Authorship { first: false, corresponding: true });
    }

    #[test]
    fn test_tally_counts_unique_papers() {
        let m = ApplicantMatcher::new(&sample_applicant());
        let records = vec![
            RecordBuilder::new("1").authors(&["Wei Zhang"]).build(),
            RecordBuilder::new("1").authors(&["Wei Zhang"]).build(),
            RecordBuilder::new("2").authors(&["A B", "Wei Zhang"]).build(),
            RecordBuilder::new("3").authors(&["A B", "C D"]).build(),
        ];
        let counts = AuthorshipCounts::tally(&records, &m);
        assert_eq!(counts.first_author, 1);
        assert_eq!(counts.corresponding, 2);
        assert_eq!(counts.first_or_corresponding, 2);
    }
}
