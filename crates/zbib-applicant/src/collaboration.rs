//! Co-authorship hypergraph around the applicant.
//!
//! Every paper contributes one hyperedge: the set of its authors other than
//! the applicant. Papers with exactly the same co-author set merge into one
//! edge. An edge recurring across enough papers is a stable team.
//!
//! Names are compared exactly after case folding and whitespace collapsing.
//! Variants that are not listed as aliases are treated as different people,
//! so team recurrence can be undercounted.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;
use zbib_common::{normalize_name, Record};

use crate::authorship::ApplicantMatcher;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollaborationParams {
    /// Distinct papers an edge needs to count as a stable team
    #[serde(default = "default_stable_team_min_papers")]
    pub stable_team_min_papers: usize,
    #[serde(default = "default_top_collaborators")]
    pub top_collaborators: usize,
    /// Number of most frequent collaborators included in the graph
    #[serde(default = "default_graph_size")]
    pub graph_size: usize,
    /// Co-author spelling variant → canonical spelling
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
}

fn default_stable_team_min_papers() -> usize { 3 }
fn default_top_collaborators() -> usize { 10 }
fn default_graph_size() -> usize { 15 }

impl Default for CollaborationParams {
    fn default() -> Self {
        Self {
            stable_team_min_papers: default_stable_team_min_papers(),
            top_collaborators: default_top_collaborators(),
            graph_size: default_graph_size(),
            aliases: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollaborationEdge {
    /// Display names, first spelling seen
    pub co_authors: BTreeSet<String>,
    pub paper_ids: BTreeSet<String>,
}

impl CollaborationEdge {
    pub fn papers(&self) -> usize {
        self.paper_ids.len()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollaborationStats {
    /// Papers by stable teams / papers with at least one co-author
    pub team_stability_index: f64,
    /// Papers whose only author is the applicant / all papers
    pub solo_ratio: f64,
    pub avg_team_size: f64,
    pub max_team_size: usize,
    pub co_authored_papers: usize,
    pub top_collaborators: Vec<(String, usize)>,
    /// Co-appearance among the most frequent collaborators
    pub collaborator_graph: BTreeMap<String, BTreeSet<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollaborationNetwork {
    /// Most papers first
    pub edges: Vec<CollaborationEdge>,
    pub stable_teams: Vec<CollaborationEdge>,
    pub stats: CollaborationStats,
}

#[derive(Debug, Clone)]
pub struct CollaborationAnalyzer {
    matcher: ApplicantMatcher,
    aliases: HashMap<String, String>,
    params: CollaborationParams,
}

/// One paper's authors after alias resolution, keyed by normalised name.
struct PaperAuthors<'a> {
    id: &'a str,
    size: usize,
    applicant_present: bool,
    co_authors: BTreeMap<String, String>,
}

impl CollaborationAnalyzer {
    pub fn new(matcher: ApplicantMatcher, params: CollaborationParams) -> Self {
        let aliases = params
            .aliases
            .iter()
            .map(|(variant, canonical)| (normalize_name(variant), canonical.trim().to_string()))
            .collect();
        Self { matcher, aliases, params }
    }

    /// Canonical display spelling of `name`.
    fn resolve<'n>(&'n self, name: &'n str) -> &'n str {
        self.aliases
            .get(&normalize_name(name))
            .map(String::as_str)
            .unwrap_or(name)
    }

    fn paper_authors<'r>(&self, record: &'r Record) -> PaperAuthors<'r> {
        let mut co_authors = BTreeMap::new();
        let mut applicant_present = false;
        let mut size = 0;
        for raw in record.author_names() {
            if raw.trim().is_empty() {
                continue;
            }
            size += 1;
            let name = self.resolve(raw);
            if self.matcher.matches(raw) || self.matcher.matches(name) {
                applicant_present = true;
                continue;
            }
            co_authors
                .entry(normalize_name(name))
                .or_insert_with(|| name.trim().to_string());
        }
        PaperAuthors { id: &record.id, size, applicant_present, co_authors }
    }

    pub fn build_network(&self, records: &[Record]) -> CollaborationNetwork {
        let mut seen = HashSet::with_capacity(records.len());
        let papers: Vec<PaperAuthors<'_>> = records
            .iter()
            .filter(|r| seen.insert(r.id.as_str()))
            .map(|r| self.paper_authors(r))
            .collect();

        let mut display: HashMap<&str, &str> = HashMap::new();
        let mut merged: BTreeMap<BTreeSet<&str>, BTreeSet<String>> = BTreeMap::new();
        let mut per_author: HashMap<&str, usize> = HashMap::new();

        for paper in &papers {
            if paper.co_authors.is_empty() {
                continue;
            }
            for (norm, name) in &paper.co_authors {
                display.entry(norm.as_str()).or_insert(name.as_str());
                *per_author.entry(norm.as_str()).or_insert(0) += 1;
            }
            let key: BTreeSet<&str> = paper.co_authors.keys().map(String::as_str).collect();
            merged.entry(key).or_default().insert(paper.id.to_string());
        }

        let mut edges: Vec<CollaborationEdge> = merged
            .into_iter()
            .map(|(key, paper_ids)| CollaborationEdge {
                co_authors: key.iter().map(|&n| display.get(n).copied().unwrap_or(n).to_string()).collect(),
                paper_ids,
            })
            .collect();
        edges.sort_by(|a, b| b.papers().cmp(&a.papers()).then_with(|| a.co_authors.cmp(&b.co_authors)));

        let min_papers = self.params.stable_team_min_papers;
        let stable_teams: Vec<CollaborationEdge> =
            edges.iter().filter(|e| e.papers() >= min_papers).cloned().collect();

        let stats = self.stats(&papers, &stable_teams, &per_author, &display);
        debug!(
            edges = edges.len(),
            stable_teams = stable_teams.len(),
            stability = stats.team_stability_index,
            "Built collaboration network"
        );

        CollaborationNetwork { edges, stable_teams, stats }
    }

    fn stats(
        &self,
        papers: &[PaperAuthors<'_>],
        stable_teams: &[CollaborationEdge],
        per_author: &HashMap<&str, usize>,
        display: &HashMap<&str, &str>,
    ) -> CollaborationStats {
        let total = papers.len();
        let co_authored = papers.iter().filter(|p| !p.co_authors.is_empty()).count();
        let solo = papers
            .iter()
            .filter(|p| p.applicant_present && p.co_authors.is_empty())
            .count();
        let stable_papers: usize = stable_teams.iter().map(CollaborationEdge::papers).sum();

        let sizes: Vec<usize> = papers.iter().map(|p| p.size).filter(|s| *s > 0).collect();
        let avg_team_size = if sizes.is_empty() {
            0.0
        } else {
            sizes.iter().sum::<usize>() as f64 / sizes.len() as f64
        };

        let mut ranked: Vec<(&str, usize)> = per_author.iter().map(|(n, c)| (*n, *c)).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        let name_of = |norm: &str| display.get(norm).copied().unwrap_or(norm).to_string();

        let top_collaborators = ranked
            .iter()
            .take(self.params.top_collaborators)
            .map(|(n, c)| (name_of(n), *c))
            .collect();

        let graph_nodes: HashSet<&str> =
            ranked.iter().take(self.params.graph_size).map(|(n, _)| *n).collect();
        let mut collaborator_graph: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for paper in papers {
            let present: Vec<&str> = paper
                .co_authors
                .keys()
                .map(String::as_str)
                .filter(|n| graph_nodes.contains(n))
                .collect();
            for (i, a) in present.iter().enumerate() {
                for b in &present[i + 1..] {
                    collaborator_graph.entry(name_of(a)).or_default().insert(name_of(b));
                    collaborator_graph.entry(name_of(b)).or_default().insert(name_of(a));
                }
            }
        }

        CollaborationStats {
            team_stability_index: ratio(stable_papers, co_authored),
            solo_ratio: ratio(solo, total),
            avg_team_size,
            max_team_size: sizes.iter().copied().max().unwrap_or(0),
            co_authored_papers: co_authored,
            top_collaborators,
            collaborator_graph,
        }
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zbib_test_utils::{sample_applicant, RecordBuilder};

    fn analyzer(params: CollaborationParams) -> CollaborationAnalyzer {
        CollaborationAnalyzer::new(ApplicantMatcher::new(&sample_applicant()), params)
    }

    #[test]
    fn test_identical_sets_merge_regardless_of_order_and_case() {
        let records = vec![
            RecordBuilder::new("1").authors(&["Wei Zhang", "Li Na", "Chen Yu"]).build(),
            RecordBuilder::new("2").authors(&["chen yu", "Wei Zhang", "LI NA"]).build(),
        ];
        let net = analyzer(CollaborationParams::default()).build_network(&records);
        assert_eq!(net.edges.len(), 1);
        assert_eq!(net.edges[0].papers(), 2);
        assert_eq!(
            net.edges[0].co_authors,
            BTreeSet::from(["Chen Yu".to_string(), "Li Na".to_string()])
        );
    }

    #[test]
    fn test_solo_and_empty_papers() {
        let records = vec![
            RecordBuilder::new("1").authors(&["Wei Zhang"]).build(),
            RecordBuilder::new("2").authors(&["Wei Zhang", "Li Na"]).build(),
            RecordBuilder::new("3").build(),
            RecordBuilder::new("4").authors(&["张伟", "Li Na", "Chen Yu", "Wang Fang"]).build(),
        ];
        let stats = analyzer(CollaborationParams::default()).build_network(&records).stats;
        assert_eq!(stats.solo_ratio, 0.25);
        assert_eq!(stats.co_authored_papers, 2);
        assert_eq!(stats.max_team_size, 4);
        assert!((stats.avg_team_size - 7.0 / 3.0).abs() < 1e-9);
        assert_eq!(stats.top_collaborators[0], ("Li Na".to_string(), 2));
        assert!(stats.collaborator_graph["Li Na"].contains("Wang Fang"));
    }

    #[test]
    fn test_alias_map_resolves_variants() {
        let params = CollaborationParams {
            aliases: BTreeMap::from([("N. Li".to_string(), "Li Na".to_string())]),
            ..Default::default()
        };
        let records = vec![
            RecordBuilder::new("1").authors(&["Wei Zhang", "Li Na"]).build(),
            RecordBuilder::new("2").authors(&["Wei Zhang", "N. Li"]).build(),
            RecordBuilder::new("3").authors(&["Wei Zhang", "n.  li"]).build(),
        ];
        let net = analyzer(params).build_network(&records);
        assert_eq!(net.edges.len(), 1);
        assert_eq!(net.stable_teams.len(), 1);
        assert_eq!(net.stats.team_stability_index, 1.0);
    }

    #[test]
    fn test_no_co_authors_gives_zero_stability() {
        let records = vec![RecordBuilder::new("1").authors(&["Wei Zhang"]).build()];
        let net = analyzer(CollaborationParams::default()).build_network(&records);
        assert!(net.edges.is_empty());
        assert_eq!(net.stats.team_stability_index, 0.0);
        assert_eq!(net.stats.solo_ratio, 1.0);
    }
}
