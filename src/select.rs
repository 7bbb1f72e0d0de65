//! Query-driven filtering of candidates for the interactive picker.
//!
//! The picker asks a [`SelectionSource`] for the candidates matching the
//! text typed so far. The ranking itself is delegated to a [`Matcher`]; the
//! source only normalizes the query and maps the matcher's results back to
//! candidate paths, keeping the matcher's order.

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::traverse::CandidateSet;

/// One candidate accepted by a [`Matcher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    /// Index of the candidate in the slice handed to the matcher.
    pub index: usize,
    /// Matcher-specific score, higher is better.
    pub score: i64,
    /// Character positions that matched the query, for highlighting.
    pub positions: Vec<usize>,
}

/// Ranks candidates against a query.
pub trait Matcher {
    /// Returns the candidates matching `query`, best first.
    fn filter(&self, query: &str, candidates: &[&str]) -> Vec<Match>;
}

/// Fuzzy matcher backed by the skim algorithm.
///
/// An empty query matches everything in the original order. Otherwise
/// matches are ordered by descending score, ties keeping the original order.
pub struct SkimMatcher {
    inner: SkimMatcherV2,
}

impl Default for SkimMatcher {
    fn default() -> Self {
        Self {
            inner: SkimMatcherV2::default().smart_case(),
        }
    }
}

impl std::fmt::Debug for SkimMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkimMatcher").finish_non_exhaustive()
    }
}

impl Matcher for SkimMatcher {
    fn filter(&self, query: &str, candidates: &[&str]) -> Vec<Match> {
        if query.is_empty() {
            return (0..candidates.len())
                .map(|index| Match {
                    index,
                    score: 0,
                    positions: Vec::new(),
                })
                .collect();
        }

        let mut matches: Vec<Match> = candidates
            .iter()
            .enumerate()
            .filter_map(|(index, candidate)| {
                self.inner
                    .fuzzy_indices(candidate, query)
                    .map(|(score, positions)| Match {
                        index,
                        score,
                        positions,
                    })
            })
            .collect();

        // sort_by is stable, equal scores keep candidate order
        matches.sort_by(|a, b| b.score.cmp(&a.score));
        matches
    }
}

/// Plain substring matcher, case-insensitive, candidate order preserved.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubstringMatcher;

impl Matcher for SubstringMatcher {
    fn filter(&self, query: &str, candidates: &[&str]) -> Vec<Match> {
        let needle: Vec<char> = query.chars().collect();
        candidates
            .iter()
            .enumerate()
            .filter_map(|(index, candidate)| {
                let start = find_chars(candidate, &needle)?;
                Some(Match {
                    index,
                    score: 0,
                    positions: (start..start + needle.len()).collect(),
                })
            })
            .collect()
    }
}

/// Char index of the first case-insensitive occurrence of `needle`.
fn find_chars(haystack: &str, needle: &[char]) -> Option<usize> {
    let chars: Vec<char> = haystack.chars().collect();
    if needle.is_empty() {
        return Some(0);
    }
    chars.windows(needle.len()).position(|window| {
        window
            .iter()
            .zip(needle)
            .all(|(a, b)| a.to_lowercase().eq(b.to_lowercase()))
    })
}

/// Adapts a [`CandidateSet`] into the filter function used by the picker.
pub struct SelectionSource<'a> {
    candidates: &'a CandidateSet,
    paths: Vec<&'a str>,
    matcher: &'a dyn Matcher,
}

impl<'a> SelectionSource<'a> {
    /// Creates a source over `candidates` ranked by `matcher`.
    pub fn new(candidates: &'a CandidateSet, matcher: &'a dyn Matcher) -> Self {
        Self {
            candidates,
            paths: candidates.paths(),
            matcher,
        }
    }

    /// The candidates this source filters.
    pub fn candidates(&self) -> &'a CandidateSet {
        self.candidates
    }

    /// Returns the candidate paths matching `query`, in matcher order.
    ///
    /// A missing query is treated as the empty string.
    pub fn filter(&self, query: Option<&str>) -> Vec<&'a str> {
        let query = query.unwrap_or("");
        self.matcher
            .filter(query, &self.paths)
            .into_iter()
            .filter_map(|m| self.paths.get(m.index).copied())
            .collect()
    }
}
