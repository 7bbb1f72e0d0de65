//! Property-based tests using proptest.
//!
//! These tests verify invariants of ignore rules and candidate filtering
//! using randomly generated inputs.

use arcpick::{Candidate, CandidateSet, EntryKind, IgnoreSet, SelectionSource, SkimMatcher};
use proptest::prelude::*;

/// Strategy for ignore-file lines: names, globs, comments and noise.
fn rule_line_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z]{1,6}",
        "\\*\\.[a-z]{1,3}",
        "[a-z]{1,3}\\?",
        "/?[a-z]{1,6}/?",
        "#[a-z ]{0,6}",
        " {0,3}",
    ]
}

/// Strategy for bare entry names.
fn name_strategy() -> impl Strategy<Value = String> {
    "\\.?[a-z]{1,6}(\\.[a-z]{1,3})?"
}

proptest! {
    /// Rule order never changes the verdict.
    #[test]
    fn exclusion_is_order_independent(
        lines in proptest::collection::vec(rule_line_strategy(), 0..12),
        names in proptest::collection::vec(name_strategy(), 1..20),
    ) {
        let forward = IgnoreSet::build([".git"], false, Some(&lines.join("\n")));
        let mut reversed_lines = lines.clone();
        reversed_lines.reverse();
        let backward = IgnoreSet::build([".git"], false, Some(&reversed_lines.join("\n")));

        prop_assert_eq!(&forward, &backward);
        for name in &names {
            prop_assert_eq!(forward.is_excluded(name), backward.is_excluded(name));
        }
    }

    /// Asking twice gives the same answer, and duplicating rules is a no-op.
    #[test]
    fn exclusion_is_idempotent(
        lines in proptest::collection::vec(rule_line_strategy(), 0..12),
        name in name_strategy(),
    ) {
        let contents = lines.join("\n");
        let set = IgnoreSet::build(Vec::<String>::new(), false, Some(&contents));
        let doubled = IgnoreSet::build(
            Vec::<String>::new(),
            false,
            Some(&format!("{contents}\n{contents}")),
        );

        prop_assert_eq!(set.is_excluded(&name), set.is_excluded(&name));
        prop_assert_eq!(&set, &doubled);
        prop_assert!(!set.is_excluded(""));
    }

    /// Allow-all excludes nothing, whatever the file says.
    #[test]
    fn allow_all_excludes_nothing(
        lines in proptest::collection::vec(rule_line_strategy(), 0..12),
        name in name_strategy(),
    ) {
        let set = IgnoreSet::build([".git"], true, Some(&lines.join("\n")));
        prop_assert!(set.is_empty());
        prop_assert!(!set.is_excluded(&name));
    }

    /// Filter results are always a duplicate-free subset of the candidates.
    #[test]
    fn filter_returns_subset(
        names in proptest::collection::btree_set(name_strategy(), 0..20),
        query in "[a-z.]{0,4}",
    ) {
        let candidates: CandidateSet = names
            .iter()
            .map(|n| Candidate::new(n.as_str(), EntryKind::File))
            .collect();
        let matcher = SkimMatcher::default();
        let source = SelectionSource::new(&candidates, &matcher);
        let result = source.filter(Some(&query));

        let mut seen = std::collections::BTreeSet::new();
        for path in &result {
            prop_assert!(candidates.contains(path));
            prop_assert!(seen.insert(*path));
        }
        if query.is_empty() {
            prop_assert_eq!(result.len(), candidates.len());
        }
    }
}
