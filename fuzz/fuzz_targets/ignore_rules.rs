//! Fuzz target for ignore-file parsing with arbitrary text.
//!
//! Run with: cargo +nightly fuzz run ignore_rules
//!
//! Properties checked:
//! - Parsing never panics
//! - No empty rule is ever stored
//! - Every stored rule excludes the text it was built from when literal
//! - Literal-only sets never exclude the empty name

#![no_main]

use arcpick::{IgnoreRule, IgnoreSet};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(contents) = std::str::from_utf8(data) else {
        return;
    };

    let set = IgnoreSet::build([".git"], false, Some(contents));
    assert!(set.is_excluded(".git"));

    for rule in set.rules() {
        let text = rule.to_string();
        assert!(!text.is_empty(), "empty rule from {:?}", contents);
        if let IgnoreRule::Literal(name) = &rule {
            assert!(set.is_excluded(name));
        }
    }

    // a glob such as `*` legitimately matches the empty name
    if set.rules().all(|rule| matches!(rule, IgnoreRule::Literal(_))) {
        assert!(!set.is_excluded(""), "empty name excluded by {:?}", contents);
    }

    for line in contents.split('\n') {
        let _ = IgnoreRule::parse_line(line);
    }
});
