//! Exclusion rules applied during enumeration and directory expansion.
//!
//! An [`IgnoreSet`] is the union of a fixed base list (for example `.git`)
//! and the rules read from an ignore file in the working directory. Rules are
//! matched against *bare* entry names, never against full paths, so a rule
//! `target` hides every entry called `target` at any depth.
//!
//! # Rule syntax
//!
//! Each line of the ignore file is handled as follows:
//!
//! - surrounding whitespace and a trailing `\r` are removed;
//! - empty lines and `#` comments are dropped;
//! - `!` negations are not supported and are dropped;
//! - one leading `/` and one trailing `/` are stripped;
//! - a line containing `*`, `?` or `[` that compiles as a glob becomes a
//!   glob rule, anything else is matched literally.
//!
//! ```rust
//! use arcpick::IgnoreSet;
//!
//! let set = IgnoreSet::build([".git"], false, Some("target/\n*.log\n\n# notes\n"));
//! assert!(set.is_excluded(".git"));
//! assert!(set.is_excluded("target"));
//! assert!(set.is_excluded("debug.log"));
//! assert!(!set.is_excluded("notes"));
//! assert!(!set.is_excluded("src"));
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::io;

use glob::{MatchOptions, Pattern};

use crate::config::Config;
use crate::{Error, Result};

/// Options used for every glob match. `*` also matches dotfiles, as in
/// `.gitignore`.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// A single exclusion rule.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IgnoreRule {
    /// Matches a name exactly.
    Literal(String),
    /// Matches names against a glob pattern.
    Glob(Pattern),
}

impl IgnoreRule {
    /// Classifies a name as a literal or a glob rule.
    ///
    /// Returns `None` for an empty (or all-whitespace) name.
    pub fn new(name: &str) -> Option<Self> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        if name.contains(['*', '?', '[']) {
            if let Ok(pattern) = Pattern::new(name) {
                return Some(Self::Glob(pattern));
            }
            log::debug!("ignore rule {:?} is not a valid glob, matching literally", name);
        }
        Some(Self::Literal(name.to_string()))
    }

    /// Parses one ignore-file line.
    pub fn parse_line(line: &str) -> Option<Self> {
        let line = line.trim_end_matches('\r').trim();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }
        if line.starts_with('!') {
            log::debug!("negated ignore rule {:?} is not supported, skipping", line);
            return None;
        }
        let line = line.strip_prefix('/').unwrap_or(line);
        let line = line.strip_suffix('/').unwrap_or(line);
        Self::new(line)
    }

    /// Returns true if `name` is matched by this rule.
    pub fn matches(&self, name: &str) -> bool {
        match self {
            Self::Literal(literal) => literal == name,
            Self::Glob(pattern) => pattern.matches_with(name, MATCH_OPTIONS),
        }
    }
}

impl fmt::Display for IgnoreRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(literal) => f.write_str(literal),
            Self::Glob(pattern) => f.write_str(pattern.as_str()),
        }
    }
}

/// A set of exclusion rules.
///
/// Rules live in ordered sets, so the result of [`is_excluded`] never
/// depends on the order rules were added in, and adding a rule twice has no
/// effect.
///
/// [`is_excluded`]: IgnoreSet::is_excluded
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreSet {
    literals: BTreeSet<String>,
    globs: BTreeSet<Pattern>,
}

impl IgnoreSet {
    /// Creates an empty set that excludes nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a set from base entries and optional ignore-file contents.
    ///
    /// With `allow_all` set the result is empty regardless of the other
    /// arguments.
    pub fn build<I, S>(base: I, allow_all: bool, ignore_file_contents: Option<&str>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::empty();
        if allow_all {
            return set;
        }

        for entry in base {
            if let Some(rule) = IgnoreRule::new(entry.as_ref()) {
                set.insert(rule);
            }
        }

        if let Some(contents) = ignore_file_contents {
            for rule in contents.split('\n').filter_map(IgnoreRule::parse_line) {
                set.insert(rule);
            }
        }

        set
    }

    /// Builds the set described by `config`, reading its ignore file.
    ///
    /// A missing ignore file is not an error. The file is not read at all
    /// when `config.allow_all` is set.
    pub fn load(config: &Config) -> Result<Self> {
        if config.allow_all {
            return Ok(Self::empty());
        }

        let path = config.ignore_file_path();
        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => Some(contents),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(source) => return Err(Error::IgnoreFile { path, source }),
        };

        let set = Self::build(&config.base_ignores, false, contents.as_deref());
        log::debug!("loaded {} ignore rules", set.len());
        Ok(set)
    }

    /// Adds a rule to the set.
    pub fn insert(&mut self, rule: IgnoreRule) {
        match rule {
            IgnoreRule::Literal(literal) => {
                self.literals.insert(literal);
            }
            IgnoreRule::Glob(pattern) => {
                self.globs.insert(pattern);
            }
        }
    }

    /// Returns true if an entry with the bare name `name` must be skipped.
    pub fn is_excluded(&self, name: &str) -> bool {
        self.literals.contains(name)
            || self
                .globs
                .iter()
                .any(|pattern| pattern.matches_with(name, MATCH_OPTIONS))
    }

    /// Number of rules in the set.
    pub fn len(&self) -> usize {
        self.literals.len() + self.globs.len()
    }

    /// Returns true if the set excludes nothing.
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty() && self.globs.is_empty()
    }

    /// All rules, literals first, each group in sorted order.
    pub fn rules(&self) -> impl Iterator<Item = IgnoreRule> + '_ {
        self.literals
            .iter()
            .cloned()
            .map(IgnoreRule::Literal)
            .chain(self.globs.iter().cloned().map(IgnoreRule::Glob))
    }
}
