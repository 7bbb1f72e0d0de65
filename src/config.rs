//! Session configuration.
//!
//! A [`Config`] is built once from the parsed command line and passed by
//! reference to every stage that needs it. Nothing downstream mutates it.
//!
//! # Example
//!
//! ```rust
//! use arcpick::Config;
//!
//! let config = Config::new(".")
//!     .recursive(true)
//!     .ignore_file(".arcpickignore");
//!
//! assert!(config.recursive);
//! assert!(!config.allow_all);
//! assert_eq!(config.base_ignores, vec![".git".to_string()]);
//! ```

use std::path::{Path, PathBuf};

/// Name of the ignore file read from the working directory by default.
pub const DEFAULT_IGNORE_FILE: &str = ".gitignore";

/// Entries excluded even when no ignore file exists.
pub const DEFAULT_BASE_IGNORES: &[&str] = &[".git"];

/// Immutable configuration for one archiving session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory whose entries are offered for selection and where the
    /// archive is written.
    pub root: PathBuf,
    /// Descend into subdirectories and offer their files individually.
    pub recursive: bool,
    /// Disable every ignore rule, the base set included.
    pub allow_all: bool,
    /// Ignore file name, resolved against `root`.
    pub ignore_file: PathBuf,
    /// Names excluded regardless of the ignore file.
    pub base_ignores: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self::new(".")
    }
}

impl Config {
    /// Creates a configuration rooted at `root` with default settings.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            recursive: false,
            allow_all: false,
            ignore_file: PathBuf::from(DEFAULT_IGNORE_FILE),
            base_ignores: DEFAULT_BASE_IGNORES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Enables or disables recursive enumeration.
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Enables or disables the "allow all" override.
    pub fn allow_all(mut self, allow_all: bool) -> Self {
        self.allow_all = allow_all;
        self
    }

    /// Sets the ignore file name.
    pub fn ignore_file(mut self, name: impl Into<PathBuf>) -> Self {
        self.ignore_file = name.into();
        self
    }

    /// Replaces the base ignore entries.
    pub fn base_ignores<I, S>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.base_ignores = entries.into_iter().map(Into::into).collect();
        self
    }

    /// Full path of the ignore file.
    pub fn ignore_file_path(&self) -> PathBuf {
        if self.ignore_file.is_absolute() {
            self.ignore_file.clone()
        } else {
            self.root.join(&self.ignore_file)
        }
    }

    /// Working directory as a path reference.
    pub fn root(&self) -> &Path {
        &self.root
    }
}
