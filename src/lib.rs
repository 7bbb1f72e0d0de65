//! # arcpick
//!
//! Interactive archiving: pick files and directories from a working
//! directory, fuzzy-searching as you go, and pack them into a zip or
//! gzip-compressed tar archive.
//!
//! The library holds the whole pipeline. The `arcpick` binary (behind the
//! `cli` feature) only adds flag parsing and a terminal frontend.
//!
//! ## Pipeline
//!
//! 1. [`Config`] describes the session: root directory, recursion and which
//!    ignore rules apply.
//! 2. [`IgnoreSet`] holds the exclusion rules: a base list plus the lines of
//!    an ignore file such as `.gitignore`.
//! 3. [`enumerate`] lists the [`Candidate`]s the user may pick from.
//! 4. [`SelectionSource`] filters candidates for a query using a [`Matcher`].
//! 5. [`ArchiveJob`] writes the chosen items through an [`ArchiveWriter`].
//!
//! [`session::run`] drives all five steps through a [`Prompt`]
//! implementation. [`session::plan`] stops before writing, for frontends
//! that want to watch the completion signals themselves.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use arcpick::{ArchiveFormat, ArchiveJob, Config, IgnoreSet, enumerate};
//!
//! # #[tokio::main]
//! # async fn main() -> arcpick::Result<()> {
//! let config = Config::new(".").recursive(true);
//! let ignore = IgnoreSet::load(&config)?;
//! let candidates = enumerate(config.root(), config.recursive, &ignore)?;
//!
//! let items: Vec<String> = candidates
//!     .iter()
//!     .filter(|c| c.path.ends_with(".rs"))
//!     .map(|c| c.path.clone())
//!     .collect();
//!
//! let summary = ArchiveJob::new(config.root(), "sources", ArchiveFormat::Zip, items)?
//!     .ignore(ignore)
//!     .run()
//!     .await?;
//! println!("{} total bytes", summary.bytes_written);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result<T>`], an alias for
//! `std::result::Result<T, Error>`. Items that disappear between selection
//! and archiving are not errors; they show up as warnings in the
//! [`WriteSummary`].
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli` | No | The `arcpick` command-line tool |
//!
//! ## Minimum Supported Rust Version (MSRV)
//!
//! This crate requires **Rust 1.85** or later.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod config;
pub mod error;
pub mod ignore;
pub mod select;
pub mod session;
pub mod traverse;
pub mod write;

pub use config::Config;
pub use error::{Error, Result};
pub use ignore::{IgnoreRule, IgnoreSet};
pub use select::{Match, Matcher, SelectionSource, SkimMatcher, SubstringMatcher};
pub use session::{Outcome, Plan, Prompt};
pub use traverse::{Candidate, CandidateSet, EntryKind, enumerate};
pub use write::{
    ArchiveFormat, ArchiveJob, ArchiveWarning, ArchiveWriter, Completion, WarningKind,
    WriteSummary, WriterState, validate_archive_name,
};
