//! Error types for archive selection and writing.
//!
//! This module provides the [`Error`] enum which represents every failure mode
//! of the enumerate → select → write pipeline, along with a convenient
//! [`Result<T>`] type alias.
//!
//! # Error Handling
//!
//! Fatal conditions are returned as `Err(Error)` and unwind to the caller.
//! Recoverable conditions met while archiving (an item that disappeared after
//! it was selected) are not errors: they are logged and collected as
//! [`ArchiveWarning`]s in the [`WriteSummary`].
//!
//! ```rust,no_run
//! use arcpick::{Config, Error, IgnoreSet, enumerate};
//!
//! fn list(root: &str) -> arcpick::Result<()> {
//!     let config = Config::new(root).recursive(true);
//!     let ignore = IgnoreSet::load(&config)?;
//!     match enumerate(&config.root, config.recursive, &ignore) {
//!         Ok(candidates) => {
//!             for candidate in candidates.iter() {
//!                 println!("{}", candidate.path);
//!             }
//!             Ok(())
//!         }
//!         Err(Error::Enumeration { path, source }) => {
//!             eprintln!("cannot list {}: {}", path.display(), source);
//!             Err(Error::Enumeration { path, source })
//!         }
//!         Err(e) => Err(e),
//!     }
//! }
//! ```
//!
//! [`ArchiveWarning`]: crate::write::ArchiveWarning
//! [`WriteSummary`]: crate::write::WriteSummary

use std::io;
use std::path::PathBuf;

/// The main error type for arcpick operations.
///
/// | Category | Variants | Typical Cause |
/// |----------|----------|---------------|
/// | Enumeration | [`Enumeration`][Self::Enumeration], [`IgnoreFile`][Self::IgnoreFile] | Unreadable directory or ignore file |
/// | Archiving | [`Entry`][Self::Entry], [`Zip`][Self::Zip], [`Io`][Self::Io] | Disk full, permission denied |
/// | Job setup | [`SelfInclusion`][Self::SelfInclusion], [`InvalidArchiveName`][Self::InvalidArchiveName] | Bad user input |
/// | Writer protocol | [`InvalidState`][Self::InvalidState], [`WorkerLost`][Self::WorkerLost], [`Aborted`][Self::Aborted] | Misuse or a crashed worker |
/// | Frontend | [`Prompt`][Self::Prompt] | Terminal not available |
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// An I/O error not tied to a specific archive item.
    ///
    /// Returned when creating the temporary output, flushing the compressed
    /// stream or moving the finished archive into place fails.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A directory could not be listed or one of its entries could not be
    /// stat'ed while building the candidate list.
    ///
    /// This aborts before any prompt is shown: a silently truncated candidate
    /// list would hide files from the user.
    #[error("Cannot enumerate '{}': {source}", path.display())]
    Enumeration {
        /// The directory or entry that failed.
        path: PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },

    /// The ignore file exists but could not be read as UTF-8 text.
    #[error("Cannot read ignore file '{}': {source}", path.display())]
    IgnoreFile {
        /// Path of the ignore file.
        path: PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },

    /// A selected item could not be added to the archive.
    ///
    /// Only failures other than "entry vanished" end up here; a vanished
    /// entry is downgraded to a warning.
    #[error("Failed to add '{path}' to archive: {source}")]
    Entry {
        /// The item path (as shown to the user).
        path: String,
        /// The underlying I/O error.
        source: io::Error,
    },

    /// The zip container reported an error.
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// The destination archive was selected as one of its own items.
    #[error("Archive '{path}' cannot include itself")]
    SelfInclusion {
        /// The offending item.
        path: String,
    },

    /// The archive name entered by the user cannot be used as a file name.
    #[error("Invalid archive name: {0:?}")]
    InvalidArchiveName(String),

    /// A writer operation was called in the wrong state.
    #[error("Invalid writer state: {0}")]
    InvalidState(&'static str),

    /// The background worker ended without signalling completion.
    #[error("Archive worker stopped before signalling completion")]
    WorkerLost,

    /// The writer was dropped before it was finalized.
    #[error("Archive writer dropped before finalize")]
    Aborted,

    /// The interactive frontend failed (no terminal, closed input).
    #[error("Prompt failed: {0}")]
    Prompt(String),
}

impl Error {
    /// Returns true when the error originates from the filesystem.
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            Self::Io(_) | Self::Enumeration { .. } | Self::IgnoreFile { .. } | Self::Entry { .. }
        )
    }
}

/// A specialized Result type for arcpick operations.
pub type Result<T> = std::result::Result<T, Error>;
