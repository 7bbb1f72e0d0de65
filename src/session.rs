//! End-to-end interactive session.
//!
//! [`plan`] wires the interactive part of the pipeline together: ignore
//! rules, enumeration and the user's choices, ending in an [`ArchiveJob`].
//! [`run`] also writes the archive. Everything that talks to the user goes
//! through the [`Prompt`] trait, so the session can be driven by a terminal
//! frontend or by a scripted one in tests.

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::ignore::IgnoreSet;
use crate::select::{SelectionSource, SkimMatcher};
use crate::traverse::enumerate;
use crate::write::{ArchiveFormat, ArchiveJob, WriteSummary, validate_archive_name};
use crate::Result;

/// User interaction needed by a session.
pub trait Prompt {
    /// Asks for the archive base name, without extension.
    fn archive_name(&mut self) -> Result<String>;

    /// Lets the user pick items. Returns paths in the order they were
    /// picked; an empty list cancels the session.
    fn select(&mut self, source: &SelectionSource<'_>) -> Result<Vec<String>>;

    /// Asks for the output format.
    fn archive_format(&mut self) -> Result<ArchiveFormat>;

    /// Asks whether an existing archive may be replaced.
    fn confirm_overwrite(&mut self, path: &Path) -> Result<bool>;
}

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The archive was written.
    Written {
        /// Archive path.
        destination: PathBuf,
        /// What was written.
        summary: WriteSummary,
    },
    /// The archive exists and the user chose to keep it.
    OverwriteDeclined {
        /// The untouched archive.
        destination: PathBuf,
    },
    /// The user picked nothing.
    NothingSelected,
}

/// What the user decided, before anything is written.
#[derive(Debug, Clone)]
pub enum Plan {
    /// Write this job.
    Ready(ArchiveJob),
    /// The archive exists and the user chose to keep it.
    OverwriteDeclined {
        /// The untouched archive.
        destination: PathBuf,
    },
    /// The user picked nothing.
    NothingSelected,
}

/// Asks the user everything a session needs and returns the resulting job.
///
/// # Errors
///
/// Enumeration and ignore-file errors are returned before the user is asked
/// anything. Prompt errors are returned as they occur.
pub fn plan(config: &Config, prompt: &mut dyn Prompt) -> Result<Plan> {
    let ignore = IgnoreSet::load(config)?;
    let candidates = enumerate(config.root(), config.recursive, &ignore)?;

    let name = prompt.archive_name()?;
    let name = validate_archive_name(&name)?.to_string();

    let matcher = SkimMatcher::default();
    let source = SelectionSource::new(&candidates, &matcher);
    let items = prompt.select(&source)?;
    if items.is_empty() {
        log::debug!("nothing selected");
        return Ok(Plan::NothingSelected);
    }

    let format = prompt.archive_format()?;
    let job = ArchiveJob::new(config.root(), &name, format, items)?.ignore(ignore);
    let destination = job.destination();

    if destination.exists() && !prompt.confirm_overwrite(destination)? {
        log::debug!("keeping existing '{}'", destination.display());
        return Ok(Plan::OverwriteDeclined {
            destination: destination.to_path_buf(),
        });
    }
    Ok(Plan::Ready(job))
}

/// Runs one session: [`plan`], then write the archive.
///
/// # Errors
///
/// As [`plan`], plus archiving errors.
pub async fn run(config: &Config, prompt: &mut dyn Prompt) -> Result<Outcome> {
    let job = match plan(config, prompt)? {
        Plan::Ready(job) => job,
        Plan::OverwriteDeclined { destination } => {
            return Ok(Outcome::OverwriteDeclined { destination });
        }
        Plan::NothingSelected => return Ok(Outcome::NothingSelected),
    };

    let destination = job.destination().to_path_buf();
    let summary = job.run().await?;
    Ok(Outcome::Written {
        destination,
        summary,
    })
}
