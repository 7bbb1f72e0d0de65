//! One archiving job: destination, format and the items to store.

use std::path::{Path, PathBuf};

use super::options::{ArchiveFormat, WriteSummary};
use super::{ArchiveWriter, Completion};
use crate::ignore::IgnoreSet;
use crate::{Error, Result};

/// Checks that `name` can be used as an archive base name.
///
/// The name must be non-empty, must not be `.` or `..`, and must not contain
/// a path separator or NUL.
///
/// ```rust
/// use arcpick::validate_archive_name;
///
/// assert_eq!(validate_archive_name(" backup ").unwrap(), "backup");
/// assert!(validate_archive_name("").is_err());
/// assert!(validate_archive_name("../x").is_err());
/// ```
pub fn validate_archive_name(name: &str) -> Result<&str> {
    let trimmed = name.trim();
    let invalid = trimmed.is_empty()
        || trimmed == "."
        || trimmed == ".."
        || trimmed.contains(['/', '\0'])
        || trimmed.contains(std::path::MAIN_SEPARATOR);
    if invalid {
        return Err(Error::InvalidArchiveName(name.to_string()));
    }
    Ok(trimmed)
}

/// The selected items plus everything needed to archive them.
///
/// Immutable once built; [`start`](ArchiveJob::start) and
/// [`run`](ArchiveJob::run) consume it.
#[derive(Debug, Clone)]
pub struct ArchiveJob {
    root: PathBuf,
    destination: PathBuf,
    format: ArchiveFormat,
    items: Vec<String>,
    ignore: IgnoreSet,
}

impl ArchiveJob {
    /// Creates a job writing `<root>/<name>.<ext>`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArchiveName`] for an unusable name and
    /// [`Error::SelfInclusion`] if an item is the destination itself.
    pub fn new(
        root: impl Into<PathBuf>,
        name: &str,
        format: ArchiveFormat,
        items: Vec<String>,
    ) -> Result<Self> {
        let root = root.into();
        let file_name = format.file_name(validate_archive_name(name)?);

        if let Some(item) = items
            .iter()
            .find(|item| Path::new(item.as_str()) == Path::new(&file_name))
        {
            return Err(Error::SelfInclusion { path: item.clone() });
        }

        Ok(Self {
            destination: root.join(&file_name),
            root,
            format,
            items,
            ignore: IgnoreSet::empty(),
        })
    }

    /// Sets the rules used to prune selected directories.
    pub fn ignore(mut self, ignore: IgnoreSet) -> Self {
        self.ignore = ignore;
        self
    }

    /// Path of the archive this job produces.
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Items in the order they are archived.
    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Output format.
    pub fn format(&self) -> ArchiveFormat {
        self.format
    }

    /// Streams every item to a new writer and finalizes it.
    ///
    /// Returns as soon as the last item is queued; the returned
    /// [`Completion`] reports when the archive is closed and drained.
    pub async fn start(self) -> Result<Completion> {
        let mut writer = ArchiveWriter::new(self.destination, self.format)
            .root(self.root)
            .ignore(self.ignore);
        writer.open().await?;
        for item in self.items {
            writer.add(item).await?;
        }
        writer.finalize().await
    }

    /// Writes the archive and waits for both completion signals.
    pub async fn run(self) -> Result<WriteSummary> {
        self.start().await?.wait().await
    }
}
