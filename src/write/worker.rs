//! Blocking side of the archive writer.
//!
//! The worker owns the sink and the temporary output file. It receives
//! commands from [`ArchiveWriter`](super::ArchiveWriter) over a bounded
//! channel and reports back through the two completion signals.

use std::fs::{self, File, Metadata};
use std::io::{self, Read};
use std::path::{MAIN_SEPARATOR, Path, PathBuf};

use tempfile::TempPath;
use tokio::sync::{mpsc, oneshot};
use walkdir::{DirEntry, WalkDir};

use super::options::{ArchiveWarning, WarningKind, WriteSummary};
use super::sink::ArchiveSink;
use crate::ignore::IgnoreSet;
use crate::traverse::EntryKind;
use crate::{Error, Result};

/// Permissions given to a new archive on Unix.
#[cfg(unix)]
const DEFAULT_MODE: u32 = 0o644;

/// Message from the writer handle to the worker.
#[derive(Debug)]
pub(crate) enum Command {
    /// Archive one selected item.
    Add(String),
    /// No more items follow.
    Finish,
}

/// Everything the worker needs besides the sink.
#[derive(Debug)]
pub(crate) struct WorkerContext {
    /// Directory items are resolved against.
    pub(crate) root: PathBuf,
    /// Rules applied while expanding selected directories.
    pub(crate) ignore: IgnoreSet,
    /// Canonical paths never archived: the destination and its temp file.
    pub(crate) skip: Vec<PathBuf>,
    /// Final location of the archive.
    pub(crate) destination: PathBuf,
}

impl WorkerContext {
    fn is_skipped(&self, path: &Path) -> bool {
        let Some(name) = path.file_name() else {
            return false;
        };
        if !self.skip.iter().any(|s| s.file_name() == Some(name)) {
            return false;
        }
        match path.parent().map(fs::canonicalize) {
            Some(Ok(parent)) => self.skip.contains(&parent.join(name)),
            _ => false,
        }
    }

    fn keep(&self, entry: &DirEntry) -> bool {
        let Some(name) = entry.file_name().to_str() else {
            log::warn!("Skipping non UTF-8 name: {}", entry.path().display());
            return false;
        };
        !self.ignore.is_excluded(name) && !self.is_skipped(entry.path())
    }
}

#[derive(Debug, Default)]
struct Tally {
    entries: usize,
    directories: usize,
    warnings: Vec<ArchiveWarning>,
}

impl Tally {
    fn warn(&mut self, path: impl Into<String>, kind: WarningKind) {
        let warning = ArchiveWarning {
            path: path.into(),
            kind,
        };
        log::warn!("{}", warning);
        self.warnings.push(warning);
    }

    fn into_summary(self, bytes_written: u64) -> WriteSummary {
        WriteSummary {
            bytes_written,
            entries_written: self.entries,
            directories_written: self.directories,
            warnings: self.warnings,
        }
    }
}

/// Worker entry point, run on the blocking pool.
///
/// `drained` fires once the compressor has been flushed (or discarded after
/// an error). `closed` carries the outcome after the output file was synced
/// and moved into place.
pub(crate) fn run(
    sink: Box<dyn ArchiveSink>,
    temp: TempPath,
    ctx: WorkerContext,
    mut commands: mpsc::Receiver<Command>,
    closed: oneshot::Sender<Result<WriteSummary>>,
    drained: oneshot::Sender<()>,
) {
    let mut tally = Tally::default();
    let streamed = stream_entries(sink, &ctx, &mut commands, &mut tally);
    // receivers may be gone if the caller dropped the completion
    let _ = drained.send(());

    let result = streamed
        .and_then(|file| close(file, temp, &ctx.destination))
        .map(|bytes| tally.into_summary(bytes));
    match &result {
        Ok(summary) => log::debug!(
            "archive '{}' closed, {} bytes",
            ctx.destination.display(),
            summary.bytes_written
        ),
        Err(e) => log::debug!("archive '{}' failed: {}", ctx.destination.display(), e),
    }
    let _ = closed.send(result);
}

fn stream_entries(
    mut sink: Box<dyn ArchiveSink>,
    ctx: &WorkerContext,
    commands: &mut mpsc::Receiver<Command>,
    tally: &mut Tally,
) -> Result<File> {
    loop {
        match commands.blocking_recv() {
            Some(Command::Add(item)) => add_item(sink.as_mut(), ctx, &item, tally)?,
            Some(Command::Finish) => break,
            None => return Err(Error::Aborted),
        }
    }
    sink.finish()
}

fn add_item(
    sink: &mut dyn ArchiveSink,
    ctx: &WorkerContext,
    item: &str,
    tally: &mut Tally,
) -> Result<()> {
    let path = ctx.root.join(item);
    if ctx.is_skipped(&path) {
        return Err(Error::SelfInclusion {
            path: item.to_string(),
        });
    }

    let meta = match fs::metadata(&path) {
        Ok(meta) => meta,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tally.warn(item, WarningKind::Vanished);
            return Ok(());
        }
        Err(source) => {
            return Err(Error::Entry {
                path: item.to_string(),
                source,
            });
        }
    };

    match EntryKind::from_metadata(&meta) {
        Some(EntryKind::File) => add_file(sink, &path, &entry_name(item), item, tally),
        Some(EntryKind::Directory) => add_tree(sink, ctx, &path, &meta, item, tally),
        None => {
            tally.warn(item, WarningKind::UnsupportedKind);
            Ok(())
        }
    }
}

fn add_file(
    sink: &mut dyn ArchiveSink,
    path: &Path,
    name: &str,
    display: &str,
    tally: &mut Tally,
) -> Result<()> {
    let entry_error = |source| Error::Entry {
        path: display.to_string(),
        source,
    };

    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tally.warn(display, WarningKind::Vanished);
            return Ok(());
        }
        Err(source) => return Err(entry_error(source)),
    };

    // stat the open handle so size and contents describe the same file
    let meta = file.metadata().map_err(entry_error)?;
    let mut data = ExactLen::new(file, meta.len());
    sink.append_file(name, &meta, &mut data)
        .map_err(entry_error)?;
    tally.entries += 1;
    Ok(())
}

/// Yields exactly `remaining` bytes of `inner`, failing if it ends early.
///
/// Container headers record the size up front, so a file that shrinks
/// while it is copied must fail the entry rather than pad or truncate it.
struct ExactLen<R> {
    inner: R,
    remaining: u64,
}

impl<R: Read> ExactLen<R> {
    fn new(inner: R, len: u64) -> Self {
        Self {
            inner,
            remaining: len,
        }
    }
}

impl<R: Read> Read for ExactLen<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.remaining == 0 || buf.is_empty() {
            return Ok(0);
        }
        let max = buf.len().min(usize::try_from(self.remaining).unwrap_or(usize::MAX));
        let n = self.inner.read(&mut buf[..max])?;
        if n == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("file shrank while archiving, {} bytes missing", self.remaining),
            ));
        }
        self.remaining -= n as u64;
        Ok(n)
    }
}

fn add_tree(
    sink: &mut dyn ArchiveSink,
    ctx: &WorkerContext,
    path: &Path,
    meta: &Metadata,
    item: &str,
    tally: &mut Tally,
) -> Result<()> {
    let base = entry_name(item);
    sink.append_dir(&base, meta).map_err(|source| Error::Entry {
        path: item.to_string(),
        source,
    })?;
    tally.directories += 1;

    let walker = WalkDir::new(path)
        .min_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| ctx.keep(entry));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let display = err
                    .path()
                    .and_then(|p| p.strip_prefix(&ctx.root).ok())
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| item.to_string());
                let source = io::Error::from(err);
                if source.kind() == io::ErrorKind::NotFound {
                    tally.warn(display, WarningKind::Vanished);
                    continue;
                }
                return Err(Error::Entry {
                    path: display,
                    source,
                });
            }
        };

        // keep() already dropped non UTF-8 names
        let Some(relative) = entry
            .path()
            .strip_prefix(path)
            .ok()
            .and_then(Path::to_str)
        else {
            continue;
        };
        let display = format!("{item}{MAIN_SEPARATOR}{relative}");
        let name = format!("{base}/{}", entry_name(relative));

        let file_type = entry.file_type();
        if file_type.is_dir() {
            let meta = entry.metadata().map_err(|err| Error::Entry {
                path: display.clone(),
                source: io::Error::from(err),
            })?;
            sink.append_dir(&name, &meta)
                .map_err(|source| Error::Entry {
                    path: display,
                    source,
                })?;
            tally.directories += 1;
        } else if file_type.is_file() {
            add_file(sink, entry.path(), &name, &display, tally)?;
        } else {
            tally.warn(display, WarningKind::UnsupportedKind);
        }
    }
    Ok(())
}

/// Archive entry name for an item path: `/` separated, no trailing slash.
pub(crate) fn entry_name(item: &str) -> String {
    let name = if MAIN_SEPARATOR == '/' {
        item.to_string()
    } else {
        item.replace(MAIN_SEPARATOR, "/")
    };
    name.trim_end_matches('/').to_string()
}

fn close(file: File, temp: TempPath, destination: &Path) -> Result<u64> {
    set_permissions(&file, destination)?;
    file.sync_all()?;
    let bytes = file.metadata()?.len();
    drop(file);
    temp.persist(destination).map_err(|e| Error::Io(e.error))?;
    Ok(bytes)
}

/// Gives the new archive the permissions of the file it replaces, or the
/// usual default for a new file. Temp files are created owner-only.
fn set_permissions(file: &File, destination: &Path) -> Result<()> {
    let permissions = match fs::metadata(destination) {
        Ok(existing) => existing.permissions(),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                fs::Permissions::from_mode(DEFAULT_MODE)
            }
            #[cfg(not(unix))]
            {
                return Ok(());
            }
        }
        Err(e) => return Err(Error::Io(e)),
    };
    file.set_permissions(permissions)?;
    Ok(())
}
