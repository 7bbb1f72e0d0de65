//! Archive writing API.
//!
//! [`ArchiveWriter`] streams the selected items into a zip or gzip-compressed
//! tar archive. The compression runs on tokio's blocking pool; the async
//! handle only queues items, so [`ArchiveWriter::add`] may return before the
//! bytes reach disk.
//!
//! The writer moves through [`WriterState`]s:
//!
//! ```text
//! Idle --open--> Streaming --finalize--> Finalized
//!                    |
//!                    +--worker error--> Failed
//! ```
//!
//! [`ArchiveWriter::finalize`] hands back a [`Completion`] carrying two
//! independent signals: *drained* fires once the compressor has been flushed,
//! *closed* once the output file has been synced and moved into place.
//! [`Completion::wait`] waits for both.
//!
//! Output is atomic. The archive is built in a temporary file next to the
//! destination and renamed over it only after everything succeeded; on
//! failure, or if the writer is dropped before finalize, the temporary file is
//! removed and an existing destination is left untouched.
//!
//! # Example
//!
//! ```rust,no_run
//! use arcpick::{ArchiveFormat, ArchiveWriter};
//!
//! # async fn demo() -> arcpick::Result<()> {
//! let mut writer = ArchiveWriter::new("out.zip", ArchiveFormat::Zip);
//! writer.open().await?;
//! writer.add("notes.txt").await?;
//! writer.add("src").await?;
//! let summary = writer.finalize().await?.wait().await?;
//! println!("{} total bytes", summary.bytes_written);
//! # Ok(())
//! # }
//! ```

mod job;
pub(crate) mod options;
mod sink;
mod tar_sink;
mod worker;
mod zip_sink;

pub use job::{ArchiveJob, validate_archive_name};
pub use options::{ArchiveFormat, ArchiveWarning, UnknownFormat, WarningKind, WriteSummary};

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use tempfile::TempPath;
use tokio::sync::{mpsc, oneshot};

use crate::ignore::IgnoreSet;
use crate::{Error, Result};
use worker::{Command, WorkerContext};

/// Items queued ahead of the worker before `add` starts waiting.
const CHANNEL_CAPACITY: usize = 32;

/// Receiver for the *closed* signal.
pub type ClosedSignal = oneshot::Receiver<Result<WriteSummary>>;

/// Receiver for the *drained* signal.
pub type DrainedSignal = oneshot::Receiver<()>;

/// State of an [`ArchiveWriter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriterState {
    /// Created, no output opened yet.
    Idle,
    /// Accepting items.
    Streaming,
    /// No more items accepted; completion pending or done.
    Finalized,
    /// The output could not be created, or the worker stopped before it
    /// was told to finish. Further calls are rejected.
    Failed,
}

/// Streaming archive writer.
pub struct ArchiveWriter {
    destination: PathBuf,
    format: ArchiveFormat,
    root: PathBuf,
    ignore: IgnoreSet,
    state: WriterState,
    commands: Option<mpsc::Sender<Command>>,
    completion: Option<Completion>,
}

impl std::fmt::Debug for ArchiveWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveWriter")
            .field("destination", &self.destination)
            .field("format", &self.format)
            .field("root", &self.root)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl ArchiveWriter {
    /// Creates a writer for `destination`. Items are resolved against the
    /// current directory and directories are expanded without exclusions
    /// unless configured otherwise.
    pub fn new(destination: impl Into<PathBuf>, format: ArchiveFormat) -> Self {
        Self {
            destination: destination.into(),
            format,
            root: PathBuf::from("."),
            ignore: IgnoreSet::empty(),
            state: WriterState::Idle,
            commands: None,
            completion: None,
        }
    }

    /// Sets the directory items are resolved against.
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Sets the rules used to prune selected directories.
    pub fn ignore(mut self, ignore: IgnoreSet) -> Self {
        self.ignore = ignore;
        self
    }

    /// Current state.
    ///
    /// A streaming writer whose worker already stopped reports
    /// [`WriterState::Failed`].
    pub fn state(&self) -> WriterState {
        match (self.state, &self.commands) {
            (WriterState::Streaming, Some(commands)) if commands.is_closed() => {
                WriterState::Failed
            }
            (state, _) => state,
        }
    }

    /// Archive path the writer produces.
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Creates the temporary output and starts the worker.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] unless the writer is idle, and
    /// [`Error::Io`] if the temporary file cannot be created.
    pub async fn open(&mut self) -> Result<()> {
        if self.state != WriterState::Idle {
            return Err(Error::InvalidState("open requires an idle writer"));
        }

        let destination = self.destination.clone();
        let prepared = tokio::task::spawn_blocking(move || prepare(&destination))
            .await
            .map_err(|_| Error::WorkerLost)
            .and_then(|r| r);
        let (file, temp, skip) = match prepared {
            Ok(prepared) => prepared,
            Err(e) => {
                self.state = WriterState::Failed;
                return Err(e);
            }
        };
        log::debug!(
            "writing {} archive to '{}' via '{}'",
            self.format,
            self.destination.display(),
            temp.display()
        );

        let (command_tx, command_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let (closed_tx, closed_rx) = oneshot::channel();
        let (drained_tx, drained_rx) = oneshot::channel();
        let sink = sink::create_sink(self.format, file);
        let ctx = WorkerContext {
            root: self.root.clone(),
            ignore: self.ignore.clone(),
            skip,
            destination: self.destination.clone(),
        };

        tokio::task::spawn_blocking(move || {
            worker::run(sink, temp, ctx, command_rx, closed_tx, drained_tx)
        });

        self.commands = Some(command_tx);
        self.completion = Some(Completion {
            closed: closed_rx,
            drained: drained_rx,
        });
        self.state = WriterState::Streaming;
        Ok(())
    }

    /// Queues one item, a path relative to the root.
    ///
    /// Files become one entry named after the item. Directories become a
    /// directory entry plus their whole subtree, pruned by the ignore rules.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] unless the writer is streaming. If the
    /// worker already stopped, the writer becomes [`WriterState::Failed`] and
    /// the worker's error is returned.
    pub async fn add(&mut self, item: impl Into<String>) -> Result<()> {
        if self.state != WriterState::Streaming {
            return Err(Error::InvalidState("add requires a streaming writer"));
        }
        let commands = self
            .commands
            .as_ref()
            .ok_or(Error::InvalidState("add requires a streaming writer"))?;

        if commands.send(Command::Add(item.into())).await.is_ok() {
            return Ok(());
        }
        Err(self.fail().await)
    }

    /// Signals that no more items follow and returns the completion signals.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] unless the writer is streaming. If the
    /// worker already stopped, the writer becomes [`WriterState::Failed`] and
    /// the worker's error is returned.
    pub async fn finalize(&mut self) -> Result<Completion> {
        if self.state != WriterState::Streaming {
            return Err(Error::InvalidState("finalize requires a streaming writer"));
        }
        let commands = self
            .commands
            .as_ref()
            .ok_or(Error::InvalidState("finalize requires a streaming writer"))?;

        if commands.send(Command::Finish).await.is_err() {
            return Err(self.fail().await);
        }
        self.commands = None;
        let completion = self.completion.take().ok_or(Error::WorkerLost)?;
        self.state = WriterState::Finalized;
        Ok(completion)
    }

    /// Moves to [`WriterState::Failed`] and collects the worker's error.
    async fn fail(&mut self) -> Error {
        self.state = WriterState::Failed;
        self.commands = None;
        let Some(completion) = self.completion.take() else {
            return Error::WorkerLost;
        };
        match completion.wait().await {
            Err(e) => e,
            Ok(_) => Error::WorkerLost,
        }
    }
}

/// Completion signals of a finalized writer.
#[derive(Debug)]
pub struct Completion {
    closed: ClosedSignal,
    drained: DrainedSignal,
}

impl Completion {
    /// Splits the completion into its two signals.
    ///
    /// A receiver that reports `RecvError` means the worker stopped without
    /// signalling.
    pub fn into_signals(self) -> (ClosedSignal, DrainedSignal) {
        (self.closed, self.drained)
    }

    /// Waits for both signals.
    ///
    /// # Errors
    ///
    /// Returns the worker's error if archiving failed, or
    /// [`Error::WorkerLost`] if either signal never fired.
    pub async fn wait(self) -> Result<WriteSummary> {
        let (closed, drained) = tokio::join!(self.closed, self.drained);
        let summary = closed.map_err(|_| Error::WorkerLost)??;
        drained.map_err(|_| Error::WorkerLost)?;
        Ok(summary)
    }
}

/// Creates the temporary output next to `destination` and computes the
/// paths directory expansion must never archive.
fn prepare(destination: &Path) -> Result<(File, TempPath, Vec<PathBuf>)> {
    let dir = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let (file, temp) = tempfile::Builder::new()
        .prefix(".arcpick-")
        .suffix(".tmp")
        .tempfile_in(dir)?
        .into_parts();

    let dir = fs::canonicalize(dir)?;
    let skip = [destination.file_name(), temp.file_name()]
        .into_iter()
        .flatten()
        .map(|name| dir.join(name))
        .collect();
    Ok((file, temp, skip))
}
