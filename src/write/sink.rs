//! Format-specific archive containers behind one entry-addition contract.

use std::fs::{File, Metadata};
use std::io::{self, Read};

use super::options::ArchiveFormat;
use crate::Result;
use super::tar_sink::TarSink;
use super::zip_sink::ZipSink;

/// Compressing container the worker streams entries into.
///
/// Entry names use `/` as separator and never end with one; sinks add the
/// directory marker themselves where the format needs it.
pub(crate) trait ArchiveSink: Send {
    /// Appends a regular file whose contents are read from `data`.
    fn append_file(&mut self, name: &str, meta: &Metadata, data: &mut dyn Read) -> io::Result<()>;

    /// Appends a directory entry.
    fn append_dir(&mut self, name: &str, meta: &Metadata) -> io::Result<()>;

    /// Writes trailing structures, flushes all buffered data and returns the
    /// underlying file.
    fn finish(self: Box<Self>) -> Result<File>;
}

/// Creates the sink for `format` writing into `file`.
pub(crate) fn create_sink(format: ArchiveFormat, file: File) -> Box<dyn ArchiveSink> {
    match format {
        ArchiveFormat::Zip => Box::new(ZipSink::new(file)),
        ArchiveFormat::Tar => Box::new(TarSink::new(file)),
    }
}

/// Unix permission bits of `meta`, if the platform has them.
pub(crate) fn unix_mode(meta: &Metadata) -> Option<u32> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        Some(meta.permissions().mode() & 0o7777)
    }
    #[cfg(not(unix))]
    {
        let _ = meta;
        None
    }
}
