//! Zip container.

use std::fs::{File, Metadata};
use std::io::{self, BufWriter, Read};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::sink::{ArchiveSink, unix_mode};
use crate::{Error, Result};

/// Deflate level used for every entry.
const DEFLATE_LEVEL: i64 = 9;

pub(crate) struct ZipSink {
    writer: ZipWriter<BufWriter<File>>,
}

impl ZipSink {
    pub(crate) fn new(file: File) -> Self {
        Self {
            writer: ZipWriter::new(BufWriter::new(file)),
        }
    }

    fn options(meta: &Metadata) -> SimpleFileOptions {
        let mut options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(DEFLATE_LEVEL))
            .large_file(meta.len() >= u64::from(u32::MAX));
        if let Some(mode) = unix_mode(meta) {
            options = options.unix_permissions(mode);
        }
        options
    }
}

impl ArchiveSink for ZipSink {
    fn append_file(&mut self, name: &str, meta: &Metadata, data: &mut dyn Read) -> io::Result<()> {
        self.writer
            .start_file(name, Self::options(meta))
            .map_err(io::Error::from)?;
        io::copy(data, &mut self.writer)?;
        Ok(())
    }

    fn append_dir(&mut self, name: &str, meta: &Metadata) -> io::Result<()> {
        self.writer
            .add_directory(name, Self::options(meta))
            .map_err(io::Error::from)
    }

    fn finish(self: Box<Self>) -> Result<File> {
        let buffered = self.writer.finish()?;
        buffered
            .into_inner()
            .map_err(|e| Error::Io(e.into_error()))
    }
}
