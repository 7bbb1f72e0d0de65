//! Gzip-compressed tar container.

use std::fs::{File, Metadata};
use std::io::{self, BufWriter, Read};

use flate2::Compression;
use flate2::write::GzEncoder;
use tar::{Builder, EntryType, Header, HeaderMode};

use super::sink::ArchiveSink;
use crate::{Error, Result};

pub(crate) struct TarSink {
    builder: Builder<GzEncoder<BufWriter<File>>>,
}

impl TarSink {
    pub(crate) fn new(file: File) -> Self {
        let encoder = GzEncoder::new(BufWriter::new(file), Compression::best());
        let mut builder = Builder::new(encoder);
        builder.mode(HeaderMode::Complete);
        Self { builder }
    }
}

impl ArchiveSink for TarSink {
    fn append_file(&mut self, name: &str, meta: &Metadata, data: &mut dyn Read) -> io::Result<()> {
        let mut header = Header::new_gnu();
        header.set_metadata_in_mode(meta, HeaderMode::Complete);
        header.set_entry_type(EntryType::Regular);
        header.set_size(meta.len());
        self.builder.append_data(&mut header, name, data)
    }

    fn append_dir(&mut self, name: &str, meta: &Metadata) -> io::Result<()> {
        let mut header = Header::new_gnu();
        header.set_metadata_in_mode(meta, HeaderMode::Complete);
        header.set_entry_type(EntryType::Directory);
        header.set_size(0);
        self.builder.append_data(&mut header, name, io::empty())
    }

    fn finish(self: Box<Self>) -> Result<File> {
        let encoder = self.builder.into_inner()?;
        let buffered = encoder.finish()?;
        buffered
            .into_inner()
            .map_err(|e| Error::Io(e.into_error()))
    }
}
