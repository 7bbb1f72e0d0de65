//! Shared test utilities for integration tests.
//!
//! Note: `#![allow(dead_code)]` is required because each integration test file
//! compiles as a separate crate and may only use a subset of these helpers.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

use arcpick::{ArchiveFormat, Prompt, SelectionSource};
use flate2::read::GzDecoder;
use tempfile::TempDir;

/// Creates a temp directory holding `files` (path, contents) and `dirs`.
///
/// Paths use `/` and intermediate directories are created as needed.
pub fn tree(files: &[(&str, &[u8])], dirs: &[&str]) -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    for sub in dirs {
        fs::create_dir_all(dir.path().join(sub)).expect("Failed to create dir");
    }
    for (path, data) in files {
        let full = dir.path().join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        fs::write(full, data).expect("Failed to write file");
    }
    dir
}

/// One entry read back from an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadEntry {
    pub name: String,
    pub is_dir: bool,
    pub data: Vec<u8>,
}

/// Reads every entry of a zip archive, in archive order.
pub fn read_zip(path: &Path) -> Vec<ReadEntry> {
    let file = File::open(path).expect("Failed to open zip");
    let mut archive = zip::ZipArchive::new(file).expect("Failed to parse zip");
    let mut entries = Vec::new();
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).expect("Failed to read zip entry");
        let is_dir = entry.is_dir();
        let name = entry.name().trim_end_matches('/').to_string();
        let mut data = Vec::new();
        entry.read_to_end(&mut data).expect("Failed to read zip data");
        entries.push(ReadEntry { name, is_dir, data });
    }
    entries
}

/// Reads every entry of a gzip-compressed tar archive, in archive order.
pub fn read_tar(path: &Path) -> Vec<ReadEntry> {
    let file = File::open(path).expect("Failed to open tar");
    let mut archive = tar::Archive::new(GzDecoder::new(file));
    let mut entries = Vec::new();
    for entry in archive.entries().expect("Failed to list tar") {
        let mut entry = entry.expect("Failed to read tar entry");
        let is_dir = entry.header().entry_type().is_dir();
        let name = entry
            .path()
            .expect("Invalid tar path")
            .to_string_lossy()
            .trim_end_matches('/')
            .to_string();
        let mut data = Vec::new();
        entry.read_to_end(&mut data).expect("Failed to read tar data");
        entries.push(ReadEntry { name, is_dir, data });
    }
    entries
}

/// Reads an archive of either format.
pub fn read_archive(path: &Path, format: ArchiveFormat) -> Vec<ReadEntry> {
    match format {
        ArchiveFormat::Zip => read_zip(path),
        ArchiveFormat::Tar => read_tar(path),
    }
}

/// Sorted names of the file (non-directory) entries.
pub fn file_names(entries: &[ReadEntry]) -> Vec<String> {
    let mut names: Vec<String> = entries
        .iter()
        .filter(|e| !e.is_dir)
        .map(|e| e.name.clone())
        .collect();
    names.sort();
    names
}

/// A [`Prompt`] replaying canned answers.
///
/// `select` runs each query against the source and keeps every match, so
/// tests also exercise the filter.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    pub name: String,
    pub queries: Vec<String>,
    pub format: ArchiveFormat,
    pub overwrite: bool,
    pub seen_candidates: Vec<String>,
    pub overwrite_asked: bool,
    log: VecDeque<&'static str>,
}

impl ScriptedPrompt {
    pub fn new(name: &str, queries: &[&str], format: ArchiveFormat) -> Self {
        Self {
            name: name.to_string(),
            queries: queries.iter().map(|q| q.to_string()).collect(),
            format,
            ..Self::default()
        }
    }

    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Prompts in the order they were shown.
    pub fn calls(&self) -> Vec<&'static str> {
        self.log.iter().copied().collect()
    }
}

impl Prompt for ScriptedPrompt {
    fn archive_name(&mut self) -> arcpick::Result<String> {
        self.log.push_back("name");
        Ok(self.name.clone())
    }

    fn select(&mut self, source: &SelectionSource<'_>) -> arcpick::Result<Vec<String>> {
        self.log.push_back("select");
        self.seen_candidates = source.filter(None).iter().map(|s| s.to_string()).collect();
        let mut chosen: Vec<String> = Vec::new();
        for query in &self.queries {
            for path in source.filter(Some(query)) {
                if !chosen.iter().any(|c| c == path) {
                    chosen.push(path.to_string());
                }
            }
        }
        Ok(chosen)
    }

    fn archive_format(&mut self) -> arcpick::Result<ArchiveFormat> {
        self.log.push_back("format");
        Ok(self.format)
    }

    fn confirm_overwrite(&mut self, _path: &Path) -> arcpick::Result<bool> {
        self.log.push_back("overwrite");
        self.overwrite_asked = true;
        Ok(self.overwrite)
    }
}
