//! Candidate enumeration.
//!
//! [`enumerate`] lists what the user may pick from. In flat mode that is the
//! immediate children of the root, files and directories alike. In recursive
//! mode it is every file below the root, depth-first in pre-order, with
//! directories never listed themselves: choosing a directory as a whole is
//! only possible in flat mode.
//!
//! Entries whose bare name is excluded by the [`IgnoreSet`] are dropped, and
//! excluded directories are never descended into.
//!
//! Listing order is the host's directory-listing order; nothing is re-sorted.
//!
//! # Example
//!
//! ```rust,no_run
//! use arcpick::{IgnoreSet, enumerate};
//!
//! let ignore = IgnoreSet::build([".git"], false, None);
//! let candidates = enumerate(".".as_ref(), true, &ignore)?;
//! for path in candidates.paths() {
//!     println!("{path}");
//! }
//! # Ok::<(), arcpick::Error>(())
//! ```

use std::fs::{self, Metadata};
use std::io;
use std::path::Path;

use walkdir::WalkDir;

use crate::ignore::IgnoreSet;
use crate::{Error, Result};

/// Kind of a filesystem entry, as reported by `stat` (symlinks followed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// A regular file.
    File,
    /// A directory.
    Directory,
}

impl EntryKind {
    /// Classifies followed metadata. Returns `None` for devices, fifos and
    /// sockets.
    pub fn from_metadata(meta: &Metadata) -> Option<Self> {
        if meta.is_file() {
            Some(Self::File)
        } else if meta.is_dir() {
            Some(Self::Directory)
        } else {
            None
        }
    }
}

/// An entry the user may select.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Candidate {
    /// Path relative to the enumeration root. Reused verbatim as the
    /// archive entry name.
    pub path: String,
    /// What the path pointed to when it was enumerated.
    pub kind: EntryKind,
}

impl Candidate {
    /// Creates a candidate.
    pub fn new(path: impl Into<String>, kind: EntryKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// Returns true if the candidate is a directory.
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// Candidates in traversal order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateSet {
    candidates: Vec<Candidate>,
}

impl CandidateSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of candidates.
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Returns true if there is nothing to select.
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Candidates in traversal order.
    pub fn iter(&self) -> std::slice::Iter<'_, Candidate> {
        self.candidates.iter()
    }

    /// Candidate paths in traversal order.
    pub fn paths(&self) -> Vec<&str> {
        self.candidates.iter().map(|c| c.path.as_str()).collect()
    }

    /// Returns the candidate at `index`.
    pub fn get(&self, index: usize) -> Option<&Candidate> {
        self.candidates.get(index)
    }

    /// Returns true if a candidate with this path exists.
    pub fn contains(&self, path: &str) -> bool {
        self.candidates.iter().any(|c| c.path == path)
    }

    fn push(&mut self, candidate: Candidate) {
        self.candidates.push(candidate);
    }
}

impl From<Vec<Candidate>> for CandidateSet {
    fn from(candidates: Vec<Candidate>) -> Self {
        Self { candidates }
    }
}

impl FromIterator<Candidate> for CandidateSet {
    fn from_iter<T: IntoIterator<Item = Candidate>>(iter: T) -> Self {
        Self {
            candidates: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a CandidateSet {
    type Item = &'a Candidate;
    type IntoIter = std::slice::Iter<'a, Candidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.candidates.iter()
    }
}

/// Lists the candidates below `root`.
///
/// # Errors
///
/// Returns [`Error::Enumeration`] if `root` or any directory below it cannot
/// be listed, or if an entry cannot be stat'ed (for example because it was
/// deleted during the walk, or is a dangling symlink). The walk stops at the
/// first error rather than returning a partial list.
pub fn enumerate(root: &Path, recursive: bool, ignore: &IgnoreSet) -> Result<CandidateSet> {
    let candidates = if recursive {
        enumerate_recursive(root, ignore)?
    } else {
        enumerate_flat(root, ignore)?
    };
    log::debug!(
        "enumerated {} candidates under '{}'",
        candidates.len(),
        root.display()
    );
    Ok(candidates)
}

fn enumerate_flat(root: &Path, ignore: &IgnoreSet) -> Result<CandidateSet> {
    let mut candidates = CandidateSet::new();

    let entries = fs::read_dir(root).map_err(|source| Error::Enumeration {
        path: root.to_path_buf(),
        source,
    })?;

    for entry in entries {
        let entry = entry.map_err(|source| Error::Enumeration {
            path: root.to_path_buf(),
            source,
        })?;
        let path = entry.path();

        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            log::warn!("Skipping non UTF-8 name: {}", path.display());
            continue;
        };

        if ignore.is_excluded(&name) {
            continue;
        }

        let meta = fs::metadata(&path).map_err(|source| Error::Enumeration {
            path: path.clone(),
            source,
        })?;

        match EntryKind::from_metadata(&meta) {
            Some(kind) => candidates.push(Candidate::new(name, kind)),
            None => log::debug!("skipping special file '{}'", path.display()),
        }
    }

    Ok(candidates)
}

fn enumerate_recursive(root: &Path, ignore: &IgnoreSet) -> Result<CandidateSet> {
    let mut candidates = CandidateSet::new();

    let walker = WalkDir::new(root)
        .min_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| match entry.file_name().to_str() {
            Some(name) => !ignore.is_excluded(name),
            None => {
                log::warn!("Skipping non UTF-8 name: {}", entry.path().display());
                false
            }
        });

    for entry in walker {
        let entry = entry.map_err(|e| walk_error(root, e))?;
        let file_type = entry.file_type();

        if file_type.is_dir() {
            continue;
        }
        if !file_type.is_file() {
            log::debug!("skipping special file '{}'", entry.path().display());
            continue;
        }

        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        // Every component passed the UTF-8 filter above.
        if let Some(path) = relative.to_str() {
            candidates.push(Candidate::new(path, EntryKind::File));
        }
    }

    Ok(candidates)
}

fn walk_error(root: &Path, err: walkdir::Error) -> Error {
    let path = err.path().unwrap_or(root).to_path_buf();
    Error::Enumeration {
        path,
        source: io::Error::from(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::path::MAIN_SEPARATOR;
    use tempfile::TempDir;

    fn tree(files: &[&str], dirs: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for d in dirs {
            fs::create_dir_all(dir.path().join(d)).unwrap();
        }
        for f in files {
            let path = dir.path().join(f);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(path, f.as_bytes()).unwrap();
        }
        dir
    }

    fn sorted(set: &CandidateSet) -> Vec<String> {
        let mut paths: Vec<String> = set.paths().into_iter().map(String::from).collect();
        paths.sort();
        paths
    }

    fn sep(path: &str) -> String {
        path.replace('/', &MAIN_SEPARATOR.to_string())
    }

    #[test]
    fn test_flat_excludes_git() {
        let dir = tree(&["a.txt", "b.txt", ".git/HEAD"], &[]);
        let ignore = IgnoreSet::build([".git"], false, None);
        let set = enumerate(dir.path(), false, &ignore).unwrap();
        assert_eq!(sorted(&set), vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn test_flat_allow_all_includes_git() {
        let dir = tree(&["a.txt", "b.txt", ".git/HEAD"], &[]);
        let set = enumerate(dir.path(), false, &IgnoreSet::empty()).unwrap();
        assert_eq!(sorted(&set), vec![".git", "a.txt", "b.txt"]);
        let git = set.iter().find(|c| c.path == ".git").unwrap();
        assert_eq!(git.kind, EntryKind::Directory);
    }

    #[test]
    fn test_flat_lists_directories_without_descending() {
        let dir = tree(&["a.txt", "sub/c.txt"], &[]);
        let set = enumerate(dir.path(), false, &IgnoreSet::empty()).unwrap();
        assert_eq!(sorted(&set), vec!["a.txt", "sub"]);
    }

    #[test]
    fn test_recursive_lists_only_files() {
        let dir = tree(&["a.txt", "b.txt", "sub/c.txt", ".git/HEAD"], &[]);
        let ignore = IgnoreSet::build([".git"], false, None);
        let set = enumerate(dir.path(), true, &ignore).unwrap();
        assert_eq!(sorted(&set), vec!["a.txt".to_string(), "b.txt".into(), sep("sub/c.txt")]);
        assert!(set.iter().all(|c| c.kind == EntryKind::File));
    }

    #[test]
    fn test_recursive_prunes_excluded_directory() {
        let dir = tree(&["keep/a.txt", "target/debug/out.bin", "src/target.txt"], &[]);
        let ignore = IgnoreSet::build(["target"], false, None);
        let set = enumerate(dir.path(), true, &ignore).unwrap();
        assert_eq!(sorted(&set), vec![sep("keep/a.txt"), sep("src/target.txt")]);
    }

    #[test]
    fn test_recursive_empty_subdirectory() {
        let dir = tree(&["a.txt"], &["empty", "nested/deeper"]);
        let set = enumerate(dir.path(), true, &IgnoreSet::empty()).unwrap();
        assert_eq!(sorted(&set), vec!["a.txt"]);
    }

    #[test]
    fn test_recursive_is_preorder() {
        let dir = tree(&["d/x/1.txt", "d/x/2.txt", "d/y.txt"], &[]);
        let set = enumerate(dir.path(), true, &IgnoreSet::empty()).unwrap();
        let paths = set.paths();
        // Files of a directory appear contiguously, before its parent's later siblings.
        let x: Vec<usize> = paths
            .iter()
            .enumerate()
            .filter(|(_, p)| p.starts_with(&sep("d/x/")))
            .map(|(i, _)| i)
            .collect();
        assert_eq!(x.len(), 2);
        assert_eq!(x[1], x[0] + 1);
    }

    #[test]
    fn test_no_duplicates() {
        let dir = tree(&["a", "b", "c/d", "c/e/f"], &[]);
        let set = enumerate(dir.path(), true, &IgnoreSet::empty()).unwrap();
        let unique: HashSet<&str> = set.paths().into_iter().collect();
        assert_eq!(unique.len(), set.len());
    }

    #[test]
    fn test_missing_root_is_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        for recursive in [false, true] {
            let err = enumerate(&missing, recursive, &IgnoreSet::empty()).unwrap_err();
            assert!(matches!(err, Error::Enumeration { .. }), "{err:?}");
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_is_error() {
        let dir = tree(&["a.txt"], &[]);
        std::os::unix::fs::symlink(dir.path().join("gone"), dir.path().join("link")).unwrap();
        let err = enumerate(dir.path(), false, &IgnoreSet::empty()).unwrap_err();
        assert!(matches!(err, Error::Enumeration { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_excluded_dangling_symlink_is_ignored() {
        let dir = tree(&["a.txt"], &[]);
        std::os::unix::fs::symlink(dir.path().join("gone"), dir.path().join("link")).unwrap();
        let ignore = IgnoreSet::build(["link"], false, None);
        let set = enumerate(dir.path(), false, &ignore).unwrap();
        assert_eq!(set.paths(), vec!["a.txt"]);
    }
}
