//! Archive format selection and write results.

use std::fmt;
use std::str::FromStr;

/// Container format of the produced archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ArchiveFormat {
    /// Zip archive, Deflate at level 9.
    #[default]
    Zip,
    /// Tar archive compressed with gzip at maximum level.
    ///
    /// The file keeps the plain `.tar` extension; `tar` detects the gzip
    /// layer when extracting.
    Tar,
}

impl ArchiveFormat {
    /// All formats, in the order they are offered to the user.
    pub const ALL: [ArchiveFormat; 2] = [ArchiveFormat::Zip, ArchiveFormat::Tar];

    /// File extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Zip => "zip",
            Self::Tar => "tar",
        }
    }

    /// Archive file name for a user-chosen base name.
    ///
    /// ```rust
    /// use arcpick::ArchiveFormat;
    ///
    /// assert_eq!(ArchiveFormat::Zip.file_name("out"), "out.zip");
    /// assert_eq!(ArchiveFormat::Tar.file_name("out"), "out.tar");
    /// ```
    pub fn file_name(self, name: &str) -> String {
        format!("{}.{}", name, self.extension())
    }
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Error returned when parsing an unknown format name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFormat(pub String);

impl fmt::Display for UnknownFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown archive format {:?} (expected zip or tar)", self.0)
    }
}

impl std::error::Error for UnknownFormat {}

impl FromStr for ArchiveFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "zip" => Ok(Self::Zip),
            "tar" => Ok(Self::Tar),
            _ => Err(UnknownFormat(s.to_string())),
        }
    }
}

/// Why an item was skipped without failing the job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// The entry disappeared between selection and archiving.
    Vanished,
    /// The entry is neither a file nor a directory.
    UnsupportedKind,
}

/// A recoverable problem met while archiving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveWarning {
    /// Path of the skipped entry, relative to the working directory.
    pub path: String,
    /// What went wrong.
    pub kind: WarningKind,
}

impl fmt::Display for ArchiveWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            WarningKind::Vanished => write!(f, "{} no longer exists, skipped", self.path),
            WarningKind::UnsupportedKind => {
                write!(f, "{} is not a regular file or directory, skipped", self.path)
            }
        }
    }
}

/// Statistics about a finished archive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteSummary {
    /// Size of the archive file on disk.
    pub bytes_written: u64,
    /// Number of file entries written.
    pub entries_written: usize,
    /// Number of directory entries written.
    pub directories_written: usize,
    /// Items skipped along the way.
    pub warnings: Vec<ArchiveWarning>,
}

impl WriteSummary {
    /// Returns true if every selected item made it into the archive.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}
