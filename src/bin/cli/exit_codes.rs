//! Exit codes for the CLI tool.

use arcpick::Error;

/// Exit code constants
pub const SUCCESS: i32 = 0;
/// Archive written but some items were skipped
pub const WARNING: i32 = 1;
/// Fatal error occurred
pub const FATAL_ERROR: i32 = 2;
/// I/O error
pub const IO_ERROR: i32 = 5;
/// Ctrl+C (128 + SIGINT)
pub const USER_INTERRUPT: i32 = 130;
/// Invalid command line arguments or archive name
pub const BAD_ARGS: i32 = 255;

/// Exit code enum for structured handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success,
    Warning,
    FatalError,
    IoError,
    UserInterrupt,
    BadArgs,
}

impl ExitCode {
    /// Returns the numeric exit code
    pub fn code(self) -> i32 {
        match self {
            Self::Success => SUCCESS,
            Self::Warning => WARNING,
            Self::FatalError => FATAL_ERROR,
            Self::IoError => IO_ERROR,
            Self::UserInterrupt => USER_INTERRUPT,
            Self::BadArgs => BAD_ARGS,
        }
    }
}

/// Converts an arcpick error to an exit code
pub fn error_to_exit_code(error: &Error) -> ExitCode {
    match error {
        Error::Io(_) | Error::Enumeration { .. } | Error::IgnoreFile { .. } => ExitCode::IoError,
        Error::Entry { .. } => ExitCode::IoError,
        Error::InvalidArchiveName(_) | Error::SelfInclusion { .. } => ExitCode::BadArgs,
        Error::Aborted => ExitCode::UserInterrupt,
        Error::Zip(_) | Error::InvalidState(_) | Error::WorkerLost | Error::Prompt(_) => {
            ExitCode::FatalError
        }
        // Future error variants - required by #[non_exhaustive]
        _ => ExitCode::FatalError,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_mapping() {
        let io = Error::Io(std::io::Error::other("disk full"));
        assert_eq!(error_to_exit_code(&io), ExitCode::IoError);
        assert_eq!(
            error_to_exit_code(&Error::InvalidArchiveName("a/b".into())),
            ExitCode::BadArgs
        );
        assert_eq!(error_to_exit_code(&Error::WorkerLost).code(), FATAL_ERROR);
    }
}
