//! Error types and exit codes for dateindex

use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;

/// Main error type for dateindex operations
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Invalid date token '{token}': {source}")]
    InvalidDate {
        token: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Failed to {op} {}: {source}", path.display())]
    Filesystem {
        op: FsOp,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Notification error for {}: {message}", path.display())]
    Notify { path: PathBuf, message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Filesystem mutation that failed while reconciling a link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsOp {
    CreateDir,
    RemoveStale,
    Symlink,
}

impl std::fmt::Display for FsOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::CreateDir => "create parent directory",
            Self::RemoveStale => "remove stale index entry",
            Self::Symlink => "create symlink",
        };
        f.write_str(s)
    }
}

impl IndexError {
    /// Convert error to exit code:
    /// - 0: Success (user stop)
    /// - 1: Fatal filesystem / notification error
    /// - 2: Configuration error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::Filesystem { .. } => ExitCode::from(1),
            Self::Notify { .. } => ExitCode::from(1),
            Self::Io(_) => ExitCode::from(1),
            Self::InvalidDate { .. } => ExitCode::from(1),
            Self::ConfigError { .. } => ExitCode::from(2),
        }
    }

    pub(crate) fn fs(op: FsOp, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Filesystem {
            op,
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for dateindex operations
pub type Result<T> = std::result::Result<T, IndexError>;
