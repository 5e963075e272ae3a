use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PadError {
    #[error("not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("I/O error ({op} {}): {source}", path.display())]
    IoAt {
        op: &'static str,
        path: PathBuf,
        source: io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("no valid input files")]
    NoInputFiles,

    #[error("not supported: {0}")]
    Unsupported(String),

    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
}

impl PadError {
    /// Error for a path that must already exist (source files, archive inputs).
    /// `NotFound` from the OS is reported as [`PadError::NotFound`].
    pub fn lookup(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            PadError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            PadError::IoAt {
                op: "open",
                path: path.to_path_buf(),
                source,
            }
        }
    }

    /// True for filesystem and container write failures.
    pub fn is_io_failure(&self) -> bool {
        matches!(
            self,
            PadError::IoAt { .. } | PadError::Io(_) | PadError::Archive(_)
        )
    }
}

/// Attach the failing operation and path to a raw `io::Error`.
pub(crate) trait IoContext<T> {
    fn at(self, op: &'static str, path: &Path) -> Result<T>;
}

impl<T> IoContext<T> for std::result::Result<T, io::Error> {
    fn at(self, op: &'static str, path: &Path) -> Result<T> {
        self.map_err(|source| PadError::IoAt {
            op,
            path: path.to_path_buf(),
            source,
        })
    }
}

// Convenient crate-wide result type
pub type Result<T> = std::result::Result<T, PadError>;
