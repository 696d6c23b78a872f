use std::fmt::{Display, Formatter};
use std::io;
use std::path::PathBuf;

#[derive(Debug)]
/// Errors that can occur when using the guard or the tracked temp types.
pub enum TempError {
    /// Occurs when a guarded deletion targets a path that does not resolve
    /// under the temporary-directory root. Carries the rejected path.
    UnsafeDeletion(PathBuf),
    /// Occurs when attempting to use a file handle that was already closed.
    FileClosed,
    /// An IO error.
    Io(io::Error),
}

impl Display for TempError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsafeDeletion(path) => write!(
                f,
                "refusing to delete {}: not under the temporary directory root",
                path.display()
            ),
            Self::FileClosed => write!(f, "file handle is closed"),
            Self::Io(e) => write!(f, "IO error: {e}"),
        }
    }
}

impl std::error::Error for TempError {}

pub type TempResult<T> = Result<T, TempError>;

impl From<io::Error> for TempError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}
