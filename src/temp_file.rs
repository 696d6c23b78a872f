use std::fmt::{Debug, Formatter};
use std::fs::{self, File};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use tempfile::Builder;

use crate::error::{TempError, TempResult};
use crate::guard::{PathGuard, PathResource};
use crate::registry::InstanceRegistry;

/// Filename prefix used when no prefix is given.
pub const DEFAULT_FILE_PREFIX: &str = "anon";

static FILES: InstanceRegistry<TrackedFile> = InstanceRegistry::new();

/// A tracked temporary file with optional initial content.
///
/// Creation allocates a uniquely-named file under the temporary-directory
/// root, writes the initial content, rewinds the cursor to the start, and
/// registers the instance for bulk teardown via
/// [`delete_all`](TrackedFile::delete_all).
///
/// Clones share one underlying handle and path, so closing the handle during
/// teardown is observable from every clone. When the last clone is released,
/// a best-effort removal of the file runs as a leak backstop; the guarded
/// [`delete_all`](TrackedFile::delete_all) path is the intended teardown.
#[derive(Clone)]
pub struct TrackedFile {
    guard: PathGuard,
    core: Arc<FileCore>,
}

struct FileCore {
    /// The full path to the temporary file.
    path: PathBuf,
    /// The underlying file handle; `None` once closed.
    file: Mutex<Option<File>>,
}

impl TrackedFile {
    /// Creates a tracked temporary file.
    ///
    /// The filename starts with `prefix` followed by a uniqueness suffix
    /// chosen by the allocator. `content` is written as raw bytes and the
    /// cursor repositioned to offset 0, so an immediate read returns exactly
    /// `content`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be allocated or written.
    pub fn create<S, C>(prefix: S, content: C) -> TempResult<Self>
    where
        S: AsRef<str>,
        C: AsRef<[u8]>,
    {
        let guard = PathGuard::new();
        let (mut file, path) = Builder::new()
            .prefix(prefix.as_ref())
            .tempfile_in(guard.root())?
            .keep()
            .map_err(|e| TempError::Io(e.error))?;
        file.write_all(content.as_ref())?;
        file.seek(SeekFrom::Start(0))?;
        tracing::debug!(path = %path.display(), "created tracked temporary file");
        let tracked = Self {
            guard,
            core: Arc::new(FileCore {
                path,
                file: Mutex::new(Some(file)),
            }),
        };
        Self::registry().register(tracked.clone());
        Ok(tracked)
    }

    /// Creates an empty tracked temporary file with the default prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be allocated.
    pub fn anonymous() -> TempResult<Self> {
        Self::create(DEFAULT_FILE_PREFIX, b"")
    }

    /// The registry of live [`TrackedFile`] instances.
    ///
    /// One process-wide instance; integrating applications can inspect it or
    /// reset it between test runs.
    #[must_use]
    pub fn registry() -> &'static InstanceRegistry<TrackedFile> {
        &FILES
    }

    /// Deletes every tracked file created so far, in creation order.
    ///
    /// Each instance undergoes a guarded deletion and its handle is then
    /// closed. The first failure halts the batch; because the registry is
    /// drained before iteration, a failed batch does not reprocess on retry —
    /// the unprocessed remainder falls back to best-effort cleanup when the
    /// last handles are released. Re-invocation on an empty registry is a
    /// no-op.
    ///
    /// # Errors
    ///
    /// Returns [`TempError::UnsafeDeletion`] if an instance's path no longer
    /// resolves under the temporary-directory root; other filesystem errors
    /// propagate unchanged.
    pub fn delete_all() -> TempResult<()> {
        for file in Self::registry().drain() {
            file.guard.guarded_delete(&file)?;
            file.close();
        }
        Ok(())
    }

    /// The path to the temporary file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.core.path
    }

    /// Closes the underlying handle. Idempotent.
    ///
    /// The file itself stays on disk; only the handle is released.
    pub fn close(&self) {
        self.lock_file().take();
    }

    /// Whether the underlying handle has been closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.lock_file().is_none()
    }

    /// Retrieves metadata of the file.
    ///
    /// # Errors
    ///
    /// Returns a not-found error once the file has been deleted.
    pub fn metadata(&self) -> TempResult<fs::Metadata> {
        fs::metadata(&self.core.path).map_err(Into::into)
    }

    fn lock_file(&self) -> std::sync::MutexGuard<'_, Option<File>> {
        self.core.file.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn with_file<R>(&self, op: impl FnOnce(&mut File) -> io::Result<R>) -> io::Result<R> {
        match self.lock_file().as_mut() {
            Some(file) => op(file),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                TempError::FileClosed,
            )),
        }
    }
}

impl PathResource for TrackedFile {
    fn resource_path(&self) -> &Path {
        &self.core.path
    }
}

impl Write for TrackedFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.with_file(|file| file.write(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.with_file(File::flush)
    }
}

impl Read for TrackedFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.with_file(|file| file.read(buf))
    }

    fn read_to_end(&mut self, buf: &mut Vec<u8>) -> io::Result<usize> {
        self.with_file(|file| file.read_to_end(buf))
    }

    fn read_to_string(&mut self, buf: &mut String) -> io::Result<usize> {
        self.with_file(|file| file.read_to_string(buf))
    }
}

impl Seek for TrackedFile {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.with_file(|file| file.seek(pos))
    }
}

impl AsRef<Path> for TrackedFile {
    fn as_ref(&self) -> &Path {
        &self.core.path
    }
}

impl Debug for TrackedFile {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackedFile")
            .field("path", &self.core.path)
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl Drop for FileCore {
    fn drop(&mut self) {
        if let Ok(slot) = self.file.get_mut() {
            slot.take();
        }
        if let Err(e) = fs::remove_file(&self.path) {
            if e.kind() != io::ErrorKind::NotFound {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "failed to remove temporary file on drop"
                );
            }
        }
    }
}
