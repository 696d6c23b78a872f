use std::ffi::OsStr;
use std::fmt::{Debug, Display, Formatter};
use std::fs;
use std::io;
use std::path::{Path, PathBuf, StripPrefixError};
use std::sync::Arc;

use tempfile::Builder;

use crate::error::TempResult;
use crate::guard::{PathGuard, PathResource};
use crate::registry::InstanceRegistry;

/// Directory-name prefix used when no prefix is given.
pub const DEFAULT_DIR_PREFIX: &str = "TmpDir-";

static DIRS: InstanceRegistry<TrackedDir> = InstanceRegistry::new();

/// A tracked temporary directory.
///
/// Creation allocates a uniquely-named directory under the
/// temporary-directory root and registers the instance for bulk teardown via
/// [`delete_all`](TrackedDir::delete_all). The navigational path operations
/// forward to the owned path and never touch the safety check — only
/// deletions are guarded.
///
/// Clones share the same path. When the last clone is released, a
/// best-effort recursive removal runs as a leak backstop.
#[derive(Clone)]
pub struct TrackedDir {
    guard: PathGuard,
    core: Arc<DirCore>,
}

struct DirCore {
    /// The full path to the temporary directory.
    path: PathBuf,
}

impl TrackedDir {
    /// Creates a tracked temporary directory.
    ///
    /// The directory name starts with `prefix` followed by a uniqueness
    /// suffix chosen by the allocator.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be allocated.
    pub fn create<S: AsRef<str>>(prefix: S) -> TempResult<Self> {
        let guard = PathGuard::new();
        let path = Builder::new()
            .prefix(prefix.as_ref())
            .tempdir_in(guard.root())?
            .keep();
        tracing::debug!(path = %path.display(), "created tracked temporary directory");
        let tracked = Self {
            guard,
            core: Arc::new(DirCore { path }),
        };
        Self::registry().register(tracked.clone());
        Ok(tracked)
    }

    /// Creates a tracked temporary directory with the default prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be allocated.
    pub fn anonymous() -> TempResult<Self> {
        Self::create(DEFAULT_DIR_PREFIX)
    }

    /// The registry of live [`TrackedDir`] instances.
    ///
    /// One process-wide instance; integrating applications can inspect it or
    /// reset it between test runs.
    #[must_use]
    pub fn registry() -> &'static InstanceRegistry<TrackedDir> {
        &DIRS
    }

    /// Recursively deletes every tracked directory created so far, in
    /// creation order.
    ///
    /// The first failure halts the batch; because the registry is drained
    /// before iteration, a failed batch does not reprocess on retry — the
    /// unprocessed remainder falls back to best-effort cleanup when the last
    /// handles are released. Re-invocation on an empty registry is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`crate::TempError::UnsafeDeletion`] if an instance's path no
    /// longer resolves under the temporary-directory root; other filesystem
    /// errors propagate unchanged.
    pub fn delete_all() -> TempResult<()> {
        for dir in Self::registry().drain() {
            dir.guard.guarded_delete(&dir)?;
        }
        Ok(())
    }

    /// Removes the directory's immediate children, leaving it in place.
    ///
    /// # Errors
    ///
    /// Propagates filesystem errors from the removal of any child.
    pub fn clear_contents(&self) -> TempResult<()> {
        self.guard.guarded_delete_contents(self)
    }

    /// The path of the temporary directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.core.path
    }

    /// Whether the directory currently exists on disk.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.core.path.exists()
    }

    /// Whether the path currently refers to a directory on disk.
    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.core.path.is_dir()
    }

    /// The final component of the directory's path.
    #[must_use]
    pub fn file_name(&self) -> Option<&OsStr> {
        self.core.path.file_name()
    }

    /// The directory's parent path.
    #[must_use]
    pub fn parent(&self) -> Option<&Path> {
        self.core.path.parent()
    }

    /// Joins a relative path onto the directory's path.
    #[must_use]
    pub fn join<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        self.core.path.join(path)
    }

    /// The directory's path relative to `base`.
    ///
    /// # Errors
    ///
    /// Returns an error if `base` is not a prefix of the path.
    pub fn strip_prefix<P: AsRef<Path>>(&self, base: P) -> Result<&Path, StripPrefixError> {
        self.core.path.strip_prefix(base)
    }
}

impl PathResource for TrackedDir {
    fn resource_path(&self) -> &Path {
        &self.core.path
    }
}

impl AsRef<Path> for TrackedDir {
    fn as_ref(&self) -> &Path {
        &self.core.path
    }
}

impl Display for TrackedDir {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.core.path.display())
    }
}

impl Debug for TrackedDir {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackedDir")
            .field("path", &self.core.path)
            .finish()
    }
}

impl Drop for DirCore {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_dir_all(&self.path) {
            if e.kind() != io::ErrorKind::NotFound {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "failed to remove temporary directory on drop"
                );
            }
        }
    }
}
