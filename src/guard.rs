use once_cell::sync::Lazy;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{TempError, TempResult};

static TEMP_ROOT: Lazy<PathBuf> = Lazy::new(env::temp_dir);

/// The process-wide temporary-directory root.
///
/// Read from [`std::env::temp_dir`] once, on first use, and fixed for the
/// lifetime of the process.
#[must_use]
pub fn temp_root() -> &'static Path {
    &TEMP_ROOT
}

/// A value that can answer "what filesystem path do I refer to".
///
/// Implemented for plain path and string types as well as the tracked temp
/// types, so the guarded operations accept either kind of argument.
pub trait PathResource {
    /// The filesystem location this resource refers to.
    fn resource_path(&self) -> &Path;
}

impl PathResource for Path {
    fn resource_path(&self) -> &Path {
        self
    }
}

impl PathResource for PathBuf {
    fn resource_path(&self) -> &Path {
        self.as_path()
    }
}

impl PathResource for str {
    fn resource_path(&self) -> &Path {
        Path::new(self)
    }
}

impl PathResource for String {
    fn resource_path(&self) -> &Path {
        Path::new(self.as_str())
    }
}

/// Checks deletion targets against a temporary-directory root and refuses to
/// remove anything that does not resolve under it.
///
/// The guard holds no open handles and performs no filesystem access until a
/// deletion is requested; the predicate methods are pure path computation.
#[derive(Debug, Clone)]
pub struct PathGuard {
    /// Root every deletable path must live under.
    root: PathBuf,
}

impl PathGuard {
    /// Creates a guard rooted at the process temporary directory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: temp_root().to_path_buf(),
        }
    }

    /// Creates a guard rooted at an arbitrary directory.
    ///
    /// Mainly useful for tests and for integrators that stage temporary
    /// resources somewhere other than the system scratch directory.
    pub fn with_root<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    /// The root this guard checks deletion targets against.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves the path a resource refers to into an absolute form.
    ///
    /// Relative paths are expanded against the current working directory.
    /// This is pure path computation; nothing on disk is touched.
    ///
    /// # Errors
    ///
    /// Returns an error if the current working directory cannot be determined.
    pub fn effective_path<R>(&self, resource: &R) -> TempResult<PathBuf>
    where
        R: PathResource + ?Sized,
    {
        let raw = resource.resource_path();
        if raw.is_absolute() {
            Ok(raw.to_path_buf())
        } else {
            Ok(env::current_dir()?.join(raw))
        }
    }

    /// Whether a path is rooted under this guard's root.
    ///
    /// This is a plain byte-prefix comparison of the two paths' string forms,
    /// not a segment-aware check: with root `/tmp`, the sibling `/tmpfoo` is
    /// also accepted. Callers relying on exact containment should place their
    /// root so that no sibling shares its name as a prefix.
    #[must_use]
    pub fn is_safe<P: AsRef<Path>>(&self, path: P) -> bool {
        path.as_ref()
            .as_os_str()
            .as_encoded_bytes()
            .starts_with(self.root.as_os_str().as_encoded_bytes())
    }

    /// Recursively removes the path a resource refers to, after checking it
    /// resolves under this guard's root.
    ///
    /// A missing target is treated as already deleted and is not an error.
    /// Symlinks are removed, never followed.
    ///
    /// # Errors
    ///
    /// Returns [`TempError::UnsafeDeletion`] if the effective path is outside
    /// the root; any other filesystem failure propagates unchanged.
    pub fn guarded_delete<R>(&self, resource: &R) -> TempResult<()>
    where
        R: PathResource + ?Sized,
    {
        let path = self.effective_path(resource)?;
        if !self.is_safe(&path) {
            return Err(TempError::UnsafeDeletion(path));
        }
        let meta = match fs::symlink_metadata(&path) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            other => other?,
        };
        let removed = if meta.is_dir() {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };
        match removed {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
            Ok(()) => {
                tracing::debug!(path = %path.display(), "removed temporary path");
                Ok(())
            }
        }
    }

    /// Removes the immediate children of the path a resource refers to,
    /// leaving the directory itself in place.
    ///
    /// The same safety check as [`guarded_delete`](Self::guarded_delete)
    /// applies. A missing directory is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`TempError::UnsafeDeletion`] if the effective path is outside
    /// the root; any other filesystem failure propagates unchanged.
    pub fn guarded_delete_contents<R>(&self, resource: &R) -> TempResult<()>
    where
        R: PathResource + ?Sized,
    {
        let path = self.effective_path(resource)?;
        if !self.is_safe(&path) {
            return Err(TempError::UnsafeDeletion(path));
        }
        let entries = match fs::read_dir(&path) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            other => other?,
        };
        for entry in entries {
            let entry = entry?;
            let child = entry.path();
            let removed = match entry.file_type() {
                Ok(kind) if kind.is_dir() => fs::remove_dir_all(&child),
                _ => fs::remove_file(&child),
            };
            match removed {
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                other => other?,
            }
        }
        tracing::debug!(path = %path.display(), "emptied temporary directory");
        Ok(())
    }
}

impl Default for PathGuard {
    fn default() -> Self {
        Self::new()
    }
}
