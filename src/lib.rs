//! A safety-and-lifecycle layer over temporary files and directories,
//! intended primarily for automated test suites.
//!
//! Every resource created through the crate is registered for bulk teardown
//! ([`TrackedFile::delete_all`], [`TrackedDir::delete_all`]), and every
//! deletion — batch or standalone — passes through [`PathGuard`], which
//! refuses to remove anything that does not resolve under the
//! temporary-directory root. The guard is a footgun-check for cooperative
//! test code, not a security boundary: it performs no TOCTOU protection
//! between the check and the removal.

pub mod error;
pub mod guard;
pub mod registry;
pub mod temp_dir;
pub mod temp_file;

pub use error::*;
pub use guard::{temp_root, PathGuard, PathResource};
pub use registry::InstanceRegistry;
pub use temp_dir::TrackedDir;
pub use temp_file::TrackedFile;

/// Crate version, as compiled.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
