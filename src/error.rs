//! Error types for handle lifecycle and recursive registration.

use std::ffi::OsString;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors from inotify handle operations.
///
/// Registration failures name the syscall class that failed, so callers can
/// tell a refused watch from a directory that could not be listed. The
/// underlying OS error is always preserved as the source.
#[derive(Error, Debug)]
pub enum WatchError {
    /// The kernel refused to allocate an inotify instance, typically because
    /// the per-user instance limit or the process fd table is exhausted.
    #[error("failed to initialize inotify instance: {source}")]
    Init {
        #[source]
        source: io::Error,
    },

    /// The handle was closed before the operation ran. Not retryable; a
    /// caller holding on to a closed handle is a usage bug.
    #[error("inotify handle is closed")]
    Closed,

    /// `inotify_add_watch` failed for a directory. Fatal for the whole
    /// subtree rooted there; nothing beneath it was visited.
    #[error("failed to add watch on {path}: {source}")]
    WatchCreation {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// `opendir` failed while walking the tree.
    #[error("failed to open directory {path}: {source}")]
    DirectoryOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// `readdir` failed partway through a directory listing.
    #[error("failed to list directory {path}: {source}")]
    DirectoryList {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// `closedir` failed after a fully listed directory.
    #[error("failed to close directory {path}: {source}")]
    DirectoryClose {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Joining a child name onto its parent would exceed the platform
    /// `PATH_MAX` bound. Reported instead of truncating.
    #[error("path too long: {name:?} under {path}")]
    PathTooLong { path: PathBuf, name: OsString },
}
