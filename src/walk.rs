//! Depth-first recursive watch registration.

use std::ffi::OsStr;
use std::os::fd::RawFd;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::error::WatchError;
use crate::mask::EventMask;
use crate::registry::{WatchDescriptor, WatchRegistry};
use crate::sys::{self, DirStream};

/// Register `root` and every directory beneath it on `fd`.
///
/// Pre-order: a directory's own watch is registered and recorded before its
/// children are visited, so a failure partway through the tree leaves every
/// earlier directory watched and resolvable. The first failure unwinds
/// immediately; siblings after the failing entry are not registered. Sibling
/// order is whatever the OS returns from the directory listing.
///
/// The registry lock is held only for the insert at each successful
/// registration, never across syscalls.
pub(crate) fn register_tree(
    fd: RawFd,
    root: &Path,
    mask: EventMask,
    registry: &Mutex<WatchRegistry>,
) -> Result<(), WatchError> {
    let wd = match sys::add_watch(fd, root, mask.bits()) {
        Ok(wd) => WatchDescriptor::from(wd),
        Err(source) => {
            return Err(WatchError::WatchCreation {
                path: root.to_path_buf(),
                source,
            });
        }
    };
    tracing::trace!(target: "inotree::walk", %wd, path = %root.display(), "watch registered");
    registry.lock().insert(wd, root.to_path_buf());

    let mut dir = DirStream::open(root).map_err(|source| WatchError::DirectoryOpen {
        path: root.to_path_buf(),
        source,
    })?;

    loop {
        // An early return here drops the stream, which releases the listing
        // handle before the error propagates.
        let entry = match dir.next_entry() {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(source) => {
                return Err(WatchError::DirectoryList {
                    path: root.to_path_buf(),
                    source,
                });
            }
        };
        if !entry.is_dir() {
            continue;
        }
        let child = join_child(root, &entry.name)?;
        register_tree(fd, &child, mask, registry)?;
    }

    dir.close().map_err(|source| WatchError::DirectoryClose {
        path: root.to_path_buf(),
        source,
    })
}

/// Join `name` onto `parent`, enforcing the platform path-length bound.
///
/// `PATH_MAX` counts the separator and the terminating NUL the C API needs;
/// exceeding it is an error for this branch, never a truncation.
fn join_child(parent: &Path, name: &OsStr) -> Result<PathBuf, WatchError> {
    let joined = parent.as_os_str().len() + 1 + name.len();
    if joined + 1 > libc::PATH_MAX as usize {
        return Err(WatchError::PathTooLong {
            path: parent.to_path_buf(),
            name: name.to_os_string(),
        });
    }
    Ok(parent.join(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    #[test]
    fn join_builds_child_paths() {
        let child = join_child(Path::new("/watched/root"), OsStr::new("sub")).unwrap();
        assert_eq!(child, PathBuf::from("/watched/root/sub"));
    }

    #[test]
    fn join_past_path_max_fails_instead_of_truncating() {
        let parent = PathBuf::from(format!("/{}", "x".repeat(libc::PATH_MAX as usize - 100)));
        let name = OsString::from("y".repeat(200));

        let err = join_child(&parent, &name).unwrap_err();
        assert!(matches!(err, WatchError::PathTooLong { .. }));
    }

    #[test]
    fn join_just_under_the_bound_succeeds() {
        let parent = PathBuf::from(format!("/{}", "x".repeat(1000)));
        let name = OsString::from("y".repeat(100));
        assert!(join_child(&parent, &name).is_ok());
    }
}
