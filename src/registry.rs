//! Watch registry: kernel watch descriptors back to the paths they watch.
//!
//! Pure storage with insert and lookup. Entries are added one at a time as
//! the recursive walk registers each directory and dropped in bulk when the
//! owning handle closes.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Identifier the kernel assigns to one watch on one inotify instance.
///
/// Raw `inotify_event` records carry this value in their `wd` field; convert
/// with `WatchDescriptor::from(event.wd)` before a registry lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WatchDescriptor(i32);

impl WatchDescriptor {
    /// The raw descriptor value.
    pub fn as_raw(self) -> i32 {
        self.0
    }
}

impl From<i32> for WatchDescriptor {
    fn from(wd: i32) -> Self {
        Self(wd)
    }
}

impl fmt::Display for WatchDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Mapping from watch descriptors to the directories they watch.
#[derive(Debug, Default)]
pub struct WatchRegistry {
    watches: HashMap<WatchDescriptor, PathBuf>,
}

impl WatchRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful registration.
    ///
    /// Re-watching a path yields the same kernel descriptor, so an existing
    /// entry is replaced with an identical path rather than treated as a
    /// conflict.
    pub fn insert(&mut self, wd: WatchDescriptor, path: PathBuf) {
        self.watches.insert(wd, path);
    }

    /// Path watched by `wd`, or `None` for unknown or stale descriptors.
    pub fn resolve(&self, wd: WatchDescriptor) -> Option<&Path> {
        self.watches.get(&wd).map(PathBuf::as_path)
    }

    /// Number of registered watches.
    pub fn len(&self) -> usize {
        self.watches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.watches.is_empty()
    }

    /// Iterate over every registered watch.
    pub fn iter(&self) -> impl Iterator<Item = (WatchDescriptor, &Path)> {
        self.watches.iter().map(|(wd, path)| (*wd, path.as_path()))
    }

    /// Drop every entry; part of handle teardown.
    pub fn clear(&mut self) {
        self.watches.clear();
    }
}
