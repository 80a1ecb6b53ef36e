//! Inotify handle: one instance fd plus the registry of watches added
//! through it, with deterministic, idempotent teardown.

use std::os::fd::RawFd;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::error::WatchError;
use crate::mask::EventMask;
use crate::registry::{WatchDescriptor, WatchRegistry};
use crate::sys;
use crate::walk;

/// Options for [`Handle::open_with`].
///
/// The defaults suit reactor integration: the instance fd is nonblocking and
/// close-on-exec.
#[derive(Debug, Clone, Copy)]
pub struct HandleOptions {
    nonblocking: bool,
    close_on_exec: bool,
}

impl Default for HandleOptions {
    fn default() -> Self {
        Self {
            nonblocking: true,
            close_on_exec: true,
        }
    }
}

impl HandleOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether reads on the instance fd return `EAGAIN` instead of blocking.
    pub fn nonblocking(mut self, nonblocking: bool) -> Self {
        self.nonblocking = nonblocking;
        self
    }

    /// Whether the instance fd is closed across `exec`.
    pub fn close_on_exec(mut self, close_on_exec: bool) -> Self {
        self.close_on_exec = close_on_exec;
        self
    }

    fn flags(self) -> i32 {
        let mut flags = 0;
        if self.nonblocking {
            flags |= libc::IN_NONBLOCK;
        }
        if self.close_on_exec {
            flags |= libc::IN_CLOEXEC;
        }
        flags
    }
}

/// An open inotify instance and the registry of watches added through it.
///
/// One handle exclusively owns one instance fd and one registry. Teardown
/// runs exactly once, on [`close`](Handle::close) or on drop, whichever
/// comes first; every operation on a closed handle fails with
/// [`WatchError::Closed`].
pub struct Handle {
    inner: Arc<Inner>,
}

struct Inner {
    /// `None` once closed. Operations hold the read side for their duration
    /// (a recursive walk included), so `close`, the sole writer, never
    /// overlaps an in-flight operation.
    chan: RwLock<Option<Channel>>,
}

struct Channel {
    fd: RawFd,
    registry: Mutex<WatchRegistry>,
}

impl Drop for Channel {
    fn drop(&mut self) {
        tracing::debug!(
            target: "inotree::handle",
            fd = self.fd,
            watches = self.registry.lock().len(),
            "inotify instance closed"
        );
        if let Err(err) = sys::close_fd(self.fd) {
            tracing::debug!(target: "inotree::handle", fd = self.fd, %err, "close failed");
        }
    }
}

impl Handle {
    /// Open a new inotify instance with default options.
    pub fn open() -> Result<Self, WatchError> {
        Self::open_with(HandleOptions::default())
    }

    /// Open a new inotify instance.
    ///
    /// Fails with [`WatchError::Init`] when the kernel refuses the instance
    /// (per-user instance limit, fd table exhaustion). Retrying without
    /// addressing the limit will fail again.
    pub fn open_with(options: HandleOptions) -> Result<Self, WatchError> {
        let fd = sys::inotify_init(options.flags()).map_err(|source| WatchError::Init { source })?;
        tracing::debug!(target: "inotree::handle", fd, "inotify instance opened");
        Ok(Self {
            inner: Arc::new(Inner {
                chan: RwLock::new(Some(Channel {
                    fd,
                    registry: Mutex::new(WatchRegistry::new()),
                })),
            }),
        })
    }

    /// The raw instance fd, for registration with a poll/epoll-style
    /// reactor. Read readiness means raw `inotify_event` records are
    /// pending.
    pub fn fd(&self) -> Result<RawFd, WatchError> {
        let chan = self.inner.chan.read();
        Ok(chan.as_ref().ok_or(WatchError::Closed)?.fd)
    }

    /// Recursively watch `root` and every directory beneath it with `mask`.
    ///
    /// Blocks the calling thread for the duration of the walk; the thread is
    /// dedicated to the blocking syscalls. Other operations on this handle
    /// proceed concurrently, except [`close`](Handle::close), which waits.
    ///
    /// `root` must name an existing, readable directory; resolve it to an
    /// absolute, canonical path first if events should map back to absolute
    /// paths. On error, watches registered before the failure point stay
    /// active and resolvable; there is no rollback. Watching an
    /// already-watched tree again is allowed and performs no deduplication.
    pub fn watch_blocking(
        &self,
        root: impl AsRef<Path>,
        mask: EventMask,
    ) -> Result<(), WatchError> {
        self.inner.watch_tree(root.as_ref(), mask)
    }

    /// Recursively watch `root`, isolating the blocking walk on tokio's
    /// blocking pool so runtime workers are never stalled by it.
    ///
    /// Same contract as [`watch_blocking`](Handle::watch_blocking). Must be
    /// called within a tokio runtime.
    pub async fn watch(&self, root: impl AsRef<Path>, mask: EventMask) -> Result<(), WatchError> {
        let inner = Arc::clone(&self.inner);
        let root = root.as_ref().to_path_buf();
        match tokio::task::spawn_blocking(move || inner.watch_tree(&root, mask)).await {
            Ok(result) => result,
            Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
            // Runtime shut down before the walk ran.
            Err(_) => Err(WatchError::Closed),
        }
    }

    /// Path watched by `wd`, or `None` for a descriptor this handle never
    /// issued. Absence is a normal outcome, not an error: stale descriptors
    /// are expected after a race with directory deletion.
    pub fn resolve(&self, wd: impl Into<WatchDescriptor>) -> Result<Option<PathBuf>, WatchError> {
        let chan = self.inner.chan.read();
        let chan = chan.as_ref().ok_or(WatchError::Closed)?;
        Ok(chan.registry.lock().resolve(wd.into()).map(Path::to_path_buf))
    }

    /// Number of currently registered watches.
    pub fn watch_count(&self) -> Result<usize, WatchError> {
        let chan = self.inner.chan.read();
        let chan = chan.as_ref().ok_or(WatchError::Closed)?;
        Ok(chan.registry.lock().len())
    }

    /// Snapshot of every `(descriptor, path)` pair currently registered.
    pub fn watches(&self) -> Result<Vec<(WatchDescriptor, PathBuf)>, WatchError> {
        let chan = self.inner.chan.read();
        let chan = chan.as_ref().ok_or(WatchError::Closed)?;
        let registry = chan.registry.lock();
        Ok(registry
            .iter()
            .map(|(wd, path)| (wd, path.to_path_buf()))
            .collect())
    }

    /// Close the instance fd and drop every registry entry.
    ///
    /// Waits for in-flight operations to finish, then tears down exactly
    /// once. Calling again, or dropping the handle afterwards, is a no-op.
    pub fn close(&self) -> Result<(), WatchError> {
        self.inner.close();
        Ok(())
    }
}

impl Inner {
    fn watch_tree(&self, root: &Path, mask: EventMask) -> Result<(), WatchError> {
        let chan = self.chan.read();
        let chan = chan.as_ref().ok_or(WatchError::Closed)?;
        walk::register_tree(chan.fd, root, mask, &chan.registry)
    }

    fn close(&self) {
        // Dropping the channel closes the fd and frees the registry. A walk
        // still running on the blocking pool keeps the inner state alive via
        // its own Arc, so drop-without-close defers teardown until it ends.
        self.chan.write().take();
    }
}
