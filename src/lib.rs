//! Recursive inotify watch registration for Linux.
//!
//! Given a root directory, [`Handle::watch`] registers a kernel watch on the
//! root and on every directory beneath it, and records each resulting watch
//! descriptor against the absolute path it watches. Event reading stays
//! outside this crate: register [`Handle::fd`] with your reactor, read the
//! raw `inotify_event` records yourself, and map each record's `wd` back to
//! a path with [`Handle::resolve`].
//!
//! # Architecture
//!
//! ```text
//! Handle
//!   - inotify instance fd (IN_NONBLOCK | IN_CLOEXEC by default)
//!   - WatchRegistry: WatchDescriptor -> PathBuf
//!         |
//!   register_tree (depth-first, pre-order)
//!         |
//!   sys: inotify_add_watch / opendir / readdir / closedir
//! ```
//!
//! The recursive walk performs blocking syscalls and may traverse thousands
//! of directories. Run it through [`Handle::watch`], which isolates it on
//! tokio's blocking pool, or dedicate a thread to [`Handle::watch_blocking`].
//! Watches registered before a mid-walk failure stay active and resolvable;
//! there is no rollback and no deduplication.
//!
//! # Example
//!
//! ```no_run
//! use inotree::{EventMask, Handle};
//!
//! # fn main() -> Result<(), inotree::WatchError> {
//! let handle = Handle::open()?;
//! handle.watch_blocking("/var/log", EventMask::CREATE | EventMask::MODIFY)?;
//! let fd = handle.fd()?; // hand this to poll/epoll
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod handle;
pub mod mask;
pub mod registry;
mod sys;
mod walk;

pub use error::WatchError;
pub use handle::{Handle, HandleOptions};
pub use mask::EventMask;
pub use registry::{WatchDescriptor, WatchRegistry};
