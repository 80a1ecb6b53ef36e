//! Handle open/close lifecycle and closed-error surface.

use std::fs;
use std::io;

use inotree::{EventMask, Handle, HandleOptions, WatchError};
use tempfile::TempDir;

const MASK: EventMask = EventMask::ALL_EVENTS;

#[test]
fn every_operation_fails_closed_after_close() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir(tmp.path().join("sub")).unwrap();

    let handle = Handle::open().unwrap();
    handle.watch_blocking(tmp.path(), MASK).unwrap();
    handle.close().unwrap();

    assert!(matches!(handle.fd(), Err(WatchError::Closed)));
    assert!(matches!(handle.resolve(1), Err(WatchError::Closed)));
    assert!(matches!(handle.watch_count(), Err(WatchError::Closed)));
    assert!(matches!(handle.watches(), Err(WatchError::Closed)));
    assert!(matches!(
        handle.watch_blocking(tmp.path(), MASK),
        Err(WatchError::Closed)
    ));
}

#[tokio::test]
async fn async_watch_fails_closed_after_close() {
    let tmp = TempDir::new().unwrap();

    let handle = Handle::open().unwrap();
    handle.close().unwrap();

    assert!(matches!(
        handle.watch(tmp.path(), MASK).await,
        Err(WatchError::Closed)
    ));
}

#[test]
fn close_is_idempotent() {
    let handle = Handle::open().unwrap();
    handle.close().unwrap();
    handle.close().unwrap();
    // Dropping after an explicit close must not double-free the fd either.
    drop(handle);
}

#[test]
fn default_instance_is_nonblocking() {
    let handle = Handle::open().unwrap();
    let fd = handle.fd().unwrap();

    // No events pending: a nonblocking read reports EAGAIN instead of
    // stalling the test.
    let mut buf = [0u8; 4096];
    let n = unsafe { libc::read(fd, buf.as_mut_ptr().cast(), buf.len()) };
    assert_eq!(n, -1);
    assert_eq!(
        io::Error::last_os_error().raw_os_error(),
        Some(libc::EAGAIN)
    );
}

#[test]
fn options_select_a_blocking_instance() {
    let handle = Handle::open_with(HandleOptions::new().nonblocking(false)).unwrap();
    let fd = handle.fd().unwrap();

    let status = unsafe { libc::fcntl(fd, libc::F_GETFL) };
    assert!(status >= 0);
    assert_eq!(status & libc::O_NONBLOCK, 0);
}

#[test]
fn registry_is_empty_on_open() {
    let handle = Handle::open().unwrap();
    assert_eq!(handle.watch_count().unwrap(), 0);
    assert!(handle.watches().unwrap().is_empty());
}
