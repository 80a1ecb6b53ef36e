//! Thin wrappers over the inotify and dirent syscall surface.
//!
//! Everything here returns plain `io::Error` straight from errno; the walk
//! layer attaches paths and syscall classes on top.

use std::ffi::{CStr, CString, OsStr, OsString};
use std::io;
use std::os::fd::RawFd;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

/// Create an inotify instance with the given `IN_NONBLOCK`/`IN_CLOEXEC` flags.
pub fn inotify_init(flags: i32) -> io::Result<RawFd> {
    let fd = unsafe { libc::inotify_init1(flags) };
    if fd < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(fd)
}

/// Register `path` on `fd` with the raw event `mask`, returning the kernel
/// watch descriptor.
pub fn add_watch(fd: RawFd, path: &Path, mask: u32) -> io::Result<i32> {
    let c_path = cstring(path)?;
    let wd = unsafe { libc::inotify_add_watch(fd, c_path.as_ptr(), mask) };
    if wd < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(wd)
}

/// Close an instance fd.
pub fn close_fd(fd: RawFd) -> io::Result<()> {
    if unsafe { libc::close(fd) } < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

fn cstring(path: &Path) -> io::Result<CString> {
    CString::new(path.as_os_str().as_bytes())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))
}

/// One entry read from a [`DirStream`], carrying the kernel-reported entry
/// type so directory detection needs no extra stat call.
pub struct DirEntry {
    pub name: OsString,
    d_type: u8,
}

impl DirEntry {
    /// True only for `DT_DIR`. Symlinks to directories and `DT_UNKNOWN`
    /// entries are not directories by this test.
    pub fn is_dir(&self) -> bool {
        self.d_type == libc::DT_DIR
    }
}

/// An open directory stream.
///
/// The underlying handle is released exactly once: by [`DirStream::close`],
/// which surfaces the `closedir` error, or by Drop when an error unwinds
/// past it.
#[derive(Debug)]
pub struct DirStream {
    dir: *mut libc::DIR,
}

impl DirStream {
    pub fn open(path: &Path) -> io::Result<Self> {
        let c_path = cstring(path)?;
        let dir = unsafe { libc::opendir(c_path.as_ptr()) };
        if dir.is_null() {
            return Err(io::Error::last_os_error());
        }
        Ok(Self { dir })
    }

    /// Read the next entry, skipping the `.` and `..` pseudo-entries.
    ///
    /// Returns `Ok(None)` at end of stream. `readdir` reports failure only
    /// through errno, so errno is cleared before the call and re-read after
    /// a null return to tell the two apart.
    pub fn next_entry(&mut self) -> io::Result<Option<DirEntry>> {
        loop {
            unsafe { *libc::__errno_location() = 0 };
            let entry = unsafe { libc::readdir64(self.dir) };
            if entry.is_null() {
                let err = io::Error::last_os_error();
                return match err.raw_os_error() {
                    Some(0) | None => Ok(None),
                    Some(_) => Err(err),
                };
            }
            let name = unsafe { CStr::from_ptr((*entry).d_name.as_ptr()) }.to_bytes();
            if name == b"." || name == b".." {
                continue;
            }
            return Ok(Some(DirEntry {
                name: OsStr::from_bytes(name).to_os_string(),
                d_type: unsafe { (*entry).d_type },
            }));
        }
    }

    /// Release the stream, reporting the `closedir` error the Drop path
    /// would have to swallow.
    pub fn close(mut self) -> io::Result<()> {
        let dir = std::mem::replace(&mut self.dir, std::ptr::null_mut());
        if unsafe { libc::closedir(dir) } < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }
}

impl Drop for DirStream {
    fn drop(&mut self) {
        if !self.dir.is_null() {
            // closedir must not clobber the errno a caller may still be
            // materializing into the error it is about to return.
            unsafe {
                let saved = *libc::__errno_location();
                libc::closedir(self.dir);
                *libc::__errno_location() = saved;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dir_stream_lists_children_without_pseudo_entries() {
        let tmp = tempfile::TempDir::new().unwrap();
        std::fs::create_dir(tmp.path().join("sub")).unwrap();
        std::fs::write(tmp.path().join("file"), b"x").unwrap();

        let mut stream = DirStream::open(tmp.path()).unwrap();
        let mut names = Vec::new();
        while let Some(entry) = stream.next_entry().unwrap() {
            names.push(entry.name.clone());
        }
        stream.close().unwrap();

        names.sort();
        assert_eq!(names, vec![OsString::from("file"), OsString::from("sub")]);
    }

    #[test]
    fn dir_entry_type_comes_from_the_kernel() {
        let tmp = tempfile::TempDir::new().unwrap();
        std::fs::create_dir(tmp.path().join("sub")).unwrap();
        std::fs::write(tmp.path().join("file"), b"x").unwrap();

        let mut stream = DirStream::open(tmp.path()).unwrap();
        while let Some(entry) = stream.next_entry().unwrap() {
            assert_eq!(entry.is_dir(), entry.name == "sub");
        }
    }

    #[test]
    fn open_missing_directory_fails() {
        let tmp = tempfile::TempDir::new().unwrap();
        let err = DirStream::open(&tmp.path().join("missing")).unwrap_err();
        assert_eq!(err.raw_os_error(), Some(libc::ENOENT));
    }
}
