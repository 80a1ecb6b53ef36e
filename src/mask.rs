//! Event-interest masks for `inotify_add_watch`.

use bitflags::bitflags;

bitflags! {
    /// Event kinds a watch subscribes to, plus the `IN_*` behavior flags the
    /// kernel accepts alongside them.
    ///
    /// The mask is passed through to `inotify_add_watch` unchanged; this
    /// crate attaches no meaning to individual bits. See `inotify(7)` for
    /// each flag's semantics.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct EventMask: u32 {
        /// File was accessed.
        const ACCESS = libc::IN_ACCESS;
        /// File was modified.
        const MODIFY = libc::IN_MODIFY;
        /// Metadata changed.
        const ATTRIB = libc::IN_ATTRIB;
        /// Writable file was closed.
        const CLOSE_WRITE = libc::IN_CLOSE_WRITE;
        /// Unwritable file was closed.
        const CLOSE_NOWRITE = libc::IN_CLOSE_NOWRITE;
        /// File was opened.
        const OPEN = libc::IN_OPEN;
        /// File was moved out of the watched directory.
        const MOVED_FROM = libc::IN_MOVED_FROM;
        /// File was moved into the watched directory.
        const MOVED_TO = libc::IN_MOVED_TO;
        /// File or directory was created in the watched directory.
        const CREATE = libc::IN_CREATE;
        /// File or directory was deleted from the watched directory.
        const DELETE = libc::IN_DELETE;
        /// The watched path itself was deleted.
        const DELETE_SELF = libc::IN_DELETE_SELF;
        /// The watched path itself was moved.
        const MOVE_SELF = libc::IN_MOVE_SELF;

        /// Only watch the path if it is a directory.
        const ONLYDIR = libc::IN_ONLYDIR;
        /// Do not follow the path if it is a symlink.
        const DONT_FOLLOW = libc::IN_DONT_FOLLOW;
        /// Stop reporting events for unlinked children.
        const EXCL_UNLINK = libc::IN_EXCL_UNLINK;
        /// Add to an existing watch's mask instead of replacing it.
        const MASK_ADD = libc::IN_MASK_ADD;
        /// Remove the watch after the first event.
        const ONESHOT = libc::IN_ONESHOT;

        /// Every event kind the kernel can report.
        const ALL_EVENTS = libc::IN_ALL_EVENTS;
    }
}
