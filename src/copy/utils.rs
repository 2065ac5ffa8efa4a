//! Utility functions for copy operations.
//!
//! This module contains helpers shared by the file, directory, symlink,
//! and pipe handlers: attribute preservation, handle closing, and
//! platform-specific node creation.

use crate::entry::Entry;
use filetime::{set_file_times, set_symlink_file_times};
use std::fs::{self, File};
use std::io;
use std::path::Path;

// =============================================================================
// Timestamps and ownership
// =============================================================================

/// Set `dst`'s access and modification times to the entry's.
pub(crate) fn preserve_times(entry: &Entry, dst: &Path) -> io::Result<()> {
    set_file_times(dst, entry.accessed(), entry.modified())
}

/// Like [`preserve_times`], but on the link itself rather than its target.
pub(crate) fn preserve_link_times(entry: &Entry, dst: &Path) -> io::Result<()> {
    set_symlink_file_times(dst, entry.accessed(), entry.modified())
}

/// Set `dst`'s owner and group to the entry's.
#[cfg(unix)]
pub(crate) fn preserve_owner(entry: &Entry, dst: &Path) -> io::Result<()> {
    use std::os::unix::fs::MetadataExt;
    let meta = entry.metadata();
    std::os::unix::fs::chown(dst, Some(meta.uid()), Some(meta.gid()))
}

#[cfg(not(unix))]
pub(crate) fn preserve_owner(_entry: &Entry, _dst: &Path) -> io::Result<()> {
    Ok(())
}

// =============================================================================
// Identity
// =============================================================================

/// Whether `src` and `dst` both exist and resolve to the same file.
#[cfg(unix)]
pub(crate) fn same_file(src: &Path, dst: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;
    match (fs::metadata(src), fs::metadata(dst)) {
        (Ok(a), Ok(b)) => a.dev() == b.dev() && a.ino() == b.ino(),
        _ => false,
    }
}

#[cfg(not(unix))]
pub(crate) fn same_file(src: &Path, dst: &Path) -> bool {
    match (src.canonicalize(), dst.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

// =============================================================================
// Handles
// =============================================================================

/// Close `file`, reporting the error `close(2)` returns.
///
/// Dropping a `File` silently discards close errors.
#[cfg(unix)]
pub(crate) fn close_file(file: File) -> io::Result<()> {
    use std::os::unix::io::IntoRawFd;

    let fd = file.into_raw_fd();
    // SAFETY: `fd` was just released by `File`, so this is its only owner
    // and it is closed exactly once.
    let result = unsafe { libc::close(fd) };
    if result == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

#[cfg(not(unix))]
pub(crate) fn close_file(file: File) -> io::Result<()> {
    drop(file);
    Ok(())
}

// =============================================================================
// Node creation
// =============================================================================

/// Create `dst` and any missing parents, fully open so children can be written.
pub(crate) fn create_dir_open(dst: &Path) -> io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o777);
    }
    builder.create(dst)
}

/// Create the parent directory of `dst` if it is missing.
pub(crate) fn create_parent(dst: &Path) -> io::Result<()> {
    match dst.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => create_dir_open(parent),
        _ => Ok(()),
    }
}

/// Create a named pipe at `path` with permission bits `mode`.
#[cfg(unix)]
pub(crate) fn make_fifo(path: &Path, mode: u32) -> io::Result<()> {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let c_path = CString::new(path.as_os_str().as_bytes())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    // SAFETY: c_path is a valid NUL-terminated C string.
    let result = unsafe { libc::mkfifo(c_path.as_ptr(), (mode & 0o7777) as libc::mode_t) };
    if result == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

#[cfg(not(unix))]
pub(crate) fn make_fifo(_path: &Path, _mode: u32) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "Named pipes not supported on this platform",
    ))
}

#[cfg(unix)]
pub(crate) use std::os::unix::fs::symlink;

#[cfg(not(unix))]
pub(crate) fn symlink(_target: &Path, _link: &Path) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "Symlinks not supported on this platform",
    ))
}

// =============================================================================
// Tests
// =============================================================================
