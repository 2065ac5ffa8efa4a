//! Filesystem entry snapshots.
//!
//! An [`Entry`] is taken once per visit, without following symlinks, and is
//! classified exactly once at construction. Copy handlers never re-stat an
//! entry they were handed.

use filetime::FileTime;
use std::fs::{self, Metadata, Permissions};
use std::io;
use std::path::{Path, PathBuf};

/// Kind of a filesystem entry, as seen without following symlinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// Regular file
    File,
    /// Directory
    Dir,
    /// Symbolic link
    Symlink,
    /// Named pipe (FIFO)
    NamedPipe,
    /// Block or character device
    Device,
    /// Unix domain socket
    Socket,
}

impl EntryKind {
    /// Classify a file type obtained from `symlink_metadata`.
    pub fn from_file_type(ft: fs::FileType) -> Self {
        if ft.is_symlink() {
            return Self::Symlink;
        }
        if ft.is_dir() {
            return Self::Dir;
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::FileTypeExt;
            if ft.is_fifo() {
                return Self::NamedPipe;
            }
            if ft.is_block_device() || ft.is_char_device() {
                return Self::Device;
            }
            if ft.is_socket() {
                return Self::Socket;
            }
        }

        Self::File
    }

    /// Devices and sockets, which are only copied when specials are allowed.
    #[inline]
    pub fn is_special(self) -> bool {
        matches!(self, Self::Device | Self::Socket)
    }
}

/// Immutable snapshot of a filesystem entry.
#[derive(Debug, Clone)]
pub struct Entry {
    path: PathBuf,
    kind: EntryKind,
    metadata: Metadata,
}

impl Entry {
    /// Snapshot `path` without following a trailing symlink.
    pub fn lstat(path: &Path) -> io::Result<Self> {
        let metadata = fs::symlink_metadata(path)?;
        Ok(Self::from_metadata(path.to_path_buf(), metadata))
    }

    /// Build an entry from metadata that was obtained without following symlinks.
    pub fn from_metadata(path: PathBuf, metadata: Metadata) -> Self {
        let kind = EntryKind::from_file_type(metadata.file_type());
        Self {
            path,
            kind,
            metadata,
        }
    }

    /// Path the snapshot was taken of.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Kind of the entry, never following a symlink.
    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    /// Raw metadata from the snapshot.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Device and inode pair identifying the underlying file.
    #[cfg(unix)]
    pub(crate) fn file_id(&self) -> Option<(u64, u64)> {
        use std::os::unix::fs::MetadataExt;
        Some((self.metadata.dev(), self.metadata.ino()))
    }

    #[cfg(not(unix))]
    pub(crate) fn file_id(&self) -> Option<(u64, u64)> {
        None
    }

    #[inline]
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }

    #[inline]
    pub fn is_symlink(&self) -> bool {
        self.kind == EntryKind::Symlink
    }

    /// Size in bytes at the time of the snapshot.
    pub fn len(&self) -> u64 {
        self.metadata.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metadata.len() == 0
    }

    pub fn permissions(&self) -> Permissions {
        self.metadata.permissions()
    }

    pub fn accessed(&self) -> FileTime {
        FileTime::from_last_access_time(&self.metadata)
    }

    pub fn modified(&self) -> FileTime {
        FileTime::from_last_modification_time(&self.metadata)
    }

    /// Status change time, where the platform records one.
    pub fn changed(&self) -> Option<FileTime> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::MetadataExt;
            Some(FileTime::from_unix_time(
                self.metadata.ctime(),
                self.metadata.ctime_nsec() as u32,
            ))
        }
        #[cfg(not(unix))]
        {
            None
        }
    }

    /// File name of the entry, if the path has one.
    pub fn file_name(&self) -> Option<&std::ffi::OsStr> {
        self.path.file_name()
    }
}
