//! Error types for treecopy.
//!
//! This module provides the [`Error`] enum containing all possible errors
//! that can occur during a copy, and the [`Result`] type alias.
//!
//! # Error Categories
//!
//! | Category | Errors |
//! |----------|--------|
//! | Source access | [`Error::SourceAccess`] |
//! | Destination creation | [`Error::CreateDestination`], [`Error::RemoveDestination`], [`Error::SameFile`] |
//! | Content transfer | [`Error::Transfer`] |
//! | Attribute application | [`Error::Attribute`] |
//! | Policy callbacks | [`Error::Callback`] |
//! | Conflict probe | [`Error::ConflictProbe`] |
//! | Safety | [`Error::MaxDepthExceeded`], [`Error::SymlinkCycle`] |
//!
//! The first error raised anywhere in the traversal aborts the whole copy.
//! Nothing is rolled back, so the destination may be partially written.

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for treecopy operations.
///
/// This is a type alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type returned by caller-supplied callbacks.
pub type CallbackError = Box<dyn std::error::Error + Send + Sync>;

/// Whether an IO error means the destination filesystem is full.
///
/// Matches [`io::ErrorKind::StorageFull`] as well as the raw `ENOSPC`
/// (Unix) and `ERROR_DISK_FULL` (Windows) codes.
///
/// # Example
///
/// ```no_run
/// use std::io;
/// use treecopy::is_no_space_error;
///
/// let error = io::Error::new(io::ErrorKind::StorageFull, "disk full");
/// assert!(is_no_space_error(&error));
/// ```
pub fn is_no_space_error(error: &io::Error) -> bool {
    #[cfg(windows)]
    const NO_SPACE: Option<i32> = Some(112);
    #[cfg(unix)]
    const NO_SPACE: Option<i32> = Some(libc::ENOSPC);
    #[cfg(not(any(unix, windows)))]
    const NO_SPACE: Option<i32> = None;

    error.kind() == io::ErrorKind::StorageFull
        || matches!(
            (error.raw_os_error(), NO_SPACE),
            (Some(raw), Some(code)) if raw == code
        )
}

/// Attribute that failed to apply to a destination entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    /// Permission bits (chmod)
    Permissions,
    /// Owner and group (chown)
    Owner,
    /// Access and modification times
    Times,
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Permissions => "permissions",
            Self::Owner => "ownership",
            Self::Times => "timestamps",
        })
    }
}

/// Caller-supplied callback that reported a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Callback {
    /// The skip predicate
    Skip,
    /// The permission control function
    PermissionControl,
}

impl fmt::Display for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Skip => "skip",
            Self::PermissionControl => "permission control",
        })
    }
}

/// Stable, machine-readable classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    SourceAccess,
    DestinationCreate,
    Transfer,
    Attribute,
    Callback,
    ConflictProbe,
    DepthLimit,
    SymlinkCycle,
}

impl ErrorCategory {
    /// Returns the snake_case label for this category.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SourceAccess => "source_access",
            Self::DestinationCreate => "destination_create",
            Self::Transfer => "transfer",
            Self::Attribute => "attribute",
            Self::Callback => "callback",
            Self::ConflictProbe => "conflict_probe",
            Self::DepthLimit => "depth_limit",
            Self::SymlinkCycle => "symlink_cycle",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur during copy operations.
///
/// All errors include the path being processed when the failure occurred.
/// Use [`Error::category`] for a coarse classification and
/// [`std::error::Error::source`] for the underlying cause.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Source could not be stat'ed, opened, read as a directory, or resolved
    #[error("Cannot access source {path}: {source}")]
    SourceAccess {
        /// Source path
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// Destination directory, file, symlink, or pipe could not be created
    #[error("Cannot create destination {path}: {source}")]
    CreateDestination {
        /// Destination path
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// An existing destination directory could not be removed for replacement
    #[error("Cannot remove existing destination {path}: {source}")]
    RemoveDestination {
        /// Destination path
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// Reading, writing, syncing, or closing file content failed
    #[error("Failed to transfer content to {path}: {source}")]
    Transfer {
        /// Destination path
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// Permissions, ownership, or timestamps could not be applied
    #[error("Failed to apply {attribute} to {path}: {source}")]
    Attribute {
        /// Which attribute failed
        attribute: Attribute,
        /// Destination path
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// A caller-supplied policy callback returned an error
    #[error("The {callback} callback failed for {path}: {source}")]
    Callback {
        /// Which callback failed
        callback: Callback,
        /// Source path the callback was invoked for
        path: PathBuf,
        /// Error returned by the callback
        source: CallbackError,
    },

    /// Probing an existing destination failed with something other than "not found"
    #[error("Cannot probe existing destination {path}: {source}")]
    ConflictProbe {
        /// Destination path
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// Maximum recursion depth exceeded
    #[error("Maximum depth {max_depth} exceeded at: {path}")]
    MaxDepthExceeded {
        /// The path where max depth was exceeded
        path: PathBuf,
        /// The configured maximum depth
        max_depth: usize,
    },

    /// A followed symlink leads back into a directory that is still being copied,
    /// or a symlink chain never reaches a non-link
    #[error("Symlink cycle at: {path}")]
    SymlinkCycle {
        /// Source path where the cycle closed
        path: PathBuf,
    },

    /// Source and destination are the same file, so copying would destroy it
    #[error("Source and destination are the same file: {path}")]
    SameFile {
        /// Destination path
        path: PathBuf,
    },
}

impl Error {
    /// Classify this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::SourceAccess { .. } => ErrorCategory::SourceAccess,
            Self::CreateDestination { .. }
            | Self::RemoveDestination { .. }
            | Self::SameFile { .. } => {
                ErrorCategory::DestinationCreate
            }
            Self::Transfer { .. } => ErrorCategory::Transfer,
            Self::Attribute { .. } => ErrorCategory::Attribute,
            Self::Callback { .. } => ErrorCategory::Callback,
            Self::ConflictProbe { .. } => ErrorCategory::ConflictProbe,
            Self::MaxDepthExceeded { .. } => ErrorCategory::DepthLimit,
            Self::SymlinkCycle { .. } => ErrorCategory::SymlinkCycle,
        }
    }

    /// The path that was being processed when the error occurred.
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::SourceAccess { path, .. }
            | Self::CreateDestination { path, .. }
            | Self::RemoveDestination { path, .. }
            | Self::Transfer { path, .. }
            | Self::Attribute { path, .. }
            | Self::Callback { path, .. }
            | Self::ConflictProbe { path, .. }
            | Self::MaxDepthExceeded { path, .. }
            | Self::SymlinkCycle { path }
            | Self::SameFile { path } => path,
        }
    }

    /// The underlying IO error, if this error wraps one.
    pub fn io_error(&self) -> Option<&io::Error> {
        match self {
            Self::SourceAccess { source, .. }
            | Self::CreateDestination { source, .. }
            | Self::RemoveDestination { source, .. }
            | Self::Transfer { source, .. }
            | Self::Attribute { source, .. }
            | Self::ConflictProbe { source, .. } => Some(source),
            Self::Callback { .. }
            | Self::MaxDepthExceeded { .. }
            | Self::SymlinkCycle { .. }
            | Self::SameFile { .. } => None,
        }
    }

    /// Whether this error was caused by the destination running out of space.
    pub fn is_no_space(&self) -> bool {
        self.io_error().is_some_and(is_no_space_error)
    }

    pub(crate) fn source_access(path: &std::path::Path, source: io::Error) -> Self {
        Self::SourceAccess {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn create(path: &std::path::Path, source: io::Error) -> Self {
        Self::CreateDestination {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn transfer(path: &std::path::Path, source: io::Error) -> Self {
        Self::Transfer {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn attribute(
        attribute: Attribute,
        path: &std::path::Path,
        source: io::Error,
    ) -> Self {
        Self::Attribute {
            attribute,
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn callback(
        callback: Callback,
        path: &std::path::Path,
        source: CallbackError,
    ) -> Self {
        Self::Callback {
            callback,
            path: path.to_path_buf(),
            source,
        }
    }
}
