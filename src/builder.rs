//! Builder API for ergonomic copying operations.
//!
//! The builder pattern provides a fluent interface for configuring and executing
//! copy operations. This is often more convenient than manually constructing
//! [`CopyOptions`].
//!
//! # Examples
//!
//! ## Basic Usage
//!
//! ```no_run
//! use treecopy::CopyBuilder;
//!
//! // Simple copy with defaults
//! CopyBuilder::new("src", "dst").run()?;
//! # Ok::<(), treecopy::Error>(())
//! ```
//!
//! ## Archive-style Copy
//!
//! ```no_run
//! use treecopy::CopyBuilder;
//!
//! CopyBuilder::new("src", "dst")
//!     .preserve_times()
//!     .preserve_owner()
//!     .sync()
//!     .run()?;
//! # Ok::<(), treecopy::Error>(())
//! ```
//!
//! ## Filtering
//!
//! ```no_run
//! use treecopy::CopyBuilder;
//!
//! CopyBuilder::new("project", "backup")
//!     .skip(|_entry, src, _dst| Ok(src.ends_with("target")))
//!     .run()?;
//! # Ok::<(), treecopy::Error>(())
//! ```

use crate::copy::copy;
use crate::entry::Entry;
use crate::error::{CallbackError, Result};
use crate::options::{CopyOptions, DirExistsAction, ReaderWrapper, SymlinkAction};
use crate::permission::{self, PermissionControl};
use crate::progress::ProgressReporter;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A builder for configuring and executing copy operations.
///
/// `CopyBuilder` provides a fluent interface over [`CopyOptions`]. Whatever
/// the source is (file, directory, symlink, or pipe), [`run`](Self::run)
/// hands it to [`copy`](crate::copy).
///
/// # Example
///
/// ```no_run
/// use treecopy::{CopyBuilder, DirExistsAction};
///
/// CopyBuilder::new("/data/project", "/backup/project")
///     .dir_exists(DirExistsAction::Replace)
///     .preserve_times()
///     .run()?;
/// # Ok::<(), treecopy::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct CopyBuilder {
    src: PathBuf,
    dst: PathBuf,
    options: CopyOptions,
}

impl CopyBuilder {
    /// Create a new `CopyBuilder` with the given source and destination paths.
    ///
    /// Uses default options: shallow symlinks, merge into existing
    /// directories, source permissions, no timestamps or ownership.
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(src: P, dst: Q) -> Self {
        Self {
            src: src.as_ref().to_path_buf(),
            dst: dst.as_ref().to_path_buf(),
            options: CopyOptions::default(),
        }
    }

    /// Preserve access and modification times.
    #[must_use]
    pub fn preserve_times(mut self) -> Self {
        self.options = self.options.with_preserve_times();
        self
    }

    /// Preserve owner and group. Usually requires elevated privileges.
    #[must_use]
    pub fn preserve_owner(mut self) -> Self {
        self.options = self.options.with_preserve_owner();
        self
    }

    /// Sync each file to stable storage before closing it.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use treecopy::CopyBuilder;
    ///
    /// CopyBuilder::new("db", "/mnt/backup/db")
    ///     .sync()
    ///     .run()?;
    /// # Ok::<(), treecopy::Error>(())
    /// ```
    #[must_use]
    pub fn sync(mut self) -> Self {
        self.options = self.options.with_sync();
        self
    }

    /// Copy device files and sockets by reading their content.
    #[must_use]
    pub fn specials(mut self) -> Self {
        self.options = self.options.with_specials();
        self
    }

    /// Set the content copy buffer size in bytes (0 = platform default).
    #[must_use]
    pub fn buffer_size(mut self, size: usize) -> Self {
        self.options = self.options.with_copy_buffer_size(size);
        self
    }

    /// Use the same action for every symlink.
    #[must_use]
    pub fn symlinks(mut self, action: SymlinkAction) -> Self {
        self.options = self.options.with_symlink_action(action);
        self
    }

    /// Follow every symlink and copy what it points to.
    ///
    /// Shorthand for `.symlinks(SymlinkAction::Deep)`. A link leading back
    /// into a directory that is still being copied fails the copy with
    /// [`Error::SymlinkCycle`](crate::Error::SymlinkCycle).
    #[must_use]
    pub fn deep_symlinks(self) -> Self {
        self.symlinks(SymlinkAction::Deep)
    }

    /// Choose the symlink action per source symlink path.
    #[must_use]
    pub fn on_symlink<F>(mut self, policy: F) -> Self
    where
        F: Fn(&Path) -> SymlinkAction + Send + Sync + 'static,
    {
        self.options = self.options.with_on_symlink(policy);
        self
    }

    /// Use the same action for every existing nested destination directory.
    #[must_use]
    pub fn dir_exists(mut self, action: DirExistsAction) -> Self {
        self.options = self.options.with_dir_exists_action(action);
        self
    }

    /// Choose the action per existing nested destination directory.
    #[must_use]
    pub fn on_dir_exists<F>(mut self, policy: F) -> Self
    where
        F: Fn(&Path, &Path) -> DirExistsAction + Send + Sync + 'static,
    {
        self.options = self.options.with_on_dir_exists(policy);
        self
    }

    /// Skip entries for which `predicate` returns `Ok(true)`.
    ///
    /// The top-level source is never offered to the predicate.
    #[must_use]
    pub fn skip<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Entry, &Path, &Path) -> std::result::Result<bool, CallbackError>
            + Send
            + Sync
            + 'static,
    {
        self.options = self.options.with_skip(predicate);
        self
    }

    /// Set the permission control.
    #[must_use]
    pub fn permission_control(mut self, control: PermissionControl) -> Self {
        self.options = self.options.with_permission_control(control);
        self
    }

    /// Give every copy the source permissions plus `bits`.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use treecopy::CopyBuilder;
    ///
    /// // Make the copy group-writable
    /// CopyBuilder::new("shared", "/srv/shared")
    ///     .add_permission(0o020)
    ///     .run()?;
    /// # Ok::<(), treecopy::Error>(())
    /// ```
    #[must_use]
    pub fn add_permission(self, bits: u32) -> Self {
        self.permission_control(permission::add_permission(bits))
    }

    /// Stream every file's content through `wrapper`.
    #[must_use]
    pub fn wrap_reader(mut self, wrapper: Arc<dyn ReaderWrapper>) -> Self {
        self.options = self.options.with_wrap_reader(wrapper);
        self
    }

    /// Report per-file byte progress.
    #[must_use]
    pub fn file_progress(mut self) -> Self {
        self.options = self.options.with_file_progress();
        self
    }

    /// Report directory entry progress.
    #[must_use]
    pub fn dir_progress(mut self) -> Self {
        self.options = self.options.with_dir_progress();
        self
    }

    /// Send progress to `reporter` instead of the default.
    #[must_use]
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.options = self.options.with_progress_reporter(reporter);
        self
    }

    /// Limit the recursion depth.
    ///
    /// The top-level source is depth 0 and each directory level or
    /// followed symlink adds one. Exceeding the limit fails with
    /// [`Error::MaxDepthExceeded`](crate::Error::MaxDepthExceeded).
    #[must_use]
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.options = self.options.with_max_depth(depth);
        self
    }

    /// Set a warning handler for non-fatal issues.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use treecopy::CopyBuilder;
    ///
    /// CopyBuilder::new("src", "dst")
    ///     .on_warning(|msg| eprintln!("Warning: {}", msg))
    ///     .run()?;
    /// # Ok::<(), treecopy::Error>(())
    /// ```
    #[must_use]
    pub fn on_warning(mut self, handler: fn(&str)) -> Self {
        self.options = self.options.with_warn_handler(handler);
        self
    }

    /// Get a reference to the current options.
    pub fn options(&self) -> &CopyOptions {
        &self.options
    }

    /// Execute the copy operation.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered; see [`Error`](crate::Error).
    /// Entries copied before the failure are left in place.
    pub fn run(self) -> Result<()> {
        copy(&self.src, &self.dst, &self.options)
    }
}
