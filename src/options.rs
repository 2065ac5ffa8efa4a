//! Configuration options for copy operations.
//!
//! This module provides [`CopyOptions`], the policy threaded unchanged
//! through every recursive call of a copy, together with the
//! [`SymlinkAction`] and [`DirExistsAction`] selectors.
//!
//! # Example
//!
//! ```
//! use treecopy::{CopyOptions, DirExistsAction, SymlinkAction};
//!
//! let options = CopyOptions::default()
//!     .with_symlink_action(SymlinkAction::Deep)
//!     .with_dir_exists_action(DirExistsAction::Replace)
//!     .with_preserve_times();
//! ```

use crate::entry::Entry;
use crate::error::CallbackError;
use crate::permission::{self, PermissionControl};
use crate::progress::ProgressReporter;
use std::fmt;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

/// What to do with a symlink found in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SymlinkAction {
    /// Recreate the link itself, pointing at the same target string (default).
    #[default]
    Shallow,
    /// Copy whatever the link points to; the destination is a real file or directory.
    Deep,
    /// Leave the link out of the copy.
    Skip,
}

/// What to do when a nested destination directory already exists.
///
/// The top-level destination is never subject to this check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DirExistsAction {
    /// Remove the existing directory tree, then copy.
    Replace,
    /// Leave the existing directory alone and skip this subtree.
    Untouchable,
    /// Copy into the existing directory, keeping entries the source lacks (default).
    #[default]
    Merge,
}

/// Selects a [`SymlinkAction`] for a source symlink path.
pub type SymlinkPolicy = Arc<dyn Fn(&Path) -> SymlinkAction + Send + Sync>;

/// Selects a [`DirExistsAction`] for a (source, destination) directory pair.
pub type DirExistsPolicy = Arc<dyn Fn(&Path, &Path) -> DirExistsAction + Send + Sync>;

/// Decides, for (entry, source, destination), whether to skip the entry.
///
/// Returning `Ok(true)` omits the entry and, for directories, its whole
/// subtree. Returning an error aborts the copy.
pub type SkipPredicate =
    Arc<dyn Fn(&Entry, &Path, &Path) -> Result<bool, CallbackError> + Send + Sync>;

/// Wraps the reader a file's content is streamed through.
///
/// Useful for instrumentation such as byte counting or throttling.
pub trait ReaderWrapper: Send + Sync {
    /// Wrap `reader`, which yields the content of `src`.
    fn wrap<'a>(&self, reader: Box<dyn Read + 'a>, src: &Path) -> Box<dyn Read + 'a>;
}

/// Options for copy operations.
///
/// Use [`Default::default()`] to get the defaults, then customize using the
/// builder methods. Options are never mutated once a copy starts.
///
/// # Default Values
///
/// | Field | Default | Description |
/// |-------|---------|-------------|
/// | `on_symlink` | `None` | Symlinks are copied shallowly |
/// | `on_dir_exists` | `None` | Existing directories are merged into |
/// | `permission_control` | source mode | Copy permissions from the source |
/// | `skip` | `None` | Nothing is skipped |
/// | `preserve_times` | `false` | Copy atime/mtime |
/// | `preserve_owner` | `false` | Copy uid/gid |
/// | `sync` | `false` | fsync each file after writing |
/// | `allow_specials` | `false` | Copy devices and sockets |
/// | `copy_buffer_size` | `0` | Platform default buffering |
/// | `wrap_reader` | `None` | No reader instrumentation |
/// | `file_progress` | `false` | Per-file byte progress |
/// | `dir_progress` | `false` | Directory entry progress |
/// | `max_depth` | `None` | No depth limit |
#[derive(Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct CopyOptions {
    /// Symlink action selector (default: always [`SymlinkAction::Shallow`])
    pub on_symlink: Option<SymlinkPolicy>,

    /// Existing-directory action selector (default: always [`DirExistsAction::Merge`])
    pub on_dir_exists: Option<DirExistsPolicy>,

    /// Decides the final permissions of each file and directory
    pub permission_control: PermissionControl,

    /// Skip predicate evaluated before every entry below the top level
    pub skip: Option<SkipPredicate>,

    /// Whether to preserve access and modification times (default: false)
    pub preserve_times: bool,

    /// Whether to preserve owner and group (default: false)
    ///
    /// Usually requires elevated privileges unless the owner is unchanged.
    pub preserve_owner: bool,

    /// Whether to sync files to disk after writing (default: false)
    pub sync: bool,

    /// Whether to copy devices and sockets (default: false)
    ///
    /// When false they are silently left out. When true they are read like
    /// regular files.
    pub allow_specials: bool,

    /// Buffer size for content copies; 0 uses the platform default
    pub copy_buffer_size: usize,

    /// Reader wrapper applied to every file's content stream
    pub wrap_reader: Option<Arc<dyn ReaderWrapper>>,

    /// Report per-file byte progress (ignored when `wrap_reader` is set)
    pub file_progress: bool,

    /// Report directory entry progress when the source is a directory
    pub dir_progress: bool,

    /// Where progress goes; defaults to terminal bars with the `progress` feature
    pub progress_reporter: Option<Arc<dyn ProgressReporter>>,

    /// Maximum recursion depth (default: None = unlimited)
    ///
    /// Directory levels and deep symlink hops both count. Symlink cycles are
    /// detected without it.
    pub max_depth: Option<usize>,

    /// Callback for warnings (optional)
    ///
    /// If not set and `tracing` feature is enabled, warnings are logged via tracing.
    /// Otherwise, warnings are silently ignored.
    pub warn_handler: Option<fn(&str)>,
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self {
            on_symlink: None,
            on_dir_exists: None,
            permission_control: permission::preserve_permissions(),
            skip: None,
            preserve_times: false,
            preserve_owner: false,
            sync: false,
            allow_specials: false,
            copy_buffer_size: 0,
            wrap_reader: None,
            file_progress: false,
            dir_progress: false,
            progress_reporter: None,
            max_depth: None,
            warn_handler: None,
        }
    }
}

impl fmt::Debug for CopyOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn callback<T: ?Sized>(value: Option<&T>) -> &'static str {
            if value.is_some() { "Some(..)" } else { "None" }
        }

        f.debug_struct("CopyOptions")
            .field("on_symlink", &callback(self.on_symlink.as_deref()))
            .field("on_dir_exists", &callback(self.on_dir_exists.as_deref()))
            .field("skip", &callback(self.skip.as_deref()))
            .field("preserve_times", &self.preserve_times)
            .field("preserve_owner", &self.preserve_owner)
            .field("sync", &self.sync)
            .field("allow_specials", &self.allow_specials)
            .field("copy_buffer_size", &self.copy_buffer_size)
            .field("wrap_reader", &callback(self.wrap_reader.as_deref()))
            .field("file_progress", &self.file_progress)
            .field("dir_progress", &self.dir_progress)
            .field(
                "progress_reporter",
                &callback(self.progress_reporter.as_deref()),
            )
            .field("max_depth", &self.max_depth)
            .finish_non_exhaustive()
    }
}

impl CopyOptions {
    /// Create options with a warning handler
    #[must_use]
    pub fn with_warn_handler(mut self, handler: fn(&str)) -> Self {
        self.warn_handler = Some(handler);
        self
    }

    /// Choose the symlink action per source symlink path
    #[must_use]
    pub fn with_on_symlink<F>(mut self, policy: F) -> Self
    where
        F: Fn(&Path) -> SymlinkAction + Send + Sync + 'static,
    {
        self.on_symlink = Some(Arc::new(policy));
        self
    }

    /// Use the same symlink action for every symlink
    #[must_use]
    pub fn with_symlink_action(self, action: SymlinkAction) -> Self {
        self.with_on_symlink(move |_| action)
    }

    /// Choose the action for existing destination directories
    #[must_use]
    pub fn with_on_dir_exists<F>(mut self, policy: F) -> Self
    where
        F: Fn(&Path, &Path) -> DirExistsAction + Send + Sync + 'static,
    {
        self.on_dir_exists = Some(Arc::new(policy));
        self
    }

    /// Use the same action for every existing destination directory
    #[must_use]
    pub fn with_dir_exists_action(self, action: DirExistsAction) -> Self {
        self.with_on_dir_exists(move |_, _| action)
    }

    /// Set the permission control
    ///
    /// See [`crate::permission`] for the built-in controls.
    #[must_use]
    pub fn with_permission_control(mut self, control: PermissionControl) -> Self {
        self.permission_control = control;
        self
    }

    /// Set the skip predicate
    #[must_use]
    pub fn with_skip<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Entry, &Path, &Path) -> Result<bool, CallbackError> + Send + Sync + 'static,
    {
        self.skip = Some(Arc::new(predicate));
        self
    }

    /// Preserve access and modification times
    #[must_use]
    pub fn with_preserve_times(mut self) -> Self {
        self.preserve_times = true;
        self
    }

    /// Preserve owner and group
    #[must_use]
    pub fn with_preserve_owner(mut self) -> Self {
        self.preserve_owner = true;
        self
    }

    /// Sync each file to stable storage before closing it
    #[must_use]
    pub fn with_sync(mut self) -> Self {
        self.sync = true;
        self
    }

    /// Copy devices and sockets instead of leaving them out
    #[must_use]
    pub fn with_specials(mut self) -> Self {
        self.allow_specials = true;
        self
    }

    /// Set the content copy buffer size (0 = platform default)
    #[must_use]
    pub fn with_copy_buffer_size(mut self, size: usize) -> Self {
        self.copy_buffer_size = size;
        self
    }

    /// Stream every file's content through `wrapper`
    #[must_use]
    pub fn with_wrap_reader(mut self, wrapper: Arc<dyn ReaderWrapper>) -> Self {
        self.wrap_reader = Some(wrapper);
        self
    }

    /// Report per-file byte progress
    #[must_use]
    pub fn with_file_progress(mut self) -> Self {
        self.file_progress = true;
        self
    }

    /// Report directory entry progress
    #[must_use]
    pub fn with_dir_progress(mut self) -> Self {
        self.dir_progress = true;
        self
    }

    /// Send progress to `reporter`
    #[must_use]
    pub fn with_progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Set maximum recursion depth
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub(crate) fn symlink_action(&self, src: &Path) -> SymlinkAction {
        match &self.on_symlink {
            Some(policy) => policy(src),
            None => SymlinkAction::Shallow,
        }
    }

    pub(crate) fn dir_exists_action(&self, src: &Path, dst: &Path) -> DirExistsAction {
        match &self.on_dir_exists {
            Some(policy) => policy(src, dst),
            None => DirExistsAction::Merge,
        }
    }

    /// Reporter to use when either progress flag is set.
    pub(crate) fn reporter(&self) -> Option<Arc<dyn ProgressReporter>> {
        if let Some(reporter) = &self.progress_reporter {
            return Some(reporter.clone());
        }

        #[cfg(feature = "progress")]
        {
            Some(Arc::new(crate::progress::BarReporter::new()))
        }
        #[cfg(not(feature = "progress"))]
        {
            None
        }
    }

    pub(crate) fn warn(&self, msg: &str) {
        if let Some(handler) = self.warn_handler {
            handler(msg);
        } else {
            #[cfg(feature = "tracing")]
            tracing::warn!("{}", msg);
        }
    }

    pub(crate) fn verbose(&self, msg: &str) {
        #[cfg(feature = "tracing")]
        tracing::debug!("{}", msg);
        #[cfg(not(feature = "tracing"))]
        let _ = msg;
    }
}
