//! Core copy operations.
//!
//! [`copy`] stats the source once, then hands it to the classifier, which
//! routes every entry to exactly one handler: symlinks, directories, named
//! pipes, or regular files. Directories recurse back into the classifier for
//! each child, depth first and strictly in sequence.

mod dir;
mod file;
mod symlink;
pub(crate) mod utils;

use crate::entry::{Entry, EntryKind};
use crate::error::{Callback, Error, Result};
use crate::options::CopyOptions;
use crate::progress::{Progress, ProgressReporter};
use std::cell::RefCell;
use std::path::Path;
use std::sync::Arc;

/// Copy `src` to `dst`, whatever kind of entry `src` is.
///
/// Files, directory trees, symlinks, and named pipes are all handled; see
/// [`CopyOptions`] for what can be tuned. The source is examined without
/// following a trailing symlink, so a symlink source is subject to the
/// symlink policy like any other link.
///
/// The top-level entry is never offered to the skip predicate, and the
/// top-level destination is never subject to the existing-directory policy:
/// the caller chose to copy exactly there.
///
/// # Errors
///
/// The first error anywhere in the tree aborts the copy and is returned
/// unchanged. Entries copied before the failure stay on disk.
///
/// Copying an entry onto itself fails with [`Error::SameFile`] before
/// anything is written. Following a symlink back into a directory that is
/// still being copied fails with [`Error::SymlinkCycle`].
///
/// # Example
///
/// ```no_run
/// use treecopy::{copy, CopyOptions};
/// use std::path::Path;
///
/// copy(Path::new("project"), Path::new("backup"), &CopyOptions::default())?;
/// # Ok::<(), treecopy::Error>(())
/// ```
pub fn copy(src: &Path, dst: &Path, options: &CopyOptions) -> Result<()> {
    let entry = Entry::lstat(src).map_err(|e| Error::source_access(src, e))?;
    if utils::same_file(src, dst) {
        return Err(Error::SameFile {
            path: dst.to_path_buf(),
        });
    }

    let reporter = if options.file_progress || options.dir_progress {
        options.reporter()
    } else {
        None
    };
    let walk = Walk {
        options,
        root_dst: dst,
        base: src.parent().unwrap_or(Path::new("")),
        reporter,
        open_dirs: RefCell::new(Vec::new()),
    };

    let root_label = format!(
        "Dir: {}",
        src.file_name().unwrap_or(src.as_os_str()).to_string_lossy()
    );
    let dir_progress = match &walk.reporter {
        Some(reporter) if options.dir_progress && entry.is_dir() => {
            Some(reporter.directory(&root_label))
        }
        _ => None,
    };

    options.verbose(&format!("copy {} -> {}", src.display(), dst.display()));
    let result = walk.dispatch(src, dst, &entry, dir_progress.as_deref(), 0);

    if let Some(progress) = dir_progress {
        progress.describe(&root_label);
        progress.advance(1);
        progress.finish();
    }

    result
}

/// State shared by every call of one copy operation.
pub(crate) struct Walk<'a> {
    pub(crate) options: &'a CopyOptions,
    /// Destination of the top-level call
    pub(crate) root_dst: &'a Path,
    /// Parent of the top-level source, for progress labels
    pub(crate) base: &'a Path,
    pub(crate) reporter: Option<Arc<dyn ProgressReporter>>,
    /// Identities of the source directories on the current recursion path
    pub(crate) open_dirs: RefCell<Vec<(u64, u64)>>,
}

impl Walk<'_> {
    /// Offer the entry to the skip predicate, then dispatch it.
    pub(crate) fn copy_next_or_skip(
        &self,
        src: &Path,
        dst: &Path,
        entry: &Entry,
        progress: Option<&dyn Progress>,
        depth: usize,
    ) -> Result<()> {
        if let Some(skip) = &self.options.skip {
            let skipped =
                skip(entry, src, dst).map_err(|e| Error::callback(Callback::Skip, src, e))?;
            if skipped {
                self.options.verbose(&format!("skipped {}", src.display()));
                return Ok(());
            }
        }
        self.dispatch(src, dst, entry, progress, depth)
    }

    /// Route the entry to the handler for its kind.
    pub(crate) fn dispatch(
        &self,
        src: &Path,
        dst: &Path,
        entry: &Entry,
        progress: Option<&dyn Progress>,
        depth: usize,
    ) -> Result<()> {
        if let Some(max_depth) = self.options.max_depth {
            if depth > max_depth {
                return Err(Error::MaxDepthExceeded {
                    path: src.to_path_buf(),
                    max_depth,
                });
            }
        }

        match entry.kind() {
            kind if kind.is_special() && !self.options.allow_specials => {
                self.options
                    .verbose(&format!("ignoring special file {}", src.display()));
                Ok(())
            }
            EntryKind::Symlink => self.copy_symlink(src, dst, entry, depth),
            EntryKind::Dir => self.copy_dir(src, dst, entry, progress, depth),
            EntryKind::NamedPipe => self.copy_pipe(dst, entry),
            EntryKind::File | EntryKind::Device | EntryKind::Socket => {
                self.copy_file(src, dst, entry)
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
