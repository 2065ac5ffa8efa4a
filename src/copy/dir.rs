//! Directory copy operations.
//!
//! A directory is copied in three steps: resolve any conflict with an
//! existing destination, copy every child through the classifier, then
//! finalize the directory's own attributes. The destination is created
//! fully open and only gets its final mode once the children are written.

use crate::entry::Entry;
use crate::error::{Attribute, Callback, Error, Result};
use crate::options::DirExistsAction;
use crate::progress::Progress;
use std::fs::{self, Metadata};
use std::io;
use std::path::Path;

use super::Walk;
use super::utils::{create_dir_open, preserve_owner, preserve_times};

/// Whether a directory copy should go ahead after conflict resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resolution {
    Proceed,
    LeaveUntouched,
}

impl Walk<'_> {
    pub(crate) fn copy_dir(
        &self,
        src: &Path,
        dst: &Path,
        entry: &Entry,
        progress: Option<&dyn Progress>,
        depth: usize,
    ) -> Result<()> {
        let Some(id) = entry.file_id() else {
            return self.copy_dir_contents(src, dst, entry, progress, depth);
        };
        if self.open_dirs.borrow().contains(&id) {
            return Err(Error::SymlinkCycle {
                path: src.to_path_buf(),
            });
        }

        self.open_dirs.borrow_mut().push(id);
        let result = self.copy_dir_contents(src, dst, entry, progress, depth);
        self.open_dirs.borrow_mut().pop();
        result
    }

    fn copy_dir_contents(
        &self,
        src: &Path,
        dst: &Path,
        entry: &Entry,
        progress: Option<&dyn Progress>,
        depth: usize,
    ) -> Result<()> {
        if self.resolve_existing(src, dst)? == Resolution::LeaveUntouched {
            return Ok(());
        }

        let decision = (self.options.permission_control)(entry, dst)
            .map_err(|e| Error::callback(Callback::PermissionControl, src, e))?;
        create_dir_open(dst).map_err(|e| Error::create(dst, e))?;

        let result = self
            .copy_children(src, dst, progress, depth)
            .and_then(|()| self.finalize(entry, dst));

        // Applied on every exit path, but the first error wins
        let applied = decision
            .apply(dst)
            .map_err(|e| Error::attribute(Attribute::Permissions, dst, e));
        result?;
        applied
    }

    /// Consult the existing-directory policy for a nested destination.
    fn resolve_existing(&self, src: &Path, dst: &Path) -> Result<Resolution> {
        match fs::metadata(dst) {
            Ok(_) if self.options.on_dir_exists.is_some() && dst != self.root_dst => {
                match self.options.dir_exists_action(src, dst) {
                    DirExistsAction::Replace => {
                        self.options
                            .verbose(&format!("replacing existing {}", dst.display()));
                        let meta = fs::symlink_metadata(dst).map_err(|e| {
                            Error::ConflictProbe {
                                path: dst.to_path_buf(),
                                source: e,
                            }
                        })?;
                        remove_existing(dst, &meta).map_err(|e| Error::RemoveDestination {
                            path: dst.to_path_buf(),
                            source: e,
                        })?;
                        Ok(Resolution::Proceed)
                    }
                    DirExistsAction::Untouchable => {
                        self.options
                            .verbose(&format!("leaving existing {} untouched", dst.display()));
                        Ok(Resolution::LeaveUntouched)
                    }
                    DirExistsAction::Merge => Ok(Resolution::Proceed),
                }
            }
            Ok(_) => Ok(Resolution::Proceed),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Resolution::Proceed),
            Err(e) => Err(Error::ConflictProbe {
                path: dst.to_path_buf(),
                source: e,
            }),
        }
    }

    fn copy_children(
        &self,
        src: &Path,
        dst: &Path,
        progress: Option<&dyn Progress>,
        depth: usize,
    ) -> Result<()> {
        let children = list_dir(src)?;

        if let Some(progress) = progress {
            progress.grow(children.len() as u64);
            if let Ok(rel) = src.strip_prefix(self.base) {
                progress.describe(&format!("Dir: {}", rel.display()));
            }
        }

        for child in &children {
            let Some(name) = child.file_name() else {
                continue;
            };
            let child_dst = dst.join(name);
            self.copy_next_or_skip(child.path(), &child_dst, child, progress, depth + 1)?;
            if let Some(progress) = progress {
                progress.advance(1);
            }
        }

        Ok(())
    }

    /// Restore times, then ownership, once the children no longer touch `dst`.
    fn finalize(&self, entry: &Entry, dst: &Path) -> Result<()> {
        if self.options.preserve_times {
            preserve_times(entry, dst).map_err(|e| Error::attribute(Attribute::Times, dst, e))?;
        }
        if self.options.preserve_owner {
            preserve_owner(entry, dst).map_err(|e| Error::attribute(Attribute::Owner, dst, e))?;
        }
        Ok(())
    }
}

/// Snapshot a directory's children, sorted by name.
fn list_dir(src: &Path) -> Result<Vec<Entry>> {
    let mut children = Vec::new();
    for dirent in fs::read_dir(src).map_err(|e| Error::source_access(src, e))? {
        let dirent = dirent.map_err(|e| Error::source_access(src, e))?;
        let path = dirent.path();
        // DirEntry::metadata does not follow symlinks
        let metadata = dirent
            .metadata()
            .map_err(|e| Error::source_access(&path, e))?;
        children.push(Entry::from_metadata(path, metadata));
    }
    children.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(children)
}

/// Remove an existing file, symlink, or directory at the given path
fn remove_existing(path: &Path, meta: &Metadata) -> io::Result<()> {
    if meta.file_type().is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}

// =============================================================================
// Tests
// =============================================================================
