//! Symlink copy operations.

use crate::entry::Entry;
use crate::error::{Attribute, Error, Result};
use crate::options::SymlinkAction;
use std::fs;
use std::path::{Path, PathBuf};

use super::Walk;
use super::utils::{preserve_link_times, symlink};

impl Walk<'_> {
    pub(crate) fn copy_symlink(
        &self,
        src: &Path,
        dst: &Path,
        entry: &Entry,
        depth: usize,
    ) -> Result<()> {
        match self.options.symlink_action(src) {
            SymlinkAction::Shallow => {
                let target = fs::read_link(src).map_err(|e| Error::source_access(src, e))?;
                symlink(&target, dst).map_err(|e| Error::create(dst, e))?;
                self.options.verbose(&format!(
                    "linked {} -> {}",
                    dst.display(),
                    target.display()
                ));
                if self.options.preserve_times {
                    preserve_link_times(entry, dst)
                        .map_err(|e| Error::attribute(Attribute::Times, dst, e))?;
                }
                Ok(())
            }
            SymlinkAction::Deep => {
                if is_link_loop(src) {
                    return Err(Error::SymlinkCycle {
                        path: src.to_path_buf(),
                    });
                }
                let target = fs::read_link(src).map_err(|e| Error::source_access(src, e))?;
                let target = resolve_target(src, &target);
                let target_entry =
                    Entry::lstat(&target).map_err(|e| Error::source_access(&target, e))?;
                self.options.verbose(&format!(
                    "dereferencing {} -> {}",
                    src.display(),
                    target.display()
                ));
                // Dereferenced content does not count towards directory progress
                self.copy_next_or_skip(&target, dst, &target_entry, None, depth + 1)
            }
            SymlinkAction::Skip => {
                self.options
                    .verbose(&format!("not copying symlink {}", src.display()));
                Ok(())
            }
        }
    }
}

/// Whether following `link` ends in a loop of symlinks (`ELOOP`).
#[cfg(unix)]
fn is_link_loop(link: &Path) -> bool {
    matches!(fs::metadata(link), Err(e) if e.raw_os_error() == Some(libc::ELOOP))
}

#[cfg(not(unix))]
fn is_link_loop(_link: &Path) -> bool {
    false
}

/// Resolve a link target relative to the directory containing the link.
fn resolve_target(link: &Path, target: &Path) -> PathBuf {
    if target.is_absolute() {
        return target.to_path_buf();
    }
    match link.parent() {
        Some(parent) => parent.join(target),
        None => target.to_path_buf(),
    }
}

// =============================================================================
// Tests
// =============================================================================
