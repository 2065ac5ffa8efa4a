//! Single file and named pipe copy operations.
//!
//! File content is streamed into a freshly truncated destination, optionally
//! through a caller-supplied reader wrapper or a byte progress tracker.
//! Both handles are closed on every path; a close error only surfaces when
//! nothing failed before it.

use crate::entry::Entry;
use crate::error::{Attribute, Callback, Error, Result};
use crate::permission::PermissionDecision;
use crate::progress::{Progress, ProgressReader};
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::Path;

use super::Walk;
use super::utils::{close_file, create_parent, make_fifo, preserve_owner, preserve_times};

impl Walk<'_> {
    pub(crate) fn copy_file(&self, src: &Path, dst: &Path, entry: &Entry) -> Result<()> {
        create_parent(dst).map_err(|e| Error::create(dst, e))?;

        let decision = (self.options.permission_control)(entry, dst)
            .map_err(|e| Error::callback(Callback::PermissionControl, src, e))?;

        let dst_file = File::create(dst).map_err(|e| Error::create(dst, e))?;
        let filled = self.fill(src, dst, &dst_file, &decision);
        let closed = close_file(dst_file).map_err(|e| Error::transfer(dst, e));
        filled?;
        closed?;

        if self.options.preserve_owner {
            preserve_owner(entry, dst).map_err(|e| Error::attribute(Attribute::Owner, dst, e))?;
        }
        if self.options.preserve_times {
            preserve_times(entry, dst).map_err(|e| Error::attribute(Attribute::Times, dst, e))?;
        }

        Ok(())
    }

    /// Apply permissions, stream the content, and sync if asked.
    fn fill(
        &self,
        src: &Path,
        dst: &Path,
        dst_file: &File,
        decision: &PermissionDecision,
    ) -> Result<()> {
        // A file's own mode never blocks writes through an open handle
        decision
            .apply(dst)
            .map_err(|e| Error::attribute(Attribute::Permissions, dst, e))?;

        let mut src_file = File::open(src).map_err(|e| Error::source_access(src, e))?;
        let streamed = self.stream(src, &mut src_file, dst_file);
        let closed = close_file(src_file).map_err(|e| Error::source_access(src, e));
        let bytes = streamed.map_err(|e| Error::transfer(dst, e))?;
        closed?;

        if self.options.sync {
            dst_file.sync_all().map_err(|e| Error::transfer(dst, e))?;
        }

        self.options.verbose(&format!(
            "copied {} -> {} ({} bytes)",
            src.display(),
            dst.display(),
            bytes
        ));
        Ok(())
    }

    fn stream(&self, src: &Path, src_file: &mut File, mut dst_file: &File) -> io::Result<u64> {
        let buf_size = self.options.copy_buffer_size;

        if let Some(wrapper) = &self.options.wrap_reader {
            let mut reader = wrapper.wrap(Box::new(&mut *src_file), src);
            return copy_content(&mut reader, &mut dst_file, buf_size);
        }

        match self.file_progress(src, src_file) {
            Some(progress) => {
                let mut reader = ProgressReader::new(&mut *src_file, progress);
                copy_content(&mut reader, &mut dst_file, buf_size)
            }
            None => copy_content(src_file, &mut dst_file, buf_size),
        }
    }

    /// Byte tracker for one file; any failure just means no progress is shown.
    fn file_progress(&self, src: &Path, src_file: &File) -> Option<Box<dyn Progress>> {
        if !self.options.file_progress {
            return None;
        }
        let reporter = self.reporter.as_ref()?;

        match src_file.metadata() {
            Ok(meta) => {
                let name = src.file_name().unwrap_or(src.as_os_str());
                Some(reporter.file(meta.len(), &format!("File: {}", name.to_string_lossy())))
            }
            Err(e) => {
                self.options.warn(&format!(
                    "Cannot size {} for progress: {}",
                    src.display(),
                    e
                ));
                None
            }
        }
    }

    /// Create a named pipe matching the source's permission bits.
    pub(crate) fn copy_pipe(&self, dst: &Path, entry: &Entry) -> Result<()> {
        create_parent(dst).map_err(|e| Error::create(dst, e))?;

        #[cfg(unix)]
        let mode = {
            use std::os::unix::fs::PermissionsExt;
            entry.permissions().mode()
        };
        #[cfg(not(unix))]
        let mode = 0;

        make_fifo(dst, mode).map_err(|e| Error::create(dst, e))?;
        // mkfifo is subject to the umask
        fs::set_permissions(dst, entry.permissions())
            .map_err(|e| Error::attribute(Attribute::Permissions, dst, e))
    }
}

/// Copy everything from `reader` to `writer`.
///
/// A `buf_size` of 0 leaves buffering to `io::copy`, which lets the
/// platform pick (and use `copy_file_range` for file-to-file copies on
/// Linux).
fn copy_content<R, W>(reader: &mut R, writer: &mut W, buf_size: usize) -> io::Result<u64>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    if buf_size == 0 {
        return io::copy(reader, writer);
    }

    let mut buf = vec![0u8; buf_size];
    let mut total: u64 = 0;
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        writer.write_all(&buf[..n])?;
        total += n as u64;
    }
    Ok(total)
}

// =============================================================================
// Tests
// =============================================================================
