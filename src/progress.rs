//! Progress reporting.
//!
//! Progress is purely observational: nothing reported here can change what
//! gets copied or whether the copy fails. The copier talks to a
//! [`ProgressReporter`], which hands out one [`Progress`] tracker for the
//! top-level directory and one per file.
//!
//! With the `progress` feature, [`BarReporter`] renders trackers as
//! `indicatif` progress bars.

use std::io::{self, Read};

/// A single progress tracker.
pub trait Progress {
    /// Increase the expected total by `n`.
    fn grow(&self, n: u64);
    /// Mark `n` more units as done.
    fn advance(&self, n: u64);
    /// Replace the tracker's label.
    fn describe(&self, label: &str);
    /// The tracked work is over.
    fn finish(&self);
}

/// Factory for progress trackers.
pub trait ProgressReporter: Send + Sync {
    /// Tracker counting directory entries, starting with a total of 1.
    fn directory(&self, label: &str) -> Box<dyn Progress>;
    /// Tracker counting the bytes of one file of `len` bytes.
    fn file(&self, len: u64, label: &str) -> Box<dyn Progress>;
}

/// Reader that advances a [`Progress`] by every byte it reads.
///
/// The tracker is finished when the reader is dropped.
pub struct ProgressReader<R> {
    inner: R,
    progress: Box<dyn Progress>,
}

impl<R: Read> ProgressReader<R> {
    pub fn new(inner: R, progress: Box<dyn Progress>) -> Self {
        Self { inner, progress }
    }
}

impl<R: Read> Read for ProgressReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.progress.advance(n as u64);
        Ok(n)
    }
}

impl<R> Drop for ProgressReader<R> {
    fn drop(&mut self) {
        self.progress.finish();
    }
}

#[cfg(feature = "progress")]
pub use bar::{BarReporter, create_progress_bar};

#[cfg(feature = "progress")]
mod bar {
    use super::{Progress, ProgressReporter};
    use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

    impl Progress for ProgressBar {
        fn grow(&self, n: u64) {
            self.inc_length(n);
        }

        fn advance(&self, n: u64) {
            self.inc(n);
        }

        fn describe(&self, label: &str) {
            self.set_message(label.to_owned());
        }

        fn finish(&self) {
            ProgressBar::finish(self);
        }
    }

    /// Create a default progress bar for directory entries
    #[must_use]
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} {msg} [{bar:40.cyan/blue}] {pos}/{len} entries")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        pb
    }

    fn create_bytes_bar(len: u64) -> ProgressBar {
        let pb = ProgressBar::new(len);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{msg} [{bar:40.green/white}] {bytes}/{total_bytes} ({bytes_per_sec})")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        pb
    }

    /// Renders directory and file trackers as stacked `indicatif` bars.
    #[derive(Debug, Default)]
    pub struct BarReporter {
        multi: MultiProgress,
    }

    impl BarReporter {
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl ProgressReporter for BarReporter {
        fn directory(&self, label: &str) -> Box<dyn Progress> {
            let pb = self.multi.add(create_progress_bar(1));
            pb.set_message(label.to_owned());
            Box::new(pb)
        }

        fn file(&self, len: u64, label: &str) -> Box<dyn Progress> {
            let pb = self.multi.add(create_bytes_bar(len));
            pb.set_message(label.to_owned());
            Box::new(pb)
        }
    }
}
