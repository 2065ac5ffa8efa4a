//! # treecopy
//!
//! Recursive, policy-driven copying of files, directory trees, symlinks,
//! and named pipes.
//!
//! ## Core Features
//!
//! - **One entry point**: [`copy`] handles whatever kind of entry the source is
//! - **Symlink policies**: recreate links, follow them, or leave them out, per link
//! - **Existing directory policies**: merge into, replace, or leave alone
//! - **Skip predicate**: prune entries and whole subtrees before they are touched
//! - **Permission control**: decide final modes, applied only after content is written
//! - **Attribute preservation**: optional timestamps and ownership
//! - **Durability**: optional fsync of every file before close
//! - **Progress**: per-file byte counts and directory entry counts
//!
//! ## Quick Start with Builder API
//!
//! ```no_run
//! use treecopy::CopyBuilder;
//!
//! CopyBuilder::new("src", "dst").run()?;
//! # Ok::<(), treecopy::Error>(())
//! ```
//!
//! ### Mirror a Tree
//!
//! ```no_run
//! use treecopy::{CopyBuilder, DirExistsAction, SymlinkAction};
//!
//! CopyBuilder::new("project", "mirror")
//!     .symlinks(SymlinkAction::Deep)
//!     .dir_exists(DirExistsAction::Replace)
//!     .preserve_times()
//!     .max_depth(64)
//!     .run()?;
//! # Ok::<(), treecopy::Error>(())
//! ```
//!
//! ## Function API
//!
//! For full control, build [`CopyOptions`] and call [`copy`]:
//!
//! ```no_run
//! use treecopy::{copy, permission, CopyOptions};
//! use std::ffi::OsStr;
//! use std::path::Path;
//!
//! let options = CopyOptions::default()
//!     .with_skip(|entry, _src, _dst| {
//!         Ok(entry.is_dir() && entry.file_name() == Some(OsStr::new(".git")))
//!     })
//!     .with_permission_control(permission::add_permission(0o020))
//!     .with_sync();
//!
//! copy(Path::new("repo"), Path::new("backup/repo"), &options)?;
//! # Ok::<(), treecopy::Error>(())
//! ```
//!
//! ## Ordering Guarantees
//!
//! - Entries are visited depth first, one at a time, in name order
//! - A file's permissions are applied right after it is created, before its
//!   content is streamed through the already open handle
//! - A directory's permissions are applied after all of its children are
//!   copied, so read-only directories can still be populated
//! - The first error aborts the copy; nothing written so far is rolled back
//!
//! ## Optional Features
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `progress` | Progress bar support with indicatif |
//! | `tracing` | Structured logging with tracing crate |
//! | `serde` | Serialize/Deserialize for [`SymlinkAction`] and [`DirExistsAction`] |
//! | `full` | Enable all optional features |

#![cfg_attr(docsrs, feature(doc_cfg))]

mod builder;
mod copy;
mod entry;
mod error;
mod options;
pub mod permission;
pub mod progress;

pub use builder::CopyBuilder;
pub use copy::copy;
pub use entry::{Entry, EntryKind};
pub use error::{
    Attribute, Callback, CallbackError, Error, ErrorCategory, Result, is_no_space_error,
};
pub use options::{
    CopyOptions, DirExistsAction, DirExistsPolicy, ReaderWrapper, SkipPredicate, SymlinkAction,
    SymlinkPolicy,
};
pub use permission::{PermissionControl, PermissionDecision};
pub use progress::{Progress, ProgressReader, ProgressReporter};

#[cfg(feature = "progress")]
#[cfg_attr(docsrs, doc(cfg(feature = "progress")))]
pub use progress::{BarReporter, create_progress_bar};
