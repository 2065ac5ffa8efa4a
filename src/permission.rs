//! Permission control.
//!
//! A permission control is asked, for every file and directory, what mode
//! the destination should end up with. It answers with a
//! [`PermissionDecision`] that the copier applies later: right after
//! creation for files, and only once every child has been written for
//! directories. A read-only directory mode applied any earlier would lock
//! the copier out of its own destination.
//!
//! # Example
//!
//! ```no_run
//! use treecopy::{CopyOptions, permission};
//!
//! // Make everything group-writable on top of the source mode
//! let options = CopyOptions::default()
//!     .with_permission_control(permission::add_permission(0o020));
//! ```

use crate::entry::Entry;
use crate::error::CallbackError;
use std::fs::{self, Permissions};
use std::io;
use std::path::Path;
use std::sync::Arc;

/// Caller-supplied permission control function.
pub type PermissionControl =
    Arc<dyn Fn(&Entry, &Path) -> Result<PermissionDecision, CallbackError> + Send + Sync>;

/// Deferred permission change for one destination entry.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a permission decision does nothing until applied"]
pub struct PermissionDecision {
    permissions: Option<Permissions>,
}

impl PermissionDecision {
    /// Set the destination to `permissions` when applied.
    pub fn set(permissions: Permissions) -> Self {
        Self {
            permissions: Some(permissions),
        }
    }

    /// Leave whatever mode the destination was created with.
    pub fn leave() -> Self {
        Self { permissions: None }
    }

    /// The permissions this decision will apply, if any.
    pub fn permissions(&self) -> Option<&Permissions> {
        self.permissions.as_ref()
    }

    /// Apply the decision to `dst`.
    pub fn apply(&self, dst: &Path) -> io::Result<()> {
        match &self.permissions {
            Some(perms) => fs::set_permissions(dst, perms.clone()),
            None => Ok(()),
        }
    }
}

/// Give the destination the source's permissions (the default).
pub fn preserve_permissions() -> PermissionControl {
    add_permission(0)
}

/// Give the destination the source's permissions plus `bits`.
///
/// `bits` are Unix mode bits; on other platforms only the source's
/// read-only flag is carried over.
pub fn add_permission(bits: u32) -> PermissionControl {
    Arc::new(
        move |entry: &Entry, _dst: &Path| -> Result<PermissionDecision, CallbackError> {
            Ok(PermissionDecision::set(with_added_bits(
                entry.permissions(),
                bits,
            )))
        },
    )
}

/// Never chmod; destinations keep the mode they were created with.
pub fn leave_permissions() -> PermissionControl {
    Arc::new(
        |_entry: &Entry, _dst: &Path| -> Result<PermissionDecision, CallbackError> {
            Ok(PermissionDecision::leave())
        },
    )
}

#[cfg(unix)]
fn with_added_bits(perms: Permissions, bits: u32) -> Permissions {
    use std::os::unix::fs::PermissionsExt;
    Permissions::from_mode((perms.mode() | bits) & 0o7777)
}

#[cfg(not(unix))]
fn with_added_bits(perms: Permissions, _bits: u32) -> Permissions {
    perms
}
