//! Abstractions over the OS services the resolver depends on.
//!
//! The production implementations live in `infrastructure`; unit tests use
//! `mockall` mocks generated from these traits.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Symbolic per-user folder understood by the host OS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum SpecialFolder {
    /// `%APPDATA%` (`CSIDL_APPDATA` / `FOLDERID_RoamingAppData`).
    RoamingAppData,
}

impl fmt::Display for SpecialFolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RoamingAppData => f.write_str("AppData"),
        }
    }
}

/// Error type for special-folder lookup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FolderError {
    /// The OS reported a failure resolving the folder.
    #[error("failed to obtain the path of the {folder} folder: {reason}")]
    Lookup { folder: SpecialFolder, reason: String },

    /// The folder has no meaning on this platform or in this environment.
    #[error("the {0} folder is not available on this platform")]
    Unavailable(SpecialFolder),
}

/// Maps a [`SpecialFolder`] to an absolute directory for the current user.
#[cfg_attr(test, mockall::automock)]
pub trait SpecialFolderResolver: Send + Sync {
    /// # Errors
    ///
    /// Returns [`FolderError`] when the OS cannot resolve the folder.
    fn resolve(&self, folder: SpecialFolder) -> Result<PathBuf, FolderError>;
}

/// The small slice of file-system access the resolver needs.
#[cfg_attr(test, mockall::automock)]
pub trait FileSystem: Send + Sync {
    /// Returns `true` if `path` names an existing regular file.
    fn is_file(&self, path: &Path) -> bool;

    /// Reads the whole file into memory.  No handle outlives the call.
    ///
    /// # Errors
    ///
    /// Propagates the underlying I/O error.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;
}
