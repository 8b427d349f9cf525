//! Windows special folders via `SHGetKnownFolderPath`.

use std::ffi::OsString;
use std::os::windows::ffi::OsStringExt;
use std::path::PathBuf;

use tracing::debug;
use windows::core::GUID;
use windows::Win32::Foundation::HANDLE;
use windows::Win32::System::Com::CoTaskMemFree;
use windows::Win32::UI::Shell::{FOLDERID_RoamingAppData, SHGetKnownFolderPath, KF_FLAG_DEFAULT};

use crate::application::ports::{FolderError, SpecialFolder, SpecialFolderResolver};

/// Windows implementation of [`SpecialFolderResolver`] using the Shell API.
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowsFolderResolver;

impl WindowsFolderResolver {
    pub fn new() -> Self {
        Self
    }
}

fn known_folder_id(folder: SpecialFolder) -> &'static GUID {
    match folder {
        SpecialFolder::RoamingAppData => &FOLDERID_RoamingAppData,
    }
}

impl SpecialFolderResolver for WindowsFolderResolver {
    fn resolve(&self, folder: SpecialFolder) -> Result<PathBuf, FolderError> {
        // SAFETY: the GUID reference is 'static; a default (null) token
        // requests the folder for the current user.
        let raw = unsafe {
            SHGetKnownFolderPath(known_folder_id(folder), KF_FLAG_DEFAULT, HANDLE::default())
        }
        .map_err(|e| FolderError::Lookup {
            folder,
            reason: e.message().to_string(),
        })?;

        // SAFETY: on success `raw` is a valid NUL-terminated wide string owned
        // by us until it is released with CoTaskMemFree, which happens exactly
        // once below after the contents have been copied.
        let path = unsafe {
            let path = OsString::from_wide(raw.as_wide());
            CoTaskMemFree(Some(raw.0 as *const _));
            path
        };

        let path = PathBuf::from(path);
        debug!(path = %path.display(), "resolved {folder} via SHGetKnownFolderPath");
        Ok(path)
    }
}
