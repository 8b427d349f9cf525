//! Path values produced by the bootstrapper.
//!
//! Configuration values arrive as UTF-8 strings.  [`native_path`] turns them
//! into the platform's own path representation (UTF-16 on Windows) so that
//! folders with Cyrillic, CJK, or other non-ASCII names survive intact.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Suffix that replaces the loader's extension to form its runtime
/// configuration path.
pub const RUNTIME_CONFIG_SUFFIX: &str = ".runtimeconfig.json";

/// Number of trailing characters dropped from the loader path (`.dll`).
const LOADER_EXTENSION_LEN: usize = 4;

/// Which resolved file a path refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PathKind {
    Loader,
    RuntimeConfig,
    Launcher,
}

impl fmt::Display for PathKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Loader => "Reloaded Mod Loader DLL",
            Self::RuntimeConfig => "Reloaded Mod Loader runtime configuration",
            Self::Launcher => "Reloaded launcher executable",
        })
    }
}

/// The loader DLL and its runtime configuration, as needed to host the loader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoaderPaths {
    pub loader: PathBuf,
    pub runtime_config: PathBuf,
}

/// Every path the bootstrapper resolves.
///
/// Each field referred to an existing file when it was resolved.  Nothing
/// stops the file from disappearing afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedPaths {
    pub loader: PathBuf,
    pub runtime_config: PathBuf,
    pub launcher: PathBuf,
}

/// Converts a decoded configuration string into a native path.
#[cfg(windows)]
pub fn native_path(value: &str) -> PathBuf {
    use std::os::windows::ffi::OsStringExt;

    let wide: Vec<u16> = value.encode_utf16().collect();
    PathBuf::from(OsString::from_wide(&wide))
}

/// Converts a decoded configuration string into a native path.
#[cfg(not(windows))]
pub fn native_path(value: &str) -> PathBuf {
    PathBuf::from(OsString::from(value))
}

/// Derives the `.runtimeconfig.json` sibling of a loader path.
///
/// Drops exactly the last four characters (the `.dll` extension) and appends
/// [`RUNTIME_CONFIG_SUFFIX`].  The extension is not inspected: a loader path
/// with a longer or missing extension yields a path that will simply not exist.
/// Paths shorter than four characters keep every character.
pub fn derive_runtime_config_path(loader: &Path) -> PathBuf {
    let mut derived = strip_extension_chars(loader);
    derived.push(RUNTIME_CONFIG_SUFFIX);
    PathBuf::from(derived)
}

#[cfg(windows)]
fn strip_extension_chars(path: &Path) -> OsString {
    use std::os::windows::ffi::{OsStrExt, OsStringExt};

    let wide: Vec<u16> = path.as_os_str().encode_wide().collect();
    let keep = wide.len().checked_sub(LOADER_EXTENSION_LEN).unwrap_or(wide.len());
    OsString::from_wide(&wide[..keep])
}

#[cfg(not(windows))]
fn strip_extension_chars(path: &Path) -> OsString {
    let text = path.to_string_lossy();
    let count = text.chars().count();
    let keep = count.checked_sub(LOADER_EXTENSION_LEN).unwrap_or(count);
    OsString::from(text.chars().take(keep).collect::<String>())
}
