//! Per-user special folder lookup.
//!
//! Resolves symbolic folders such as [`SpecialFolder::RoamingAppData`] to an
//! absolute directory for the current user.
//!
//! # Platform implementations
//!
//! The correct implementation is selected at compile time via
//! `#[cfg(target_os = ...)]` and re-exported as `NativeFolderResolver`:
//!
//! | Type                    | OS        | Source                                     |
//! |-------------------------|-----------|--------------------------------------------|
//! | `WindowsFolderResolver` | Windows   | `SHGetKnownFolderPath`                     |
//! | `EnvFolderResolver`     | elsewhere | `APPDATA`, `XDG_CONFIG_HOME`, `HOME/.config` |
//!
//! The environment fallback exists for Wine/Proton prefixes and development
//! hosts, where `APPDATA` is usually exported.
//!
//! A [`FixedFolderResolver`] is always compiled so tests and embedders can
//! point the resolver at any directory.

use std::ffi::OsString;
use std::path::PathBuf;

use tracing::debug;

use crate::application::ports::{FolderError, SpecialFolder, SpecialFolderResolver};

#[cfg(target_os = "windows")]
pub mod windows;

/// Native resolver for this platform.
#[cfg(target_os = "windows")]
pub use self::windows::WindowsFolderResolver as NativeFolderResolver;

/// Native resolver for this platform.
#[cfg(not(target_os = "windows"))]
pub use self::EnvFolderResolver as NativeFolderResolver;

// ── Environment-variable resolver ─────────────────────────────────────────────

/// Resolves folders from environment variables.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvFolderResolver;

impl EnvFolderResolver {
    pub fn new() -> Self {
        Self
    }
}

impl SpecialFolderResolver for EnvFolderResolver {
    fn resolve(&self, folder: SpecialFolder) -> Result<PathBuf, FolderError> {
        match folder {
            SpecialFolder::RoamingAppData => {
                let path = app_data_from_vars(
                    std::env::var_os("APPDATA"),
                    std::env::var_os("XDG_CONFIG_HOME"),
                    std::env::var_os("HOME"),
                )
                .ok_or(FolderError::Unavailable(folder))?;
                debug!(path = %path.display(), "resolved {folder} from environment");
                Ok(path)
            }
        }
    }
}

/// `APPDATA`, else `XDG_CONFIG_HOME`, else `HOME/.config`.  Empty values are
/// treated as unset.
fn app_data_from_vars(
    app_data: Option<OsString>,
    xdg_config_home: Option<OsString>,
    home: Option<OsString>,
) -> Option<PathBuf> {
    let non_empty = |v: Option<OsString>| v.filter(|s| !s.is_empty()).map(PathBuf::from);

    non_empty(app_data)
        .or_else(|| non_empty(xdg_config_home))
        .or_else(|| non_empty(home).map(|h| h.join(".config")))
}

// ── Fixed resolver ────────────────────────────────────────────────────────────

/// Resolver returning a preset directory, or a preset failure.
#[derive(Debug, Clone)]
pub struct FixedFolderResolver {
    result: Result<PathBuf, String>,
}

impl FixedFolderResolver {
    /// Resolves every folder to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            result: Ok(path.into()),
        }
    }

    /// Fails every lookup with `reason`.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            result: Err(reason.into()),
        }
    }
}

impl SpecialFolderResolver for FixedFolderResolver {
    fn resolve(&self, folder: SpecialFolder) -> Result<PathBuf, FolderError> {
        self.result.clone().map_err(|reason| FolderError::Lookup { folder, reason })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_data_prefers_appdata_variable() {
        let path = app_data_from_vars(
            Some("C:\\Users\\u\\AppData\\Roaming".into()),
            Some("/xdg".into()),
            Some("/home/u".into()),
        );

        assert_eq!(path, Some(PathBuf::from("C:\\Users\\u\\AppData\\Roaming")));
    }

    #[test]
    fn test_app_data_falls_back_to_xdg_then_home() {
        assert_eq!(
            app_data_from_vars(None, Some("/xdg".into()), Some("/home/u".into())),
            Some(PathBuf::from("/xdg"))
        );
        assert_eq!(
            app_data_from_vars(Some("".into()), None, Some("/home/u".into())),
            Some(PathBuf::from("/home/u").join(".config"))
        );
    }

    #[test]
    fn test_app_data_none_when_nothing_set() {
        assert_eq!(app_data_from_vars(None, Some("".into()), None), None);
    }

    #[test]
    fn test_fixed_resolver_returns_preset_path() {
        let resolver = FixedFolderResolver::new("/tmp/appdata");

        let path = resolver.resolve(SpecialFolder::RoamingAppData).expect("resolve");

        assert_eq!(path, PathBuf::from("/tmp/appdata"));
    }

    #[test]
    fn test_fixed_resolver_failing_reports_lookup_error() {
        let resolver = FixedFolderResolver::failing("no profile loaded");

        let err = resolver.resolve(SpecialFolder::RoamingAppData).unwrap_err();

        assert_eq!(
            err,
            FolderError::Lookup {
                folder: SpecialFolder::RoamingAppData,
                reason: "no profile loaded".to_string(),
            }
        );
        assert_eq!(
            err.to_string(),
            "failed to obtain the path of the AppData folder: no profile loaded"
        );
    }
}
