//! Configuration resolver: finds the loader from `ReloadedII.json`.
//!
//! [`LoaderConfig::load`] reads and parses the launcher configuration once.
//! Each accessor then pulls one field, converts it to a native path, and
//! checks the file exists.  Nothing is cached between accessor calls, so a
//! file deleted after [`LoaderConfig::load`] is reported on the next call.
//!
//! # Resolution pipeline
//!
//! ```text
//! SpecialFolderResolver ── %APPDATA%
//!        │
//!        ▼
//! %APPDATA%\Reloaded-Mod-Loader-II\ReloadedII.json ── FileSystem::read
//!        │
//!        ▼
//! ConfigDocument ── LoaderPath32 | LoaderPath64 | LauncherPath
//!        │
//!        ▼
//! native_path → FileSystem::is_file → PathBuf
//! ```

use std::io;
use std::path::{Path, PathBuf};

use reloaded_core::domain::layout;
use reloaded_core::{
    derive_runtime_config_path, native_path, ConfigDocument, DocumentError, FieldError,
    LoaderArchitecture, LoaderPaths, PathKind, ReloadedLayout, ResolvedPaths,
};
use thiserror::Error;
use tracing::{debug, warn};

use super::ports::{FileSystem, FolderError, SpecialFolder, SpecialFolderResolver};

/// Configuration field holding the launcher executable path.
pub const LAUNCHER_PATH_FIELD: &str = "LauncherPath";

/// Error type for every resolver operation.
///
/// All variants are terminal for the bootstrap attempt: nothing is retried and
/// no default is substituted.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The per-user application-data folder could not be determined.
    #[error(transparent)]
    Environment(#[from] FolderError),

    /// `ReloadedII.json` does not exist.
    #[error("Reloaded config has not been found at {}", path.display())]
    ConfigNotFound { path: PathBuf },

    /// `ReloadedII.json` exists but could not be read.
    #[error("failed to read Reloaded config at {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// `ReloadedII.json` is malformed or exceeds the field bound.
    #[error("failed to parse Reloaded config at {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: DocumentError,
    },

    /// A required field is absent from the configuration.
    #[error("field `{field}` is missing from the Reloaded config")]
    MissingField { field: String },

    /// A required field is present but not a string.
    #[error("field `{field}` in the Reloaded config must be a string, found {found}")]
    InvalidField { field: String, found: &'static str },

    /// A path read from the configuration does not refer to an existing file.
    #[error("{kind} has not been found at {}", path.display())]
    FileNotFound { kind: PathKind, path: PathBuf },
}

impl From<FieldError> for ResolveError {
    fn from(err: FieldError) -> Self {
        match err {
            FieldError::Missing(field) => Self::MissingField { field },
            FieldError::NotAString { field, found } => Self::InvalidField { field, found },
        }
    }
}

/// The parsed launcher configuration plus the services needed to validate it.
#[derive(Debug)]
pub struct LoaderConfig<F> {
    app_data: PathBuf,
    config_path: PathBuf,
    document: ConfigDocument,
    architecture: LoaderArchitecture,
    fs: F,
}

impl<F: FileSystem> LoaderConfig<F> {
    /// Locates, reads, and parses `ReloadedII.json`.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::Environment`] if the AppData folder lookup fails.
    /// - [`ResolveError::ConfigNotFound`] if the configuration file is absent.
    /// - [`ResolveError::ConfigRead`] if it cannot be read.
    /// - [`ResolveError::ConfigParse`] if it is not a bounded JSON object.
    pub fn load(
        folders: &dyn SpecialFolderResolver,
        fs: F,
        architecture: LoaderArchitecture,
    ) -> Result<Self, ResolveError> {
        let app_data = folders.resolve(SpecialFolder::RoamingAppData)?;
        Self::load_from(app_data, fs, architecture)
    }

    fn load_from(
        app_data: PathBuf,
        fs: F,
        architecture: LoaderArchitecture,
    ) -> Result<Self, ResolveError> {
        let config_path = layout::config_file_path(&app_data);
        debug!(path = %config_path.display(), "loading Reloaded config");

        if !fs.is_file(&config_path) {
            warn!(path = %config_path.display(), "Reloaded config not found");
            return Err(ResolveError::ConfigNotFound { path: config_path });
        }

        let bytes = match fs.read(&config_path) {
            Ok(bytes) => bytes,
            Err(source) => return Err(ResolveError::ConfigRead { path: config_path, source }),
        };

        let document = match ConfigDocument::parse(&bytes) {
            Ok(document) => document,
            Err(source) => return Err(ResolveError::ConfigParse { path: config_path, source }),
        };

        Ok(Self {
            app_data,
            config_path,
            document,
            architecture,
            fs,
        })
    }

    /// Path of the loader DLL matching [`Self::architecture`].
    ///
    /// # Errors
    ///
    /// [`ResolveError::MissingField`] / [`ResolveError::InvalidField`] for a
    /// bad `LoaderPath32`/`LoaderPath64`, [`ResolveError::FileNotFound`] if the
    /// DLL does not exist.
    pub fn get_loader_path(&self) -> Result<PathBuf, ResolveError> {
        self.resolve_field(self.architecture.loader_path_field(), PathKind::Loader)
    }

    /// Path of the loader's `.runtimeconfig.json`, derived from the loader path.
    ///
    /// # Errors
    ///
    /// Everything [`Self::get_loader_path`] returns, plus
    /// [`ResolveError::FileNotFound`] if the derived file does not exist.
    pub fn get_runtime_config_path(&self) -> Result<PathBuf, ResolveError> {
        let loader = self.get_loader_path()?;
        let runtime_config = derive_runtime_config_path(&loader);
        self.ensure_file(runtime_config, PathKind::RuntimeConfig)
    }

    /// Path of the launcher executable.
    ///
    /// # Errors
    ///
    /// [`ResolveError::MissingField`] / [`ResolveError::InvalidField`] for a
    /// bad `LauncherPath`, [`ResolveError::FileNotFound`] if it does not exist.
    pub fn get_launcher_path(&self) -> Result<PathBuf, ResolveError> {
        self.resolve_field(LAUNCHER_PATH_FIELD, PathKind::Launcher)
    }

    /// Folder containing the launcher executable.
    ///
    /// # Errors
    ///
    /// Same as [`Self::get_launcher_path`].
    pub fn get_launcher_folder(&self) -> Result<PathBuf, ResolveError> {
        let launcher = self.get_launcher_path()?;
        Ok(launcher
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default())
    }

    /// Loader DLL and runtime configuration together.  Fails if either does.
    ///
    /// # Errors
    ///
    /// Same as [`Self::get_runtime_config_path`].
    pub fn get_loader_paths(&self) -> Result<LoaderPaths, ResolveError> {
        let loader = self.get_loader_path()?;
        let runtime_config = self.get_runtime_config_path()?;
        Ok(LoaderPaths {
            loader,
            runtime_config,
        })
    }

    /// All three paths.  Fails without a partial result if any is missing.
    ///
    /// # Errors
    ///
    /// Any error from [`Self::get_loader_paths`] or [`Self::get_launcher_path`].
    pub fn resolve_all(&self) -> Result<ResolvedPaths, ResolveError> {
        let LoaderPaths {
            loader,
            runtime_config,
        } = self.get_loader_paths()?;
        let launcher = self.get_launcher_path()?;
        Ok(ResolvedPaths {
            loader,
            runtime_config,
            launcher,
        })
    }

    /// Well-known per-user folders, plus the install layout when the launcher
    /// path resolves.
    pub fn layout(&self) -> ReloadedLayout {
        let layout = ReloadedLayout::new(&self.app_data);
        match self.get_launcher_folder() {
            Ok(folder) => layout.with_install(&folder, self.architecture),
            Err(e) => {
                debug!("install layout unavailable: {e}");
                layout
            }
        }
    }

    pub fn architecture(&self) -> LoaderArchitecture {
        self.architecture
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    fn resolve_field(&self, field: &str, kind: PathKind) -> Result<PathBuf, ResolveError> {
        let raw = self.document.string_field(field)?;
        let path = native_path(raw);
        debug!(field, path = %path.display(), "resolved {kind} from config");
        self.ensure_file(path, kind)
    }

    fn ensure_file(&self, path: PathBuf, kind: PathKind) -> Result<PathBuf, ResolveError> {
        if self.fs.is_file(&path) {
            Ok(path)
        } else {
            warn!(path = %path.display(), "{kind} has not been found");
            Err(ResolveError::FileNotFound { kind, path })
        }
    }
}

/// Well-known Reloaded-II layout for the current user.
///
/// The per-user folders only need the AppData folder, so they are returned
/// even when `ReloadedII.json` is missing or unreadable.  The install part is
/// added when the configuration loads and its launcher path resolves.
///
/// # Errors
///
/// [`ResolveError::Environment`] if the AppData folder lookup fails.
pub fn resolve_layout<F: FileSystem>(
    folders: &dyn SpecialFolderResolver,
    fs: F,
    architecture: LoaderArchitecture,
) -> Result<ReloadedLayout, ResolveError> {
    let app_data = folders.resolve(SpecialFolder::RoamingAppData)?;
    match LoaderConfig::load_from(app_data.clone(), fs, architecture) {
        Ok(config) => Ok(config.layout()),
        Err(e) => {
            debug!("install layout unavailable: {e}");
            Ok(ReloadedLayout::new(&app_data))
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{MockFileSystem, MockSpecialFolderResolver};
    use mockall::predicate::eq;
    use mockall::Sequence;

    const APP_DATA: &str = "appdata";
    const LOADER: &str = r"C:\X\Loader.dll";
    const RUNTIME_CONFIG: &str = r"C:\X\Loader.runtimeconfig.json";
    const LAUNCHER: &str = r"C:\X\Reloaded-II.exe";

    fn config_path() -> PathBuf {
        layout::config_file_path(Path::new(APP_DATA))
    }

    fn folders() -> MockSpecialFolderResolver {
        let mut folders = MockSpecialFolderResolver::new();
        folders
            .expect_resolve()
            .with(eq(SpecialFolder::RoamingAppData))
            .returning(|_| Ok(PathBuf::from(APP_DATA)));
        folders
    }

    fn config_json() -> String {
        serde_json::json!({
            "LoaderPath32": LOADER,
            "LoaderPath64": LOADER,
            "LauncherPath": LAUNCHER,
        })
        .to_string()
    }

    /// File system holding `contents` as the config and `existing` as the only
    /// other files.
    fn fs_with(contents: String, existing: &'static [&'static str]) -> MockFileSystem {
        let mut fs = MockFileSystem::new();
        let config = config_path();
        fs.expect_is_file().returning(move |p: &Path| {
            p == config || existing.iter().any(|e| native_path(e) == p)
        });
        fs.expect_read()
            .returning(move |_: &Path| Ok(contents.clone().into_bytes()));
        fs
    }

    fn load(fs: MockFileSystem) -> Result<LoaderConfig<MockFileSystem>, ResolveError> {
        LoaderConfig::load(&folders(), fs, LoaderArchitecture::X64)
    }

    // ── Construction ──────────────────────────────────────────────────────────

    #[test]
    fn test_load_fails_with_environment_error_when_folder_lookup_fails() {
        // Arrange
        let mut folders = MockSpecialFolderResolver::new();
        folders.expect_resolve().returning(|folder| {
            Err(FolderError::Lookup {
                folder,
                reason: "access denied".to_string(),
            })
        });
        let mut fs = MockFileSystem::new();
        fs.expect_is_file().never();

        // Act
        let result = LoaderConfig::load(&folders, fs, LoaderArchitecture::X64);

        // Assert
        assert!(matches!(result, Err(ResolveError::Environment(_))));
    }

    #[test]
    fn test_load_fails_with_config_not_found_before_reading() {
        // Arrange
        let mut fs = MockFileSystem::new();
        fs.expect_is_file()
            .withf(|p: &Path| p == config_path())
            .times(1)
            .returning(|_| false);
        fs.expect_read().never();

        // Act
        let result = load(fs);

        // Assert
        match result {
            Err(ResolveError::ConfigNotFound { path }) => assert_eq!(path, config_path()),
            other => panic!("expected ConfigNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_load_reports_read_failure() {
        let mut fs = MockFileSystem::new();
        fs.expect_is_file().returning(|_| true);
        fs.expect_read()
            .returning(|_| Err(io::Error::new(io::ErrorKind::PermissionDenied, "locked")));

        let result = load(fs);

        assert!(matches!(result, Err(ResolveError::ConfigRead { .. })));
    }

    #[test]
    fn test_load_fails_with_parse_error_on_truncated_json() {
        let fs = fs_with(r#"{ "LoaderPath64": "C:\\X\\Loader.dll" "#.to_string(), &[]);

        let result = load(fs);

        assert!(matches!(
            result,
            Err(ResolveError::ConfigParse {
                source: DocumentError::Malformed(_),
                ..
            })
        ));
    }

    #[test]
    fn test_load_fails_with_parse_error_when_field_bound_exceeded() {
        let items: Vec<String> = (0..reloaded_core::MAX_FIELDS).map(|i| i.to_string()).collect();
        let fs = fs_with(format!("{{ \"Mods\": [{}] }}", items.join(",")), &[]);

        let result = load(fs);

        assert!(matches!(
            result,
            Err(ResolveError::ConfigParse {
                source: DocumentError::TooManyFields { .. },
                ..
            })
        ));
    }

    // ── get_loader_path ───────────────────────────────────────────────────────

    #[test]
    fn test_get_loader_path_returns_decoded_path() {
        let config = load(fs_with(config_json(), &[LOADER])).expect("load");

        let loader = config.get_loader_path().expect("loader path");

        assert_eq!(loader, native_path(LOADER));
    }

    #[test]
    fn test_get_loader_path_selects_field_by_architecture() {
        // Arrange: only the 32-bit field exists
        let json = serde_json::json!({ "LoaderPath32": LOADER }).to_string();
        let x86 = LoaderConfig::load(&folders(), fs_with(json.clone(), &[LOADER]), LoaderArchitecture::X86)
            .expect("load x86");
        let x64 = LoaderConfig::load(&folders(), fs_with(json, &[LOADER]), LoaderArchitecture::X64)
            .expect("load x64");

        // Act / Assert
        assert_eq!(x86.get_loader_path().unwrap(), native_path(LOADER));
        assert!(matches!(
            x64.get_loader_path(),
            Err(ResolveError::MissingField { ref field }) if field == "LoaderPath64"
        ));
    }

    #[test]
    fn test_get_loader_path_fails_when_dll_absent() {
        let config = load(fs_with(config_json(), &[])).expect("load");

        let result = config.get_loader_path();

        match result {
            Err(ResolveError::FileNotFound { kind, path }) => {
                assert_eq!(kind, PathKind::Loader);
                assert_eq!(path, native_path(LOADER));
            }
            other => panic!("expected FileNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_get_loader_path_rejects_non_string_field() {
        let json = serde_json::json!({ "LoaderPath64": ["C:\\X\\Loader.dll"] }).to_string();
        let config = load(fs_with(json, &[LOADER])).expect("load");

        assert!(matches!(
            config.get_loader_path(),
            Err(ResolveError::InvalidField { found: "an array", .. })
        ));
    }

    // ── get_runtime_config_path ───────────────────────────────────────────────

    #[test]
    fn test_get_runtime_config_path_checks_exactly_the_derived_path() {
        // Arrange: record the order of existence checks
        let mut fs = MockFileSystem::new();
        let mut seq = Sequence::new();
        let json = config_json();
        fs.expect_is_file()
            .withf(|p: &Path| p == config_path())
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| true);
        fs.expect_read()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |_| Ok(json.clone().into_bytes()));
        fs.expect_is_file()
            .withf(|p: &Path| p == native_path(LOADER))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| true);
        fs.expect_is_file()
            .withf(|p: &Path| p == native_path(RUNTIME_CONFIG))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| true);
        let config = load(fs).expect("load");

        // Act
        let runtime_config = config.get_runtime_config_path().expect("runtime config");

        // Assert
        assert_eq!(runtime_config, native_path(RUNTIME_CONFIG));
    }

    #[test]
    fn test_get_runtime_config_path_fails_when_derived_file_absent() {
        let config = load(fs_with(config_json(), &[LOADER])).expect("load");

        match config.get_runtime_config_path() {
            Err(ResolveError::FileNotFound { kind, path }) => {
                assert_eq!(kind, PathKind::RuntimeConfig);
                assert_eq!(path, native_path(RUNTIME_CONFIG));
            }
            other => panic!("expected FileNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_loader_field_propagates_through_composition() {
        let json = serde_json::json!({ "LauncherPath": LAUNCHER }).to_string();
        let config = load(fs_with(json, &[LAUNCHER])).expect("load");

        assert!(matches!(config.get_loader_path(), Err(ResolveError::MissingField { .. })));
        assert!(matches!(
            config.get_runtime_config_path(),
            Err(ResolveError::MissingField { .. })
        ));
        assert!(matches!(config.get_loader_paths(), Err(ResolveError::MissingField { .. })));
        assert!(matches!(config.resolve_all(), Err(ResolveError::MissingField { .. })));
    }

    // ── get_launcher_path ─────────────────────────────────────────────────────

    #[test]
    fn test_get_launcher_path_returns_decoded_path() {
        let config = load(fs_with(config_json(), &[LAUNCHER])).expect("load");

        assert_eq!(config.get_launcher_path().unwrap(), native_path(LAUNCHER));
    }

    #[test]
    fn test_get_launcher_path_missing_field() {
        let json = serde_json::json!({ "LoaderPath64": LOADER }).to_string();
        let config = load(fs_with(json, &[LOADER])).expect("load");

        assert!(matches!(
            config.get_launcher_path(),
            Err(ResolveError::MissingField { ref field }) if field == "LauncherPath"
        ));
    }

    #[test]
    fn test_get_launcher_path_fails_when_exe_absent() {
        let config = load(fs_with(config_json(), &[LOADER])).expect("load");

        assert!(matches!(
            config.get_launcher_path(),
            Err(ResolveError::FileNotFound {
                kind: PathKind::Launcher,
                ..
            })
        ));
    }

    // ── Composites ────────────────────────────────────────────────────────────

    #[test]
    fn test_get_loader_paths_bundles_both_paths() {
        let config = load(fs_with(config_json(), &[LOADER, RUNTIME_CONFIG])).expect("load");

        let paths = config.get_loader_paths().expect("loader paths");

        assert_eq!(paths.loader, native_path(LOADER));
        assert_eq!(paths.runtime_config, native_path(RUNTIME_CONFIG));
    }

    #[test]
    fn test_get_loader_paths_has_no_partial_result() {
        let config = load(fs_with(config_json(), &[LOADER])).expect("load");

        assert!(matches!(
            config.get_loader_paths(),
            Err(ResolveError::FileNotFound {
                kind: PathKind::RuntimeConfig,
                ..
            })
        ));
    }

    #[test]
    fn test_resolve_all_returns_every_path() {
        let config =
            load(fs_with(config_json(), &[LOADER, RUNTIME_CONFIG, LAUNCHER])).expect("load");

        let resolved = config.resolve_all().expect("resolve all");

        assert_eq!(
            resolved,
            ResolvedPaths {
                loader: native_path(LOADER),
                runtime_config: native_path(RUNTIME_CONFIG),
                launcher: native_path(LAUNCHER),
            }
        );
    }

    #[test]
    fn test_resolve_all_fails_when_launcher_absent() {
        let config = load(fs_with(config_json(), &[LOADER, RUNTIME_CONFIG])).expect("load");

        assert!(matches!(
            config.resolve_all(),
            Err(ResolveError::FileNotFound {
                kind: PathKind::Launcher,
                ..
            })
        ));
    }

    #[test]
    fn test_layout_omits_install_when_launcher_missing() {
        let config = load(fs_with(config_json(), &[])).expect("load");

        let layout = config.layout();

        assert_eq!(layout.config_path, config_path());
        assert!(layout.install.is_none());
    }

    #[test]
    fn test_error_messages_are_human_readable() {
        let err = ResolveError::FileNotFound {
            kind: PathKind::Loader,
            path: PathBuf::from("Loader.dll"),
        };

        assert_eq!(
            err.to_string(),
            "Reloaded Mod Loader DLL has not been found at Loader.dll"
        );
    }

    // ── resolve_layout ────────────────────────────────────────────────────────

    #[test]
    fn test_resolve_layout_without_config_returns_user_folders() {
        // Arrange: no file exists at all
        let mut fs = MockFileSystem::new();
        fs.expect_is_file().returning(|_| false);
        fs.expect_read().never();

        // Act
        let layout =
            resolve_layout(&folders(), fs, LoaderArchitecture::X64).expect("layout");

        // Assert
        assert_eq!(layout, ReloadedLayout::new(Path::new(APP_DATA)));
        assert!(layout.install.is_none());
    }

    #[test]
    fn test_resolve_layout_with_config_adds_install() {
        let fs = fs_with(config_json(), &[LAUNCHER]);

        let layout = resolve_layout(&folders(), fs, LoaderArchitecture::X86).expect("layout");

        let install = layout.install.expect("install layout");
        assert_eq!(install.architecture, LoaderArchitecture::X86);
        let launcher = native_path(LAUNCHER);
        let launcher_folder = launcher.parent().expect("launcher folder");
        assert_eq!(
            install.loader_folder,
            layout::loader_folder(launcher_folder, LoaderArchitecture::X86)
        );
    }

    #[test]
    fn test_resolve_layout_propagates_folder_lookup_failure() {
        let mut folders = MockSpecialFolderResolver::new();
        folders
            .expect_resolve()
            .returning(|folder| Err(FolderError::Unavailable(folder)));
        let mut fs = MockFileSystem::new();
        fs.expect_is_file().never();

        let result = resolve_layout(&folders, fs, LoaderArchitecture::X64);

        assert!(matches!(
            result,
            Err(ResolveError::Environment(FolderError::Unavailable(_)))
        ));
    }
}
