//! Well-known Reloaded-II folders and files.
//!
//! The launcher and the bootstrapper must agree on where the configuration
//! lives, so these names are fixed.  Everything here is plain path
//! composition; nothing is checked against the disk.
//!
//! ```text
//! <AppData>/Reloaded-Mod-Loader-II/
//!   ReloadedII.json
//!   Logs/
//!     Logs.zip
//!   ProfileOptimization/
//!
//! <Launcher folder>/
//!   Loader/
//!     Kernel32AddressDumper.exe
//!     x86/ | x64/
//!       Reloaded.Mod.Loader.dll
//!       Bootstrapper/Reloaded.Mod.Loader.Bootstrapper.dll
//! ```

use std::path::{Path, PathBuf};

use serde::Serialize;

use super::architecture::LoaderArchitecture;

/// Folder under the application-data directory owned by Reloaded-II.
pub const CONFIG_FOLDER_NAME: &str = "Reloaded-Mod-Loader-II";
/// Launcher configuration file read by the bootstrapper.
pub const CONFIG_FILE_NAME: &str = "ReloadedII.json";

const LOGS_FOLDER_NAME: &str = "Logs";
const ARCHIVED_LOGS_FILE_NAME: &str = "Logs.zip";
const PROFILE_OPTIMIZATION_FOLDER_NAME: &str = "ProfileOptimization";
const LOADER_FOLDER_NAME: &str = "Loader";
const LOADER_DLL_NAME: &str = "Reloaded.Mod.Loader.dll";
const BOOTSTRAPPER_FOLDER_NAME: &str = "Bootstrapper";
const BOOTSTRAPPER_DLL_NAME: &str = "Reloaded.Mod.Loader.Bootstrapper.dll";
const KERNEL32_ADDRESS_DUMPER_NAME: &str = "Kernel32AddressDumper.exe";

/// Folder layout rooted at the user's application-data directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReloadedLayout {
    pub config_folder: PathBuf,
    pub config_path: PathBuf,
    pub logs_folder: PathBuf,
    pub archived_logs_path: PathBuf,
    pub profile_optimization_folder: PathBuf,
    /// Present when the launcher folder is known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub install: Option<InstallLayout>,
}

/// Loader files inside the launcher's install folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallLayout {
    pub architecture: LoaderArchitecture,
    pub loader_folder: PathBuf,
    pub loader_path: PathBuf,
    pub bootstrapper_path: PathBuf,
    pub kernel32_address_dumper_path: PathBuf,
}

impl ReloadedLayout {
    /// Builds the per-user layout under `app_data`.
    pub fn new(app_data: &Path) -> Self {
        let config_folder = config_folder(app_data);
        let logs_folder = config_folder.join(LOGS_FOLDER_NAME);
        Self {
            config_path: config_folder.join(CONFIG_FILE_NAME),
            archived_logs_path: logs_folder.join(ARCHIVED_LOGS_FILE_NAME),
            profile_optimization_folder: config_folder.join(PROFILE_OPTIMIZATION_FOLDER_NAME),
            logs_folder,
            config_folder,
            install: None,
        }
    }

    /// Adds the install layout for `launcher_folder` and `architecture`.
    pub fn with_install(mut self, launcher_folder: &Path, architecture: LoaderArchitecture) -> Self {
        self.install = Some(InstallLayout::new(launcher_folder, architecture));
        self
    }
}

impl InstallLayout {
    pub fn new(launcher_folder: &Path, architecture: LoaderArchitecture) -> Self {
        let loader_folder = loader_folder(launcher_folder, architecture);
        Self {
            architecture,
            loader_path: loader_folder.join(LOADER_DLL_NAME),
            bootstrapper_path: loader_folder
                .join(BOOTSTRAPPER_FOLDER_NAME)
                .join(BOOTSTRAPPER_DLL_NAME),
            kernel32_address_dumper_path: launcher_folder
                .join(LOADER_FOLDER_NAME)
                .join(KERNEL32_ADDRESS_DUMPER_NAME),
            loader_folder,
        }
    }
}

/// `<app_data>/Reloaded-Mod-Loader-II`
pub fn config_folder(app_data: &Path) -> PathBuf {
    app_data.join(CONFIG_FOLDER_NAME)
}

/// `<app_data>/Reloaded-Mod-Loader-II/ReloadedII.json`
pub fn config_file_path(app_data: &Path) -> PathBuf {
    config_folder(app_data).join(CONFIG_FILE_NAME)
}

/// `<launcher_folder>/Loader/<x86|x64>`
pub fn loader_folder(launcher_folder: &Path, architecture: LoaderArchitecture) -> PathBuf {
    launcher_folder
        .join(LOADER_FOLDER_NAME)
        .join(architecture.folder_name())
}
