//! Loader architecture selection.
//!
//! The bootstrapper is built once per architecture and must load the loader
//! build that matches its own pointer width.  The choice is a property of the
//! build, never of the OS the binary happens to run on: a 32-bit bootstrapper
//! on 64-bit Windows still needs `LoaderPath32`.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Loader build flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoaderArchitecture {
    X86,
    X64,
}

impl LoaderArchitecture {
    /// The architecture this crate was compiled for.
    #[cfg(target_pointer_width = "64")]
    pub const NATIVE: Self = Self::X64;

    /// The architecture this crate was compiled for.
    #[cfg(not(target_pointer_width = "64"))]
    pub const NATIVE: Self = Self::X86;

    /// Configuration field holding the loader DLL path for this architecture.
    pub const fn loader_path_field(self) -> &'static str {
        match self {
            Self::X86 => "LoaderPath32",
            Self::X64 => "LoaderPath64",
        }
    }

    /// Name of the per-architecture folder under `<launcher>/Loader`.
    pub const fn folder_name(self) -> &'static str {
        match self {
            Self::X86 => "x86",
            Self::X64 => "x64",
        }
    }
}

impl Default for LoaderArchitecture {
    fn default() -> Self {
        Self::NATIVE
    }
}

impl fmt::Display for LoaderArchitecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.folder_name())
    }
}

/// Error returned when parsing an unknown architecture name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown loader architecture `{0}` (expected x86 or x64)")]
pub struct UnknownArchitecture(pub String);

impl FromStr for LoaderArchitecture {
    type Err = UnknownArchitecture;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "x86" | "32" | "win32" => Ok(Self::X86),
            "x64" | "64" | "amd64" => Ok(Self::X64),
            _ => Err(UnknownArchitecture(s.to_string())),
        }
    }
}
