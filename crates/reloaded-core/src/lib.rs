//! # reloaded-core
//!
//! Shared library for the Reloaded-II bootstrapper containing the parsed
//! launcher configuration document, loader architecture selection, and the
//! path rules used to find the mod loader on disk.
//!
//! This crate has zero dependencies on OS APIs.  Locating the application-data
//! folder and touching the file system are the bootstrapper's job; everything
//! here is pure and can be tested on any platform.
//!
//! # Architecture overview
//!
//! The Reloaded-II launcher writes a small JSON file,
//! `%APPDATA%\Reloaded-Mod-Loader-II\ReloadedII.json`, recording where the
//! loader is installed.  The bootstrapper (injected into a game process) reads
//! that file to find the loader DLL, its `.runtimeconfig.json`, and the
//! launcher executable.
//!
//! - **`document`** – The parsed configuration file.  Parsing is bounded: a
//!   document with more than [`MAX_FIELDS`] JSON nodes is rejected instead of
//!   being silently truncated.
//!
//! - **`domain`** – Loader architecture (`x86`/`x64`), native path decoding,
//!   runtime-configuration path derivation, and the well-known Reloaded-II
//!   folder layout.

pub mod document;
pub mod domain;

pub use document::{ConfigDocument, DocumentError, FieldError, MAX_FIELDS};
pub use domain::architecture::{LoaderArchitecture, UnknownArchitecture};
pub use domain::layout::ReloadedLayout;
pub use domain::paths::{
    derive_runtime_config_path, native_path, LoaderPaths, PathKind, ResolvedPaths,
    RUNTIME_CONFIG_SUFFIX,
};
