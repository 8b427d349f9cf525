//! reloaded-bootstrapper library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! The bootstrapper runs before the mod loader exists in the process.  Its
//! only job is to find the loader: read the launcher's per-user configuration,
//! resolve the loader DLL for this build's architecture, its runtime
//! configuration, and the launcher executable, and confirm each exists.
//! Loading the runtime and spawning processes belong to the caller.

/// Application layer: the configuration resolver and the ports it needs.
pub mod application;

/// Infrastructure layer: OS adapters for folders and files.
pub mod infrastructure;
