//! Infrastructure layer for the bootstrapper.
//!
//! Contains OS-facing adapters: special-folder lookup and file-system access.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `reloaded_core`, but MUST NOT be imported by the `application` layer.

pub mod filesystem;
pub mod special_folder;
