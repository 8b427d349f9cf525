//! Domain rules for locating the Reloaded-II loader.
//!
//! This module contains pure path logic with no file-system or OS access:
//!
//! - **`architecture`** – Which loader build (`x86`/`x64`) the bootstrapper
//!   needs, and which configuration field records its location.
//! - **`paths`** – Native path decoding, the runtime-configuration sibling
//!   rule, and the records returned to callers.
//! - **`layout`** – Folders and files the launcher places under the
//!   application-data directory and its install directory.

pub mod architecture;
pub mod layout;
pub mod paths;
