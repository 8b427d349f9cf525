//! Application layer for the bootstrapper.
//!
//! Use cases here depend only on the traits in [`ports`]; the OS-facing
//! implementations are injected from `infrastructure` by the binary (or by
//! tests).
//!
//! - **`ports`** – `SpecialFolderResolver` and `FileSystem`, the two services
//!   the resolver needs from the host.
//! - **`resolve_paths`** – `LoaderConfig`, which reads `ReloadedII.json` and
//!   resolves the loader, runtime configuration, and launcher paths.

pub mod ports;
pub mod resolve_paths;
