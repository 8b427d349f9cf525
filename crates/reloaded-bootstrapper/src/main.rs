//! Reloaded-II bootstrapper command-line entry point.
//!
//! Resolves the mod loader paths from the per-user launcher configuration and
//! prints them, so scripts and external launchers can start the loader
//! without re-implementing the lookup.
//!
//! # Usage
//!
//! ```text
//! reloaded-bootstrapper [OPTIONS] [COMMAND]
//!
//! Commands:
//!   loader          Loader DLL for the selected architecture
//!   runtime-config  The loader's .runtimeconfig.json
//!   launcher        Launcher executable
//!   loader-paths    Loader DLL and runtime configuration
//!   all             Loader, runtime configuration, and launcher [default]
//!   layout          Well-known Reloaded-II folders
//!
//! Options:
//!   --arch <x86|x64>        Loader build to resolve [default: this build]
//!   --format <text|json>    Output format [default: text]
//!   --log-level <LEVEL>     Log filter when RUST_LOG is unset [default: warn]
//! ```
//!
//! # Environment variable overrides
//!
//! | Variable          | Option        |
//! |-------------------|---------------|
//! | `RELOADED_ARCH`   | `--arch`      |
//! | `RELOADED_FORMAT` | `--format`    |
//! | `RELOADED_LOG`    | `--log-level` |
//!
//! Results go to stdout, logs to stderr.  Any resolution failure exits
//! non-zero with the error chain on stderr.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use reloaded_bootstrapper::application::resolve_paths::{resolve_layout, LoaderConfig};
use reloaded_bootstrapper::infrastructure::filesystem::OsFileSystem;
use reloaded_bootstrapper::infrastructure::special_folder::NativeFolderResolver;
use reloaded_core::domain::layout::ReloadedLayout;
use reloaded_core::{LoaderArchitecture, LoaderPaths, ResolvedPaths};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Locates the Reloaded-II mod loader from `%APPDATA%\Reloaded-Mod-Loader-II\ReloadedII.json`.
#[derive(Debug, Parser)]
#[command(
    name = "reloaded-bootstrapper",
    about = "Resolve the Reloaded-II loader, runtime configuration, and launcher paths",
    version
)]
struct Cli {
    /// Loader build to resolve (`LoaderPath32` for x86, `LoaderPath64` for x64).
    #[arg(long, default_value_t = LoaderArchitecture::NATIVE, env = "RELOADED_ARCH")]
    arch: LoaderArchitecture,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, env = "RELOADED_FORMAT")]
    format: OutputFormat,

    /// `tracing` filter used when `RUST_LOG` is not set.
    #[arg(long, default_value = "warn", env = "RELOADED_LOG")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, Subcommand)]
enum Command {
    /// Loader DLL for the selected architecture.
    Loader,
    /// The loader's `.runtimeconfig.json`.
    RuntimeConfig,
    /// Launcher executable.
    Launcher,
    /// Loader DLL and runtime configuration.
    LoaderPaths,
    /// Loader, runtime configuration, and launcher.
    All,
    /// Well-known Reloaded-II folders and install files.
    Layout,
}

// ── Output ────────────────────────────────────────────────────────────────────

/// Formats a result for stdout.  Text output with a single line is the bare
/// path, so it can be captured directly by a script.
fn render_output<T: Serialize>(
    format: OutputFormat,
    value: &T,
    lines: &[(&str, &Path)],
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(value).context("failed to encode JSON output")
        }
        OutputFormat::Text if lines.len() == 1 => Ok(lines[0].1.display().to_string()),
        OutputFormat::Text => {
            let width = lines.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
            let rendered: Vec<String> = lines
                .iter()
                .map(|(key, path)| format!("{key:<width$}  {}", path.display()))
                .collect();
            Ok(rendered.join("\n"))
        }
    }
}

fn render_single(format: OutputFormat, key: &str, path: &Path) -> anyhow::Result<String> {
    let value = BTreeMap::from([(key, path)]);
    render_output(format, &value, &[(key, path)])
}

fn render_loader_paths(format: OutputFormat, paths: &LoaderPaths) -> anyhow::Result<String> {
    render_output(
        format,
        paths,
        &[
            ("loader", paths.loader.as_path()),
            ("runtime_config", paths.runtime_config.as_path()),
        ],
    )
}

fn render_resolved(format: OutputFormat, paths: &ResolvedPaths) -> anyhow::Result<String> {
    render_output(
        format,
        paths,
        &[
            ("loader", paths.loader.as_path()),
            ("runtime_config", paths.runtime_config.as_path()),
            ("launcher", paths.launcher.as_path()),
        ],
    )
}

fn render_layout(format: OutputFormat, layout: &ReloadedLayout) -> anyhow::Result<String> {
    let mut lines: Vec<(&str, &Path)> = vec![
        ("config_folder", layout.config_folder.as_path()),
        ("config_path", layout.config_path.as_path()),
        ("logs_folder", layout.logs_folder.as_path()),
        ("archived_logs_path", layout.archived_logs_path.as_path()),
        ("profile_optimization_folder", layout.profile_optimization_folder.as_path()),
    ];
    if let Some(install) = &layout.install {
        lines.extend([
            ("loader_folder", install.loader_folder.as_path()),
            ("loader_path", install.loader_path.as_path()),
            ("bootstrapper_path", install.bootstrapper_path.as_path()),
            (
                "kernel32_address_dumper_path",
                install.kernel32_address_dumper_path.as_path(),
            ),
        ]);
    }
    render_output(format, layout, &lines)
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn run(cli: &Cli) -> anyhow::Result<String> {
    let folders = NativeFolderResolver::new();
    let format = cli.format;
    let command = cli.command.unwrap_or(Command::All);

    // The per-user folders do not depend on ReloadedII.json.
    if let Command::Layout = command {
        let layout = resolve_layout(&folders, OsFileSystem, cli.arch)
            .context("failed to locate the Reloaded-II folders")?;
        if layout.install.is_none() {
            warn!("install layout unavailable, printing per-user folders only");
        }
        return render_layout(format, &layout);
    }

    let config = LoaderConfig::load(&folders, OsFileSystem, cli.arch)
        .context("failed to load the Reloaded launcher configuration")?;
    info!(
        path = %config.config_path().display(),
        arch = %config.architecture(),
        "configuration loaded"
    );

    match command {
        Command::Loader => render_single(format, "loader", &config.get_loader_path()?),
        Command::RuntimeConfig => {
            render_single(format, "runtime_config", &config.get_runtime_config_path()?)
        }
        Command::Launcher => render_single(format, "launcher", &config.get_launcher_path()?),
        Command::LoaderPaths => render_loader_paths(format, &config.get_loader_paths()?),
        Command::All => render_resolved(format, &config.resolve_all()?),
        Command::Layout => render_layout(format, &config.layout()),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // `RUST_LOG` wins over `--log-level`.  Logs go to stderr so stdout only
    // ever carries resolved paths.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .init();

    info!(arch = %cli.arch, "Reloaded bootstrapper starting");

    let output = run(&cli)?;
    println!("{output}");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
