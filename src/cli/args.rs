//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// dotnet-locator - Find the installed .NET toolchain.
#[derive(Debug, Parser)]
#[command(name = "dotnet-locator")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory to probe from (global.json lookup, `dotnet --info` working directory)
    #[arg(short, long, global = true, env = "DOTNET_LOCATOR_PROBE_DIR")]
    pub probe_dir: Option<PathBuf>,

    /// Installation root to use instead of discovering one
    #[arg(short, long, global = true, env = "DOTNET_LOCATOR_ROOT")]
    pub root: Option<PathBuf>,

    /// Cancel discovery after this many seconds
    #[arg(long, global = true, env = "DOTNET_LOCATOR_TIMEOUT", value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Print requested data only
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the full installation report (default if no command specified)
    Info,

    /// List installed SDKs
    Sdks(SdksArgs),

    /// List installed runtimes (shared frameworks)
    Runtimes(RuntimesArgs),

    /// Print the installation root
    Root,

    /// Show the global.json that applies to the probing directory
    Pin,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `sdks` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct SdksArgs {
    /// Show only the newest SDK
    #[arg(long)]
    pub latest: bool,
}

/// Arguments for the `runtimes` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct RuntimesArgs {
    /// Show only runtimes with this framework name
    #[arg(long, value_name = "FRAMEWORK")]
    pub name: Option<String>,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
