//! Command line interface definition

use clap::{Args, Parser, Subcommand};
use pscaf_config::ColorChoice;
use std::path::PathBuf;

/// pscaf - scaffold a platform build from a release artifact and patches
#[derive(Parser)]
#[command(name = "pscaf")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Scaffold a platform build from a release artifact and patches")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Global arguments available for all commands
#[derive(Parser)]
pub struct GlobalArgs {
    /// Output the final report in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Write debug logs to the log directory
    #[arg(long, global = true)]
    pub debug: bool,

    /// Echo external commands and stream their output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Color output control
    #[arg(long, global = true, value_enum, value_name = "WHEN")]
    pub color: Option<ColorChoice>,

    /// Use alternate config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Where to read the scaffold options from
#[derive(Args, Clone)]
pub struct ManifestArgs {
    /// Package manifest holding the scaffold options
    #[arg(long, env = "PSCAF_MANIFEST", value_name = "PATH")]
    pub manifest: Option<PathBuf>,

    /// Key under the manifest's `extra` section
    #[arg(long, env = "PSCAF_EXTRA_KEY", value_name = "KEY")]
    pub extra_key: Option<String>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Download, extract and patch the platform into the build directory
    Scaffold {
        #[command(flatten)]
        manifest: ManifestArgs,

        /// Directory of bundled patches
        #[arg(long, value_name = "DIR")]
        patches_dir: Option<PathBuf>,

        /// Override the platform version from the manifest
        #[arg(long, value_name = "VERSION")]
        version: Option<String>,

        /// Override the build directory from the manifest
        #[arg(long, value_name = "DIR")]
        build_dir: Option<PathBuf>,

        /// Exit with an error status when any patch fails
        #[arg(long)]
        strict: bool,
    },

    /// Print the artifact URL a scaffold run would download
    Uri {
        #[command(flatten)]
        manifest: ManifestArgs,

        /// Override the platform version from the manifest
        #[arg(long, value_name = "VERSION")]
        version: Option<String>,
    },
}
