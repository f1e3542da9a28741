//! CLI argument definitions using clap derive

use crate::device::UpdateKind;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

/// otacheck - ROM and kernel update checker
///
/// Compares OTA metadata for an available build against the build
/// installed on the device and reports whether it is newer.
#[derive(Parser, Debug)]
#[command(name = "otacheck")]
#[command(author, version, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "OTACHECK_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the installed ROM and kernel state
    Status(StatusArgs),

    /// Check whether metadata describes a newer build
    Check(CheckArgs),

    /// Print the MD5 digest of a string or file
    Hash(HashArgs),

    /// Show or edit configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Component to check
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Target {
    /// Installed ROM (firmware image)
    Rom,
    /// Installed kernel
    Kernel,
}

impl From<Target> for UpdateKind {
    fn from(target: Target) -> Self {
        match target {
            Target::Rom => UpdateKind::Rom,
            Target::Kernel => UpdateKind::Kernel,
        }
    }
}

/// Arguments for the status command
#[derive(Parser, Debug)]
pub struct StatusArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the check command
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Component the metadata describes
    #[arg(value_enum)]
    pub target: Target,

    /// Metadata file for the available build ("-" reads stdin)
    #[arg(short, long, default_value = "-")]
    pub metadata: PathBuf,

    /// Download the build when it is an update
    #[arg(short, long)]
    pub download: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the hash command
#[derive(Parser, Debug)]
pub struct HashArgs {
    /// Text to hash
    #[arg(required_unless_present = "file", conflicts_with = "file")]
    pub text: Option<String>,

    /// File to hash
    #[arg(short, long)]
    pub file: Option<PathBuf>,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

/// Arguments for the completions command
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
