//! Command-line argument parsing and definitions
//!
//! The CLI structure uses clap's derive API for a type-safe,
//! self-documenting interface.

use clap::Parser;
use std::path::PathBuf;

/// Validate publiccode.yml manifests
///
/// Parses each file with the native publiccode-parser engine and
/// reports every validation message. Exits non-zero when any file is
/// invalid.
#[derive(Parser, Debug)]
#[command(name = "publiccode", version, about, arg_required_else_help = true)]
pub struct Cli {
    /// Manifest files to validate
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,

    /// Enable network-dependent checks (off by default)
    #[arg(long)]
    pub network: bool,

    /// Repository branch to resolve relative URLs against
    #[arg(long, value_name = "BRANCH", default_value = "")]
    pub branch: String,

    /// Base URL used to resolve relative references
    #[arg(long, value_name = "URL", default_value = "")]
    pub base_url: String,

    /// Emit a machine-readable JSON report instead of human output
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output (repeat for more verbosity)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all non-essential output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Whether colored output should be used
    pub fn use_color(&self) -> bool {
        !self.no_color && !self.json
    }
}
