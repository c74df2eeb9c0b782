//! Main CLI parser and top-level argument handling.

use clap::Parser;

use crate::commands::Commands;

/// Command-line interface for notiflow workflow documents.
#[derive(Debug, Parser)]
#[command(name = "notiflow")]
#[command(about = "Normalize, inspect and render notiflow workflow API documents")]
#[command(version)]
pub struct Cli {
    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    /// Print JSON on a single line
    #[arg(long, global = true)]
    pub compact: bool,

    /// Override the API server URL for this invocation
    #[arg(long = "server-url", global = true)]
    pub server_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}
