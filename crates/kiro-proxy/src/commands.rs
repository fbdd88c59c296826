//! CLI commands

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Kiro Proxy - Use Claude models with OpenAI-compatible API.
#[derive(Parser, Debug)]
#[command(name = "kiro-proxy")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Configure Kiro Proxy with a credentials file
    Install {
        /// Path to Kiro credentials JSON file (optional with --ide)
        credentials_file: Option<PathBuf>,

        /// Auto-detect Kiro IDE credentials
        #[arg(long)]
        ide: bool,

        /// Custom API key (auto-generated if not provided)
        #[arg(short = 'k', long)]
        api_key: Option<String>,
    },

    /// Start the Kiro Proxy server
    Start {
        /// Server port (default: configured port, then 8000)
        #[arg(short, long, value_parser = clap::value_parser!(u16).range(1..))]
        port: Option<u16>,
    },

    /// Interactive setup wizard
    Init,

    /// Show current configuration status
    Status,
}
