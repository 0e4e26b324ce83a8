//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Browse a paginated gallery API from the terminal
#[derive(Parser, Debug)]
#[command(name = "gallery-feed")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search and page through results
    Search {
        /// Search term (empty lists everything)
        #[arg(short, long, default_value = "")]
        term: String,

        /// Number of pages to load
        #[arg(short, long, default_value = "1")]
        pages: u32,

        /// Show every category instead of the configured ones
        #[arg(long)]
        all_categories: bool,
    },

    /// Show one character
    Detail {
        /// Character id
        id: String,
    },

    /// Download an asset
    Download {
        /// Asset URL
        url: String,

        /// Suggested file name
        #[arg(short, long)]
        name: Option<String>,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Human-readable output
    Pretty,
}
