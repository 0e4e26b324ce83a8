//! CLI module
//!
//! Command-line front end over the pagination controller.
//!
//! # Commands
//!
//! - `search` - Run a search and load one or more pages
//! - `detail` - Show a single character
//! - `download` - Save an asset to disk

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
