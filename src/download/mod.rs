//! Asset download module
//!
//! Saves an item's image to disk, independently of any pagination state.
//!
//! # Features
//!
//! - Streaming writes (the body is never held in memory whole)
//! - File names sanitized from a suggestion, extension inferred from the URL
//! - Existing files are never overwritten; a numeric suffix is added instead
//! - Writes go to a temporary file that is renamed into place

mod downloader;

pub use downloader::{sanitize_file_name, AssetDownloader, HttpAssetDownloader};

#[cfg(test)]
mod tests;
