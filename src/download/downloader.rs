//! Asset downloader implementation

use crate::error::{Error, Result};
use crate::http::HttpClient;
use async_trait::async_trait;
use futures::StreamExt;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};
use url::Url;

static UNSAFE_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9._-]+").expect("static regex is valid"));

const MAX_FILE_NAME_LEN: usize = 100;
const FALLBACK_FILE_NAME: &str = "asset";
const MAX_NAME_ATTEMPTS: u32 = 10_000;

/// Downloads a single asset.
///
/// Failures are reported to the caller only; they never touch pagination state.
#[async_trait]
pub trait AssetDownloader: Send + Sync {
    /// Download `url`, saving it under a name derived from `suggested_file_name`.
    /// Returns where the file was written.
    async fn download(&self, url: &str, suggested_file_name: &str) -> Result<PathBuf>;
}

/// [`AssetDownloader`] that streams over HTTP into a directory.
///
/// Give it its own [`HttpClient`]: asset hosts are arbitrary, so the client
/// should carry no API headers and a timeout sized for whole files.
#[derive(Debug, Clone)]
pub struct HttpAssetDownloader {
    http: HttpClient,
    directory: PathBuf,
}

impl HttpAssetDownloader {
    /// Create a downloader writing into `directory` (created on first use)
    pub fn new(http: HttpClient, directory: impl AsRef<Path>) -> Self {
        Self {
            http,
            directory: directory.as_ref().to_path_buf(),
        }
    }

    /// Target directory
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Claim a file name for `url` in the target directory.
    ///
    /// The name is taken by creating an empty file with `create_new`, so two
    /// concurrent downloads never end up with the same path.
    pub async fn reserve(&self, url: &Url, suggested_file_name: &str) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.directory).await?;

        let name = file_name_for(url, suggested_file_name);
        for candidate in candidate_names(&name) {
            let path = self.directory.join(candidate);
            match tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(_) => return Ok(path),
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Err(Error::download(
            url.as_str(),
            format!("no free file name for '{name}'"),
        ))
    }

    /// Stream `url` into `target` through a sibling `.part` file
    async fn fetch_to(&self, url: &Url, target: &Path) -> Result<u64> {
        let temp_path = part_path(target);

        let written = match self.stream_into(url, &temp_path).await {
            Ok(written) => written,
            Err(e) => {
                let _ = tokio::fs::remove_file(&temp_path).await;
                return Err(e);
            }
        };

        if let Err(e) = tokio::fs::rename(&temp_path, target).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        Ok(written)
    }

    async fn stream_into(&self, url: &Url, temp_path: &Path) -> Result<u64> {
        let response = self.http.get(url.as_str()).await?;

        let mut file = tokio::fs::File::create(temp_path).await?;
        let mut stream = response.bytes_stream();
        let mut written: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }

        file.flush().await?;
        Ok(written)
    }
}

#[async_trait]
impl AssetDownloader for HttpAssetDownloader {
    async fn download(&self, url: &str, suggested_file_name: &str) -> Result<PathBuf> {
        let parsed = Url::parse(url).map_err(|e| Error::download(url, e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::download(
                url,
                format!("unsupported scheme '{}'", parsed.scheme()),
            ));
        }

        let to_download_error = |e: Error| match e {
            Error::Download { .. } => e,
            other => Error::download(url, other.to_string()),
        };

        let target = self
            .reserve(&parsed, suggested_file_name)
            .await
            .map_err(to_download_error)?;
        debug!("Downloading {} to {}", url, target.display());

        match self.fetch_to(&parsed, &target).await {
            Ok(bytes) => {
                info!("Saved {} ({} bytes)", target.display(), bytes);
                Ok(target)
            }
            Err(e) => {
                // release the reserved name
                let _ = tokio::fs::remove_file(&target).await;
                Err(to_download_error(e))
            }
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Reduce a suggested name to a safe single path component.
///
/// Runs of anything other than ASCII letters, digits, `.`, `_` and `-` become
/// `_`; leading and trailing dots are stripped so the result is never hidden or `..`.
pub fn sanitize_file_name(name: &str) -> String {
    let replaced = UNSAFE_CHARS.replace_all(name.trim(), "_");
    let trimmed = replaced.trim_matches(|c: char| c == '.' || c == '_');

    let mut sanitized: String = trimmed.chars().take(MAX_FILE_NAME_LEN).collect();
    if sanitized.is_empty() {
        sanitized.push_str(FALLBACK_FILE_NAME);
    }
    sanitized
}

/// Sanitized name, falling back to the URL's last segment, with the URL's
/// extension appended when the name has none
fn file_name_for(url: &Url, suggested: &str) -> String {
    let last_segment = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|segment| !segment.is_empty())
        .unwrap_or(FALLBACK_FILE_NAME);

    let base = if suggested.trim().is_empty() {
        last_segment
    } else {
        suggested
    };
    let name = sanitize_file_name(base);

    if Path::new(&name).extension().is_some() {
        return name;
    }

    match Path::new(last_segment)
        .extension()
        .and_then(|ext| ext.to_str())
    {
        Some(ext) => format!("{name}.{}", sanitize_file_name(ext)),
        None => name,
    }
}

/// `name`, then `stem-1.ext`, `stem-2.ext`, ... up to [`MAX_NAME_ATTEMPTS`] names
fn candidate_names(name: &str) -> impl Iterator<Item = String> + '_ {
    let path = Path::new(name);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(FALLBACK_FILE_NAME);
    let ext = path.extension().and_then(|e| e.to_str());

    std::iter::once(name.to_string()).chain((1..MAX_NAME_ATTEMPTS).map(move |n| match ext {
        Some(ext) => format!("{stem}-{n}.{ext}"),
        None => format!("{stem}-{n}"),
    }))
}

/// `target` with `.part` appended to the full file name
pub(super) fn part_path(target: &Path) -> PathBuf {
    let mut name = target.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}
