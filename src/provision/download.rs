//! Archive downloading.
//!
//! A [`Fetch`] implementation moves one URL to one local file. [`download`]
//! walks a candidate URL list and stops at the first success.

use crate::error::{Result, ToolrigError};
use anyhow::{bail, Context};
use reqwest::blocking::Client;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// Retrieves a single URL into a local file.
pub trait Fetch {
    /// Write the resource at `url` to `dest`.
    fn fetch(&self, url: &str, dest: &Path) -> anyhow::Result<()>;
}

/// Fetches over HTTP/HTTPS, and copies `file://` URLs and plain paths.
///
/// No overall request timeout is set.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Create a new fetcher.
    pub fn new() -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("toolrig/", env!("CARGO_PKG_VERSION")))
            .timeout(None)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client })
    }

    fn fetch_http(&self, url: &str, dest: &Path) -> anyhow::Result<()> {
        let mut response = self.client.get(url).send()?;

        if !response.status().is_success() {
            bail!("HTTP {} fetching {}", response.status(), url);
        }

        let mut file =
            File::create(dest).with_context(|| format!("Failed to create {:?}", dest))?;
        response
            .copy_to(&mut file)
            .with_context(|| format!("Failed to read body of {}", url))?;
        Ok(())
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str, dest: &Path) -> anyhow::Result<()> {
        if url.starts_with("http://") || url.starts_with("https://") {
            return self.fetch_http(url, dest);
        }

        let source = local_source(url);
        fs::copy(&source, dest)
            .with_context(|| format!("Failed to copy {:?} to {:?}", source, dest))?;
        Ok(())
    }
}

/// Map a `file://` URL or plain path to a local path.
fn local_source(url: &str) -> PathBuf {
    PathBuf::from(url.strip_prefix("file://").unwrap_or(url))
}

/// Download `urls` in order into `dest`, stopping at the first success.
///
/// Data is written to a `.part` file next to `dest` and renamed into place,
/// so `dest` never holds a truncated download.
pub fn download(fetcher: &dyn Fetch, urls: &[String], dest: &Path) -> Result<()> {
    if urls.is_empty() {
        return Err(ToolrigError::Download {
            urls: Vec::new(),
            message: "no URLs given".to_string(),
        });
    }

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut partial = dest.as_os_str().to_owned();
    partial.push(".part");
    let partial = PathBuf::from(partial);

    let mut last_error = String::new();
    for url in urls {
        tracing::info!("downloading {}", url);
        match fetcher.fetch(url, &partial) {
            Ok(()) => {
                fs::rename(&partial, dest)?;
                return Ok(());
            }
            Err(e) => {
                tracing::warn!("download from {} failed: {:#}", url, e);
                last_error = format!("{:#}", e);
                let _ = fs::remove_file(&partial);
            }
        }
    }

    Err(ToolrigError::Download {
        urls: urls.to_vec(),
        message: last_error,
    })
}
