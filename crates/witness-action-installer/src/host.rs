//! I/O capabilities used by the resolver.
//!
//! [`ToolHost`] groups everything the resolver needs from the outside world:
//! a PATH probe, the latest-release lookup, archive download and extraction,
//! and tool cache reads and writes. [`SystemHost`] is the real implementation;
//! tests substitute recording fakes.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::release::LatestRelease;
use crate::{HostError, InstallerConfig, ReleaseSource, SearchPath, ToolCache};

/// Outside-world operations behind binary resolution.
#[async_trait]
pub trait ToolHost: Send + Sync {
    /// Locate `tool` on the search path. Every failure is reported as `None`.
    async fn probe_path(&self, tool: &str, search_path: &SearchPath) -> Option<PathBuf>;

    /// Tag name of the latest release, exactly as published (e.g. `v0.10.1`).
    async fn latest_tag(&self, source: &ReleaseSource) -> Result<String, HostError>;

    /// Download `url` to the file `dest`.
    async fn download(&self, url: &str, dest: &Path) -> Result<(), HostError>;

    /// Unpack `archive` into the existing directory `dest`.
    async fn extract(&self, archive: &Path, dest: &Path) -> Result<(), HostError>;

    /// Directory of a completed cache entry.
    async fn find_cached(&self, tool: &str, version: &str, arch: &str) -> Option<PathBuf>;

    /// Copy `src` into the cache and return the entry directory.
    async fn cache_dir(
        &self,
        src: &Path,
        tool: &str,
        version: &str,
        arch: &str,
        source_url: &str,
    ) -> Result<PathBuf, HostError>;
}

/// Production host: HTTP through `reqwest`, extraction through `tar`, and an
/// on-disk [`ToolCache`].
pub struct SystemHost {
    http: reqwest::Client,
    cache: ToolCache,
    github_token: Option<String>,
}

impl SystemHost {
    pub fn new(config: &InstallerConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(format!("witness-action/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();

        Self {
            http,
            cache: ToolCache::new(&config.cache_root),
            github_token: config.github_token.clone(),
        }
    }
}

#[async_trait]
impl ToolHost for SystemHost {
    async fn probe_path(&self, tool: &str, search_path: &SearchPath) -> Option<PathBuf> {
        search_path.lookup(tool)
    }

    async fn latest_tag(&self, source: &ReleaseSource) -> Result<String, HostError> {
        debug!(url = %source.metadata_url, "fetching latest release metadata");

        let mut request = self
            .http
            .get(&source.metadata_url)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json");
        if let Some(token) = &self.github_token {
            request = request.bearer_auth(token);
        }

        let latest: LatestRelease = request
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(latest.tag_name)
    }

    async fn download(&self, url: &str, dest: &Path) -> Result<(), HostError> {
        debug!(url, dest = %dest.display(), "downloading release archive");

        let mut response = self.http.get(url).send().await?.error_for_status()?;
        let mut file = tokio::fs::File::create(dest).await?;
        let mut written = 0u64;
        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        debug!(url, bytes = written, "download complete");
        Ok(())
    }

    async fn extract(&self, archive: &Path, dest: &Path) -> Result<(), HostError> {
        let output = Command::new("tar")
            .arg("-xzf")
            .arg(archive)
            .arg("-C")
            .arg(dest)
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(format!("tar exited with {}: {}", output.status, stderr.trim()).into());
        }
        Ok(())
    }

    async fn find_cached(&self, tool: &str, version: &str, arch: &str) -> Option<PathBuf> {
        self.cache.find(tool, version, arch)
    }

    async fn cache_dir(
        &self,
        src: &Path,
        tool: &str,
        version: &str,
        arch: &str,
        source_url: &str,
    ) -> Result<PathBuf, HostError> {
        let cache = self.cache.clone();
        let src = src.to_path_buf();
        let (tool, version, arch, url) = (
            tool.to_string(),
            version.to_string(),
            arch.to_string(),
            source_url.to_string(),
        );
        let dir = tokio::task::spawn_blocking(move || {
            cache.install(&src, &tool, &version, &arch, Some(&url))
        })
        .await??;
        Ok(dir)
    }
}
