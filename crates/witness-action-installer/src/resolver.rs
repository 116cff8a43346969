//! Binary resolution state machine.
//!
//! ```text
//! CHECK_PATH --found--> RESOLVED(system)
//!     | not found
//!     v
//! CHECK_CACHE (requested version, else latest, else fallback)
//!     |--hit--> RESOLVED(cache)
//!     | miss
//!     v
//! DOWNLOAD --ok--> RESOLVED(download)
//!     \--err--> FAILED(download | extract | cache install)
//! ```
//!
//! Stages run strictly in order and each one only starts after the previous
//! one produced nothing. A binary found on the search path is never shadowed
//! by a cached copy, and the fallback version is only used when the latest
//! release cannot be determined.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tempfile::TempDir;
use tracing::{debug, info, warn};

use crate::{
    normalize_version, validate_version, HostError, InstallError, InstallerConfig, ReleaseSource,
    SearchPath, Target, ToolHost, TOOL_NAME,
};

/// Where a resolved binary came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
    /// Already on the search path.
    System,
    /// Found in the tool cache.
    Cache,
    /// Downloaded and installed during this run.
    Download,
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Resolution::System => write!(f, "system"),
            Resolution::Cache => write!(f, "cache"),
            Resolution::Download => write!(f, "download"),
        }
    }
}

/// A ready-to-run binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedBinary {
    pub path: PathBuf,
    /// Version of a cached or downloaded binary; unknown for system binaries.
    pub version: Option<String>,
    pub resolution: Resolution,
}

/// Resolves the attestor binary through a [`ToolHost`].
pub struct Resolver<H> {
    host: H,
    tool: String,
    source: ReleaseSource,
    fallback_version: String,
    target: Result<Target, (String, String)>,
}

impl<H: ToolHost> Resolver<H> {
    /// Resolver for `witness` on the current host.
    pub fn new(host: H, config: &InstallerConfig) -> Self {
        let target = Target::current().map_err(|_| {
            (
                std::env::consts::OS.to_string(),
                std::env::consts::ARCH.to_string(),
            )
        });
        Self {
            host,
            tool: TOOL_NAME.to_string(),
            source: ReleaseSource::from_config(config),
            fallback_version: config.fallback_version.clone(),
            target,
        }
    }

    /// Override the release target instead of detecting it.
    #[must_use]
    pub fn with_target(mut self, target: Target) -> Self {
        self.target = Ok(target);
        self
    }

    /// Resolve the binary, preferring the search path, then the cache, then
    /// a fresh download of `requested` (or the latest release when `None`).
    ///
    /// Directories of cached or downloaded binaries are added to
    /// `search_path`.
    pub async fn resolve(
        &self,
        requested: Option<&str>,
        search_path: &mut SearchPath,
    ) -> Result<ResolvedBinary, InstallError> {
        if let Some(path) = self.host.probe_path(&self.tool, search_path).await {
            info!(path = %path.display(), "using {} found on PATH", self.tool);
            return Ok(ResolvedBinary {
                path,
                version: None,
                resolution: Resolution::System,
            });
        }
        debug!(tool = %self.tool, "not found on PATH");

        let version = match requested.map(str::trim).filter(|v| !v.is_empty()) {
            Some(v) => normalize_version(v),
            None => self.latest_version().await,
        };
        validate_version(&version)?;
        let target = self.target()?;

        if let Some(dir) = self
            .host
            .find_cached(&self.tool, &version, target.release_arch)
            .await
        {
            info!(version = %version, dir = %dir.display(), "using cached {}", self.tool);
            search_path.prepend(&dir);
            return Ok(ResolvedBinary {
                path: dir.join(&self.tool),
                version: Some(version),
                resolution: Resolution::Cache,
            });
        }

        let dir = self.download_and_install(&version, target).await?;
        search_path.prepend(&dir);
        Ok(ResolvedBinary {
            path: dir.join(&self.tool),
            version: Some(version),
            resolution: Resolution::Download,
        })
    }

    /// Latest published version, or the fallback when the lookup fails.
    pub async fn latest_version(&self) -> String {
        match self.host.latest_tag(&self.source).await {
            Ok(tag) => {
                let version = normalize_version(&tag);
                match validate_version(&version) {
                    Ok(()) => {
                        debug!(tag = %tag, version = %version, "latest release");
                        version
                    }
                    Err(e) => {
                        warn!(
                            tag = %tag,
                            error = %e,
                            fallback = %self.fallback_version,
                            "latest release has an unusable tag, using fallback version"
                        );
                        self.fallback_version.clone()
                    }
                }
            }
            Err(e) => {
                warn!(
                    error = %e,
                    fallback = %self.fallback_version,
                    "failed to fetch latest release, using fallback version"
                );
                self.fallback_version.clone()
            }
        }
    }

    fn target(&self) -> Result<Target, InstallError> {
        self.target
            .clone()
            .map_err(|(os, arch)| InstallError::UnsupportedPlatform { os, arch })
    }

    /// Download, extract, and cache `version`; returns the cache directory.
    ///
    /// The working directory is removed on every exit path. Removal failures
    /// are logged and otherwise ignored.
    async fn download_and_install(
        &self,
        version: &str,
        target: Target,
    ) -> Result<PathBuf, InstallError> {
        let work = TempDir::new().map_err(InstallError::TempDir)?;
        let result = self.install_in(work.path(), version, target).await;

        let work_path = work.path().to_path_buf();
        if let Err(e) = work.close() {
            warn!(dir = %work_path.display(), error = %e, "failed to remove temporary directory");
        }
        result
    }

    async fn install_in(
        &self,
        work: &Path,
        version: &str,
        target: Target,
    ) -> Result<PathBuf, InstallError> {
        let archive_name = target.archive_name(&self.tool, version);
        let url = self.source.download_url(version, &archive_name);
        info!(version, url = %url, "downloading {}", self.tool);

        let archive = work.join(&archive_name);
        self.host
            .download(&url, &archive)
            .await
            .map_err(|source| InstallError::Download {
                url: url.clone(),
                source,
            })?;

        let extract_dir = work.join("extract");
        let extract_err = |source: HostError| InstallError::Extract {
            archive: archive.clone(),
            source,
        };
        std::fs::create_dir_all(&extract_dir).map_err(|e| extract_err(e.into()))?;
        self.host
            .extract(&archive, &extract_dir)
            .await
            .map_err(extract_err)?;
        mark_executable(&extract_dir.join(&self.tool)).map_err(|e| extract_err(e.into()))?;

        let dir = self
            .host
            .cache_dir(&extract_dir, &self.tool, version, target.release_arch, &url)
            .await
            .map_err(|source| InstallError::CacheInstall {
                version: version.to_string(),
                source,
            })?;

        info!(version, dir = %dir.display(), "installed {}", self.tool);
        Ok(dir)
    }
}

impl<H> Resolver<H> {
    /// Version used when the latest release cannot be determined.
    pub fn fallback_version(&self) -> &str {
        &self.fallback_version
    }
}

#[cfg(unix)]
fn mark_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let mut perms = std::fs::metadata(path)?.permissions();
    perms.set_mode(perms.mode() | 0o755);
    std::fs::set_permissions(path, perms)
}

#[cfg(not(unix))]
fn mark_executable(path: &Path) -> std::io::Result<()> {
    std::fs::metadata(path).map(|_| ())
}
