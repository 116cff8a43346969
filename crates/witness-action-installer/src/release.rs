//! Release metadata and download URLs.

use serde::Deserialize;

use crate::{InstallError, InstallerConfig};

/// Maximum accepted length of a version string.
const MAX_VERSION_LEN: usize = 64;

/// Where release metadata and assets are published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseSource {
    /// Project base URL; assets live under `<base>/releases/download/`.
    pub release_url: String,
    /// Latest-release metadata endpoint.
    pub metadata_url: String,
}

impl ReleaseSource {
    pub fn from_config(config: &InstallerConfig) -> Self {
        Self {
            release_url: config.release_url.clone(),
            metadata_url: config.metadata_url.clone(),
        }
    }

    /// `<base>/releases/download/v<version>/<archive>`.
    pub fn download_url(&self, version: &str, archive: &str) -> String {
        format!(
            "{}/releases/download/v{version}/{archive}",
            self.release_url.trim_end_matches('/')
        )
    }
}

/// Subset of the latest-release payload we care about.
#[derive(Debug, Deserialize)]
pub(crate) struct LatestRelease {
    pub tag_name: String,
}

/// Strip surrounding whitespace and one leading `v` from a tag or version.
pub fn normalize_version(raw: &str) -> String {
    let trimmed = raw.trim();
    trimmed.strip_prefix('v').unwrap_or(trimmed).to_string()
}

/// Check that a version is safe to embed in cache paths and URLs.
pub fn validate_version(version: &str) -> Result<(), InstallError> {
    let invalid = |reason: &str| InstallError::InvalidVersion {
        version: version.to_string(),
        reason: reason.to_string(),
    };

    if version.is_empty() {
        return Err(invalid("must not be empty"));
    }
    if version.len() > MAX_VERSION_LEN {
        return Err(invalid("too long"));
    }
    if !version
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '+'))
    {
        return Err(invalid(
            "only ASCII letters, digits, '.', '-' and '+' are allowed",
        ));
    }
    if version.contains("..") {
        return Err(invalid("must not contain path traversal"));
    }
    Ok(())
}
