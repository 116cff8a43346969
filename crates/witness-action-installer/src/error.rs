//! Installer errors.
//!
//! Each fatal stage of an install has its own variant so callers can tell a
//! failed download from a corrupt archive or an unwritable cache.

use std::path::PathBuf;

/// Opaque cause reported by a [`ToolHost`](crate::ToolHost) operation.
pub type HostError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that abort binary resolution.
#[derive(Debug, thiserror::Error)]
pub enum InstallError {
    #[error("no witness release is published for {os}/{arch}")]
    UnsupportedPlatform { os: String, arch: String },

    #[error("invalid witness version {version:?}: {reason}")]
    InvalidVersion { version: String, reason: String },

    #[error("failed to prepare a temporary directory for the download")]
    TempDir(#[source] std::io::Error),

    #[error("failed to download {url}")]
    Download {
        url: String,
        #[source]
        source: HostError,
    },

    #[error("failed to extract {}", .archive.display())]
    Extract {
        archive: PathBuf,
        #[source]
        source: HostError,
    },

    #[error("failed to install witness {version} into the tool cache")]
    CacheInstall {
        version: String,
        #[source]
        source: HostError,
    },
}
