//! Versioned on-disk tool cache.
//!
//! Layout (compatible with the hosted runner tool cache):
//!
//! ```text
//! <root>/<tool>/<version>/<arch>/          installed files
//! <root>/<tool>/<version>/<arch>.complete  install metadata (JSON)
//! ```
//!
//! An entry only counts once its `.complete` marker exists, so a directory
//! left behind by an interrupted install is a miss and gets replaced.

use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Provenance recorded in the completion marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub tool: String,
    pub version: String,
    pub arch: String,
    pub installed_at: DateTime<Utc>,
    /// URL the archive was downloaded from, when known.
    pub source_url: Option<String>,
}

/// Handle to a tool cache rooted at a directory.
#[derive(Debug, Clone)]
pub struct ToolCache {
    root: PathBuf,
}

impl ToolCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory holding the files of one entry.
    fn entry_dir(&self, tool: &str, version: &str, arch: &str) -> PathBuf {
        self.root.join(tool).join(version).join(arch)
    }

    fn marker_path(&self, tool: &str, version: &str, arch: &str) -> PathBuf {
        self.root
            .join(tool)
            .join(version)
            .join(format!("{arch}.complete"))
    }

    /// Directory of a completed entry, if present.
    pub fn find(&self, tool: &str, version: &str, arch: &str) -> Option<PathBuf> {
        let dir = self.entry_dir(tool, version, arch);
        let marker = self.marker_path(tool, version, arch);
        if dir.is_dir() && marker.is_file() {
            debug!(tool, version, arch, dir = %dir.display(), "tool cache hit");
            Some(dir)
        } else {
            debug!(tool, version, arch, "tool cache miss");
            None
        }
    }

    /// Copy the contents of `src` into the cache and mark the entry complete.
    ///
    /// Any previous entry for the same key is replaced.
    pub fn install(
        &self,
        src: &Path,
        tool: &str,
        version: &str,
        arch: &str,
        source_url: Option<&str>,
    ) -> io::Result<PathBuf> {
        let dir = self.entry_dir(tool, version, arch);
        let marker = self.marker_path(tool, version, arch);

        if marker.exists() {
            std::fs::remove_file(&marker)?;
        }
        if dir.exists() {
            std::fs::remove_dir_all(&dir)?;
        }
        copy_dir_recursive(src, &dir)?;

        let entry = CacheEntry {
            tool: tool.to_string(),
            version: version.to_string(),
            arch: arch.to_string(),
            installed_at: Utc::now(),
            source_url: source_url.map(str::to_string),
        };
        let content = serde_json::to_string_pretty(&entry).map_err(io::Error::other)?;
        std::fs::write(&marker, content)?;

        debug!(tool, version, arch, dir = %dir.display(), "installed into tool cache");
        Ok(dir)
    }
}

/// Recursively copy a directory, skipping symlinks.
///
/// `std::fs::copy` carries permission bits over, so executables stay
/// executable.
fn copy_dir_recursive(src: &Path, dst: &Path) -> io::Result<()> {
    std::fs::create_dir_all(dst)?;

    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_symlink() {
            continue;
        }

        if src_path.is_dir() {
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }

    Ok(())
}
