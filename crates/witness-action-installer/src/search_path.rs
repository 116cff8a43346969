//! Directories made available to executable lookups for the rest of the job.
//!
//! The resolver never touches the process environment. Directories it adds
//! are collected here; the caller renders them into the child's `PATH` and
//! persists them for later steps through the runner's `GITHUB_PATH` file.

use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Ordered set of directories, most recently added first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPath {
    base: Option<OsString>,
    added: Vec<PathBuf>,
}

impl SearchPath {
    /// Start from the current process `PATH`.
    pub fn from_env() -> Self {
        Self::with_base(std::env::var_os("PATH"))
    }

    /// Start from an explicit base `PATH` value.
    pub fn with_base(base: Option<OsString>) -> Self {
        Self {
            base,
            added: Vec::new(),
        }
    }

    /// Make `dir` available ahead of everything already on the path.
    pub fn prepend(&mut self, dir: impl Into<PathBuf>) {
        let dir = dir.into();
        self.added.retain(|d| d != &dir);
        debug!(dir = %dir.display(), "adding directory to search path");
        self.added.insert(0, dir);
    }

    /// Directories added during this run, most recent first.
    pub fn added(&self) -> &[PathBuf] {
        &self.added
    }

    /// All directories in lookup order.
    pub fn dirs(&self) -> Vec<PathBuf> {
        let mut dirs = self.added.clone();
        if let Some(base) = &self.base {
            dirs.extend(std::env::split_paths(base).filter(|d| !d.as_os_str().is_empty()));
        }
        dirs
    }

    /// The combined value to hand a child process as `PATH`.
    pub fn to_env_value(&self) -> Option<OsString> {
        std::env::join_paths(self.dirs()).ok()
    }

    /// Find an executable file named `name` in lookup order.
    pub fn lookup(&self, name: &str) -> Option<PathBuf> {
        if name.is_empty() || name.contains('/') || name.contains('\\') {
            return None;
        }
        self.dirs()
            .into_iter()
            .map(|dir| dir.join(name))
            .find(|candidate| is_executable(candidate))
    }

    /// Append the added directories to the runner's path file so later steps
    /// see them. Directories are written oldest first, matching how the
    /// runner prepends each line in turn.
    pub fn persist(&self, path_file: &Path) -> std::io::Result<()> {
        if self.added.is_empty() {
            return Ok(());
        }
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path_file)?;
        for dir in self.added.iter().rev() {
            writeln!(file, "{}", dir.display())?;
        }
        Ok(())
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
