//! Installer configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Name of the attestor binary and of its cache entries.
pub const TOOL_NAME: &str = "witness";

/// Last known-good release, used only when the latest release cannot be
/// determined.
pub const DEFAULT_WITNESS_VERSION: &str = "0.9.2";

/// Release page of the upstream project.
const DEFAULT_RELEASE_URL: &str = "https://github.com/in-toto/witness";

/// Endpoint describing the latest tagged release.
const DEFAULT_METADATA_URL: &str = "https://api.github.com/repos/in-toto/witness/releases/latest";

/// Tool cache location relative to home, used outside of hosted runners.
const DEFAULT_CACHE_SUBDIR: &str = ".cache/witness-action/tools";

/// Where releases come from and where they are kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallerConfig {
    /// Base URL of the release project (`<base>/releases/download/...`).
    #[serde(default = "default_release_url")]
    pub release_url: String,
    /// URL returning the latest release as JSON with a `tag_name` field.
    #[serde(default = "default_metadata_url")]
    pub metadata_url: String,
    /// Root of the versioned tool cache.
    #[serde(default = "default_cache_root")]
    pub cache_root: PathBuf,
    /// Version used when the latest release lookup fails.
    #[serde(default = "default_fallback_version")]
    pub fallback_version: String,
    /// Token for authenticated metadata requests (avoids API rate limits).
    #[serde(default, skip_serializing)]
    pub github_token: Option<String>,
}

fn default_release_url() -> String {
    DEFAULT_RELEASE_URL.into()
}

fn default_metadata_url() -> String {
    DEFAULT_METADATA_URL.into()
}

fn default_cache_root() -> PathBuf {
    home_dir()
        .map(|h| h.join(DEFAULT_CACHE_SUBDIR))
        .unwrap_or_else(|| std::env::temp_dir().join("witness-action-tools"))
}

fn default_fallback_version() -> String {
    DEFAULT_WITNESS_VERSION.into()
}

impl Default for InstallerConfig {
    fn default() -> Self {
        Self {
            release_url: default_release_url(),
            metadata_url: default_metadata_url(),
            cache_root: default_cache_root(),
            fallback_version: default_fallback_version(),
            github_token: None,
        }
    }
}

impl InstallerConfig {
    /// Defaults overridden by the process environment.
    ///
    /// - `RUNNER_TOOL_CACHE` -- tool cache root on hosted runners
    /// - `GITHUB_TOKEN` -- bearer token for the metadata request
    /// - `WITNESS_RELEASE_URL` / `WITNESS_METADATA_URL` -- mirrors
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`from_env`](Self::from_env) with an explicit variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| lookup(name).filter(|v| !v.is_empty());
        let mut config = Self::default();
        if let Some(root) = var("RUNNER_TOOL_CACHE") {
            config.cache_root = PathBuf::from(root);
        }
        if let Some(url) = var("WITNESS_RELEASE_URL") {
            config.release_url = url.trim_end_matches('/').to_string();
        }
        if let Some(url) = var("WITNESS_METADATA_URL") {
            config.metadata_url = url;
        }
        config.github_token = var("GITHUB_TOKEN");
        config
    }
}

fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_point_at_upstream() {
        let config = InstallerConfig::from_lookup(lookup(&[]));
        assert_eq!(config.release_url, DEFAULT_RELEASE_URL);
        assert_eq!(config.metadata_url, DEFAULT_METADATA_URL);
        assert_eq!(config.fallback_version, DEFAULT_WITNESS_VERSION);
        assert!(config.github_token.is_none());
    }

    #[test]
    fn runner_variables_override_defaults() {
        let config = InstallerConfig::from_lookup(lookup(&[
            ("RUNNER_TOOL_CACHE", "/opt/hostedtoolcache"),
            ("GITHUB_TOKEN", "ghs_abc"),
            ("WITNESS_RELEASE_URL", "https://mirror.example/witness/"),
        ]));
        assert_eq!(config.cache_root, PathBuf::from("/opt/hostedtoolcache"));
        assert_eq!(config.github_token.as_deref(), Some("ghs_abc"));
        assert_eq!(config.release_url, "https://mirror.example/witness");
    }

    #[test]
    fn empty_variables_are_ignored() {
        let config = InstallerConfig::from_lookup(lookup(&[
            ("RUNNER_TOOL_CACHE", ""),
            ("GITHUB_TOKEN", ""),
        ]));
        assert_ne!(config.cache_root, PathBuf::from(""));
        assert!(config.github_token.is_none());
    }

    #[test]
    fn token_is_never_serialized() {
        let config = InstallerConfig {
            github_token: Some("secret".into()),
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret"));
    }
}
