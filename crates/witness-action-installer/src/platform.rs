//! Platform and architecture naming for release archives.
//!
//! Release assets follow `<tool>_<version>_<platform>_<arch>.<ext>`. The
//! mapping from the host to those names is plain data so new targets are a
//! table entry, not new code.

use serde::Serialize;

use crate::InstallError;

/// One published release target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Target {
    /// Host OS as reported by `std::env::consts::OS`.
    pub os: &'static str,
    /// Host arch as reported by `std::env::consts::ARCH`.
    pub arch: &'static str,
    /// Platform segment of the asset name.
    pub platform: &'static str,
    /// Architecture segment of the asset name, also used as the cache key.
    pub release_arch: &'static str,
    /// Archive extension without the leading dot.
    pub extension: &'static str,
}

/// Targets with published `.tar.gz` assets.
pub const SUPPORTED_TARGETS: &[Target] = &[
    Target {
        os: "linux",
        arch: "x86_64",
        platform: "linux",
        release_arch: "amd64",
        extension: "tar.gz",
    },
    Target {
        os: "linux",
        arch: "aarch64",
        platform: "linux",
        release_arch: "arm64",
        extension: "tar.gz",
    },
    Target {
        os: "macos",
        arch: "x86_64",
        platform: "darwin",
        release_arch: "amd64",
        extension: "tar.gz",
    },
    Target {
        os: "macos",
        arch: "aarch64",
        platform: "darwin",
        release_arch: "arm64",
        extension: "tar.gz",
    },
];

impl Target {
    /// Look up the target for an OS/arch pair.
    pub fn lookup(os: &str, arch: &str) -> Result<Target, InstallError> {
        SUPPORTED_TARGETS
            .iter()
            .find(|t| t.os == os && t.arch == arch)
            .copied()
            .ok_or_else(|| InstallError::UnsupportedPlatform {
                os: os.to_string(),
                arch: arch.to_string(),
            })
    }

    /// The target for the running host.
    pub fn current() -> Result<Target, InstallError> {
        Self::lookup(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// Asset file name, e.g. `witness_0.9.2_linux_amd64.tar.gz`.
    pub fn archive_name(&self, tool: &str, version: &str) -> String {
        format!(
            "{tool}_{version}_{}_{}.{}",
            self.platform, self.release_arch, self.extension
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn archive_name_follows_release_convention() {
        let target = Target::lookup("linux", "x86_64").unwrap();
        assert_eq!(
            target.archive_name("witness", "0.9.2"),
            "witness_0.9.2_linux_amd64.tar.gz"
        );

        let target = Target::lookup("macos", "aarch64").unwrap();
        assert_eq!(
            target.archive_name("witness", "0.10.1"),
            "witness_0.10.1_darwin_arm64.tar.gz"
        );
    }

    #[test]
    fn unknown_host_is_unsupported() {
        let err = Target::lookup("windows", "x86_64").unwrap_err();
        assert!(matches!(err, InstallError::UnsupportedPlatform { .. }));
        assert!(err.to_string().contains("windows/x86_64"));
    }

    #[test]
    fn table_has_no_duplicate_hosts() {
        for (i, a) in SUPPORTED_TARGETS.iter().enumerate() {
            for b in &SUPPORTED_TARGETS[i + 1..] {
                assert!(
                    !(a.os == b.os && a.arch == b.arch),
                    "duplicate target {}/{}",
                    a.os,
                    a.arch
                );
            }
        }
    }
}
