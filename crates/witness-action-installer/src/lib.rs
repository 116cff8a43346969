//! Locate or install the `witness` binary for the current job.
//!
//! Resolution order never changes: a binary already on the search path wins,
//! then a cached copy of the requested (or latest) version, then a fresh
//! download that is installed into the tool cache.
//!
//! - [`Resolver`] -- the resolution state machine
//! - [`ToolHost`] / [`SystemHost`] -- I/O capabilities the resolver relies on
//! - [`ToolCache`] -- versioned on-disk cache of installed binaries
//! - [`Target`] -- platform/arch naming for release archives
//! - [`SearchPath`] -- directories made available to later lookups in the job

pub mod cache;
pub mod config;
pub mod error;
pub mod host;
pub mod platform;
pub mod release;
pub mod resolver;
pub mod search_path;

pub use cache::{CacheEntry, ToolCache};
pub use config::{InstallerConfig, DEFAULT_WITNESS_VERSION, TOOL_NAME};
pub use error::{HostError, InstallError};
pub use host::{SystemHost, ToolHost};
pub use platform::{Target, SUPPORTED_TARGETS};
pub use release::{normalize_version, validate_version, ReleaseSource};
pub use resolver::{Resolution, ResolvedBinary, Resolver};
pub use search_path::SearchPath;
