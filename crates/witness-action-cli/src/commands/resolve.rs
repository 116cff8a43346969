//! `witness-action resolve` -- locate or install witness and print its path.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::warn;

use witness_action_installer::{InstallerConfig, Resolver, SearchPath, SystemHost};
use witness_action_types::ActionInputs;

/// Resolve witness and print the binary path on stdout.
pub async fn run(version: Option<&str>) -> Result<()> {
    let inputs = ActionInputs::from_env();
    let requested = version
        .map(str::to_string)
        .or_else(|| inputs.string("witness_version"));

    let config = InstallerConfig::from_env();
    let resolver = Resolver::new(SystemHost::new(&config), &config);
    let mut search_path = SearchPath::from_env();

    let resolved = resolver
        .resolve(requested.as_deref(), &mut search_path)
        .await
        .context("failed to resolve witness")?;

    persist_search_path(&search_path);
    println!("{}", resolved.path.display());
    Ok(())
}

/// Record added directories in the runner's path file, if there is one.
pub fn persist_search_path(search_path: &SearchPath) {
    let Some(path_file) = std::env::var_os("GITHUB_PATH") else {
        return;
    };
    if let Err(e) = search_path.persist(Path::new(&path_file)) {
        warn!(error = %e, "failed to update GITHUB_PATH");
    }
}
