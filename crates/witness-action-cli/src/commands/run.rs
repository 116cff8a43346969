//! `witness-action run` -- the wrapper itself.
//!
//! Reads the step inputs, resolves witness, and runs
//! `witness run <flags> -- <payload>` as a child process. The payload reaches
//! its interpreter untouched. witness's exit code becomes ours.

use std::path::Path;
use std::process::Stdio;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info, warn};

use witness_action_command::assemble;
use witness_action_installer::{InstallerConfig, ResolvedBinary, Resolver, SearchPath, SystemHost};
use witness_action_types::{ActionInputs, WitnessOptions};

use crate::commands::resolve::persist_search_path;
use crate::outputs::{write_step_output, write_summary, GitoidCollector};

/// Run the wrapped command and return witness's exit code.
pub async fn run(trailing: &[String]) -> Result<i32> {
    let inputs = ActionInputs::from_env();
    let options = WitnessOptions::from_inputs(&inputs).context("invalid action inputs")?;
    let payload = super::payload(trailing, &inputs)?;

    let config = InstallerConfig::from_env();
    let resolver = Resolver::new(SystemHost::new(&config), &config);
    let mut search_path = SearchPath::from_env();

    let requested = inputs.string("witness_version");
    let witness = resolver
        .resolve(requested.as_deref(), &mut search_path)
        .await
        .context("failed to resolve witness")?;
    info!(
        path = %witness.path.display(),
        resolution = %witness.resolution,
        version = witness.version.as_deref().unwrap_or("system"),
        "resolved witness"
    );
    persist_search_path(&search_path);

    let argv = assemble(&options, &payload);
    let (code, gitoids) = execute(&witness, &argv, &search_path).await?;

    if !gitoids.is_empty() {
        record_outputs(&options, &gitoids);
    }
    if code != 0 {
        warn!(code, "witness exited with a non-zero status");
    }
    Ok(code)
}

/// Spawn witness, mirror its stdout byte for byte while scanning for
/// gitoids, and wait. Output problems never cost us the exit code.
async fn execute(
    witness: &ResolvedBinary,
    argv: &[String],
    search_path: &SearchPath,
) -> Result<(i32, Vec<String>)> {
    debug!(binary = %witness.path.display(), ?argv, "spawning witness");

    let mut command = Command::new(&witness.path);
    command
        .args(argv)
        .stdin(Stdio::inherit())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit());
    if let Some(path) = search_path.to_env_value() {
        command.env("PATH", path);
    }

    let mut child = command
        .spawn()
        .with_context(|| format!("failed to start {}", witness.path.display()))?;

    let mut collector = GitoidCollector::default();
    if let Some(stdout) = child.stdout.take() {
        let mut reader = BufReader::new(stdout);
        let mut out = tokio::io::stdout();
        let mut forward = true;
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break,
                Ok(_) => {
                    collector.observe(&String::from_utf8_lossy(&buf));
                    if forward {
                        if let Err(e) = out.write_all(&buf).await {
                            warn!(error = %e, "failed to forward witness output");
                            forward = false;
                        }
                    }
                }
                Err(e) => {
                    warn!(error = %e, "failed to read witness output");
                    break;
                }
            }
        }
        if forward {
            if let Err(e) = out.flush().await {
                warn!(error = %e, "failed to flush witness output");
            }
        }
    }

    let status = child.wait().await.context("failed to wait for witness")?;
    let code = exit_code(status);
    Ok((code, collector.gitoids().to_vec()))
}

/// Exit code to forward. A signal-terminated child maps to `128 + signal`.
fn exit_code(status: std::process::ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}

fn record_outputs(options: &WitnessOptions, gitoids: &[String]) {
    info!(count = gitoids.len(), "attestations stored in archivista");

    if let Some(file) = std::env::var_os("GITHUB_OUTPUT") {
        if let Err(e) = write_step_output(Path::new(&file), gitoids) {
            warn!(error = %e, "failed to write step output");
        }
    }
    if let Some(file) = std::env::var_os("GITHUB_STEP_SUMMARY") {
        if let Err(e) = write_summary(
            Path::new(&file),
            options.step.as_deref(),
            gitoids,
            options.archivista_server.as_deref(),
        ) {
            warn!(error = %e, "failed to write job summary");
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::PathBuf;

    use tempfile::TempDir;
    use witness_action_installer::Resolution;

    fn fake_witness(dir: &Path, body: &str) -> ResolvedBinary {
        let path = dir.join("witness");
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        ResolvedBinary {
            path,
            version: None,
            resolution: Resolution::System,
        }
    }

    fn system_path() -> SearchPath {
        SearchPath::with_base(Some("/usr/bin:/bin".into()))
    }

    #[tokio::test]
    async fn forwards_exit_code() {
        let tmp = TempDir::new().unwrap();
        let witness = fake_witness(tmp.path(), "exit 7");
        let (code, gitoids) = execute(&witness, &["run".into()], &system_path())
            .await
            .unwrap();
        assert_eq!(code, 7);
        assert!(gitoids.is_empty());
    }

    #[tokio::test]
    async fn argv_reaches_child_unchanged() {
        let tmp = TempDir::new().unwrap();
        let record = tmp.path().join("argv");
        let witness = fake_witness(
            tmp.path(),
            &format!(
                "for a in \"$@\"; do printf '%s\\n' \"$a\" >> '{}'; done",
                record.display()
            ),
        );

        let argv: Vec<String> = ["run", "-s=build", "--", "/bin/sh", "-c", "echo a | wc -c && echo $HOME"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let (code, _) = execute(&witness, &argv, &system_path()).await.unwrap();
        assert_eq!(code, 0);

        let recorded = std::fs::read_to_string(&record).unwrap();
        let lines: Vec<&str> = recorded.lines().collect();
        assert_eq!(lines, argv);
    }

    #[tokio::test]
    async fn collects_gitoids_from_stdout() {
        let tmp = TempDir::new().unwrap();
        let witness = fake_witness(
            tmp.path(),
            "echo 'Stored in archivista as 0a1b2c'\necho 'done'",
        );
        let (code, gitoids) = execute(&witness, &[], &system_path()).await.unwrap();
        assert_eq!(code, 0);
        assert_eq!(gitoids, vec!["0a1b2c".to_string()]);
    }

    #[tokio::test]
    async fn non_utf8_output_keeps_exit_code() {
        let tmp = TempDir::new().unwrap();
        let witness = fake_witness(
            tmp.path(),
            "printf 'caf\\351\\n'\necho 'Stored in archivista as beef'\nexit 5",
        );
        let (code, gitoids) = execute(&witness, &[], &system_path()).await.unwrap();
        assert_eq!(code, 5);
        assert_eq!(gitoids, vec!["beef".to_string()]);
    }

    #[tokio::test]
    async fn output_without_trailing_newline_is_scanned() {
        let tmp = TempDir::new().unwrap();
        let witness = fake_witness(tmp.path(), "printf 'Stored in archivista as c0ffee'");
        let (code, gitoids) = execute(&witness, &[], &system_path()).await.unwrap();
        assert_eq!(code, 0);
        assert_eq!(gitoids, vec!["c0ffee".to_string()]);
    }

    #[tokio::test]
    async fn added_directories_are_on_child_path() {
        let tmp = TempDir::new().unwrap();
        let record = tmp.path().join("path");
        let witness = fake_witness(
            tmp.path(),
            &format!("printf '%s' \"$PATH\" > '{}'", record.display()),
        );
        let mut search_path = system_path();
        search_path.prepend(PathBuf::from("/opt/witness/bin"));

        execute(&witness, &[], &search_path).await.unwrap();
        let path = std::fs::read_to_string(&record).unwrap();
        assert!(path.starts_with("/opt/witness/bin:"), "PATH was {path}");
    }

    #[tokio::test]
    async fn missing_binary_is_an_error() {
        let witness = ResolvedBinary {
            path: PathBuf::from("/nonexistent/witness"),
            version: None,
            resolution: Resolution::System,
        };
        assert!(execute(&witness, &[], &system_path()).await.is_err());
    }
}
