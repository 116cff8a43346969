//! End-to-end tests that invoke the `witness-action` binary.
//!
//! The environment is cleared for every invocation so runner variables on the
//! machine running the tests cannot leak in. A shell script named `witness`
//! on a temporary PATH stands in for the real attestor.

#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn witness_action(path_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("witness-action").expect("binary should be built");
    cmd.env_clear()
        .env("PATH", format!("{}:/usr/bin:/bin", path_dir.display()))
        .env("HOME", path_dir);
    cmd
}

fn install_fake_witness(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("witness");
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write fake witness");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
        .expect("chmod fake witness");
    path
}

fn parse_argv(stdout: &[u8]) -> Vec<String> {
    serde_json::from_slice(stdout).expect("args should print a JSON array of strings")
}

#[test]
fn args_prints_build_example() {
    let tmp = TempDir::new().unwrap();
    let output = witness_action(tmp.path())
        .env("INPUT_STEP", "build")
        .env("INPUT_OUTFILE", "attestation.json")
        .args(["args", "--", "/bin/sh", "-c", "make build docker_tag=v1.2.3"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let argv = parse_argv(&output.stdout);
    assert_eq!(argv[0], "run");
    assert!(argv.contains(&"-s=build".to_string()));
    assert!(argv.contains(&"-o=attestation.json".to_string()));
    let sep = argv.iter().position(|a| a == "--").unwrap();
    assert_eq!(
        &argv[sep + 1..],
        ["/bin/sh", "-c", "make build docker_tag=v1.2.3"]
    );
}

#[test]
fn args_keeps_multiline_command_input_whole() {
    let tmp = TempDir::new().unwrap();
    let script = "echo one | tr a-z A-Z\necho two && echo three";
    let output = witness_action(tmp.path())
        .env("INPUT_COMMAND", script)
        .env("INPUT_ATTESTATIONS", "environment git")
        .env("INPUT_ENABLE-ARCHIVISTA", "true")
        .arg("args")
        .output()
        .unwrap();
    assert!(output.status.success());

    let argv = parse_argv(&output.stdout);
    assert_eq!(
        argv,
        vec![
            "run",
            "-a=environment",
            "-a=git",
            "--enable-archivista=true",
            "--",
            "/bin/sh",
            "-c",
            script,
        ]
    );
}

#[test]
fn args_without_command_fails() {
    let tmp = TempDir::new().unwrap();
    witness_action(tmp.path())
        .arg("args")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no command provided"));
}

#[test]
fn args_rejects_invalid_boolean() {
    let tmp = TempDir::new().unwrap();
    witness_action(tmp.path())
        .env("INPUT_COMMAND", "true")
        .env("INPUT_ENABLE-SIGSTORE", "sometimes")
        .arg("args")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid action inputs"));
}

#[test]
fn resolve_prefers_binary_on_path() {
    let tmp = TempDir::new().unwrap();
    let fake = install_fake_witness(tmp.path(), "exit 0");
    witness_action(tmp.path())
        .env("INPUT_WITNESS_VERSION", "0.9.0")
        .arg("resolve")
        .assert()
        .success()
        .stdout(predicate::str::contains(fake.display().to_string()));
}

#[test]
fn run_forwards_witness_exit_code() {
    let tmp = TempDir::new().unwrap();
    install_fake_witness(tmp.path(), "exit 3");
    witness_action(tmp.path())
        .env("INPUT_STEP", "test")
        .env("INPUT_COMMAND", "false")
        .arg("run")
        .assert()
        .code(3);
}

#[test]
fn run_passes_argv_and_records_gitoid() {
    let tmp = TempDir::new().unwrap();
    let argv_file = tmp.path().join("argv");
    let output_file = tmp.path().join("github_output");
    install_fake_witness(
        tmp.path(),
        &format!(
            "for a in \"$@\"; do printf '%s\\n' \"$a\" >> '{}'; done\necho 'Stored in archivista as deadbeef01'",
            argv_file.display()
        ),
    );

    witness_action(tmp.path())
        .env("INPUT_STEP", "build")
        .env("INPUT_ENABLE-ARCHIVISTA", "true")
        .env("GITHUB_OUTPUT", &output_file)
        .args(["run", "--", "make", "-j4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Stored in archivista as deadbeef01"));

    let recorded = std::fs::read_to_string(&argv_file).unwrap();
    assert_eq!(
        recorded.lines().collect::<Vec<_>>(),
        vec!["run", "-s=build", "--enable-archivista=true", "--", "make", "-j4"]
    );
    let outputs = std::fs::read_to_string(&output_file).unwrap();
    assert!(outputs.contains("git_oid=deadbeef01"));
}
