//! Step outputs derived from witness output.
//!
//! witness reports each attestation stored in Archivista with a line like
//! `Stored in archivista as <gitoid>`. Those gitoids become the `git_oid`
//! step output and a short job summary.

use std::io::Write;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

fn gitoid_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"Stored in archivista as ([0-9a-fA-F]+)").ok())
        .as_ref()
}

/// Collects gitoids from witness output lines.
#[derive(Debug, Default)]
pub struct GitoidCollector {
    gitoids: Vec<String>,
}

impl GitoidCollector {
    /// Inspect one output line.
    pub fn observe(&mut self, line: &str) {
        let Some(pattern) = gitoid_pattern() else {
            return;
        };
        for captures in pattern.captures_iter(line) {
            let gitoid = captures[1].to_string();
            if !self.gitoids.contains(&gitoid) {
                self.gitoids.push(gitoid);
            }
        }
    }

    pub fn gitoids(&self) -> &[String] {
        &self.gitoids
    }
}

/// Append `git_oid=<gitoids>` to the runner's output file.
pub fn write_step_output(output_file: &Path, gitoids: &[String]) -> std::io::Result<()> {
    if gitoids.is_empty() {
        return Ok(());
    }
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(output_file)?;
    writeln!(file, "git_oid={}", gitoids.join(" "))
}

/// Append a markdown section listing the stored attestations.
pub fn write_summary(
    summary_file: &Path,
    step: Option<&str>,
    gitoids: &[String],
    archivista_server: Option<&str>,
) -> std::io::Result<()> {
    if gitoids.is_empty() {
        return Ok(());
    }
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(summary_file)?;

    match step {
        Some(step) => writeln!(file, "## Attestations for step `{step}`")?,
        None => writeln!(file, "## Attestations")?,
    }
    writeln!(file)?;
    for gitoid in gitoids {
        match archivista_server {
            Some(server) => writeln!(
                file,
                "- [`{gitoid}`]({}/download/{gitoid})",
                server.trim_end_matches('/')
            )?,
            None => writeln!(file, "- `{gitoid}`")?,
        }
    }
    writeln!(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn collects_unique_gitoids_in_order() {
        let mut collector = GitoidCollector::default();
        collector.observe("INFO Starting command");
        collector.observe("INFO Stored in archivista as abc123");
        collector.observe("Stored in archivista as def456");
        collector.observe("Stored in archivista as abc123");
        assert_eq!(collector.gitoids(), ["abc123", "def456"]);
    }

    #[test]
    fn ignores_unrelated_lines() {
        let mut collector = GitoidCollector::default();
        collector.observe("Stored in archivista as ");
        collector.observe("stored somewhere else as abc");
        assert!(collector.gitoids().is_empty());
    }

    #[test]
    fn step_output_appends_space_separated_gitoids() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("output");
        std::fs::write(&file, "other=1\n").unwrap();

        write_step_output(&file, &["a1".into(), "b2".into()]).unwrap();
        assert_eq!(
            std::fs::read_to_string(&file).unwrap(),
            "other=1\ngit_oid=a1 b2\n"
        );
    }

    #[test]
    fn nothing_written_without_gitoids() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("output");
        write_step_output(&file, &[]).unwrap();
        write_summary(&file, Some("build"), &[], None).unwrap();
        assert!(!file.exists());
    }

    #[test]
    fn summary_links_to_archivista() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("summary.md");
        write_summary(
            &file,
            Some("build"),
            &["a1".into()],
            Some("https://archivista.example/"),
        )
        .unwrap();

        let content = std::fs::read_to_string(&file).unwrap();
        assert!(content.contains("## Attestations for step `build`"));
        assert!(content.contains("[`a1`](https://archivista.example/download/a1)"));
    }
}
