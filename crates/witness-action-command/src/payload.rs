//! The wrapped payload command.
//!
//! A payload is an argv, not a command line. A user script containing pipes,
//! redirects, `&&`, or several lines travels as a single element all the way
//! to the shell interpreter; nothing here splits or quotes it.

use serde::{Deserialize, Serialize};

/// Interpreter used for command mode when none is configured.
pub const DEFAULT_SHELL: &str = "/bin/sh";

/// Ordered payload argv. Positions are significant, so absent slots become
/// empty strings instead of being dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandVector(Vec<String>);

impl CommandVector {
    /// `[interpreter, "-c", script]` with the script kept as one element.
    pub fn shell(interpreter: impl Into<String>, script: impl Into<String>) -> Self {
        Self(vec![interpreter.into(), "-c".to_string(), script.into()])
    }

    /// Build from argv slots, normalizing `None` to `""`.
    pub fn from_slots<I, S>(slots: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        slots.into_iter().collect()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }
}

impl<S: Into<String>> FromIterator<Option<S>> for CommandVector {
    fn from_iter<I: IntoIterator<Item = Option<S>>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|slot| slot.map(Into::into).unwrap_or_default())
                .collect(),
        )
    }
}

impl From<Vec<String>> for CommandVector {
    fn from(argv: Vec<String>) -> Self {
        Self(argv)
    }
}

impl<'a> IntoIterator for &'a CommandVector {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shell_keeps_script_as_one_element() {
        let script = "echo hello | tee out.txt && \\\n  cat <<EOF\n$(date)\nEOF";
        let cmd = CommandVector::shell("/bin/bash", script);
        assert_eq!(cmd.len(), 3);
        assert_eq!(cmd.as_slice()[0], "/bin/bash");
        assert_eq!(cmd.as_slice()[1], "-c");
        assert_eq!(cmd.as_slice()[2], script);
    }

    #[test]
    fn none_slots_become_empty_strings() {
        let cmd = CommandVector::from_slots([Some("a"), None, Some("c")]);
        assert_eq!(cmd.as_slice(), ["a", "", "c"]);
    }

    #[test]
    fn empty_vector() {
        let cmd = CommandVector::from_slots(Vec::<Option<String>>::new());
        assert!(cmd.is_empty());
    }

    #[test]
    fn serializes_as_plain_array() {
        let cmd = CommandVector::shell("/bin/sh", "make");
        let json = serde_json::to_string(&cmd).unwrap();
        assert_eq!(json, r#"["/bin/sh","-c","make"]"#);
    }
}
