//! Tri-state access to CI step inputs.
//!
//! The runner exposes each declared input as an `INPUT_<NAME>` environment
//! variable. A missing variable, an empty one, and one carrying a value are
//! three different states here: collapsing "unset" into a default string at
//! this layer would let a baked-in value shadow an explicit request further
//! down (the requested witness version in particular).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Prefix the runner puts in front of every input variable.
pub const INPUT_ENV_PREFIX: &str = "INPUT_";

/// The state of a single input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "lowercase")]
pub enum Input {
    /// The input was not provided at all.
    Unset,
    /// The input was provided as the empty string.
    Empty,
    /// The input carries a non-empty value.
    Value(String),
}

impl Input {
    /// Classify a raw lookup result.
    pub fn from_raw(raw: Option<String>) -> Self {
        match raw {
            None => Input::Unset,
            Some(v) if v.is_empty() => Input::Empty,
            Some(v) => Input::Value(v),
        }
    }

    /// The non-empty value, if any.
    pub fn value(&self) -> Option<&str> {
        match self {
            Input::Value(v) => Some(v),
            Input::Unset | Input::Empty => None,
        }
    }

    /// Owned copy of the non-empty value.
    pub fn to_option(&self) -> Option<String> {
        self.value().map(str::to_string)
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, Input::Unset)
    }
}

/// A snapshot of the step inputs, keyed by normalized variable name.
#[derive(Debug, Clone, Default)]
pub struct ActionInputs {
    vars: HashMap<String, String>,
}

impl ActionInputs {
    /// Capture every `INPUT_*` variable from the process environment.
    pub fn from_env() -> Self {
        Self::from_vars(std::env::vars())
    }

    /// Build from arbitrary `(variable, value)` pairs; only `INPUT_*` keys are kept.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .filter(|(k, _)| k.starts_with(INPUT_ENV_PREFIX))
            .collect();
        Self { vars }
    }

    /// Build from input names as they appear in the action definition
    /// (`enable-archivista`, `witness_version`, ...).
    pub fn from_inputs<I, K, V>(inputs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let vars = inputs
            .into_iter()
            .map(|(k, v)| (env_key(k.as_ref()), v.into()))
            .collect();
        Self { vars }
    }

    /// Look up an input by its declared name.
    pub fn get(&self, name: &str) -> Input {
        Input::from_raw(self.vars.get(&env_key(name)).cloned())
    }

    /// Non-empty string value of an input.
    pub fn string(&self, name: &str) -> Option<String> {
        self.get(name).to_option()
    }

    /// Non-empty value of an input that must be present.
    pub fn required(&self, name: &str) -> Result<String, ConfigError> {
        self.string(name).ok_or_else(|| ConfigError::MissingInput {
            name: name.to_string(),
        })
    }

    /// Parse a boolean input. Unset and empty both yield `None`.
    pub fn boolean(&self, name: &str) -> Result<Option<bool>, ConfigError> {
        match self.get(name) {
            Input::Unset | Input::Empty => Ok(None),
            Input::Value(v) => match v.trim() {
                "true" | "True" | "TRUE" => Ok(Some(true)),
                "false" | "False" | "FALSE" => Ok(Some(false)),
                _ => Err(ConfigError::InvalidBoolean {
                    name: name.to_string(),
                    value: v,
                }),
            },
        }
    }

    /// Split a whitespace-separated list input, dropping empty entries.
    pub fn list(&self, name: &str) -> Vec<String> {
        self.get(name)
            .value()
            .map(|v| v.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }
}

/// Map an input name to the variable the runner exports: `INPUT_` plus the
/// upper-cased name with spaces replaced by underscores. Hyphens are kept.
fn env_key(name: &str) -> String {
    format!(
        "{INPUT_ENV_PREFIX}{}",
        name.trim().replace(' ', "_").to_uppercase()
    )
}
