//! Errors raised while reading action inputs.

/// Errors that can occur while turning raw action inputs into options.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("input '{name}' is not a valid boolean: {value:?} (expected true or false)")]
    InvalidBoolean { name: String, value: String },

    #[error("input '{name}' is required but was not provided")]
    MissingInput { name: String },
}
