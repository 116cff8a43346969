//! Core types shared across the witness-action crates.
//!
//! - [`Input`] / [`ActionInputs`] -- tri-state view of the CI step inputs
//! - [`WitnessOptions`] -- validated options that drive the `witness run` argv
//! - [`ConfigError`] -- errors raised while turning inputs into options

pub mod error;
pub mod inputs;
pub mod options;

pub use error::ConfigError;
pub use inputs::{ActionInputs, Input, INPUT_ENV_PREFIX};
pub use options::{
    WitnessOptions, SIGSTORE_FULCIO_URL, SIGSTORE_OIDC_CLIENT_ID, SIGSTORE_OIDC_ISSUER,
    SIGSTORE_TIMESTAMP_SERVER,
};
