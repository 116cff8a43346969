//! Command-line assembly for the `witness` attestor.
//!
//! - [`CommandVector`] -- the payload argv handed to the attestor after `--`
//! - [`assemble`] -- builds the complete `witness run ...` argument vector

pub mod args;
pub mod payload;

pub use args::{assemble, RUN_SUBCOMMAND, SEPARATOR};
pub use payload::{CommandVector, DEFAULT_SHELL};
