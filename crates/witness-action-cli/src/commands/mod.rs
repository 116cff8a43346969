pub mod args;
pub mod resolve;
pub mod run;

use anyhow::{Context, Result};

use witness_action_command::{CommandVector, DEFAULT_SHELL};
use witness_action_types::ActionInputs;

/// Payload for this invocation.
///
/// Trailing CLI arguments win. Otherwise the `command` input is handed to
/// the configured shell as a single `-c` argument, exactly as written.
pub fn payload(trailing: &[String], inputs: &ActionInputs) -> Result<CommandVector> {
    if !trailing.is_empty() {
        return Ok(CommandVector::from(trailing.to_vec()));
    }

    let script = inputs
        .required("command")
        .context("no command provided: set the 'command' input or pass one after --")?;
    let shell = inputs
        .string("shell")
        .unwrap_or_else(|| DEFAULT_SHELL.to_string());
    Ok(CommandVector::shell(shell, script))
}
