//! `witness-action args` -- print the witness argv without running it.

use anyhow::{Context, Result};

use witness_action_command::assemble;
use witness_action_types::{ActionInputs, WitnessOptions};

/// Print the assembled argv as a JSON array on stdout.
pub fn run(trailing: &[String]) -> Result<()> {
    let inputs = ActionInputs::from_env();
    let options = WitnessOptions::from_inputs(&inputs).context("invalid action inputs")?;
    let payload = super::payload(trailing, &inputs)?;

    let argv = assemble(&options, &payload);
    let json = serde_json::to_string(&argv).context("failed to serialize argv")?;
    println!("{json}");
    Ok(())
}
