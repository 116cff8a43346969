//! Argument vector for `witness run`.
//!
//! Layout, in fixed order:
//!
//! ```text
//! run [-s=<step>] [-a=<attestor>]... [-o=<outfile>] [--signer-file-key-path=<key>]
//!     [--<flag>=<value>]... -- <payload>...
//! ```
//!
//! The `--` separator appears exactly once, right before the payload, so a
//! payload element that looks like a flag (`-c`) is never read as one.

use witness_action_types::WitnessOptions;

use crate::CommandVector;

/// Attestor subcommand that wraps a payload.
pub const RUN_SUBCOMMAND: &str = "run";

/// End-of-options marker placed before the payload.
pub const SEPARATOR: &str = "--";

/// Build the attestor argv for `options` wrapping `payload`.
///
/// Total: every option combination and payload produce a vector.
pub fn assemble(options: &WitnessOptions, payload: &CommandVector) -> Vec<String> {
    let mut args = vec![RUN_SUBCOMMAND.to_string()];

    push_value(&mut args, "-s", options.step.as_deref());
    for attestor in &options.attestations {
        args.push(format!("-a={attestor}"));
    }
    push_value(&mut args, "-o", options.outfile.as_deref());
    push_value(&mut args, "--signer-file-key-path", options.key.as_deref());

    push_enabled(&mut args, "--enable-archivista", options.enable_archivista);
    push_value(
        &mut args,
        "--archivista-server",
        options.archivista_server.as_deref(),
    );
    push_value(&mut args, "--certificate", options.certificate.as_deref());
    push_value(&mut args, "--intermediates", options.intermediates.as_deref());
    push_value(&mut args, "--signer-fulcio-url", options.fulcio.as_deref());
    push_value(
        &mut args,
        "--signer-fulcio-oidc-client-id",
        options.fulcio_oidc_client_id.as_deref(),
    );
    push_value(
        &mut args,
        "--signer-fulcio-oidc-issuer",
        options.fulcio_oidc_issuer.as_deref(),
    );
    push_value(
        &mut args,
        "--signer-fulcio-token",
        options.fulcio_token.as_deref(),
    );
    push_value(
        &mut args,
        "--timestamp-servers",
        options.timestamp_servers.as_deref(),
    );
    push_value(&mut args, "--spiffe-socket", options.spiffe_socket.as_deref());
    push_value(
        &mut args,
        "--attestor-product-include-glob",
        options.product_include_glob.as_deref(),
    );
    push_value(
        &mut args,
        "--attestor-product-exclude-glob",
        options.product_exclude_glob.as_deref(),
    );
    push_value(&mut args, "--workingdir", options.workingdir.as_deref());
    push_enabled(&mut args, "--trace", options.trace);

    args.push(SEPARATOR.to_string());
    args.extend(payload.iter().cloned());
    args
}

fn push_value(args: &mut Vec<String>, flag: &str, value: Option<&str>) {
    if let Some(v) = value.filter(|v| !v.is_empty()) {
        args.push(format!("{flag}={v}"));
    }
}

fn push_enabled(args: &mut Vec<String>, flag: &str, value: Option<bool>) {
    if value == Some(true) {
        args.push(format!("{flag}=true"));
    }
}
