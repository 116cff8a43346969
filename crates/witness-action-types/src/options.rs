//! Options for a single `witness run` invocation.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{ActionInputs, ConfigError};

/// Sigstore public-good Fulcio instance.
pub const SIGSTORE_FULCIO_URL: &str = "https://fulcio.sigstore.dev";

/// OIDC issuer paired with the public-good Fulcio instance.
pub const SIGSTORE_OIDC_ISSUER: &str = "https://oauth2.sigstore.dev/auth";

/// OIDC client id paired with the public-good Fulcio instance.
pub const SIGSTORE_OIDC_CLIENT_ID: &str = "sigstore";

/// RFC 3161 timestamp authority used with keyless signing.
pub const SIGSTORE_TIMESTAMP_SERVER: &str = "https://freetsa.org/tsr";

/// Everything that shapes the attestor argv apart from the payload command.
///
/// Optional fields that are `None` (or hold an empty string) never produce a
/// flag. Built once per invocation and not mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WitnessOptions {
    /// Logical step name recorded in the attestation.
    pub step: Option<String>,
    /// Where to write the signed attestation.
    pub outfile: Option<String>,
    /// Attestor plugins to enable, in order.
    #[serde(default)]
    pub attestations: Vec<String>,
    /// Path to a signing key.
    pub key: Option<String>,
    /// Upload the attestation to Archivista.
    pub enable_archivista: Option<bool>,
    /// Use keyless signing through Sigstore.
    pub enable_sigstore: Option<bool>,

    pub archivista_server: Option<String>,
    pub certificate: Option<String>,
    pub intermediates: Option<String>,
    pub fulcio: Option<String>,
    pub fulcio_oidc_client_id: Option<String>,
    pub fulcio_oidc_issuer: Option<String>,
    pub fulcio_token: Option<String>,
    pub timestamp_servers: Option<String>,
    pub spiffe_socket: Option<String>,
    pub product_include_glob: Option<String>,
    pub product_exclude_glob: Option<String>,
    pub workingdir: Option<String>,
    pub trace: Option<bool>,
}

impl WitnessOptions {
    /// Build options from the step inputs.
    ///
    /// When `enable-sigstore` is explicitly `true`, Fulcio, OIDC, and
    /// timestamp inputs that were not provided at all fall back to the
    /// Sigstore public-good endpoints. Inputs provided as empty strings stay
    /// empty.
    pub fn from_inputs(inputs: &ActionInputs) -> Result<Self, ConfigError> {
        let enable_sigstore = inputs.boolean("enable-sigstore")?;
        let keyless = enable_sigstore == Some(true);

        let sigstore_default = |name: &str, default: &str| -> Option<String> {
            let input = inputs.get(name);
            if keyless && input.is_unset() {
                debug!(input = name, default, "using sigstore default");
                Some(default.to_string())
            } else {
                input.to_option()
            }
        };

        Ok(Self {
            step: inputs.string("step"),
            outfile: inputs.string("outfile"),
            attestations: inputs.list("attestations"),
            key: inputs.string("key"),
            enable_archivista: inputs.boolean("enable-archivista")?,
            enable_sigstore,
            archivista_server: inputs.string("archivista-server"),
            certificate: inputs.string("certificate"),
            intermediates: inputs.string("intermediates"),
            fulcio: sigstore_default("fulcio", SIGSTORE_FULCIO_URL),
            fulcio_oidc_client_id: sigstore_default(
                "fulcio-oidc-client-id",
                SIGSTORE_OIDC_CLIENT_ID,
            ),
            fulcio_oidc_issuer: sigstore_default("fulcio-oidc-issuer", SIGSTORE_OIDC_ISSUER),
            fulcio_token: inputs.string("fulcio-token"),
            timestamp_servers: sigstore_default("timestamp-servers", SIGSTORE_TIMESTAMP_SERVER),
            spiffe_socket: inputs.string("spiffe-socket"),
            product_include_glob: inputs.string("product-include-glob"),
            product_exclude_glob: inputs.string("product-exclude-glob"),
            workingdir: inputs.string("workingdir"),
            trace: inputs.boolean("trace")?,
        })
    }

    /// Whether attestations will be uploaded to Archivista.
    pub fn archivista_enabled(&self) -> bool {
        self.enable_archivista == Some(true)
    }
}
