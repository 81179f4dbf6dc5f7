//! Remote `bosh` command assembly.
//!
//! Pure functions only — no I/O, no async, no filesystem access.

use crate::domain::manifest::DirectorManifest;

// ── Constants ────────────────────────────────────────────────────────────────

/// UAA client the director trusts for Ops Manager.
pub const BOSH_CLIENT: &str = "ops_manager";

/// Gemfile of the bosh CLI bundled on the Ops Manager VM.
pub const BUNDLE_GEMFILE: &str = "/home/tempest-web/tempest/web/vendor/bosh/Gemfile";

pub const BOSH_INVOCATION: &str = "bundle exec bosh";

pub const ROOT_CA_CERTIFICATE: &str = "/var/tempest/workspaces/default/root_ca_certificate";

/// Directory holding one `<guid>.yml` deployment manifest per product.
pub const DEPLOYMENTS_DIR: &str = "/var/tempest/workspaces/default/deployments";

// ── Command spec ─────────────────────────────────────────────────────────────

/// Everything needed to run one command on the Ops Manager VM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteCommandSpec {
    /// SSH host (the Ops Manager VM).
    pub host: String,
    /// Path to the private key used for public-key auth.
    pub credential_path: String,
    /// `KEY=VALUE` assignments prefixed to the command line.
    pub environment: Vec<String>,
    /// Command tokens. A token may hold a flag together with its value.
    pub argv: Vec<String>,
}

impl RemoteCommandSpec {
    /// Environment assignments followed by argv tokens, space-joined.
    #[must_use]
    pub fn command_line(&self) -> String {
        self.environment
            .iter()
            .chain(&self.argv)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Same as [`command_line`](Self::command_line) with the client secret
    /// masked, for logging.
    #[must_use]
    pub fn redacted_command_line(&self) -> String {
        self.environment
            .iter()
            .map(|entry| {
                if entry.starts_with("BOSH_CLIENT_SECRET=") {
                    "BOSH_CLIENT_SECRET=\"***\"".to_string()
                } else {
                    entry.clone()
                }
            })
            .chain(self.argv.iter().cloned())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Build the remote `bosh` invocation for `raw_command`.
///
/// The deployment flag is added only when `product_guid` is present.
/// `raw_command` is passed through verbatim as the final token.
#[must_use]
pub fn build_bosh_command(
    host: &str,
    credential_path: &str,
    manifest: &DirectorManifest,
    product_guid: Option<&str>,
    raw_command: &str,
) -> RemoteCommandSpec {
    let environment = vec![
        format!("BOSH_CLIENT=\"{BOSH_CLIENT}\""),
        format!(
            "BOSH_CLIENT_SECRET=\"{}\"",
            manifest.ops_manager_client_secret()
        ),
        format!("BUNDLE_GEMFILE={BUNDLE_GEMFILE}"),
    ];

    let mut argv = vec![
        BOSH_INVOCATION.to_string(),
        "-n".to_string(),
        format!("--ca-cert {ROOT_CA_CERTIFICATE}"),
        format!("-t {}", manifest.director_address()),
    ];
    if let Some(guid) = product_guid {
        argv.push(format!("-d {DEPLOYMENTS_DIR}/{guid}.yml"));
    }
    argv.push(raw_command.to_string());

    RemoteCommandSpec {
        host: host.to_string(),
        credential_path: credential_path.to_string(),
        environment,
        argv,
    }
}
