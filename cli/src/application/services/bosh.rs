//! Application service — run a `bosh` command against the Ops Manager director.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use anyhow::{Context, Result};

use crate::application::ports::{RemoteExecutor, RemoteOutcome, RequestService};
use crate::application::services::director::{fetch_director_manifest, resolve_product_guid};
use crate::domain::command::build_bosh_command;
use crate::domain::error::ValidationError;

/// Operator input for one `bosh` invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoshRequest {
    /// Ops Manager VM to SSH into.
    pub host: String,
    pub ssh_key_path: Option<String>,
    /// Product type whose deployment manifest the command targets.
    pub product_name: Option<String>,
    /// Raw bosh command, passed through verbatim.
    pub command: String,
}

impl BoshRequest {
    /// Check local preconditions, returning the SSH key path.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingSshKeyPath`] when no key path (or a
    /// blank one) was supplied.
    pub fn validate(&self) -> Result<&str, ValidationError> {
        match self.ssh_key_path.as_deref().map(str::trim) {
            Some(path) if !path.is_empty() => Ok(path),
            _ => Err(ValidationError::MissingSshKeyPath),
        }
    }

    fn product_name(&self) -> Option<&str> {
        self.product_name.as_deref().filter(|name| !name.is_empty())
    }
}

/// Resolve the director, build the command, and run it on the Ops Manager VM.
///
/// The deployed products list is only fetched when a product name was given.
///
/// # Errors
///
/// Returns an error if validation fails, any API lookup fails, or the remote
/// session cannot be established. A non-zero remote exit status is returned
/// in the [`RemoteOutcome`], not as an error.
pub async fn run_bosh(
    api: &impl RequestService,
    remote: &impl RemoteExecutor,
    request: &BoshRequest,
) -> Result<RemoteOutcome> {
    let key_path = request.validate()?;

    let manifest = fetch_director_manifest(api).await?;

    let product_guid = match request.product_name() {
        Some(name) => Some(resolve_product_guid(api, name).await?),
        None => None,
    };

    let spec = build_bosh_command(
        &request.host,
        key_path,
        &manifest,
        product_guid.as_deref(),
        &request.command,
    );
    tracing::debug!(host = %spec.host, command = %spec.redacted_command_line(), "running remote command");

    let outcome = remote
        .execute_on_remote(&spec)
        .await
        .context("failed to execute on remote")?;
    tracing::info!(exit_status = outcome.exit_status, "remote command finished");
    Ok(outcome)
}
