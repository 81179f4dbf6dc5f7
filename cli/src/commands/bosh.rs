//! `execute-on-opsman bosh` — run a bosh command against the Ops Manager director.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::application::services::bosh::{BoshRequest, run_bosh};
use crate::cli::GlobalArgs;
use crate::domain::target::ssh_host;
use crate::infra::request_service::OpsManagerClient;
use crate::infra::ssh::Ssh2Executor;

/// Arguments for the bosh command.
#[derive(Args, Debug, Clone)]
pub struct BoshArgs {
    /// Path to the private key for the Ops Manager VM
    #[arg(short = 'i', long = "ssh-key-path", visible_alias = "ssh-key")]
    pub ssh_key_path: Option<String>,

    /// Type of the deployed product to target (e.g. `cf`)
    #[arg(short = 'p', long)]
    pub product_name: Option<String>,

    /// bosh command to execute, passed through verbatim
    #[arg(short, long, allow_hyphen_values = true)]
    pub command: String,
}

/// Run the bosh command and exit with the remote exit status.
///
/// Local input is validated before any network client is built.
///
/// # Errors
///
/// Returns an error if validation, an API lookup, or the SSH session fails.
pub async fn run(global: &GlobalArgs, args: BoshArgs) -> Result<ExitCode> {
    let BoshArgs {
        ssh_key_path,
        product_name,
        command,
    } = args;
    let mut request = BoshRequest {
        host: String::new(),
        ssh_key_path,
        product_name,
        command,
    };
    request.validate()?;

    let login = global.login()?;
    let config = global.load_config()?;
    request.host = ssh_host(&login.target);

    let api = OpsManagerClient::new(
        login.target,
        &login.username,
        &login.password,
        config.request_timeout(),
        login.skip_ssl_validation,
    )?;
    let remote = Ssh2Executor::new(&config.ssh, config.retry);

    let outcome = run_bosh(&api, &remote, &request).await?;
    Ok(ExitCode::from(u8::try_from(outcome.exit_status).unwrap_or(1)))
}
