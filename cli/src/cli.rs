//! CLI argument parsing with clap derive

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use url::Url;

use crate::application::ports::ConfigStore;
use crate::commands;
use crate::domain::config::ToolConfig;
use crate::domain::error::ValidationError;
use crate::domain::target::parse_target;
use crate::infra::config::YamlConfigStore;

/// Run commands against the BOSH director behind an Ops Manager
#[derive(Parser)]
#[command(
    name = "execute-on-opsman",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Flags shared by every command.
///
/// The Ops Manager login flags go before the command name. Short flags of
/// commands (`bosh -p` is the product) do not clash with them.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Location of the Ops Manager VM
    #[arg(short, long, env = "OM_TARGET")]
    pub target: Option<String>,

    /// Admin username for Ops Manager
    #[arg(short, long, env = "OM_USERNAME")]
    pub username: Option<String>,

    /// Admin password for Ops Manager
    #[arg(short, long, env = "OM_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Skip TLS certificate validation for Ops Manager API requests
    #[arg(short = 'k', long)]
    pub skip_ssl_validation: bool,

    /// Timeout for Ops Manager API requests, in seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub request_timeout: Option<u64>,

    /// Maximum SSH connection attempts on transient handshake failures
    #[arg(long, global = true, value_name = "N")]
    pub connect_attempts: Option<u32>,

    /// Path to the config file
    #[arg(long, global = true, env = "EXECUTE_ON_OPSMAN_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run a bosh command on the Ops Manager VM
    Bosh(commands::bosh::BoshArgs),
}

/// Validated Ops Manager API credentials.
#[derive(Debug, Clone)]
pub struct OpsManagerLogin {
    pub target: Url,
    pub username: String,
    pub password: String,
    pub skip_ssl_validation: bool,
}

impl GlobalArgs {
    /// Check that target, username and password were supplied.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] naming the first missing flag, or if the
    /// target is not a valid URL.
    pub fn login(&self) -> Result<OpsManagerLogin, ValidationError> {
        let target = required(self.target.as_deref(), "target")?;
        let username = required(self.username.as_deref(), "username")?;
        let password = required(self.password.as_deref(), "password")?;
        Ok(OpsManagerLogin {
            target: parse_target(target)?,
            username: username.to_string(),
            password: password.to_string(),
            skip_ssl_validation: self.skip_ssl_validation,
        })
    }

    /// Load the config file and apply flag overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load_config(&self) -> Result<ToolConfig> {
        let mut config = YamlConfigStore::new(self.config.clone()).load()?;
        if let Some(secs) = self.request_timeout {
            config.request_timeout_secs = secs;
        }
        if let Some(attempts) = self.connect_attempts {
            config.retry.max_attempts = attempts;
        }
        Ok(config)
    }
}

fn required<'a>(value: Option<&'a str>, flag: &'static str) -> Result<&'a str, ValidationError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(ValidationError::MissingFlag(flag))
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(self) -> Result<ExitCode> {
        let Cli { global, command } = self;
        match command {
            Command::Bosh(args) => commands::bosh::run(&global, args).await,
        }
    }
}
