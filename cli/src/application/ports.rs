//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` — never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::PathBuf;

use anyhow::Result;

use crate::domain::{RemoteCommandSpec, ToolConfig};

// ── Value Types ───────────────────────────────────────────────────────────────

/// HTTP method for an API request. Only reads are issued today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
}

impl Method {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
        }
    }
}

/// Raw response of an API request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Result of a completed remote command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoteOutcome {
    /// Exit status reported by the remote shell.
    pub exit_status: i32,
}

impl RemoteOutcome {
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_status == 0
    }
}

// ── API Port ──────────────────────────────────────────────────────────────────

/// Authenticated access to the Ops Manager API.
#[allow(async_fn_in_trait)]
pub trait RequestService {
    /// Issue a request against `path` (relative to the API target).
    ///
    /// # Errors
    ///
    /// Returns an error only if the request cannot be completed. Non-success
    /// statuses are returned as responses for the caller to judge.
    async fn invoke(&self, path: &str, method: Method) -> Result<ApiResponse>;
}

// ── Remote Execution Port ─────────────────────────────────────────────────────

/// Runs one composed command on a remote host.
#[allow(async_fn_in_trait)]
pub trait RemoteExecutor {
    /// Connect, run `spec`, stream its output, and report the exit status.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be established or the run
    /// fails at the transport level. A non-zero remote exit is not an error.
    async fn execute_on_remote(&self, spec: &RemoteCommandSpec) -> Result<RemoteOutcome>;
}

// ── Config Port ───────────────────────────────────────────────────────────────

/// Abstracts loading the tool configuration.
pub trait ConfigStore {
    /// Load the configuration, falling back to defaults if none exists.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read or parsed.
    fn load(&self) -> Result<ToolConfig>;
    /// Location of the configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if no location can be determined.
    fn path(&self) -> Result<PathBuf>;
}
