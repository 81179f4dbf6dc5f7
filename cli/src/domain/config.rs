//! Configuration schema for `execute-on-opsman`.
//!
//! Pure types only — loading from disk lives in `crate::infra::config`.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::retry::RetryPolicy;

/// Ops Manager API calls can block for a long time on large installations.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 1_800;
pub const DEFAULT_SSH_USER: &str = "ubuntu";
pub const DEFAULT_SSH_PORT: u16 = 22;

/// Top-level configuration stored in `~/.execute-on-opsman/config.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Timeout applied to every Ops Manager API request.
    pub request_timeout_secs: u64,
    pub ssh: SshConfig,
    /// Retry policy for transient SSH handshake failures.
    pub retry: RetryPolicy,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            ssh: SshConfig::default(),
            retry: RetryPolicy::default(),
        }
    }
}

impl ToolConfig {
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// SSH settings for the Ops Manager VM.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SshConfig {
    pub user: String,
    pub port: u16,
}

impl Default for SshConfig {
    fn default() -> Self {
        Self {
            user: DEFAULT_SSH_USER.to_string(),
            port: DEFAULT_SSH_PORT,
        }
    }
}
