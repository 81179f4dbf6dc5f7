//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

// ── Validation errors ─────────────────────────────────────────────────────────

/// Missing local input, reported before any I/O happens.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("ssh key path cannot be empty")]
    MissingSshKeyPath,

    #[error("{0} flag is required")]
    MissingFlag(&'static str),

    #[error("invalid target '{target}': {reason}")]
    InvalidTarget { target: String, reason: String },
}

// ── API errors ────────────────────────────────────────────────────────────────

/// Errors raised while talking to the Ops Manager API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request to {path} failed: {message}")]
    Transport { path: String, message: String },

    #[error("request to {path} returned status {status}: {body}")]
    Status {
        path: String,
        status: u16,
        body: String,
    },

    #[error("could not decode {what}: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("director manifest contains no jobs")]
    NoJobs,

    #[error("could not find product: {0}")]
    ProductNotFound(String),
}

// ── Remote errors ─────────────────────────────────────────────────────────────

/// Failure to establish an authenticated SSH session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConnectError {
    /// Key-exchange race during the handshake; safe to re-attempt.
    #[error("transient handshake failure: {0}")]
    Transient(String),

    #[error("{0}")]
    Fatal(String),

    #[error("gave up after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: String },
}

impl ConnectError {
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}

/// Failure after the connection was established.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExecutionError {
    #[error("could not open session: {0}")]
    Session(String),

    #[error("run failed: {0}")]
    Run(String),

    #[error("remote command terminated by signal {0}")]
    Signal(String),
}
