//! Infrastructure implementation of the `RemoteExecutor` port.
//!
//! `Ssh2Executor` opens one `ssh2` session to the Ops Manager VM, runs the
//! composed command line on a single channel, and streams its output to the
//! local stdout. Blocking SSH work runs on `spawn_blocking`.

use std::io::Write;
use std::net::TcpStream;
use std::time::Duration;

use anyhow::Result;
use ssh2::{ExtendedData, Session};

use crate::application::ports::{RemoteExecutor, RemoteOutcome};
use crate::domain::command::RemoteCommandSpec;
use crate::domain::config::SshConfig;
use crate::domain::error::{ConnectError, ExecutionError};
use crate::domain::retry::RetryPolicy;

/// Message some servers produce when they answer key exchange with
/// `SSH_MSG_UNIMPLEMENTED` while still starting up.
pub const TRANSIENT_HANDSHAKE_SIGNATURE: &str = "unexpected message type 3";

/// Production `RemoteExecutor` using libssh2.
#[derive(Debug, Clone)]
pub struct Ssh2Executor {
    user: String,
    port: u16,
    retry: RetryPolicy,
}

impl Ssh2Executor {
    #[must_use]
    pub fn new(ssh: &SshConfig, retry: RetryPolicy) -> Self {
        Self {
            user: ssh.user.clone(),
            port: ssh.port,
            retry,
        }
    }

    fn execute_blocking(&self, spec: &RemoteCommandSpec) -> Result<RemoteOutcome> {
        let private_key = std::fs::read_to_string(&spec.credential_path).map_err(|e| {
            ConnectError::Fatal(format!(
                "cannot read ssh key {}: {e}",
                spec.credential_path
            ))
        })?;
        let addr = format!("{}:{}", spec.host, self.port);

        let session = connect_with_retry(&self.retry, std::thread::sleep, |attempt| {
            tracing::debug!(%addr, attempt, "connecting");
            self.connect(&addr, &private_key)
        })?;

        let mut stdout = std::io::stdout().lock();
        let outcome = run_command(&session, &spec.command_line(), &mut stdout);
        if let Err(e) = session.disconnect(None, "done", None) {
            tracing::debug!(error = %e, "ssh disconnect failed");
        }
        Ok(outcome?)
    }

    fn connect(&self, addr: &str, private_key: &str) -> Result<Session, ConnectError> {
        let tcp = TcpStream::connect(addr)
            .map_err(|e| ConnectError::Fatal(format!("failed to connect to {addr}: {e}")))?;

        let mut session = Session::new()
            .map_err(|e| ConnectError::Fatal(format!("failed to create SSH session: {e}")))?;
        session.set_tcp_stream(tcp);
        session.handshake().map_err(|e| classify_handshake_error(&e))?;

        session
            .userauth_pubkey_memory(&self.user, None, private_key, None)
            .map_err(|e| {
                ConnectError::Fatal(format!(
                    "public key authentication failed for {}: {e}",
                    self.user
                ))
            })?;
        if !session.authenticated() {
            return Err(ConnectError::Fatal(format!(
                "public key authentication failed for {}",
                self.user
            )));
        }
        Ok(session)
    }
}

impl RemoteExecutor for Ssh2Executor {
    async fn execute_on_remote(&self, spec: &RemoteCommandSpec) -> Result<RemoteOutcome> {
        let executor = self.clone();
        let spec = spec.clone();
        tokio::task::spawn_blocking(move || executor.execute_blocking(&spec))
            .await
            .map_err(|e| anyhow::anyhow!("spawn_blocking panicked: {e}"))?
    }
}

/// Sort a handshake failure into transient (retryable) or fatal.
///
/// Only the startup race signature is transient. Other key exchange
/// failures, such as no common algorithm, are fatal.
#[must_use]
pub fn classify_handshake_error(err: &ssh2::Error) -> ConnectError {
    let message = format!("SSH handshake failed: {err}");
    if err.message().contains(TRANSIENT_HANDSHAKE_SIGNATURE) {
        ConnectError::Transient(message)
    } else {
        ConnectError::Fatal(message)
    }
}

/// Call `attempt` until it succeeds, fails fatally, or the policy runs out.
///
/// Only [`ConnectError::Transient`] is retried; `sleep` receives the backoff
/// before each re-attempt. Running out yields [`ConnectError::Exhausted`].
///
/// # Errors
///
/// Returns the first fatal error, or `Exhausted` with the last transient one.
pub fn connect_with_retry<T>(
    policy: &RetryPolicy,
    mut sleep: impl FnMut(Duration),
    mut attempt: impl FnMut(u32) -> Result<T, ConnectError>,
) -> Result<T, ConnectError> {
    let max_attempts = policy.attempts();
    let mut current = 1;
    loop {
        match attempt(current) {
            Ok(value) => return Ok(value),
            Err(ConnectError::Transient(message)) if current < max_attempts => {
                tracing::warn!(
                    attempt = current,
                    max_attempts,
                    error = %message,
                    "failed to establish connection; retrying"
                );
                sleep(policy.backoff(current));
                current += 1;
            }
            Err(ConnectError::Transient(last)) => {
                return Err(ConnectError::Exhausted {
                    attempts: max_attempts,
                    last,
                });
            }
            Err(e) => return Err(e),
        }
    }
}

fn run_command(
    session: &Session,
    command_line: &str,
    out: &mut impl Write,
) -> Result<RemoteOutcome, ExecutionError> {
    let mut channel = session
        .channel_session()
        .map_err(|e| ExecutionError::Session(e.to_string()))?;
    channel
        .handle_extended_data(ExtendedData::Merge)
        .map_err(|e| ExecutionError::Session(e.to_string()))?;

    channel
        .exec(command_line)
        .map_err(|e| ExecutionError::Run(e.to_string()))?;
    std::io::copy(&mut channel, out)
        .map_err(|e| ExecutionError::Run(format!("reading remote output: {e}")))?;
    out.flush()
        .map_err(|e| ExecutionError::Run(format!("writing output: {e}")))?;

    channel
        .wait_close()
        .map_err(|e| ExecutionError::Run(e.to_string()))?;
    let exit_status = channel
        .exit_status()
        .map_err(|e| ExecutionError::Run(e.to_string()))?;
    let exit_signal = channel
        .exit_signal()
        .map_err(|e| ExecutionError::Run(e.to_string()))?
        .exit_signal;
    remote_outcome(exit_status, exit_signal)
}

/// A remote killed by a signal reports no exit status; libssh2 then reads 0.
fn remote_outcome(
    exit_status: i32,
    exit_signal: Option<String>,
) -> Result<RemoteOutcome, ExecutionError> {
    match exit_signal {
        Some(signal) => Err(ExecutionError::Signal(signal)),
        None => Ok(RemoteOutcome { exit_status }),
    }
}
