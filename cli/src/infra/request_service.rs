//! Infrastructure implementation of the `RequestService` port.
//!
//! `OpsManagerClient` talks to the Ops Manager API with `ureq`, authenticating
//! once per process against the Ops Manager UAA with the password grant.
//! Blocking HTTP calls run on `spawn_blocking`.

use std::io::Read;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use tokio::sync::OnceCell;
use url::Url;

use crate::application::ports::{ApiResponse, Method, RequestService};
use crate::domain::error::ApiError;
use crate::infra::tls::insecure_client_config;

/// UAA path relative to the Ops Manager target.
pub const TOKEN_PATH: &str = "/uaa/oauth/token";

/// Public UAA client used by Ops Manager tooling.
const UAA_CLIENT_ID: &str = "opsman";

/// Upper bound on a single API response body.
const MAX_BODY_BYTES: u64 = 64 * 1024 * 1024;

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Production `RequestService` backed by a `ureq` agent.
pub struct OpsManagerClient {
    agent: ureq::Agent,
    target: Url,
    username: String,
    password: String,
    token: OnceCell<String>,
}

impl OpsManagerClient {
    /// Build a client for `target`, applying `timeout` to every request.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS client for `skip_ssl_validation` cannot be
    /// configured.
    pub fn new(
        target: Url,
        username: &str,
        password: &str,
        timeout: Duration,
        skip_ssl_validation: bool,
    ) -> Result<Self> {
        let mut builder = ureq::AgentBuilder::new().timeout(timeout);
        if skip_ssl_validation {
            tracing::debug!("skipping TLS certificate validation");
            builder = builder.tls_config(insecure_client_config()?);
        }
        Ok(Self {
            agent: builder.build(),
            target,
            username: username.to_string(),
            password: password.to_string(),
            token: OnceCell::new(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.target
            .join(path)
            .with_context(|| format!("invalid API path {path}"))
    }

    async fn access_token(&self) -> Result<&str> {
        let token = self
            .token
            .get_or_try_init(|| async {
                let url = self.endpoint(TOKEN_PATH)?;
                let agent = self.agent.clone();
                let username = self.username.clone();
                let password = self.password.clone();
                tokio::task::spawn_blocking(move || fetch_token(&agent, &url, &username, &password))
                    .await
                    .map_err(|e| anyhow::anyhow!("spawn_blocking panicked: {e}"))?
            })
            .await?;
        Ok(token.as_str())
    }
}

impl RequestService for OpsManagerClient {
    async fn invoke(&self, path: &str, method: Method) -> Result<ApiResponse> {
        let token = self
            .access_token()
            .await
            .context("could not authenticate with Ops Manager")?
            .to_string();
        let url = self.endpoint(path)?;
        let agent = self.agent.clone();
        let path = path.to_string();
        tokio::task::spawn_blocking(move || send(&agent, method, &url, &token, &path))
            .await
            .map_err(|e| anyhow::anyhow!("spawn_blocking panicked: {e}"))?
    }
}

fn fetch_token(agent: &ureq::Agent, url: &Url, username: &str, password: &str) -> Result<String> {
    let response = agent
        .post(url.as_str())
        .set("Accept", "application/json")
        .send_form(&[
            ("grant_type", "password"),
            ("username", username),
            ("password", password),
            ("client_id", UAA_CLIENT_ID),
            ("client_secret", ""),
        ])
        .map_err(|e| transport_error(TOKEN_PATH, e))?;

    let body = read_body(response, TOKEN_PATH)?;
    let token: TokenResponse =
        serde_json::from_slice(&body).map_err(|source| ApiError::Decode {
            what: "token response",
            source,
        })?;
    Ok(token.access_token)
}

fn send(
    agent: &ureq::Agent,
    method: Method,
    url: &Url,
    token: &str,
    path: &str,
) -> Result<ApiResponse> {
    let result = agent
        .request(method.as_str(), url.as_str())
        .set("Authorization", &format!("Bearer {token}"))
        .set("Accept", "application/json")
        .call();

    // Non-success statuses are responses, not transport failures.
    let response = match result {
        Ok(response) | Err(ureq::Error::Status(_, response)) => response,
        Err(e) => return Err(transport_error(path, e).into()),
    };
    let status = response.status();
    let body = read_body(response, path)?;
    Ok(ApiResponse { status, body })
}

fn read_body(response: ureq::Response, path: &str) -> Result<Vec<u8>> {
    let mut body = Vec::new();
    response
        .into_reader()
        .take(MAX_BODY_BYTES)
        .read_to_end(&mut body)
        .map_err(|e| ApiError::Transport {
            path: path.to_string(),
            message: format!("failed to read api response body: {e}"),
        })?;
    Ok(body)
}

fn transport_error(path: &str, err: ureq::Error) -> ApiError {
    let message = match err {
        ureq::Error::Status(code, response) => {
            let body = response.into_string().unwrap_or_default();
            format!("status {code}: {body}")
        }
        ureq::Error::Transport(transport) => transport.to_string(),
    };
    ApiError::Transport {
        path: path.to_string(),
        message,
    }
}
