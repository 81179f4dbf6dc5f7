//! Recording fakes for the application ports.
//!
//! `FakeOpsManager` serves canned bodies per API path and records every
//! request; `RecordingExecutor` captures the command spec it was asked to run.

#![allow(dead_code, clippy::expect_used)]

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::Result;
use execute_on_opsman::application::ports::{
    ApiResponse, Method, RemoteExecutor, RemoteOutcome, RequestService,
};
use execute_on_opsman::application::services::director::{
    DEPLOYED_PRODUCTS_PATH, DIRECTOR_MANIFEST_PATH,
};
use execute_on_opsman::domain::{ApiError, ConnectError, RemoteCommandSpec};

// ── Canned bodies ─────────────────────────────────────────────────────────────

pub const MANIFEST_BODY: &str = r#"{
    "jobs": [{
        "properties": {
            "uaa": {
                "clients": {
                    "ops_manager": {
                        "secret": "opsman_secret"
                    }
                }
            },
            "director": {
                "address": "10.0.4.2"
            }
        }
    }]
}"#;

pub const PRODUCTS_BODY: &str = r#"[
    {
        "installation_name": "p-bosh-guid",
        "guid": "p-bosh-guid",
        "type": "p-bosh"
    },
    {
        "installation_name": "cf-guid",
        "guid": "cf-guid",
        "type": "cf"
    }
]"#;

// ── Fake: Ops Manager API ─────────────────────────────────────────────────────

pub struct FakeOpsManager {
    responses: HashMap<String, ApiResponse>,
    calls: Mutex<Vec<(String, Method)>>,
}

impl FakeOpsManager {
    /// Director manifest and deployed products both available.
    pub fn healthy() -> Self {
        Self::new()
            .with(DIRECTOR_MANIFEST_PATH, 200, MANIFEST_BODY)
            .with(DEPLOYED_PRODUCTS_PATH, 200, PRODUCTS_BODY)
    }

    /// No paths served; every request fails at the transport level.
    pub fn new() -> Self {
        Self {
            responses: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with(mut self, path: &str, status: u16, body: &str) -> Self {
        self.responses.insert(
            path.to_string(),
            ApiResponse {
                status,
                body: body.as_bytes().to_vec(),
            },
        );
        self
    }

    pub fn calls(&self) -> Vec<(String, Method)> {
        self.calls.lock().expect("lock").clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("lock").len()
    }
}

impl RequestService for FakeOpsManager {
    async fn invoke(&self, path: &str, method: Method) -> Result<ApiResponse> {
        self.calls
            .lock()
            .expect("lock")
            .push((path.to_string(), method));
        match self.responses.get(path) {
            Some(response) => Ok(response.clone()),
            None => Err(ApiError::Transport {
                path: path.to_string(),
                message: "connection refused".to_string(),
            }
            .into()),
        }
    }
}

// ── Fake: remote executor ─────────────────────────────────────────────────────

pub struct RecordingExecutor {
    exit_status: i32,
    failure: Option<ConnectError>,
    specs: Mutex<Vec<RemoteCommandSpec>>,
}

impl RecordingExecutor {
    pub fn exiting_with(exit_status: i32) -> Self {
        Self {
            exit_status,
            failure: None,
            specs: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_with(failure: ConnectError) -> Self {
        Self {
            exit_status: 0,
            failure: Some(failure),
            specs: Mutex::new(Vec::new()),
        }
    }

    pub fn specs(&self) -> Vec<RemoteCommandSpec> {
        self.specs.lock().expect("lock").clone()
    }
}

impl RemoteExecutor for RecordingExecutor {
    async fn execute_on_remote(&self, spec: &RemoteCommandSpec) -> Result<RemoteOutcome> {
        self.specs.lock().expect("lock").push(spec.clone());
        if let Some(failure) = &self.failure {
            return Err(failure.clone().into());
        }
        Ok(RemoteOutcome {
            exit_status: self.exit_status,
        })
    }
}
