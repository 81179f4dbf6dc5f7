//! Domain layer — pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod command;
pub mod config;
pub mod error;
pub mod manifest;
pub mod retry;
pub mod target;

pub use command::{RemoteCommandSpec, build_bosh_command};
pub use config::{SshConfig, ToolConfig};
pub use error::{ApiError, ConnectError, ExecutionError, ValidationError};
pub use manifest::{DeployedProduct, DirectorManifest, decode_products, find_product_guid};
pub use retry::RetryPolicy;
pub use target::{parse_target, ssh_host};
