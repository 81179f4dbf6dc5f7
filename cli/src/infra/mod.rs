//! Infrastructure layer — concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: HTTP calls to the Ops
//! Manager API, SSH sessions to the Ops Manager VM, and config file access.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` are forbidden.

pub mod config;
pub mod request_service;
pub mod ssh;
pub mod tls;
