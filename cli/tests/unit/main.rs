//! Unit tests for execute-on-opsman
//!
//! These tests use fake ports and run fast without network or SSH access.

mod director_service;
mod fakes;
mod property_tests;
