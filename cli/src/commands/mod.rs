//! Command implementations

pub mod bosh;
