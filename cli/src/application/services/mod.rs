//! Application services — use-case orchestration via injected ports.

pub mod bosh;
pub mod director;
