//! Shared test utilities used across kgbench crates.

pub mod ci;
pub mod fixtures;
pub mod recording;
