//! Support library for the kgbench CLI binary.
//!
//! Exposes the command pipeline, benchmark configuration loading and logging
//! set-up so tests can drive them without spawning a subprocess.

pub mod cli;
pub mod config;
pub mod logging;
