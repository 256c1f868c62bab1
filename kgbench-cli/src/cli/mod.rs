//! Command-line interface orchestration for kgbench.
//!
//! Three commands are offered: `degrees` computes the degree histogram of an
//! edge-list file, `generate` synthesises random queries against a YAML
//! knowledge graph, and `config` validates a benchmark configuration file.

mod commands;

pub use commands::{
    Cli, CliError, Command, ConfigCommand, DegreeSummary, DegreeValues, DegreesCommand,
    ExecutionSummary, GenerateCommand, GenerateSummary, render_summary, run_cli,
};

#[cfg(test)]
mod test_helpers;
