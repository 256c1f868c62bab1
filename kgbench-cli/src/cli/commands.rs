//! Command implementations and argument parsing for the kgbench CLI.

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use kgbench_core::{
    GeneratorBuilder, GraphProperties, MetricError, QueryGenError, QueryGenerator, QueryPattern,
    StoreErrorCode, degree_distribution, normalized_degree_distribution,
};
use kgbench_providers_edgelist::{DEFAULT_DELIMITER, EdgeListError, EdgeListGraph};
use kgbench_providers_memory::{KnowledgeGraph, MemoryStoreError};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

use crate::config::{BenchmarkConfig, ConfigError};

const DEFAULT_PERCENTILES: [f64; 5] = [0.0, 20.0, 50.0, 70.0, 100.0];
const DEFAULT_QUERY_COUNT: usize = 10;
const DEFAULT_SEED: u64 = 42;
const DEFAULT_MIN_VARS: usize = 2;
const DEFAULT_MAX_VARS: usize = 6;

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "kgbench",
    about = "Graph statistics and random query generation for knowledge graph benchmarks."
)]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Compute the degree distribution of an edge-list file.
    Degrees(DegreesCommand),
    /// Generate random queries against a knowledge graph.
    Generate(GenerateCommand),
    /// Validate a benchmark configuration file.
    Config(ConfigCommand),
}

/// Options accepted by the `degrees` command.
#[derive(Debug, Args, Clone)]
pub struct DegreesCommand {
    /// Edge-list file, one edge per line.
    pub path: PathBuf,

    /// Separator between endpoints on a line.
    #[arg(long, default_value_t = DEFAULT_DELIMITER)]
    pub delimiter: char,

    /// Number of endpoints of the edges to count.
    #[arg(long, default_value_t = 2)]
    pub arity: u32,

    /// Comma-separated percentiles in `[0, 100]`.
    #[arg(long, value_delimiter = ',', default_values_t = DEFAULT_PERCENTILES)]
    pub percentiles: Vec<f64>,

    /// Divide each degree by the maximum allowed degree.
    #[arg(long)]
    pub normalized: bool,

    /// Override name for the graph (defaults to the file name).
    #[arg(long)]
    pub name: Option<String>,
}

/// Options accepted by the `generate` command.
#[derive(Debug, Args, Clone)]
pub struct GenerateCommand {
    /// YAML schema document.
    #[arg(long)]
    pub schema: PathBuf,

    /// YAML instance data; required for pinning variables to instances.
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Number of queries to generate.
    #[arg(long, default_value_t = DEFAULT_QUERY_COUNT)]
    pub count: usize,

    /// Seed for the generator.
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Minimum number of variables per query.
    #[arg(long = "min-vars", default_value_t = DEFAULT_MIN_VARS)]
    pub min_vars: usize,

    /// Maximum number of variables per query.
    #[arg(long = "max-vars", default_value_t = DEFAULT_MAX_VARS)]
    pub max_vars: usize,
}

/// Options accepted by the `config` command.
#[derive(Debug, Args, Clone)]
pub struct ConfigCommand {
    /// Benchmark configuration file.
    pub path: PathBuf,
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// File I/O failed while opening an input.
    #[error("failed to open `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// Edge-list ingestion failed.
    #[error(transparent)]
    EdgeList(#[from] EdgeListError),
    /// Knowledge graph ingestion failed.
    #[error(transparent)]
    Memory(#[from] MemoryStoreError),
    /// Degree statistics failed.
    #[error(transparent)]
    Metric(#[from] MetricError),
    /// Query synthesis failed.
    #[error(transparent)]
    QueryGen(#[from] QueryGenError),
    /// The benchmark configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl CliError {
    /// Returns the stable code of a core failure, if this is one.
    #[must_use]
    pub const fn code(&self) -> Option<&'static str> {
        match self {
            Self::Metric(error) => Some(error.code().as_str()),
            Self::QueryGen(error) => Some(error.code().as_str()),
            _ => None,
        }
    }

    /// Returns the code of the store failure underneath a core failure.
    #[must_use]
    pub const fn store_code(&self) -> Option<StoreErrorCode> {
        match self {
            Self::Metric(error) => error.store_code(),
            Self::QueryGen(error) => error.store_code(),
            _ => None,
        }
    }
}

/// Percentile values of a degree distribution.
#[derive(Debug, Clone, PartialEq)]
pub enum DegreeValues {
    /// Raw degrees.
    Raw(Vec<u64>),
    /// Degrees divided by the maximum allowed degree.
    Normalized(Vec<f64>),
}

impl DegreeValues {
    fn len(&self) -> usize {
        match self {
            Self::Raw(values) => values.len(),
            Self::Normalized(values) => values.len(),
        }
    }
}

/// Outcome of the `degrees` command.
#[derive(Debug, Clone, PartialEq)]
pub struct DegreeSummary {
    /// Name of the graph.
    pub graph: String,
    /// Number of vertices, including isolated ones.
    pub vertices: u64,
    /// Edge arity that was counted.
    pub arity: u32,
    /// Requested percentiles.
    pub percentiles: Vec<f64>,
    /// Value at each percentile; empty for a graph without vertices.
    pub values: DegreeValues,
}

/// Outcome of the `generate` command.
#[derive(Debug, Clone)]
pub struct GenerateSummary {
    /// Name of the knowledge graph queried.
    pub source: String,
    /// Seed the generator ran with.
    pub seed: u64,
    /// Generated queries in generation order.
    pub queries: Vec<QueryPattern>,
}

/// Summarises the outcome of executing a CLI command.
#[derive(Debug, Clone)]
pub enum ExecutionSummary {
    /// Degree statistics.
    Degrees(DegreeSummary),
    /// Generated queries.
    Generate(GenerateSummary),
    /// Validated benchmark configuration.
    Config(BenchmarkConfig),
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when loading inputs or running the command fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use kgbench_cli::cli::{Cli, Command, DegreesCommand, ExecutionSummary, run_cli};
/// # use tempfile::NamedTempFile;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let file = NamedTempFile::new()?;
/// std::fs::write(file.path(), "a,b\nb,c\n")?;
/// let cli = Cli {
///     command: Command::Degrees(DegreesCommand {
///         path: file.path().to_path_buf(),
///         delimiter: ',',
///         arity: 2,
///         percentiles: vec![0.0, 100.0],
///         normalized: false,
///         name: None,
///     }),
/// };
/// let ExecutionSummary::Degrees(summary) = run_cli(cli)? else {
///     unreachable!("degrees returns a degree summary");
/// };
/// assert_eq!(summary.vertices, 3);
/// # Ok(())
/// # }
/// ```
#[instrument(
    name = "cli.run",
    err,
    skip(cli),
    fields(command = field::Empty),
)]
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    let span = Span::current();
    match cli.command {
        Command::Degrees(command) => {
            span.record("command", field::display("degrees"));
            run_degrees(command).map(ExecutionSummary::Degrees)
        }
        Command::Generate(command) => {
            span.record("command", field::display("generate"));
            run_generate(command).map(ExecutionSummary::Generate)
        }
        Command::Config(command) => {
            span.record("command", field::display("config"));
            run_config(&command).map(ExecutionSummary::Config)
        }
    }
}

#[instrument(
    name = "cli.degrees",
    err,
    skip(command),
    fields(path = field::Empty, arity = command.arity, normalized = command.normalized),
)]
pub(super) fn run_degrees(command: DegreesCommand) -> Result<DegreeSummary, CliError> {
    let DegreesCommand {
        path,
        delimiter,
        arity,
        percentiles,
        normalized,
        name,
    } = command;
    Span::current().record("path", field::display(path.display()));
    let chosen_name = derive_name(&path, name.as_deref(), "graph");
    let graph = EdgeListGraph::try_from_reader(chosen_name, open_reader(&path)?, delimiter)?;
    let values = if normalized {
        DegreeValues::Normalized(normalized_degree_distribution(&graph, arity, &percentiles)?)
    } else {
        DegreeValues::Raw(degree_distribution(&graph, arity, &percentiles)?)
    };
    let summary = DegreeSummary {
        graph: graph.name().to_owned(),
        vertices: graph.vertex_count().map_err(|error| MetricError::Store {
            graph: graph.name().into(),
            error,
        })?,
        arity,
        percentiles,
        values,
    };
    info!(
        graph = summary.graph.as_str(),
        vertices = summary.vertices,
        percentiles = summary.values.len(),
        "degree distribution computed"
    );
    Ok(summary)
}

#[instrument(
    name = "cli.generate",
    err,
    skip(command),
    fields(schema = field::Empty, count = command.count, seed = command.seed),
)]
pub(super) fn run_generate(command: GenerateCommand) -> Result<GenerateSummary, CliError> {
    Span::current().record("schema", field::display(command.schema.display()));
    ensure_readable(&command.schema)?;
    if let Some(data) = &command.data {
        ensure_readable(data)?;
    }
    let name = derive_name(&command.schema, None, "knowledge_graph");
    let knowledge = KnowledgeGraph::from_paths(name, &command.schema, command.data.as_deref())?;
    let config = GeneratorBuilder::new()
        .with_seed(command.seed)
        .with_vars(command.min_vars, command.max_vars)
        .build()?;
    let mut generator = QueryGenerator::new(&knowledge, config);
    let queries = generator.generate(command.count)?;
    info!(
        source = knowledge.name(),
        queries = queries.len(),
        "queries generated"
    );
    Ok(GenerateSummary {
        source: knowledge.name().to_owned(),
        seed: command.seed,
        queries,
    })
}

#[instrument(name = "cli.config", err, skip(command), fields(path = %command.path.display()))]
pub(super) fn run_config(command: &ConfigCommand) -> Result<BenchmarkConfig, CliError> {
    Ok(BenchmarkConfig::load(&command.path)?)
}

#[instrument(name = "cli.open_reader", err, fields(path = field::Empty))]
pub(super) fn open_reader(path: &Path) -> Result<BufReader<File>, CliError> {
    Span::current().record("path", field::display(path.display()));
    let file = File::open(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufReader::new(file))
}

fn ensure_readable(path: &Path) -> Result<(), CliError> {
    File::open(path).map(drop).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub(super) fn derive_name(path: &Path, override_name: Option<&str>, fallback: &str) -> String {
    if let Some(name) = override_name {
        return name.to_owned();
    }

    path.file_stem()
        .and_then(|value| value.to_str())
        .map_or_else(|| fallback.to_owned(), ToOwned::to_owned)
}

/// Renders `summary` to `writer` in a human-readable text format.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use kgbench_cli::cli::{DegreeSummary, DegreeValues, ExecutionSummary, render_summary};
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let summary = ExecutionSummary::Degrees(DegreeSummary {
///     graph: "demo".into(),
///     vertices: 3,
///     arity: 2,
///     percentiles: vec![0.0, 100.0],
///     values: DegreeValues::Raw(vec![1, 2]),
/// });
/// let mut buffer = Vec::new();
/// render_summary(&summary, &mut buffer)?;
/// assert_eq!(
///     String::from_utf8(buffer)?,
///     "graph: demo\nvertices: 3\narity: 2\npercentile\tdegree\n0\t1\n100\t2\n"
/// );
/// # Ok(())
/// # }
/// ```
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    match summary {
        ExecutionSummary::Degrees(degrees) => render_degrees(degrees, &mut writer),
        ExecutionSummary::Generate(generated) => {
            writeln!(writer, "source: {}", generated.source)?;
            writeln!(writer, "seed: {}", generated.seed)?;
            writeln!(writer, "queries: {}", generated.queries.len())?;
            for query in &generated.queries {
                writeln!(writer, "{query}")?;
            }
            Ok(())
        }
        ExecutionSummary::Config(config) => {
            writeln!(writer, "name: {}", config.name())?;
            writeln!(writer, "schema: {}", config.schema().display())?;
            writeln!(writer, "queries: {}", config.queries().display())?;
            let concepts: Vec<String> = config.concepts().iter().map(u64::to_string).collect();
            writeln!(writer, "concepts: {}", concepts.join(", "))?;
            writeln!(writer, "repeats per query: {}", config.repeats_per_query())
        }
    }
}

fn render_degrees(summary: &DegreeSummary, writer: &mut impl Write) -> io::Result<()> {
    writeln!(writer, "graph: {}", summary.graph)?;
    writeln!(writer, "vertices: {}", summary.vertices)?;
    writeln!(writer, "arity: {}", summary.arity)?;
    match &summary.values {
        DegreeValues::Raw(values) => {
            writeln!(writer, "percentile\tdegree")?;
            for (percentile, value) in summary.percentiles.iter().zip(values) {
                writeln!(writer, "{percentile}\t{value}")?;
            }
        }
        DegreeValues::Normalized(values) => {
            writeln!(writer, "percentile\tnormalized degree")?;
            for (percentile, value) in summary.percentiles.iter().zip(values) {
                writeln!(writer, "{percentile}\t{value:.4}")?;
            }
        }
    }
    Ok(())
}
