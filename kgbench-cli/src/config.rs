//! Benchmark configuration files.
//!
//! A configuration names the schema and query files of one benchmark run,
//! the concept counts to benchmark at and how often each query repeats.
//!
//! ```yaml
//! name: societal
//! schema: schema.gql
//! queries: queries.yml
//! concepts: [100, 1000]
//! repeatsPerQuery: 10
//! ```

use std::{
    fs,
    num::NonZeroU32,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument};

/// Errors raised while loading a [`BenchmarkConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read `{path}`: {source}")]
    Io {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: std::io::Error,
    },
    /// The configuration is not valid YAML for the expected shape.
    #[error("invalid benchmark configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// `name` was blank.
    #[error("benchmark name must not be empty")]
    EmptyName,
    /// `concepts` listed no counts.
    #[error("at least one concept count is required")]
    NoConcepts,
    /// `concepts` was not strictly increasing.
    #[error("concept counts must increase strictly, but {next} follows {previous}")]
    UnorderedConcepts {
        /// Count preceding the offending entry.
        previous: u64,
        /// Offending entry.
        next: u64,
    },
    /// `repeatsPerQuery` was zero.
    #[error("repeatsPerQuery must be at least 1")]
    ZeroRepeats,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawConfig {
    name: String,
    schema: PathBuf,
    queries: PathBuf,
    concepts: Vec<u64>,
    repeats_per_query: u32,
}

/// Validated benchmark configuration with resolved file paths.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BenchmarkConfig {
    name: String,
    schema: PathBuf,
    queries: PathBuf,
    concepts: Vec<u64>,
    repeats_per_query: NonZeroU32,
}

impl BenchmarkConfig {
    /// Reads the configuration at `path`, resolving `schema` and `queries`
    /// against the file's directory.
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] when the file cannot be read and the errors
    /// of [`BenchmarkConfig::from_yaml_str`] otherwise.
    #[instrument(name = "config.load", err, fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let yaml = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        let config = Self::from_yaml_str(&yaml, base)?;
        debug!(
            name = config.name.as_str(),
            concepts = config.concepts.len(),
            "benchmark configuration loaded"
        );
        Ok(config)
    }

    /// Parses a configuration, resolving relative paths against `base`.
    ///
    /// # Errors
    /// Returns [`ConfigError::Yaml`] for malformed documents and the matching
    /// validation error when the name is blank, `concepts` is empty or not
    /// strictly increasing, or `repeatsPerQuery` is zero.
    ///
    /// # Examples
    /// ```
    /// use std::path::Path;
    /// use kgbench_cli::config::BenchmarkConfig;
    ///
    /// let yaml = "name: demo\nschema: s.yaml\nqueries: q.yaml\nconcepts: [10, 20]\nrepeatsPerQuery: 3\n";
    /// let config = BenchmarkConfig::from_yaml_str(yaml, Path::new("/bench"))?;
    /// assert_eq!(config.schema(), Path::new("/bench/s.yaml"));
    /// assert_eq!(config.repeats_per_query().get(), 3);
    /// # Ok::<(), kgbench_cli::config::ConfigError>(())
    /// ```
    pub fn from_yaml_str(yaml: &str, base: &Path) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_yaml::from_str(yaml)?;
        if raw.name.trim().is_empty() {
            return Err(ConfigError::EmptyName);
        }
        if raw.concepts.is_empty() {
            return Err(ConfigError::NoConcepts);
        }
        let unordered = raw.concepts.windows(2).find_map(|pair| match *pair {
            [previous, next] if previous >= next => Some((previous, next)),
            _ => None,
        });
        if let Some((previous, next)) = unordered {
            return Err(ConfigError::UnorderedConcepts { previous, next });
        }
        let repeats_per_query = NonZeroU32::new(raw.repeats_per_query).ok_or(ConfigError::ZeroRepeats)?;
        Ok(Self {
            name: raw.name,
            schema: base.join(raw.schema),
            queries: base.join(raw.queries),
            concepts: raw.concepts,
            repeats_per_query,
        })
    }

    /// Returns the benchmark name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the resolved schema path.
    #[must_use]
    pub fn schema(&self) -> &Path {
        &self.schema
    }

    /// Returns the resolved queries path.
    #[must_use]
    pub fn queries(&self) -> &Path {
        &self.queries
    }

    /// Returns the concept counts to benchmark at, ascending.
    #[must_use]
    pub fn concepts(&self) -> &[u64] {
        &self.concepts
    }

    #[must_use]
    pub fn repeats_per_query(&self) -> NonZeroU32 {
        self.repeats_per_query
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    const VALID: &str = "\
name: societal
schema: schema.yaml
queries: queries/all.yaml
concepts: [100, 1000, 5000]
repeatsPerQuery: 10
";

    #[test]
    fn relative_paths_resolve_against_the_base() {
        let config = BenchmarkConfig::from_yaml_str(VALID, Path::new("/runs/a")).expect("valid config");
        assert_eq!(config.name(), "societal");
        assert_eq!(config.schema(), Path::new("/runs/a/schema.yaml"));
        assert_eq!(config.queries(), Path::new("/runs/a/queries/all.yaml"));
        assert_eq!(config.concepts(), &[100, 1000, 5000]);
    }

    #[test]
    fn absolute_paths_are_kept() {
        let yaml = VALID.replace("schema.yaml", "/data/schema.yaml");
        let config = BenchmarkConfig::from_yaml_str(&yaml, Path::new("/runs/a")).expect("valid config");
        assert_eq!(config.schema(), Path::new("/data/schema.yaml"));
    }

    #[rstest]
    #[case::blank_name(VALID.replace("name: societal", "name: \"  \""))]
    #[case::no_concepts(VALID.replace("[100, 1000, 5000]", "[]"))]
    #[case::unordered(VALID.replace("[100, 1000, 5000]", "[100, 100]"))]
    #[case::zero_repeats(VALID.replace("repeatsPerQuery: 10", "repeatsPerQuery: 0"))]
    #[case::snake_case_key(VALID.replace("repeatsPerQuery", "repeats_per_query"))]
    #[case::negative_concepts(VALID.replace("[100, 1000, 5000]", "[-1]"))]
    fn invalid_configs_are_rejected(#[case] yaml: String) {
        assert!(BenchmarkConfig::from_yaml_str(&yaml, Path::new(".")).is_err());
    }

    #[test]
    fn unordered_concepts_name_the_offending_pair() {
        let yaml = VALID.replace("[100, 1000, 5000]", "[10, 30, 20]");
        let err = BenchmarkConfig::from_yaml_str(&yaml, Path::new(".")).expect_err("must fail");
        assert!(matches!(
            err,
            ConfigError::UnorderedConcepts {
                previous: 30,
                next: 20
            }
        ));
    }

    #[test]
    fn missing_files_report_their_path() {
        let dir = tempfile::tempdir().expect("temp dir must be created");
        let path = dir.path().join("absent.yaml");
        let err = BenchmarkConfig::load(&path).expect_err("file does not exist");
        match err {
            ConfigError::Io { path: reported, .. } => assert_eq!(reported, path),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
