//! Builder-style configuration for [`super::QueryGenerator`].

use std::num::NonZeroUsize;

use crate::error::QueryGenError;

/// Validated query-synthesis parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratorConfig {
    seed: u64,
    min_vars: NonZeroUsize,
    max_vars: NonZeroUsize,
    max_extension_attempts: NonZeroUsize,
    max_query_attempts: NonZeroUsize,
    attribute_probability: f64,
    reuse_probability: f64,
    role_fill_probability: f64,
    pin_probability: f64,
}

impl GeneratorConfig {
    /// Seed of the generator's random source.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Smallest number of variables a query is grown to.
    #[must_use]
    pub fn min_vars(&self) -> NonZeroUsize {
        self.min_vars
    }

    /// Largest target number of variables. A relation extension may overshoot
    /// it by the number of role players it allocates.
    #[must_use]
    pub fn max_vars(&self) -> NonZeroUsize {
        self.max_vars
    }

    /// Random choices tried per extension step before the query is abandoned.
    #[must_use]
    pub fn max_extension_attempts(&self) -> NonZeroUsize {
        self.max_extension_attempts
    }

    /// Whole-query attempts before generation fails.
    #[must_use]
    pub fn max_query_attempts(&self) -> NonZeroUsize {
        self.max_query_attempts
    }

    /// Probability of growing by an attribute rather than a relation.
    #[must_use]
    pub fn attribute_probability(&self) -> f64 {
        self.attribute_probability
    }

    /// Probability of binding a role to an existing compatible variable.
    #[must_use]
    pub fn reuse_probability(&self) -> f64 {
        self.reuse_probability
    }

    /// Probability of binding each role other than the anchor's.
    #[must_use]
    pub fn role_fill_probability(&self) -> f64 {
        self.role_fill_probability
    }

    /// Probability of pinning a fresh non-attribute variable to an instance.
    #[must_use]
    pub fn pin_probability(&self) -> f64 {
        self.pin_probability
    }
}

/// Configures and validates [`GeneratorConfig`] values.
///
/// # Examples
/// ```
/// use kgbench_core::GeneratorBuilder;
///
/// let config = GeneratorBuilder::new()
///     .with_seed(7)
///     .with_vars(2, 5)
///     .build()
///     .expect("configuration is valid");
/// assert_eq!(config.seed(), 7);
/// assert_eq!(config.max_vars().get(), 5);
///
/// assert!(GeneratorBuilder::new().with_vars(4, 2).build().is_err());
/// ```
#[derive(Clone, Debug)]
pub struct GeneratorBuilder {
    seed: u64,
    min_vars: usize,
    max_vars: usize,
    max_extension_attempts: usize,
    max_query_attempts: usize,
    attribute_probability: f64,
    reuse_probability: f64,
    role_fill_probability: f64,
    pin_probability: f64,
}

impl Default for GeneratorBuilder {
    fn default() -> Self {
        Self {
            seed: 42,
            min_vars: 2,
            max_vars: 6,
            max_extension_attempts: 16,
            max_query_attempts: 8,
            attribute_probability: 0.3,
            reuse_probability: 0.25,
            role_fill_probability: 0.75,
            pin_probability: 0.0,
        }
    }
}

impl GeneratorBuilder {
    /// Creates a builder populated with default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the random seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the inclusive range of target variable counts.
    #[must_use]
    pub fn with_vars(mut self, min: usize, max: usize) -> Self {
        self.min_vars = min;
        self.max_vars = max;
        self
    }

    /// Sets how many random choices an extension step may try.
    #[must_use]
    pub fn with_max_extension_attempts(mut self, attempts: usize) -> Self {
        self.max_extension_attempts = attempts;
        self
    }

    /// Sets how many whole-query attempts are made.
    #[must_use]
    pub fn with_max_query_attempts(mut self, attempts: usize) -> Self {
        self.max_query_attempts = attempts;
        self
    }

    /// Sets the attribute-extension probability.
    #[must_use]
    pub fn with_attribute_probability(mut self, probability: f64) -> Self {
        self.attribute_probability = probability;
        self
    }

    /// Sets the variable-reuse probability.
    #[must_use]
    pub fn with_reuse_probability(mut self, probability: f64) -> Self {
        self.reuse_probability = probability;
        self
    }

    /// Sets the role-fill probability.
    #[must_use]
    pub fn with_role_fill_probability(mut self, probability: f64) -> Self {
        self.role_fill_probability = probability;
        self
    }

    /// Sets the instance-pinning probability.
    #[must_use]
    pub fn with_pin_probability(mut self, probability: f64) -> Self {
        self.pin_probability = probability;
        self
    }

    /// Validates the parameters.
    ///
    /// # Errors
    /// Returns [`QueryGenError::InvalidConfig`] when a count is zero, the
    /// variable range is inverted or a probability lies outside `[0, 1]`.
    pub fn build(self) -> Result<GeneratorConfig, QueryGenError> {
        let min_vars = non_zero("min_vars", self.min_vars)?;
        let max_vars = non_zero("max_vars", self.max_vars)?;
        if max_vars < min_vars {
            return Err(QueryGenError::invalid_config(format!(
                "max_vars ({max_vars}) is smaller than min_vars ({min_vars})"
            )));
        }
        Ok(GeneratorConfig {
            seed: self.seed,
            min_vars,
            max_vars,
            max_extension_attempts: non_zero(
                "max_extension_attempts",
                self.max_extension_attempts,
            )?,
            max_query_attempts: non_zero("max_query_attempts", self.max_query_attempts)?,
            attribute_probability: probability(
                "attribute_probability",
                self.attribute_probability,
            )?,
            reuse_probability: probability("reuse_probability", self.reuse_probability)?,
            role_fill_probability: probability(
                "role_fill_probability",
                self.role_fill_probability,
            )?,
            pin_probability: probability("pin_probability", self.pin_probability)?,
        })
    }
}

fn non_zero(name: &str, value: usize) -> Result<NonZeroUsize, QueryGenError> {
    NonZeroUsize::new(value)
        .ok_or_else(|| QueryGenError::invalid_config(format!("{name} must be at least 1")))
}

fn probability(name: &str, value: f64) -> Result<f64, QueryGenError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(QueryGenError::invalid_config(format!(
            "{name} must lie in [0, 1], got {value}"
        )))
    }
}
