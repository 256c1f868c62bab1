//! Randomised synthesis of schema-consistent read queries.
//!
//! A [`QueryBuilder`] grows one query through atomic [`Extension`]s and is
//! consumed into an immutable [`QueryPattern`]. The [`QueryGenerator`] drives
//! builders with random, schema-checked choices.

mod builder;
mod config;
mod generator;
mod pattern;

use std::fmt;

pub use builder::{BuilderState, Extension, QueryBuilder, Slot};
pub use config::{GeneratorBuilder, GeneratorConfig};
pub use generator::QueryGenerator;
pub use pattern::{QueryPattern, RelationStatement};

/// Query variable, allocated densely from zero within one builder.
///
/// # Examples
/// ```
/// use kgbench_core::Variable;
///
/// assert_eq!(Variable::new(3).to_string(), "$x3");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Variable(usize);

impl Variable {
    /// Wraps an allocation index.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the allocation index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "$x{}", self.0)
    }
}
