//! Error types for the kgbench core library.
//!
//! Every enum exposes a stable machine-readable code so the CLI and log
//! pipelines can classify failures without matching on display strings.

use std::{fmt, sync::Arc};

use thiserror::Error;

use crate::{
    ids::{ConceptId, RoleLabel, TypeLabel, VertexId},
    query::Variable,
};

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// An error signalled by a backing store behind one of the capability traits.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum StoreError {
    /// The requested vertex does not exist.
    #[error("vertex `{vertex}` does not exist")]
    UnknownVertex {
        /// Vertex that could not be resolved.
        vertex: VertexId,
    },
    /// The requested type is not declared by the schema.
    #[error("type `{label}` is not declared")]
    UnknownType {
        /// Label that could not be resolved.
        label: TypeLabel,
    },
    /// The relation type does not declare the requested role.
    #[error("relation `{relation}` does not relate role `{role}`")]
    UnknownRole {
        /// Relation type that was queried.
        relation: TypeLabel,
        /// Role that the relation does not declare.
        role: RoleLabel,
    },
    /// A fetched instance belonged to a different type than the one requested.
    #[error("concept `{id}` has type `{found}` but `{expected}` was requested")]
    TypeMismatch {
        /// Instance returned by the store.
        id: ConceptId,
        /// Type the caller asked for.
        expected: TypeLabel,
        /// Type the instance actually has.
        found: TypeLabel,
    },
    /// A page lookup addressed an offset beyond the candidate count.
    #[error("offset {offset} is outside the {count} available candidates")]
    OffsetOutOfRange {
        /// Requested ordinal offset.
        offset: usize,
        /// Number of candidates the store holds.
        count: usize,
    },
    /// The backend failed for a reason outside this taxonomy.
    #[error("store backend failed: {message}")]
    Backend {
        /// Backend-provided description.
        message: Arc<str>,
    },
}

define_error_codes! {
    /// Stable codes describing [`StoreError`] variants.
    enum StoreErrorCode for StoreError {
        /// The requested vertex does not exist.
        UnknownVertex => UnknownVertex { .. } => "STORE_UNKNOWN_VERTEX",
        /// The requested type is not declared by the schema.
        UnknownType => UnknownType { .. } => "STORE_UNKNOWN_TYPE",
        /// The relation type does not declare the requested role.
        UnknownRole => UnknownRole { .. } => "STORE_UNKNOWN_ROLE",
        /// A fetched instance belonged to a different type than requested.
        TypeMismatch => TypeMismatch { .. } => "STORE_TYPE_MISMATCH",
        /// A page lookup addressed an offset beyond the candidate count.
        OffsetOutOfRange => OffsetOutOfRange { .. } => "STORE_OFFSET_OUT_OF_RANGE",
        /// The backend failed for another reason.
        Backend => Backend { .. } => "STORE_BACKEND_FAILURE",
    }
}

/// Error produced while sampling identifiers with a [`crate::Picker`].
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum PickError {
    /// More distinct identifiers were requested than candidates exist.
    #[error("requested {requested} distinct candidates but only {available} exist")]
    ExhaustedCandidates {
        /// Number of identifiers the caller asked for.
        requested: usize,
        /// Number of candidates the source reported.
        available: usize,
    },
    /// A page lookup inside the counted range returned nothing.
    #[error("no candidate found at offset {offset} of {count}")]
    MissingCandidate {
        /// Offset that yielded no result.
        offset: usize,
        /// Candidate count observed when sampling started.
        count: usize,
    },
    /// The backing store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

define_error_codes! {
    /// Stable codes describing [`PickError`] variants.
    enum PickErrorCode for PickError {
        /// More distinct identifiers were requested than candidates exist.
        ExhaustedCandidates => ExhaustedCandidates { .. } => "PICK_EXHAUSTED_CANDIDATES",
        /// A page lookup inside the counted range returned nothing.
        MissingCandidate => MissingCandidate { .. } => "PICK_MISSING_CANDIDATE",
        /// The backing store failed.
        StoreFailure => Store { .. } => "PICK_STORE_FAILURE",
    }
}

impl PickError {
    /// Retrieve the inner [`StoreErrorCode`] when the error originated in a store.
    pub const fn store_code(&self) -> Option<StoreErrorCode> {
        match self {
            Self::Store(error) => Some(error.code()),
            _ => None,
        }
    }
}

/// Error produced while computing degree statistics.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum MetricError {
    /// A requested percentile was not a finite value in `[0, 100]`.
    #[error("percentile {value} must be a finite value between 0 and 100")]
    InvalidPercentile {
        /// The rejected percentile.
        value: f64,
    },
    /// Edge arity must be at least one.
    #[error("edge arity {arity} is not supported")]
    UnsupportedArity {
        /// The rejected arity.
        arity: u32,
    },
    /// The degree query reported more touched vertices than the graph holds.
    #[error("graph `{graph}` reported {reported} vertices with degree > 0 but only has {vertices}")]
    InconsistentDegreeData {
        /// Name of the graph that produced the data.
        graph: Arc<str>,
        /// Number of non-zero degrees reported.
        reported: usize,
        /// Total vertex count reported.
        vertices: u64,
    },
    /// A degree exceeded the combinatorial bound used for normalisation.
    #[error("degree {degree} exceeds the maximum allowed degree {bound}")]
    DegreeExceedsBound {
        /// Observed degree.
        degree: u64,
        /// Bound reported by the graph.
        bound: u64,
    },
    /// A [`crate::GraphProperties`] query failed.
    #[error("graph `{graph}` failed: {error}")]
    Store {
        /// Name of the graph that failed.
        graph: Arc<str>,
        #[source]
        /// Underlying store error.
        error: StoreError,
    },
}

define_error_codes! {
    /// Stable codes describing [`MetricError`] variants.
    enum MetricErrorCode for MetricError {
        /// A requested percentile was out of range.
        InvalidPercentile => InvalidPercentile { .. } => "METRIC_INVALID_PERCENTILE",
        /// Edge arity must be at least one.
        UnsupportedArity => UnsupportedArity { .. } => "METRIC_UNSUPPORTED_ARITY",
        /// The degree query reported more vertices than exist.
        InconsistentDegreeData => InconsistentDegreeData { .. } => "METRIC_INCONSISTENT_DEGREE_DATA",
        /// A degree exceeded the normalisation bound.
        DegreeExceedsBound => DegreeExceedsBound { .. } => "METRIC_DEGREE_EXCEEDS_BOUND",
        /// A graph query failed.
        StoreFailure => Store { .. } => "METRIC_STORE_FAILURE",
    }
}

impl MetricError {
    /// Retrieve the inner [`StoreErrorCode`] when a graph query failed.
    pub const fn store_code(&self) -> Option<StoreErrorCode> {
        match self {
            Self::Store { error, .. } => Some(error.code()),
            _ => None,
        }
    }
}

/// Error produced while synthesising queries.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum QueryGenError {
    /// The schema declares no types to start a query from.
    #[error("schema declares no thing types")]
    EmptySchema,
    /// No legal extension was found within the attempt budget.
    #[error("no legal extension found after {attempts} attempts: {reason}")]
    SchemaViolation {
        /// Attempts spent before giving up.
        attempts: usize,
        /// Description of the last rejected choice.
        reason: Arc<str>,
    },
    /// A builder was finished before any variable was allocated.
    #[error("query has no variables")]
    EmptyQuery,
    /// A variable appears in the pattern without a resolved type.
    #[error("variable {variable} is referenced but has no type")]
    UnboundVariable {
        /// The offending variable.
        variable: Variable,
    },
    /// The allocation counter disagrees with the type map.
    #[error("allocated {next_var} variables but {mapped} have types")]
    CounterMismatch {
        /// Value of the allocation counter.
        next_var: usize,
        /// Number of entries in the type map.
        mapped: usize,
    },
    /// Every attempt to build one query failed.
    #[error("query generation failed after {attempts} attempts: {last}")]
    GenerationFailed {
        /// Number of whole-query attempts made.
        attempts: usize,
        #[source]
        /// Failure of the final attempt.
        last: Box<QueryGenError>,
    },
    /// Generator configuration was rejected.
    #[error("invalid generator configuration: {reason}")]
    InvalidConfig {
        /// Description of the invalid setting.
        reason: Arc<str>,
    },
    /// Picking a concrete instance failed.
    #[error(transparent)]
    Pick(#[from] PickError),
    /// Schema introspection failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

define_error_codes! {
    /// Stable codes describing [`QueryGenError`] variants.
    enum QueryGenErrorCode for QueryGenError {
        /// The schema declares no types.
        EmptySchema => EmptySchema => "QUERYGEN_EMPTY_SCHEMA",
        /// No legal extension was found.
        SchemaViolation => SchemaViolation { .. } => "QUERYGEN_SCHEMA_VIOLATION",
        /// A builder was finished without variables.
        EmptyQuery => EmptyQuery => "QUERYGEN_EMPTY_QUERY",
        /// A variable has no resolved type.
        UnboundVariable => UnboundVariable { .. } => "QUERYGEN_UNBOUND_VARIABLE",
        /// The allocation counter disagrees with the type map.
        CounterMismatch => CounterMismatch { .. } => "QUERYGEN_COUNTER_MISMATCH",
        /// Every attempt to build one query failed.
        GenerationFailed => GenerationFailed { .. } => "QUERYGEN_GENERATION_FAILED",
        /// Generator configuration was rejected.
        InvalidConfig => InvalidConfig { .. } => "QUERYGEN_INVALID_CONFIG",
        /// Picking a concrete instance failed.
        PickFailure => Pick { .. } => "QUERYGEN_PICK_FAILURE",
        /// Schema introspection failed.
        StoreFailure => Store { .. } => "QUERYGEN_STORE_FAILURE",
    }
}

impl QueryGenError {
    /// Retrieve the inner [`StoreErrorCode`] when schema introspection or an
    /// instance lookup failed.
    pub const fn store_code(&self) -> Option<StoreErrorCode> {
        match self {
            Self::Store(error) | Self::Pick(PickError::Store(error)) => Some(error.code()),
            _ => None,
        }
    }

    pub(crate) fn schema_violation(attempts: usize, reason: impl AsRef<str>) -> Self {
        Self::SchemaViolation {
            attempts,
            reason: Arc::from(reason.as_ref()),
        }
    }

    pub(crate) fn invalid_config(reason: impl AsRef<str>) -> Self {
        Self::InvalidConfig {
            reason: Arc::from(reason.as_ref()),
        }
    }
}

/// Convenient alias for results returned by store-backed operations.
pub type StoreResult<T> = core::result::Result<T, StoreError>;
