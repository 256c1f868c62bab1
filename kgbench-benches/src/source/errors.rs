//! Error types for synthetic benchmark data generation.

/// Errors that may occur while generating benchmark inputs.
#[derive(Debug, thiserror::Error)]
pub enum SyntheticError {
    /// The requested vertex count was zero.
    #[error("vertex count must be greater than zero")]
    ZeroVertices,
    /// The requested edge arity was zero.
    #[error("edge arity must be greater than zero")]
    ZeroArity,
    /// The requested instance count was zero.
    #[error("instance count must be greater than zero")]
    ZeroInstances,
    /// The stride selecting role players was zero.
    #[error("role-player stride must be greater than zero")]
    ZeroStride,
    /// Relations were requested without any role players to fill them.
    #[error("{relations} relations need at least one person and one company")]
    NoPlayers {
        /// Number of relations requested.
        relations: usize,
    },
}
