//! Error types for the lintel engine.

use thiserror::Error;

/// A specialized `Result` type for taxonomy, inference, and validation operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Defines the errors that can occur while building a taxonomy or running inference.
///
/// A failed validation is *not* an error: [`crate::ShapeValidator::validate`]
/// returns `Ok` with a populated [`crate::ValidationReport`] in that case.
#[derive(Error, Debug, Clone)]
pub enum Error {
    /// The declared class hierarchy contains a cycle.
    #[error("cyclic class hierarchy through {0}")]
    CyclicHierarchy(String),

    /// Two or more tag-set rules cannot be ordered by specificity.
    #[error("ambiguous tag-set resolution: {0}")]
    AmbiguousTagSet(String),

    /// The same class was declared more than once in the builder.
    #[error("class declared twice: {0}")]
    DuplicateClass(String),

    /// A shape was defined with inconsistent constraints.
    #[error("invalid shape definition: {0}")]
    InvalidShape(String),

    /// A caller-imposed pass ceiling was exceeded before the closure converged.
    #[error("inference did not converge within {limit} passes")]
    PassLimitExceeded { limit: usize },

    /// An internal fact store lock was poisoned.
    #[error("fact store error: {0}")]
    Store(String),

    /// A report could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(String),
}
