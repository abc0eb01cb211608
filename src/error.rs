//! Crate-level error types.

use thiserror::Error;

use crate::sampler::SampleError;

/// Errors surfaced by example computation.
///
/// Absence of examples is not an error: an unavailable shape or disabled
/// generation yields an empty artifact map, never an `Err`. Errors are
/// `Clone` because the reactive layer caches the failed result until the
/// next invalidation.
#[derive(Debug, Clone, Error)]
pub enum EngineError {
    /// The external sample generator failed. Not retried; the computation
    /// fails for this cycle only and a later selection change re-runs it.
    #[error("sample generation failed: {0}")]
    Sampler(#[from] SampleError),

    /// A source schema document could not be loaded into a shape graph.
    #[error("schema load failed: {0}")]
    Schema(String),
}

/// Result alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
