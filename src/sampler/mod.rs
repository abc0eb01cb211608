//! Sampling contract consumed by the example engine.

use serde_json::Value;
use thiserror::Error;

use crate::domain::media::GenerationOptions;
use crate::domain::resolved::ResolvedShape;

pub mod faker;

pub use faker::FakerSampler;

/// Errors raised by a [`SampleGenerator`].
#[derive(Debug, Clone, Error)]
pub enum SampleError {
    /// The resolved shape contains a construct the generator cannot sample
    #[error("unsupported shape construct: {0}")]
    Unsupported(String),

    /// Generation failed for an otherwise well-formed shape
    #[error("sample generation failed: {0}")]
    Failed(String),
}

/// Turns a resolved, polymorphism-free shape into one concrete value.
///
/// Implementations must honor every [`GenerationOptions`] flag: read-only
/// fields are omitted when `skip_read_only`, write-only fields when
/// `skip_write_only`, optional fields when `skip_non_required`, and
/// containers nested deeper than `max_depth` collapse to an empty
/// placeholder instead of expanding. Implementations are
/// discriminator-unaware by contract; the engine patches tags afterwards.
pub trait SampleGenerator {
    fn sample(&self, shape: &ResolvedShape, options: &GenerationOptions)
        -> Result<Value, SampleError>;
}
