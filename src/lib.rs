//! # Exemplar - Reactive Example Synthesis
//!
//! Exemplar turns a discriminated-union shape graph into ready-to-show
//! example payloads, and keeps those payloads up to date as variant
//! selections change.
//!
//! ## Features
//!
//! - **Shape graphs**: Arena-backed trees of scalars, objects, arrays, and
//!   polymorphic (`oneOf`-style) nodes with a live variant selection
//! - **Active-variant resolution**: Collapses polymorphism to the concrete
//!   shape behind the current selections, stacking discriminators
//! - **Fake-data sampling**: Format-aware value generation via the `fake`
//!   crate, with depth limiting and read-only/write-only filtering
//! - **Discriminator patching**: Sampled payloads carry the tags that make
//!   them valid members of their variant
//! - **Reactivity**: A cached computation re-derives examples only when a
//!   selection it actually read has changed
//! - **Schema ingestion**: A JSON-Schema-subset loader for driving the
//!   engine from source documents
//!
//! ## Quick Start
//!
//! ```rust
//! use std::rc::Rc;
//! use exemplar::domain::media::MediaDescriptor;
//! use exemplar::domain::shape::{FieldDef, ShapeArena};
//! use exemplar::engine::orchestrator::ExampleEngine;
//!
//! let mut builder = ShapeArena::builder();
//! let name = builder.string();
//! let cat = builder.object(vec![FieldDef::new("name", name).required()]);
//! let dog = builder.object(vec![FieldDef::new("name", name).required()]);
//! let pet = builder.one_of(Some("petType"), vec![("Cat", cat), ("Dog", dog)]);
//! let graph = Rc::new(builder.finish());
//!
//! let media = MediaDescriptor::generated("application/json", false, pet);
//! let engine = ExampleEngine::default();
//! let examples = engine.examples(Some(&graph), &media)?;
//!
//! assert_eq!(examples["Cat"].value["petType"], "Cat");
//! assert_eq!(examples["Dog"].value["petType"], "Dog");
//! # Ok::<(), exemplar::EngineError>(())
//! ```
//!
//! ## Architecture
//!
//! - **Domain**: Shape graph, resolved shapes, media descriptors
//! - **Engine**: Dependency collection, resolution, patching, orchestration
//! - **Sampler**: Pluggable value generation behind [`SampleGenerator`]
//! - **Reactive**: Cells and cached computations with dependency tracking

pub mod domain;
pub mod engine;
pub mod error;
pub mod reactive;
pub mod sampler;
pub mod schema;

pub use domain::media::{
    EncodingHint, EngineSettings, ExampleArtifact, GenerationOptions, MediaDescriptor,
};
pub use domain::resolved::{Discriminator, ResolvedKind, ResolvedShape};
pub use domain::shape::{ShapeArena, ShapeBuilder, ShapeId};
pub use engine::orchestrator::{ExampleEngine, ExampleMap, DEFAULT_EXAMPLE_NAME};
pub use error::{EngineError, EngineResult};
pub use reactive::{Computed, ValueCell};
pub use sampler::{FakerSampler, SampleError, SampleGenerator};
pub use schema::load_shape_graph;
