//! Example engine: deciding what to emit and wiring the pipeline
//!
//! Three states, evaluated in order. `Static`: the media carries
//! caller-supplied examples, returned verbatim and generation is skipped
//! entirely. `NoExamples`: generation is disabled, or the shape graph /
//! root shape is unavailable, or the root has no concrete form; an empty
//! map, silently. `Generating`: dependencies are collected first (so the
//! surrounding computation subscribes to every selection, active or not),
//! then either one artifact per root variant or a single `"default"`
//! artifact.

use std::collections::HashMap;
use std::rc::Rc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::media::{EngineSettings, ExampleArtifact, GenerationOptions, MediaDescriptor};
use crate::domain::shape::ShapeArena;
use crate::engine::collector::collect_dependencies;
use crate::engine::patcher::patch_discriminators;
use crate::engine::resolver::{resolve, resolve_variant};
use crate::error::EngineResult;
use crate::reactive::Computed;
use crate::sampler::{FakerSampler, SampleGenerator};

/// Artifact key used when the root is not polymorphic.
pub const DEFAULT_EXAMPLE_NAME: &str = "default";

/// Map of example name to artifact, handed to a rendering layer.
pub type ExampleMap = HashMap<String, ExampleArtifact>;

/// Orchestrates example synthesis for media descriptors.
#[derive(Clone)]
pub struct ExampleEngine {
    sampler: Rc<dyn SampleGenerator>,
    settings: EngineSettings,
}

impl Default for ExampleEngine {
    fn default() -> Self {
        Self::new(Rc::new(FakerSampler), EngineSettings::default())
    }
}

impl ExampleEngine {
    pub fn new(sampler: Rc<dyn SampleGenerator>, settings: EngineSettings) -> Self {
        Self { sampler, settings }
    }

    /// One synchronous pass of the pipeline. Reads selection state
    /// through the tracked layer; call inside a [`Computed`] (or use
    /// [`computed`](ExampleEngine::computed)) to get invalidation on
    /// selection changes.
    pub fn examples(
        &self,
        graph: Option<&Rc<ShapeArena>>,
        media: &MediaDescriptor,
    ) -> EngineResult<ExampleMap> {
        if !media.static_examples.is_empty() {
            debug!(media = %media.name, "returning caller-supplied examples");
            return Ok(media.static_examples.clone());
        }
        if !media.generate_examples {
            return Ok(ExampleMap::new());
        }
        let (graph, root) = match (graph, media.shape) {
            (Some(graph), Some(root)) => (graph, root),
            _ => {
                debug!(media = %media.name, "shape or context unavailable, no examples");
                return Ok(ExampleMap::new());
            }
        };
        // Descriptors are deserializable, so the root id may not belong
        // to this arena.
        if !graph.contains(root) {
            warn!(media = %media.name, node = root.0, "root shape id out of range, no examples");
            return Ok(ExampleMap::new());
        }

        // Subscribe to every selection before resolving; the resolver
        // alone would miss inactive branches.
        collect_dependencies(graph, root);

        let options = GenerationOptions::for_direction(media.is_request, &self.settings);
        let mut artifacts = ExampleMap::new();

        let variants = graph.variants(root);
        if graph.is_polymorphic(root) && !variants.is_empty() {
            for (index, variant) in variants.iter().enumerate() {
                let Some(resolved) = resolve_variant(graph, root, index) else {
                    continue;
                };
                debug!(media = %media.name, tag = %variant.tag, "generating variant example");
                let mut value = self.sampler.sample(&resolved, &options)?;

                // Root tag is written directly: the forced-variant
                // resolve left it off so every artifact gets its own.
                if let (Some(field), Value::Object(map)) =
                    (graph.discriminator_field(root), &mut value)
                {
                    map.insert(field.to_string(), Value::String(variant.tag.clone()));
                }
                patch_discriminators(&mut value, &resolved);

                let mut artifact = ExampleArtifact::new(&variant.tag, value);
                artifact.encoding = media.encoding.clone();
                if artifacts.insert(variant.tag.clone(), artifact).is_some() {
                    warn!(tag = %variant.tag, "variant tag collision, overwriting earlier example");
                }
            }
        } else if let Some(resolved) = resolve(graph, root) {
            debug!(media = %media.name, "generating single example");
            let mut value = self.sampler.sample(&resolved, &options)?;
            patch_discriminators(&mut value, &resolved);

            let mut artifact = ExampleArtifact::new(DEFAULT_EXAMPLE_NAME, value);
            artifact.encoding = media.encoding.clone();
            artifacts.insert(DEFAULT_EXAMPLE_NAME.to_string(), artifact);
        }

        Ok(artifacts)
    }

    /// Reactive wrapper around [`examples`](ExampleEngine::examples):
    /// the returned computation re-runs lazily after any selection it
    /// read (through the collector) changes, including selections in
    /// branches that were inactive during the last run.
    pub fn computed(
        &self,
        graph: Rc<ShapeArena>,
        media: Rc<MediaDescriptor>,
    ) -> Computed<EngineResult<ExampleMap>> {
        let engine = self.clone();
        Computed::new(move || engine.examples(Some(&graph), &media))
    }
}
