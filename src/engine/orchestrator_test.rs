use std::cell::Cell;
use std::rc::Rc;

use serde_json::{json, Value};

use crate::domain::media::{EngineSettings, ExampleArtifact, GenerationOptions, MediaDescriptor};
use crate::domain::resolved::ResolvedShape;
use crate::domain::shape::{FieldDef, ShapeArena, ShapeId};
use crate::engine::orchestrator::{ExampleEngine, DEFAULT_EXAMPLE_NAME};
use crate::error::EngineError;
use crate::reactive::Computed;
use crate::sampler::{FakerSampler, SampleError, SampleGenerator};

fn engine() -> ExampleEngine {
    ExampleEngine::new(Rc::new(FakerSampler), EngineSettings::default())
}

/// Cat/Dog with a nested toy union inside Cat.
fn pet_graph() -> (Rc<ShapeArena>, ShapeId, ShapeId) {
    let mut builder = ShapeArena::builder();
    let name = builder.string();
    let label = builder.string();
    let ball = builder.object(vec![FieldDef::new("label", label).required()]);
    let rope = builder.object(vec![FieldDef::new("label", label).required()]);
    let toy = builder.one_of(Some("toyType"), vec![("Ball", ball), ("Rope", rope)]);
    let cat = builder.object(vec![
        FieldDef::new("name", name).required(),
        FieldDef::new("toy", toy).required(),
    ]);
    let dog = builder.object(vec![FieldDef::new("name", name).required()]);
    let pet = builder.one_of(Some("petType"), vec![("Cat", cat), ("Dog", dog)]);
    (Rc::new(builder.finish()), pet, toy)
}

struct FailingSampler;

impl SampleGenerator for FailingSampler {
    fn sample(
        &self,
        _shape: &ResolvedShape,
        _options: &GenerationOptions,
    ) -> Result<Value, SampleError> {
        Err(SampleError::Failed("boom".to_string()))
    }
}

#[test]
fn static_examples_take_absolute_precedence() {
    let (graph, pet, _) = pet_graph();
    let mut media = MediaDescriptor::with_static(
        "application/json",
        false,
        [ExampleArtifact::new("minimal", json!({"petType": "Fish"}))],
    );
    // Even with generation enabled and a shape available, static wins.
    media.generate_examples = true;
    media.shape = Some(pet);

    let examples = engine().examples(Some(&graph), &media).unwrap();
    assert_eq!(examples.len(), 1);
    assert_eq!(examples["minimal"].value, json!({"petType": "Fish"}));
}

#[test]
fn generation_disabled_yields_no_examples() {
    let (graph, pet, _) = pet_graph();
    let mut media = MediaDescriptor::generated("application/json", false, pet);
    media.generate_examples = false;

    let examples = engine().examples(Some(&graph), &media).unwrap();
    assert!(examples.is_empty());
}

#[test]
fn missing_graph_or_shape_yields_no_examples() {
    let (graph, pet, _) = pet_graph();
    let media = MediaDescriptor::generated("application/json", false, pet);
    assert!(engine().examples(None, &media).unwrap().is_empty());

    let mut shapeless = MediaDescriptor::generated("application/json", false, pet);
    shapeless.shape = None;
    assert!(engine().examples(Some(&graph), &shapeless).unwrap().is_empty());
}

#[test]
fn deserialized_out_of_range_shape_id_yields_no_examples() {
    let (graph, _, _) = pet_graph();
    // A descriptor loaded from JSON can name a node the arena never had.
    let media: MediaDescriptor = serde_json::from_value(json!({
        "name": "application/json",
        "generate_examples": true,
        "shape": 9999
    }))
    .unwrap();

    let examples = engine().examples(Some(&graph), &media).unwrap();
    assert!(examples.is_empty());
}

#[test]
fn non_polymorphic_root_emits_single_default_artifact() {
    let mut builder = ShapeArena::builder();
    let id = builder.string_with_format("uuid");
    let root = builder.object(vec![FieldDef::new("id", id).required()]);
    let graph = Rc::new(builder.finish());
    let media = MediaDescriptor::generated("application/json", false, root);

    let examples = engine().examples(Some(&graph), &media).unwrap();
    assert_eq!(examples.len(), 1);
    let artifact = &examples[DEFAULT_EXAMPLE_NAME];
    assert_eq!(artifact.name, DEFAULT_EXAMPLE_NAME);
    assert!(artifact.value["id"].is_string());
}

#[test]
fn polymorphic_root_fans_out_one_artifact_per_variant() {
    let (graph, pet, _) = pet_graph();
    let media = MediaDescriptor::generated("application/json", false, pet);

    let examples = engine().examples(Some(&graph), &media).unwrap();
    assert_eq!(examples.len(), 2);
    for tag in ["Cat", "Dog"] {
        let artifact = &examples[tag];
        assert_eq!(artifact.value["petType"], tag);
        assert!(artifact.value["name"].is_string());
    }
}

#[test]
fn nested_discriminator_is_patched_inside_variant() {
    let (graph, pet, toy) = pet_graph();
    let media = MediaDescriptor::generated("application/json", false, pet);

    let examples = engine().examples(Some(&graph), &media).unwrap();
    assert_eq!(examples["Cat"].value["toy"]["toyType"], "Ball");

    graph.set_active_variant(toy, 1);
    let examples = engine().examples(Some(&graph), &media).unwrap();
    assert_eq!(examples["Cat"].value["toy"]["toyType"], "Rope");
}

#[test]
fn root_fanout_ignores_live_root_selection() {
    let (graph, pet, _) = pet_graph();
    // A stale root selection must not break the per-variant fan-out.
    graph.set_active_variant(pet, 99);
    let media = MediaDescriptor::generated("application/json", false, pet);

    let examples = engine().examples(Some(&graph), &media).unwrap();
    assert_eq!(examples.len(), 2);
    assert_eq!(examples["Dog"].value["petType"], "Dog");
}

#[test]
fn colliding_variant_tags_keep_one_artifact() {
    let mut builder = ShapeArena::builder();
    let name = builder.string();
    let first = builder.object(vec![FieldDef::new("name", name)]);
    let second = builder.object(vec![FieldDef::new("name", name)]);
    let root = builder.one_of(Some("kind"), vec![("Twin", first), ("Twin", second)]);
    let graph = Rc::new(builder.finish());
    let media = MediaDescriptor::generated("application/json", false, root);

    let examples = engine().examples(Some(&graph), &media).unwrap();
    assert_eq!(examples.len(), 1, "last write wins on tag collision");
    assert_eq!(examples["Twin"].value["kind"], "Twin");
}

#[test]
fn empty_root_variant_list_yields_no_examples() {
    let mut builder = ShapeArena::builder();
    let root = builder.one_of(Some("kind"), vec![]);
    let graph = Rc::new(builder.finish());
    let media = MediaDescriptor::generated("application/json", false, root);

    let examples = engine().examples(Some(&graph), &media).unwrap();
    assert!(examples.is_empty());
}

#[test]
fn sampler_failure_propagates() {
    let (graph, pet, _) = pet_graph();
    let media = MediaDescriptor::generated("application/json", false, pet);
    let engine = ExampleEngine::new(Rc::new(FailingSampler), EngineSettings::default());

    let result = engine.examples(Some(&graph), &media);
    assert!(matches!(result, Err(EngineError::Sampler(_))));
}

#[test]
fn artifacts_carry_media_encoding() {
    let mut builder = ShapeArena::builder();
    let id = builder.string();
    let root = builder.object(vec![FieldDef::new("id", id)]);
    let graph = Rc::new(builder.finish());

    let media = MediaDescriptor::generated("application/json", false, root).with_encoding(
        "id",
        crate::domain::media::EncodingHint {
            content_type: Some("text/plain".to_string()),
            ..Default::default()
        },
    );

    let examples = engine().examples(Some(&graph), &media).unwrap();
    let hint = &examples[DEFAULT_EXAMPLE_NAME].encoding["id"];
    assert_eq!(hint.content_type.as_deref(), Some("text/plain"));
}

#[test]
fn computed_recomputes_only_after_selection_change() {
    let (graph, pet, toy) = pet_graph();
    let media = Rc::new(MediaDescriptor::generated("application/json", false, pet));
    let runs = Rc::new(Cell::new(0u32));

    let engine = engine();
    let runs_inner = runs.clone();
    let graph_inner = graph.clone();
    let media_inner = media.clone();
    let computed = Computed::new(move || {
        runs_inner.set(runs_inner.get() + 1);
        engine.examples(Some(&graph_inner), &media_inner)
    });

    let first = computed.get().unwrap();
    let second = computed.get().unwrap();
    assert_eq!(runs.get(), 1, "no recompute without a selection change");

    // Discriminator fields are stable across reads even though free-form
    // scalars may differ between actual runs.
    assert_eq!(first["Cat"].value["petType"], second["Cat"].value["petType"]);
    assert_eq!(
        first["Cat"].value["toy"]["toyType"],
        second["Cat"].value["toy"]["toyType"]
    );

    graph.set_active_variant(toy, 1);
    let third = computed.get().unwrap();
    assert_eq!(runs.get(), 2, "selection change forces one recompute");
    assert_eq!(third["Cat"].value["toy"]["toyType"], "Rope");
}

#[test]
fn computed_wrapper_tracks_nested_selection() {
    let (graph, pet, toy) = pet_graph();
    let media = Rc::new(MediaDescriptor::generated("application/json", false, pet));
    let computed = engine().computed(graph.clone(), media);

    assert_eq!(computed.get().unwrap()["Cat"].value["toy"]["toyType"], "Ball");
    graph.set_active_variant(toy, 1);
    assert!(computed.is_stale(), "nested write invalidates the map");
    assert_eq!(computed.get().unwrap()["Cat"].value["toy"]["toyType"], "Rope");
}
