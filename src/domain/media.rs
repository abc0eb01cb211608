//! Media descriptors, example artifacts and generation options.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::shape::ShapeId;

// ============================================================================
// Encoding and artifacts
// ============================================================================

/// Per-field encoding metadata carried through to rendered examples.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EncodingHint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explode: Option<bool>,
    #[serde(default)]
    pub allow_reserved: bool,
}

/// A concrete example value paired with a display name. Immutable once
/// constructed; generation builds a fresh artifact on every run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExampleArtifact {
    pub name: String,
    pub value: Value,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub encoding: HashMap<String, EncodingHint>,
}

impl ExampleArtifact {
    pub fn new(name: &str, value: Value) -> Self {
        Self {
            name: name.to_string(),
            value,
            encoding: HashMap::new(),
        }
    }
}

// ============================================================================
// Media descriptor
// ============================================================================

/// Describes one media entry (a content type in one direction) for which
/// examples are wanted. Caller-supplied `static_examples` take absolute
/// precedence over generation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MediaDescriptor {
    /// Identifier / content-type string ("application/json", ...)
    pub name: String,
    /// Request direction hides read-only fields; response direction hides
    /// write-only fields
    #[serde(default)]
    pub is_request: bool,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub encoding: HashMap<String, EncodingHint>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub static_examples: HashMap<String, ExampleArtifact>,
    #[serde(default)]
    pub generate_examples: bool,
    /// Root of the shape graph this media conforms to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<ShapeId>,
}

impl MediaDescriptor {
    /// Descriptor with generation enabled over `shape`.
    pub fn generated(name: &str, is_request: bool, shape: ShapeId) -> Self {
        Self {
            name: name.to_string(),
            is_request,
            encoding: HashMap::new(),
            static_examples: HashMap::new(),
            generate_examples: true,
            shape: Some(shape),
        }
    }

    /// Descriptor carrying caller-supplied examples, keyed by artifact
    /// name. Generation is skipped entirely for these.
    pub fn with_static(
        name: &str,
        is_request: bool,
        examples: impl IntoIterator<Item = ExampleArtifact>,
    ) -> Self {
        Self {
            name: name.to_string(),
            is_request,
            encoding: HashMap::new(),
            static_examples: examples
                .into_iter()
                .map(|artifact| (artifact.name.clone(), artifact))
                .collect(),
            generate_examples: false,
            shape: None,
        }
    }

    pub fn with_encoding(mut self, field: &str, hint: EncodingHint) -> Self {
        self.encoding.insert(field.to_string(), hint);
        self
    }
}

// ============================================================================
// Generation options and settings
// ============================================================================

fn default_max_depth() -> usize {
    8
}

/// Knobs the sampler must honor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationOptions {
    #[serde(default)]
    pub skip_read_only: bool,
    #[serde(default)]
    pub skip_write_only: bool,
    #[serde(default)]
    pub skip_non_required: bool,
    /// Containers nested deeper than this are not expanded
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            skip_read_only: false,
            skip_write_only: false,
            skip_non_required: false,
            max_depth: default_max_depth(),
        }
    }
}

impl GenerationOptions {
    /// Derive options for one media direction: requests omit read-only
    /// fields, responses omit write-only fields, and requests may be
    /// restricted to required fields only.
    pub fn for_direction(is_request: bool, settings: &EngineSettings) -> Self {
        Self {
            skip_read_only: is_request,
            skip_write_only: !is_request,
            skip_non_required: is_request && settings.only_required_in_samples,
            max_depth: settings.max_depth,
        }
    }
}

/// Engine-level configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// When set, request samples include only required fields
    #[serde(default)]
    pub only_required_in_samples: bool,
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            only_required_in_samples: false,
            max_depth: default_max_depth(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
