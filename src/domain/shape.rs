//! Shape graph: arena-allocated schema nodes with per-node variant selection
//!
//! A [`ShapeArena`] is the single source of truth for a shape tree. Nodes
//! are addressed by stable [`ShapeId`]s, so identity survives selection
//! changes; a polymorphic node owns its active-variant cell and mutating
//! the selection never touches structure. The arena is structurally
//! immutable once built.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::reactive::ValueCell;

// ============================================================================
// Identifiers and scalar metadata
// ============================================================================

/// Stable handle to a node in a [`ShapeArena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShapeId(pub(crate) usize);

/// Primitive kind of a scalar shape.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarKind {
    Null,
    Boolean,
    Integer,
    Number,
    #[default]
    String,
}

/// Metadata a sampler can use to produce a plausible scalar.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScalarShape {
    #[serde(rename = "type")]
    pub kind: ScalarKind,
    /// Format hint for strings ("email", "uuid", "date-time", ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Closed set of allowed values; sampled verbatim when non-empty
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<String>,
    /// Fixed value; wins over everything else
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub const_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
}

impl ScalarShape {
    pub fn of(kind: ScalarKind) -> Self {
        Self {
            kind,
            ..Default::default()
        }
    }
}

// ============================================================================
// Structural nodes
// ============================================================================

/// One named field of an object shape.
#[derive(Clone, Debug)]
pub struct FieldDef {
    pub name: String,
    pub shape: ShapeId,
    pub required: bool,
    pub read_only: bool,
    pub write_only: bool,
}

impl FieldDef {
    pub fn new(name: &str, shape: ShapeId) -> Self {
        Self {
            name: name.to_string(),
            shape,
            required: false,
            read_only: false,
            write_only: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn write_only(mut self) -> Self {
        self.write_only = true;
        self
    }
}

/// One alternative of a polymorphic node.
#[derive(Clone, Debug)]
pub struct VariantDef {
    /// Literal tag written into the discriminator field
    pub tag: String,
    pub shape: ShapeId,
}

/// Structural kind of a shape node.
#[derive(Clone, Debug)]
pub enum ShapeKind {
    Scalar(ScalarShape),
    Object {
        fields: Vec<FieldDef>,
    },
    Array {
        item: ShapeId,
    },
    /// Closed set of alternative shapes distinguished by a literal tag.
    /// The node owns its active-variant cell; the surrounding UI writes
    /// it, this crate only reads (tracked).
    Polymorphic {
        discriminator_field: Option<String>,
        variants: Vec<VariantDef>,
        selection: ValueCell<usize>,
    },
}

/// A node record in the arena.
#[derive(Clone, Debug)]
pub struct ShapeNode {
    pub kind: ShapeKind,
}

// ============================================================================
// Arena
// ============================================================================

/// Arena of shape nodes. The query surface below is what the engine
/// consumes; reads of the selection cell go through the reactive layer so
/// callers inside a computation subscribe automatically.
#[derive(Debug)]
pub struct ShapeArena {
    nodes: Vec<ShapeNode>,
}

impl ShapeArena {
    pub fn builder() -> ShapeBuilder {
        ShapeBuilder { nodes: Vec::new() }
    }

    pub fn node(&self, id: ShapeId) -> &ShapeNode {
        &self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `id` names a node of this arena. Ids are plain indices and
    /// deserializable, so one arriving from outside may not.
    pub fn contains(&self, id: ShapeId) -> bool {
        id.0 < self.nodes.len()
    }

    pub fn is_polymorphic(&self, id: ShapeId) -> bool {
        matches!(self.node(id).kind, ShapeKind::Polymorphic { .. })
    }

    /// Ordered variant list; empty for non-polymorphic nodes.
    pub fn variants(&self, id: ShapeId) -> &[VariantDef] {
        match &self.node(id).kind {
            ShapeKind::Polymorphic { variants, .. } => variants,
            _ => &[],
        }
    }

    pub fn discriminator_field(&self, id: ShapeId) -> Option<&str> {
        match &self.node(id).kind {
            ShapeKind::Polymorphic {
                discriminator_field, ..
            } => discriminator_field.as_deref(),
            _ => None,
        }
    }

    /// Tracked read of a node's active-variant index. Returns the stored
    /// value as-is; out-of-range indices are clamped at resolve time, not
    /// here. Zero for non-polymorphic nodes.
    pub fn active_variant_index(&self, id: ShapeId) -> usize {
        match &self.node(id).kind {
            ShapeKind::Polymorphic { selection, .. } => selection.get(),
            _ => 0,
        }
    }

    /// Untracked counterpart of [`active_variant_index`].
    ///
    /// [`active_variant_index`]: ShapeArena::active_variant_index
    pub fn active_variant_index_untracked(&self, id: ShapeId) -> usize {
        match &self.node(id).kind {
            ShapeKind::Polymorphic { selection, .. } => selection.get_untracked(),
            _ => 0,
        }
    }

    /// Write a node's active-variant selection, invalidating every
    /// computation that read it. No-op on non-polymorphic nodes.
    pub fn set_active_variant(&self, id: ShapeId, index: usize) {
        match &self.node(id).kind {
            ShapeKind::Polymorphic { selection, .. } => selection.set(index),
            _ => warn!(node = id.0, "set_active_variant on non-polymorphic node ignored"),
        }
    }
}

/// Builder minting [`ShapeId`]s as nodes are added.
pub struct ShapeBuilder {
    nodes: Vec<ShapeNode>,
}

impl ShapeBuilder {
    fn push(&mut self, kind: ShapeKind) -> ShapeId {
        let id = ShapeId(self.nodes.len());
        self.nodes.push(ShapeNode { kind });
        id
    }

    pub fn scalar(&mut self, scalar: ScalarShape) -> ShapeId {
        self.push(ShapeKind::Scalar(scalar))
    }

    pub fn string(&mut self) -> ShapeId {
        self.scalar(ScalarShape::of(ScalarKind::String))
    }

    pub fn string_with_format(&mut self, format: &str) -> ShapeId {
        self.scalar(ScalarShape {
            format: Some(format.to_string()),
            ..ScalarShape::of(ScalarKind::String)
        })
    }

    pub fn string_enum(&mut self, values: &[&str]) -> ShapeId {
        self.scalar(ScalarShape {
            enum_values: values.iter().map(|v| v.to_string()).collect(),
            ..ScalarShape::of(ScalarKind::String)
        })
    }

    pub fn integer(&mut self) -> ShapeId {
        self.scalar(ScalarShape::of(ScalarKind::Integer))
    }

    pub fn number(&mut self) -> ShapeId {
        self.scalar(ScalarShape::of(ScalarKind::Number))
    }

    pub fn boolean(&mut self) -> ShapeId {
        self.scalar(ScalarShape::of(ScalarKind::Boolean))
    }

    pub fn object(&mut self, fields: Vec<FieldDef>) -> ShapeId {
        self.push(ShapeKind::Object { fields })
    }

    pub fn array(&mut self, item: ShapeId) -> ShapeId {
        self.push(ShapeKind::Array { item })
    }

    /// A polymorphic node. Selection starts at the first variant.
    pub fn one_of(
        &mut self,
        discriminator_field: Option<&str>,
        variants: Vec<(&str, ShapeId)>,
    ) -> ShapeId {
        self.push(ShapeKind::Polymorphic {
            discriminator_field: discriminator_field.map(str::to_string),
            variants: variants
                .into_iter()
                .map(|(tag, shape)| VariantDef {
                    tag: tag.to_string(),
                    shape,
                })
                .collect(),
            selection: ValueCell::new(0),
        })
    }

    pub fn finish(self) -> ShapeArena {
        ShapeArena { nodes: self.nodes }
    }
}

// ============================================================================
// Tests
// ============================================================================
