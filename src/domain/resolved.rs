//! Resolved shapes: polymorphism-free trees ready for sampling
//!
//! Resolution replaces every polymorphic node with its active variant and
//! records which discriminator tags the chosen path implies. A resolved
//! node carries *all* discriminators that apply to it: stacked
//! polymorphic nodes (a variant that is itself polymorphic) accumulate.

use crate::domain::shape::ScalarShape;

/// A discriminator obligation: `value[field] = tag` at this position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Discriminator {
    pub field: String,
    pub tag: String,
}

/// One field of a resolved object shape. Visibility flags survive
/// resolution so the sampler can honor generation options.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedField {
    pub name: String,
    pub required: bool,
    pub read_only: bool,
    pub write_only: bool,
    pub shape: ResolvedShape,
}

/// Structural kind of a resolved shape.
#[derive(Clone, Debug, PartialEq)]
pub enum ResolvedKind {
    Scalar(ScalarShape),
    Object { fields: Vec<ResolvedField> },
    Array { item: Box<ResolvedShape> },
}

/// A fully concrete shape tree with no alternatives left.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedShape {
    pub kind: ResolvedKind,
    /// Discriminators the active-variant path imposes at this position,
    /// outermost first. Empty for positions not reached through a
    /// polymorphic node.
    pub discriminators: Vec<Discriminator>,
}

impl ResolvedShape {
    pub fn new(kind: ResolvedKind) -> Self {
        Self {
            kind,
            discriminators: Vec::new(),
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(
            self.kind,
            ResolvedKind::Object { .. } | ResolvedKind::Array { .. }
        )
    }

    /// Field lookup on object shapes.
    pub fn field(&self, name: &str) -> Option<&ResolvedField> {
        match &self.kind {
            ResolvedKind::Object { fields } => fields.iter().find(|f| f.name == name),
            _ => None,
        }
    }
}
