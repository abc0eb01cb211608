//! Discriminator resolution: collapsing polymorphic nodes to their
//! active variant
//!
//! Resolution is a pure function of current selection state. Only the
//! active variant is expanded into the result; inactive branches are left
//! to the dependency collector. A stale selection (index past the end of
//! the variant list) falls back to the first variant instead of failing.

use tracing::warn;

use crate::domain::resolved::{Discriminator, ResolvedField, ResolvedKind, ResolvedShape};
use crate::domain::shape::{ShapeArena, ShapeId, ShapeKind};

/// Resolve `id` against the live selection state. `None` means the node
/// cannot produce a concrete shape (empty variant list, or a cycle back
/// into a node currently being resolved).
pub fn resolve(graph: &ShapeArena, id: ShapeId) -> Option<ResolvedShape> {
    resolve_node(graph, id, &mut Vec::new())
}

/// Resolve a polymorphic root with `forced_index` in place of its live
/// selection. Selections deeper in the tree still use their own cells.
///
/// The root's own discriminator is deliberately NOT attached to the
/// result: the orchestrator writes the root tag directly, one artifact
/// per variant. Non-polymorphic roots fall back to [`resolve`].
pub fn resolve_variant(
    graph: &ShapeArena,
    id: ShapeId,
    forced_index: usize,
) -> Option<ResolvedShape> {
    match &graph.node(id).kind {
        ShapeKind::Polymorphic { variants, .. } => {
            let variant = variants.get(forced_index)?;
            let mut in_progress = vec![id];
            resolve_node(graph, variant.shape, &mut in_progress)
        }
        _ => resolve(graph, id),
    }
}

fn resolve_node(
    graph: &ShapeArena,
    id: ShapeId,
    in_progress: &mut Vec<ShapeId>,
) -> Option<ResolvedShape> {
    if in_progress.contains(&id) {
        // Self-referential shape; the branch is dropped rather than
        // expanded forever. max_depth bounds the sampled value anyway.
        return None;
    }
    in_progress.push(id);

    let resolved = match &graph.node(id).kind {
        ShapeKind::Scalar(scalar) => {
            Some(ResolvedShape::new(ResolvedKind::Scalar(scalar.clone())))
        }
        ShapeKind::Object { fields } => {
            let mut resolved_fields = Vec::with_capacity(fields.len());
            for field in fields {
                // Fields whose shape has no concrete form are dropped.
                if let Some(shape) = resolve_node(graph, field.shape, in_progress) {
                    resolved_fields.push(ResolvedField {
                        name: field.name.clone(),
                        required: field.required,
                        read_only: field.read_only,
                        write_only: field.write_only,
                        shape,
                    });
                }
            }
            Some(ResolvedShape::new(ResolvedKind::Object {
                fields: resolved_fields,
            }))
        }
        ShapeKind::Array { item } => resolve_node(graph, *item, in_progress).map(|item| {
            ResolvedShape::new(ResolvedKind::Array {
                item: Box::new(item),
            })
        }),
        ShapeKind::Polymorphic {
            discriminator_field,
            variants,
            selection,
        } => {
            if variants.is_empty() {
                None
            } else {
                let stored = selection.get();
                let index = if stored < variants.len() {
                    stored
                } else {
                    warn!(
                        node = id.0,
                        stored,
                        variants = variants.len(),
                        "stale variant selection, falling back to first variant"
                    );
                    0
                };
                let variant = &variants[index];
                resolve_node(graph, variant.shape, in_progress).map(|mut resolved| {
                    if let Some(field) = discriminator_field {
                        // Outermost discriminator first when variants
                        // stack.
                        resolved.discriminators.insert(
                            0,
                            Discriminator {
                                field: field.clone(),
                                tag: variant.tag.clone(),
                            },
                        );
                    }
                    resolved
                })
            }
        }
    };

    in_progress.pop();
    resolved
}

// ============================================================================
// Tests
// ============================================================================
