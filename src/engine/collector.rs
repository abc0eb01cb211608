//! Dependency collection over a shape graph
//!
//! The resolver only descends into active variants, so on its own a
//! computation would never subscribe to selections buried in inactive
//! branches, and switching into such a branch later would go unnoticed.
//! This pass walks *every* reachable node, active or not, and performs a
//! tracked read of each polymorphic node's selection cell. The return
//! value is nothing; the reads are the point.

use std::collections::HashSet;

use crate::domain::shape::{ShapeArena, ShapeId, ShapeKind};

/// Touch the selection cell of every polymorphic node reachable from
/// `root`, including nodes inside currently inactive variants. A visited
/// set makes this terminate on cyclic graphs.
pub fn collect_dependencies(graph: &ShapeArena, root: ShapeId) {
    let mut visited = HashSet::new();
    visit(graph, root, &mut visited);
}

fn visit(graph: &ShapeArena, id: ShapeId, visited: &mut HashSet<ShapeId>) {
    if !visited.insert(id) {
        return;
    }
    match &graph.node(id).kind {
        ShapeKind::Scalar(_) => {}
        ShapeKind::Object { fields } => {
            for field in fields {
                visit(graph, field.shape, visited);
            }
        }
        ShapeKind::Array { item } => visit(graph, *item, visited),
        ShapeKind::Polymorphic {
            variants, selection, ..
        } => {
            // Tracked read; the surrounding computation subscribes.
            let _ = selection.get();
            for variant in variants {
                visit(graph, variant.shape, visited);
            }
        }
    }
}
