//! Core data model: shape graphs, resolved shapes and media artifacts.

pub mod media;
pub mod resolved;
pub mod shape;
