// src/tree/mod.rs
// =============================================================================
// This module builds and draws the repository tree.
//
// Submodules:
// - graph: nodes/edges collected during the walk
// - walk: depth-first traversal over a DirectoryLister
// - render: DOT output and PNG rendering through Graphviz
// =============================================================================

mod graph;
mod render;
mod walk;

pub use render::{rasterize, to_dot, write_source};
pub use walk::{walk_repository, RemoteContents, SkippedSubtree, DEFAULT_MAX_DEPTH};
