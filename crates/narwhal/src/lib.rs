#![forbid(unsafe_code)]

//! Headless force-directed layout for weighted knowledge graphs.
//!
//! `narwhal` places the entities of a knowledge graph (people, companies, roles, skills,
//! requirements, profile dimensions) on a canvas. Nodes start on an ellipse inscribed in the
//! canvas and are then relaxed by pairwise repulsion and edge-weighted springs. Runs are fully
//! deterministic: the same input always yields bit-identical coordinates.

pub mod algo;
pub mod error;
pub mod graph;
pub mod style;
pub mod svg;

pub use algo::{LayoutOptions, RepulsionMode, place};
pub use error::{Error, Result};
pub use graph::{
    Bounds, Canvas, Edge, Graph, LayoutResult, LayoutStats, Node, NodeKind, Point, PositionedNode,
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Lays out `graph` on `canvas` with the default physics (80 steps).
pub fn layout(graph: &Graph, canvas: Canvas) -> Result<LayoutResult> {
    layout_with(graph, canvas, &LayoutOptions::default())
}

/// Headless layout entry point.
pub fn layout_with(graph: &Graph, canvas: Canvas, opts: &LayoutOptions) -> Result<LayoutResult> {
    canvas.validate()?;
    opts.validate()?;
    graph.validate()?;
    algo::relax::layout(graph, canvas, opts)
}
