//! Presentation defaults shared by every renderer of a laid out graph.

use crate::graph::NodeKind;

pub const FALLBACK_COLOR: &str = "#6B7280";
pub const EDGE_COLOR: &str = "#374151";
pub const LABEL_COLOR: &str = "#9CA3AF";
/// Vertical gap between a node's rim and the baseline of its label.
pub const LABEL_OFFSET: f64 = 14.0;
/// Shown in place of the drawing when a graph has no nodes ("no graph data").
pub const EMPTY_GRAPH_TEXT: &str = "暂无图谱数据";

pub fn node_color(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Person => "#6366f1",
        NodeKind::Company => "#F97316",
        NodeKind::Role => "#F59E0B",
        NodeKind::Skill => "#10B981",
        NodeKind::Requirement => "#06B6D4",
        NodeKind::Dimension => "#8B5CF6",
    }
}

pub fn node_radius(size: f64) -> f64 {
    if size.is_finite() && size > 0.0 {
        size * 0.5
    } else {
        0.0
    }
}
