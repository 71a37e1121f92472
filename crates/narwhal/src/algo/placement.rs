use crate::algo::LayoutOptions;
use crate::graph::{Canvas, Node, Point};
use std::f64::consts::PI;

/// Evenly spaced start positions on an ellipse centered in `canvas`, indexed by input order.
///
/// Node `i` of `n` sits at angle `2π·i/n`; the radii are `placement_radius` times the canvas
/// width and height. No two nodes share a start position, so every repulsion direction is
/// defined on the first step.
pub fn place(nodes: &[Node], canvas: Canvas, opts: &LayoutOptions) -> Vec<Point> {
    ellipse_points(nodes.len(), canvas, opts.placement_radius)
}

pub(crate) fn ellipse_points(count: usize, canvas: Canvas, radius_ratio: f64) -> Vec<Point> {
    let center = canvas.center();
    let n = count as f64;
    (0..count)
        .map(|i| {
            let angle = (i as f64 / n) * PI * 2.0;
            Point {
                x: center.x + angle.cos() * canvas.width * radius_ratio,
                y: center.y + angle.sin() * canvas.height * radius_ratio,
            }
        })
        .collect()
}
