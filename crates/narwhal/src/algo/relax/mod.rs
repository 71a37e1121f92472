use crate::algo::placement::ellipse_points;
use crate::algo::{LayoutOptions, RepulsionMode};
use crate::error::Result;
use crate::graph::{Canvas, Graph, LayoutResult, LayoutStats, PositionedNode};
use rustc_hash::FxHashMap;

mod grid;

use grid::RepulsionGrid;

pub fn layout(graph: &Graph, canvas: Canvas, opts: &LayoutOptions) -> Result<LayoutResult> {
    let mut sim = SimGraph::from_graph(graph, canvas, opts);
    let stats = sim.run(opts);

    tracing::debug!(
        nodes = sim.nodes.len(),
        edges = sim.edges.len(),
        skipped_edges = stats.skipped_edges,
        iterations = stats.iterations,
        converged = stats.converged,
        kinetic_energy = stats.kinetic_energy,
        "relaxation finished"
    );

    let nodes = graph
        .nodes
        .iter()
        .zip(&sim.nodes)
        .map(|(n, s)| PositionedNode {
            id: n.id.clone(),
            label: n.display_label().to_string(),
            kind: n.kind,
            size: n.size,
            x: s.x,
            y: s.y,
        })
        .collect();

    Ok(LayoutResult {
        width: canvas.width,
        height: canvas.height,
        nodes,
        stats,
    })
}

#[derive(Debug, Clone, Copy, Default)]
struct SimNode {
    x: f64,
    y: f64,
    vx: f64,
    vy: f64,
}

/// An edge resolved to arena indices. Dangling and self-referencing edges never get here.
#[derive(Debug, Clone, Copy)]
struct SimEdge {
    a: usize,
    b: usize,
    weight: f64,
}

#[derive(Debug, Clone)]
struct SimGraph {
    nodes: Vec<SimNode>,
    edges: Vec<SimEdge>,
    skipped_edges: usize,
}

impl SimGraph {
    fn from_graph(graph: &Graph, canvas: Canvas, opts: &LayoutOptions) -> Self {
        let nodes: Vec<SimNode> = ellipse_points(graph.nodes.len(), canvas, opts.placement_radius)
            .into_iter()
            .map(|p| SimNode {
                x: p.x,
                y: p.y,
                vx: 0.0,
                vy: 0.0,
            })
            .collect();

        let mut id_to_idx: FxHashMap<&str, usize> = FxHashMap::default();
        id_to_idx.reserve(graph.nodes.len());
        for (idx, n) in graph.nodes.iter().enumerate() {
            id_to_idx.insert(n.id.as_str(), idx);
        }

        let mut edges: Vec<SimEdge> = Vec::with_capacity(graph.edges.len());
        let mut skipped_edges = 0usize;
        for e in &graph.edges {
            let (Some(&a), Some(&b)) = (
                id_to_idx.get(e.source.as_str()),
                id_to_idx.get(e.target.as_str()),
            ) else {
                skipped_edges += 1;
                continue;
            };
            if a == b {
                skipped_edges += 1;
                continue;
            }
            edges.push(SimEdge {
                a,
                b,
                weight: e.weight,
            });
        }

        Self {
            nodes,
            edges,
            skipped_edges,
        }
    }

    fn run(&mut self, opts: &LayoutOptions) -> LayoutStats {
        let mut stats = LayoutStats {
            skipped_edges: self.skipped_edges,
            ..Default::default()
        };
        if self.nodes.is_empty() {
            return stats;
        }

        let steps = opts.steps;
        let mut candidates: Vec<usize> = Vec::new();
        for step in 0..steps {
            let alpha = 1.0 - step as f64 / steps as f64;

            match opts.repulsion_mode {
                RepulsionMode::AllPairs => self.repel_all_pairs(opts, alpha),
                RepulsionMode::Grid { range } => {
                    self.repel_within_grid(opts, alpha, range, &mut candidates)
                }
            }
            self.attract(opts, alpha);
            self.integrate(opts);
            stats.iterations = step + 1;

            let Some(threshold) = opts.energy_threshold else {
                continue;
            };
            if stats.iterations % opts.convergence_check_period != 0 {
                continue;
            }
            let energy = self.kinetic_energy();
            tracing::trace!(step, energy, threshold, "convergence check");
            if energy < threshold {
                stats.converged = true;
                break;
            }
        }

        stats.kinetic_energy = self.kinetic_energy();
        stats
    }

    fn repel_all_pairs(&mut self, opts: &LayoutOptions, alpha: f64) {
        let strength = opts.repulsion * alpha;
        for i in 0..self.nodes.len() {
            for j in (i + 1)..self.nodes.len() {
                repel_pair(&mut self.nodes, i, j, strength, opts.min_distance);
            }
        }
    }

    fn repel_within_grid(
        &mut self,
        opts: &LayoutOptions,
        alpha: f64,
        range: f64,
        candidates: &mut Vec<usize>,
    ) {
        let strength = opts.repulsion * alpha;
        let Some(grid) = RepulsionGrid::build(&self.nodes, range) else {
            return;
        };
        for i in 0..self.nodes.len() {
            grid.collect_later_neighbors(i, &self.nodes, range, candidates);
            for &j in candidates.iter() {
                repel_pair(&mut self.nodes, i, j, strength, opts.min_distance);
            }
        }
    }

    fn attract(&mut self, opts: &LayoutOptions, alpha: f64) {
        for e in &self.edges {
            let a = self.nodes[e.a];
            let b = self.nodes[e.b];
            let dx = b.x - a.x;
            let dy = b.y - a.y;
            let dist = (dx * dx + dy * dy).sqrt().max(opts.min_distance);
            let force = (dist - opts.rest_length) * opts.spring * alpha * e.weight;
            let fx = (dx / dist) * force;
            let fy = (dy / dist) * force;
            self.nodes[e.a].vx += fx;
            self.nodes[e.a].vy += fy;
            self.nodes[e.b].vx -= fx;
            self.nodes[e.b].vy -= fy;
        }
    }

    fn integrate(&mut self, opts: &LayoutOptions) {
        for n in &mut self.nodes {
            n.x += n.vx * opts.time_step;
            n.y += n.vy * opts.time_step;
            n.vx *= opts.damping;
            n.vy *= opts.damping;
        }
    }

    fn kinetic_energy(&self) -> f64 {
        self.nodes.iter().map(|n| n.vx * n.vx + n.vy * n.vy).sum()
    }
}

/// Pushes nodes `i < j` apart along the line joining them, equal and opposite.
fn repel_pair(nodes: &mut [SimNode], i: usize, j: usize, strength: f64, min_distance: f64) {
    debug_assert!(i < j);
    let (left, right) = nodes.split_at_mut(j);
    let a = &mut left[i];
    let b = &mut right[0];
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let dist = (dx * dx + dy * dy).sqrt().max(min_distance);
    let force = strength / dist;
    let fx = (dx / dist) * force;
    let fy = (dy / dist) * force;
    a.vx -= fx;
    a.vy -= fy;
    b.vx += fx;
    b.vy += fy;
}

#[cfg(test)]
mod tests {
    use super::{SimGraph, SimNode, repel_pair};
    use crate::algo::LayoutOptions;
    use crate::graph::{Canvas, Edge, Graph, Node, NodeKind};

    fn node_at(x: f64, y: f64) -> SimNode {
        SimNode {
            x,
            y,
            ..Default::default()
        }
    }

    #[test]
    fn repulsion_is_equal_and_opposite() {
        let mut nodes = vec![node_at(0.0, 0.0), node_at(3.0, 4.0)];
        repel_pair(&mut nodes, 0, 1, 200.0, 1.0);
        // dist = 5, force = 40, unit = (0.6, 0.8)
        assert!((nodes[0].vx + 24.0).abs() < 1e-12);
        assert!((nodes[0].vy + 32.0).abs() < 1e-12);
        assert_eq!(nodes[0].vx, -nodes[1].vx);
        assert_eq!(nodes[0].vy, -nodes[1].vy);
    }

    #[test]
    fn coincident_nodes_do_not_produce_nan() {
        let mut nodes = vec![node_at(10.0, 10.0), node_at(10.0, 10.0)];
        repel_pair(&mut nodes, 0, 1, 200.0, 1.0);
        assert!(nodes.iter().all(|n| n.vx.is_finite() && n.vy.is_finite()));
    }

    #[test]
    fn dangling_and_self_edges_are_not_resolved() {
        let graph = Graph::new(
            vec![Node::new("a", NodeKind::Person), Node::new("b", NodeKind::Skill)],
            vec![
                Edge::new("a", "b", 1.0),
                Edge::new("a", "ghost", 1.0),
                Edge::new("b", "b", 1.0),
            ],
        );
        let canvas = Canvas::new(400.0, 300.0).expect("canvas");
        let sim = SimGraph::from_graph(&graph, canvas, &LayoutOptions::default());
        assert_eq!(sim.edges.len(), 1);
        assert_eq!((sim.edges[0].a, sim.edges[0].b), (0, 1));
        assert_eq!(sim.skipped_edges, 2);
    }

    #[test]
    fn spring_at_rest_length_exerts_no_force() {
        let graph = Graph::new(
            vec![Node::new("a", NodeKind::Role), Node::new("b", NodeKind::Requirement)],
            vec![Edge::new("a", "b", 3.0)],
        );
        let canvas = Canvas::new(400.0, 300.0).expect("canvas");
        let opts = LayoutOptions::default();
        let mut sim = SimGraph::from_graph(&graph, canvas, &opts);
        sim.nodes[0] = node_at(0.0, 0.0);
        sim.nodes[1] = node_at(100.0, 0.0);
        sim.attract(&opts, 1.0);
        assert_eq!(sim.nodes[0].vx, 0.0);
        assert_eq!(sim.nodes[1].vx, 0.0);
    }

    #[test]
    fn zero_weight_edges_leave_velocities_untouched() {
        let graph = Graph::new(
            vec![Node::new("a", NodeKind::Role), Node::new("b", NodeKind::Requirement)],
            vec![Edge::new("a", "b", 0.0)],
        );
        let canvas = Canvas::new(400.0, 300.0).expect("canvas");
        let opts = LayoutOptions::default();
        let mut sim = SimGraph::from_graph(&graph, canvas, &opts);
        sim.attract(&opts, 1.0);
        assert!(sim.nodes.iter().all(|n| n.vx == 0.0 && n.vy == 0.0));
    }
}
