use super::SimNode;
use crate::graph::Bounds;

/// Point buckets over the current node extent. The cell side is never smaller than the
/// repulsion range, so a 3x3 scan around a node's cell sees every neighbor within range.
#[derive(Debug, Clone)]
pub(super) struct RepulsionGrid {
    left: f64,
    top: f64,
    cell: f64,
    cols: usize,
    rows: usize,
    // cells[col * rows + row] holds node indices in ascending order.
    cells: Vec<Vec<usize>>,
}

impl RepulsionGrid {
    pub(super) fn build(nodes: &[SimNode], range: f64) -> Option<Self> {
        if nodes.is_empty() || !range.is_finite() || range <= 0.0 {
            return None;
        }

        let bounds = Bounds::from_points(nodes.iter().map(|n| (n.x, n.y)))?;
        if !(bounds.min_x.is_finite() && bounds.max_x.is_finite())
            || !(bounds.min_y.is_finite() && bounds.max_y.is_finite())
        {
            return None;
        }
        let w = bounds.width().max(1.0);
        let h = bounds.height().max(1.0);

        // At most ~sqrt(n) buckets per axis; a tiny range only widens the cells.
        let per_axis = (nodes.len() as f64).sqrt().ceil();
        let cell = range.max(w / per_axis).max(h / per_axis);
        let cols = (w / cell).floor() as usize + 1;
        let rows = (h / cell).floor() as usize + 1;

        let mut grid = Self {
            left: bounds.min_x,
            top: bounds.min_y,
            cell,
            cols,
            rows,
            cells: vec![Vec::new(); cols * rows],
        };
        for (idx, n) in nodes.iter().enumerate() {
            let (col, row) = grid.cell_of(n);
            grid.cells[col * rows + row].push(idx);
        }
        Some(grid)
    }

    fn cell_of(&self, n: &SimNode) -> (usize, usize) {
        let col = ((n.x - self.left) / self.cell).floor().max(0.0) as usize;
        let row = ((n.y - self.top) / self.cell).floor().max(0.0) as usize;
        (col.min(self.cols - 1), row.min(self.rows - 1))
    }

    /// Fills `out` with every `j > node_idx` whose per-axis separation from `node_idx` is
    /// within the range, ascending, so pair order matches the all-pairs loop.
    pub(super) fn collect_later_neighbors(
        &self,
        node_idx: usize,
        nodes: &[SimNode],
        range: f64,
        out: &mut Vec<usize>,
    ) {
        out.clear();
        let me = &nodes[node_idx];
        let (cx, cy) = self.cell_of(me);

        for col in cx.saturating_sub(1)..=(cx + 1).min(self.cols - 1) {
            for row in cy.saturating_sub(1)..=(cy + 1).min(self.rows - 1) {
                for &other in &self.cells[col * self.rows + row] {
                    if other <= node_idx {
                        continue;
                    }
                    let dx = (me.x - nodes[other].x).abs();
                    let dy = (me.y - nodes[other].y).abs();
                    if dx <= range && dy <= range {
                        out.push(other);
                    }
                }
            }
        }

        // Each node lives in exactly one cell, so sorting is enough to dedupe.
        out.sort_unstable();
    }
}

#[cfg(test)]
mod tests {
    use super::{RepulsionGrid, SimNode};

    fn node_at(x: f64, y: f64) -> SimNode {
        SimNode {
            x,
            y,
            ..Default::default()
        }
    }

    #[test]
    fn neighbors_exclude_far_and_earlier_nodes() {
        let range = 10.0;
        let nodes = vec![
            node_at(0.0, 0.0),
            node_at(8.0, 0.0),
            node_at(200.0, 0.0),
            node_at(4.0, 9.0),
        ];
        let grid = RepulsionGrid::build(&nodes, range).expect("grid");

        let mut out = Vec::new();
        grid.collect_later_neighbors(0, &nodes, range, &mut out);
        assert_eq!(out, vec![1, 3]);

        grid.collect_later_neighbors(1, &nodes, range, &mut out);
        assert_eq!(out, vec![3], "node1 should not include earlier node0");

        grid.collect_later_neighbors(2, &nodes, range, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn huge_range_collapses_to_a_single_cell() {
        let nodes = vec![node_at(0.0, 0.0), node_at(500.0, 300.0), node_at(250.0, 10.0)];
        let grid = RepulsionGrid::build(&nodes, 1e9).expect("grid");
        assert_eq!((grid.cols, grid.rows), (1, 1));

        let mut out = Vec::new();
        grid.collect_later_neighbors(0, &nodes, 1e9, &mut out);
        assert_eq!(out, vec![1, 2]);
    }

    #[test]
    fn tiny_range_keeps_the_bucket_count_bounded() {
        let nodes: Vec<SimNode> = (0..9)
            .map(|i| node_at(f64::from(i % 3) * 300.0, f64::from(i / 3) * 200.0))
            .collect();
        let range = 1e-12;
        let grid = RepulsionGrid::build(&nodes, range).expect("grid");
        assert!(grid.cols <= 4 && grid.rows <= 4, "{}x{}", grid.cols, grid.rows);

        let mut out = Vec::new();
        for i in 0..nodes.len() {
            grid.collect_later_neighbors(i, &nodes, range, &mut out);
            assert!(out.is_empty(), "node {i} found {out:?}");
        }
    }

    #[test]
    fn empty_input_has_no_grid() {
        assert!(RepulsionGrid::build(&[], 10.0).is_none());
    }
}
