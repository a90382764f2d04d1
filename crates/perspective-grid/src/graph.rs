use crate::{CellId, GridDrawParams, GridError, NodeId, Side, SubGridCell};
use log::trace;
use nalgebra::Point2;
use perspective_core::{compute_intersection, square_to_quad, DrawPath, Homography};
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// A corner shared by up to four cells.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridNode {
    pub position: Point2<f64>,
}

/// Where a cell's opposite edges meet when extended.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VanishingPoints {
    /// Intersection of the top and bottom edges.
    pub top_bottom: Point2<f64>,
    /// Intersection of the left and right edges.
    pub left_right: Point2<f64>,
}

/// Mesh of linked sub-grid cells over shared corner nodes.
///
/// Nodes and cells live in two arenas addressed by [`NodeId`] and
/// [`CellId`]. Neighbour links are plain ids, so back references need no
/// reference counting and [`clear_sub_grids`](Self::clear_sub_grids) is a
/// reset of both vectors. Ids from before a clear are stale afterwards.
///
/// The mesh may hold several disconnected groups; every cell after the
/// first must be attached to a cell already present.
#[derive(Debug, Default)]
pub struct PerspectiveGridGraph {
    nodes: Vec<GridNode>,
    cells: Vec<SubGridCell>,
}

impl PerspectiveGridGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, position: Point2<f64>) -> NodeId {
        self.nodes.push(GridNode { position });
        NodeId(self.nodes.len() - 1)
    }

    pub fn node(&self, id: NodeId) -> Option<Point2<f64>> {
        self.nodes.get(id.0).map(|n| n.position)
    }

    /// Move a corner; every cell sharing it follows.
    pub fn move_node(&mut self, id: NodeId, position: Point2<f64>) -> Result<(), GridError> {
        let node = self.nodes.get_mut(id.0).ok_or(GridError::UnknownNode(id))?;
        node.position = position;
        Ok(())
    }

    pub fn cell(&self, id: CellId) -> Option<&SubGridCell> {
        self.cells.get(id.0)
    }

    pub fn set_subdivisions(&mut self, id: CellId, subdivisions: u32) -> Result<(), GridError> {
        let cell = self.cells.get_mut(id.0).ok_or(GridError::UnknownCell(id))?;
        cell.set_subdivisions(subdivisions);
        Ok(())
    }

    /// Cells in insertion order.
    pub fn cells(&self) -> impl Iterator<Item = (CellId, &SubGridCell)> + '_ {
        self.cells.iter().enumerate().map(|(i, c)| (CellId(i), c))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn has_sub_grids(&self) -> bool {
        !self.cells.is_empty()
    }

    /// Drop every cell and node.
    pub fn clear_sub_grids(&mut self) {
        self.cells.clear();
        self.nodes.clear();
    }

    /// Insert `cell` into the mesh.
    ///
    /// The first cell of an empty graph is always accepted; any links it
    /// carries are discarded since there is nothing to point at. Every
    /// later cell needs at least one link to a present cell, each linked
    /// neighbour must share the corresponding edge's two corner nodes, and
    /// the neighbour's facing slot must be free. On success the reverse
    /// links are written into the neighbours.
    ///
    /// A refused cell is dropped and the graph is left untouched.
    pub fn add_sub_grid(&mut self, mut cell: SubGridCell) -> Result<CellId, GridError> {
        for corner in cell.corners() {
            if corner.0 >= self.nodes.len() {
                return Err(GridError::UnknownNode(corner));
            }
        }

        let id = CellId(self.cells.len());
        if self.cells.is_empty() {
            cell.clear_neighbors();
            self.cells.push(cell);
            return Ok(id);
        }

        let mut attached = false;
        for (side, neighbor_id) in cell.links() {
            let neighbor = self
                .cells
                .get(neighbor_id.0)
                .ok_or(GridError::UnknownCell(neighbor_id))?;
            if neighbor.edge(side.opposite()) != cell.edge(side) {
                return Err(GridError::EdgeMismatch { side });
            }
            if neighbor.neighbor(side.opposite()).is_some() {
                return Err(GridError::BackLinkOccupied { side });
            }
            attached = true;
        }
        if !attached {
            return Err(GridError::Detached);
        }

        let links: Vec<(Side, CellId)> = cell.links().collect();
        self.cells.push(cell);
        for (side, neighbor_id) in links {
            self.cells[neighbor_id.0].set_neighbor(side.opposite(), id);
        }
        Ok(id)
    }

    /// Grow the mesh by one cell on `side` of `from`.
    ///
    /// The new cell reuses `from`'s two corners on that edge; `far` gives
    /// the two new corners in the same order as [`SubGridCell::edge`]
    /// (top-to-bottom for left/right, left-to-right for top/bottom).
    pub fn extend(
        &mut self,
        from: CellId,
        side: Side,
        far: [Point2<f64>; 2],
    ) -> Result<CellId, GridError> {
        let source = self.cells.get(from.0).ok_or(GridError::UnknownCell(from))?;
        if source.neighbor(side).is_some() {
            return Err(GridError::BackLinkOccupied {
                side: side.opposite(),
            });
        }
        let [s0, s1] = source.edge(side);
        let subdivisions = source.subdivisions();

        let f0 = self.add_node(far[0]);
        let f1 = self.add_node(far[1]);
        let mut cell = match side {
            Side::Right => SubGridCell::new(s0, f0, s1, f1),
            Side::Left => SubGridCell::new(f0, s0, f1, s1),
            Side::Bottom => SubGridCell::new(s0, s1, f0, f1),
            Side::Top => SubGridCell::new(f0, f1, s0, s1),
        };
        cell.set_subdivisions(subdivisions);
        cell.set_neighbor(side.opposite(), from);
        self.add_sub_grid(cell)
    }

    /// Corner positions as `[top_left, top_right, bottom_left, bottom_right]`.
    pub fn corner_points(&self, id: CellId) -> Option<[Point2<f64>; 4]> {
        let cell = self.cells.get(id.0)?;
        let [tl, tr, bl, br] = cell.corners();
        Some([self.node(tl)?, self.node(tr)?, self.node(bl)?, self.node(br)?])
    }

    /// Vanishing points from the corners' current positions.
    pub fn vanishing_points(&self, id: CellId) -> Option<VanishingPoints> {
        let [tl, tr, bl, br] = self.corner_points(id)?;
        let vp = VanishingPoints {
            top_bottom: compute_intersection(tl, tr, bl, br),
            left_right: compute_intersection(tl, bl, tr, br),
        };
        trace!("sub-grid {:?} vanishing points {:?}", id, vp);
        Some(vp)
    }

    pub fn top_bottom_vanishing_point(&self, id: CellId) -> Option<Point2<f64>> {
        self.vanishing_points(id).map(|vp| vp.top_bottom)
    }

    pub fn left_right_vanishing_point(&self, id: CellId) -> Option<Point2<f64>> {
        self.vanishing_points(id).map(|vp| vp.left_right)
    }

    /// Line work for every cell, in widget coordinates.
    ///
    /// A border shared by two cells is emitted once, by the cell with the
    /// lower [`SubGridCell::index`].
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip_all, fields(cells = self.cells.len())))]
    pub fn draw(&self, to_widget: &Homography, params: &GridDrawParams) -> DrawPath {
        let mut doc = DrawPath::new();
        let mut markers = Vec::new();

        for (id, cell) in self.cells() {
            let Some([tl, tr, bl, br]) = self.corner_points(id) else {
                continue;
            };

            for side in Side::ALL {
                let shared_with_older = cell
                    .neighbor(side)
                    .and_then(|n| self.cells.get(n.0))
                    .is_some_and(|n| n.index() < cell.index());
                if shared_with_older {
                    continue;
                }
                let (a, b) = match side {
                    Side::Left => (tl, bl),
                    Side::Right => (tr, br),
                    Side::Top => (tl, tr),
                    Side::Bottom => (bl, br),
                };
                doc.line(a, b);
            }

            let n = cell.subdivisions();
            if params.draw_subdivisions && n > 0 {
                if let Some(h) = square_to_quad(&[tl, tr, br, bl]) {
                    for i in 1..=n {
                        let t = f64::from(i) / f64::from(n + 1);
                        doc.line(h.apply(Point2::new(t, 0.0)), h.apply(Point2::new(t, 1.0)));
                        doc.line(h.apply(Point2::new(0.0, t)), h.apply(Point2::new(1.0, t)));
                    }
                }
            }

            if params.draw_vanishing_points {
                if let Some(vp) = self.vanishing_points(id) {
                    markers.push(vp.top_bottom);
                    markers.push(vp.left_right);
                }
            }
        }

        let mut out = doc.mapped(to_widget);
        for m in markers {
            out.cross_marker(to_widget.apply(m), params.marker_size);
        }
        trace!("grid draw: {} segments", out.len());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_cell(graph: &mut PerspectiveGridGraph) -> SubGridCell {
        let tl = graph.add_node(Point2::new(0.0, 0.0));
        let tr = graph.add_node(Point2::new(100.0, 0.0));
        let bl = graph.add_node(Point2::new(0.0, 100.0));
        let br = graph.add_node(Point2::new(100.0, 100.0));
        SubGridCell::new(tl, tr, bl, br)
    }

    #[test]
    fn first_cell_always_accepted() {
        let mut graph = PerspectiveGridGraph::new();
        let mut cell = unit_cell(&mut graph);
        cell.set_neighbor(Side::Left, CellId(42));
        let id = graph.add_sub_grid(cell).expect("first cell");
        assert_eq!(id, CellId(0));
        assert!(graph.has_sub_grids());
        assert_eq!(graph.cell(id).and_then(|c| c.neighbor(Side::Left)), None);
    }

    #[test]
    fn detached_cell_is_refused() {
        let mut graph = PerspectiveGridGraph::new();
        let first = unit_cell(&mut graph);
        graph.add_sub_grid(first).expect("first cell");
        let second = unit_cell(&mut graph);
        assert_eq!(graph.add_sub_grid(second), Err(GridError::Detached));
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn unknown_corner_is_refused() {
        let mut graph = PerspectiveGridGraph::new();
        let cell = SubGridCell::new(NodeId(0), NodeId(1), NodeId(2), NodeId(3));
        assert_eq!(graph.add_sub_grid(cell), Err(GridError::UnknownNode(NodeId(0))));
    }

    #[test]
    fn linked_cell_must_share_the_edge() {
        let mut graph = PerspectiveGridGraph::new();
        let first = unit_cell(&mut graph);
        let first_id = graph.add_sub_grid(first).expect("first cell");

        // Corners are fresh nodes, not the first cell's right edge.
        let mut second = unit_cell(&mut graph);
        second.set_neighbor(Side::Left, first_id);
        assert_eq!(
            graph.add_sub_grid(second),
            Err(GridError::EdgeMismatch { side: Side::Left })
        );
    }

    #[test]
    fn extend_links_both_ways() {
        let mut graph = PerspectiveGridGraph::new();
        let first = unit_cell(&mut graph);
        let a = graph.add_sub_grid(first).expect("first cell");
        let b = graph
            .extend(a, Side::Right, [Point2::new(200.0, 0.0), Point2::new(200.0, 100.0)])
            .expect("extend");

        let ca = graph.cell(a).expect("a");
        let cb = graph.cell(b).expect("b");
        assert_eq!(ca.neighbor(Side::Right), Some(b));
        assert_eq!(cb.neighbor(Side::Left), Some(a));
        assert_eq!(ca.edge(Side::Right), cb.edge(Side::Left));
    }

    #[test]
    fn occupied_edge_cannot_be_extended_again() {
        let mut graph = PerspectiveGridGraph::new();
        let first = unit_cell(&mut graph);
        let a = graph.add_sub_grid(first).expect("first cell");
        let far = [Point2::new(0.0, 200.0), Point2::new(100.0, 200.0)];
        graph.extend(a, Side::Bottom, far).expect("extend");
        assert_eq!(
            graph.extend(a, Side::Bottom, far),
            Err(GridError::BackLinkOccupied { side: Side::Top })
        );
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn moving_a_shared_node_moves_both_cells() {
        let mut graph = PerspectiveGridGraph::new();
        let first = unit_cell(&mut graph);
        let a = graph.add_sub_grid(first).expect("first cell");
        let b = graph
            .extend(a, Side::Right, [Point2::new(200.0, 0.0), Point2::new(200.0, 100.0)])
            .expect("extend");
        let shared = graph.cell(a).expect("a").top_right();
        graph
            .move_node(shared, Point2::new(110.0, -5.0))
            .expect("move");
        assert_eq!(graph.corner_points(a).expect("a")[1], Point2::new(110.0, -5.0));
        assert_eq!(graph.corner_points(b).expect("b")[0], Point2::new(110.0, -5.0));
    }

    #[test]
    fn trapezoid_vanishing_point() {
        let mut graph = PerspectiveGridGraph::new();
        let tl = graph.add_node(Point2::new(40.0, 0.0));
        let tr = graph.add_node(Point2::new(60.0, 0.0));
        let bl = graph.add_node(Point2::new(0.0, 100.0));
        let br = graph.add_node(Point2::new(100.0, 100.0));
        let id = graph
            .add_sub_grid(SubGridCell::new(tl, tr, bl, br))
            .expect("first cell");

        let vp = graph.left_right_vanishing_point(id).expect("vp");
        assert!((vp.x - 50.0).abs() < 1e-9, "{vp:?}");
        assert!((vp.y + 25.0).abs() < 1e-9, "{vp:?}");

        // Top and bottom are parallel: a finite point, far away.
        let far = graph.top_bottom_vanishing_point(id).expect("vp");
        assert!(far.x.is_finite() && far.x.abs() > 1e5);
    }

    #[test]
    fn shared_border_drawn_once() {
        let mut graph = PerspectiveGridGraph::new();
        let first = unit_cell(&mut graph);
        let a = graph.add_sub_grid(first).expect("first cell");
        graph
            .extend(a, Side::Right, [Point2::new(200.0, 0.0), Point2::new(200.0, 100.0)])
            .expect("extend");

        let params = GridDrawParams {
            draw_vanishing_points: false,
            ..GridDrawParams::default()
        };
        let path = graph.draw(&Homography::identity(), &params);
        assert_eq!(path.len(), 7);
    }

    #[test]
    fn subdivisions_add_guides() {
        let mut graph = PerspectiveGridGraph::new();
        let first = unit_cell(&mut graph);
        let a = graph.add_sub_grid(first).expect("first cell");
        graph.set_subdivisions(a, 3).expect("subdivide");

        let params = GridDrawParams {
            draw_vanishing_points: false,
            ..GridDrawParams::default()
        };
        let path = graph.draw(&Homography::identity(), &params);
        assert_eq!(path.len(), 4 + 2 * 3);
        let mid = path.segments()[4 + 2];
        assert!((mid.a.x - 50.0).abs() < 1e-9 && (mid.b.x - 50.0).abs() < 1e-9);
    }

    #[test]
    fn clear_empties_everything() {
        let mut graph = PerspectiveGridGraph::new();
        let first = unit_cell(&mut graph);
        graph.add_sub_grid(first).expect("first cell");
        graph.clear_sub_grids();
        assert!(!graph.has_sub_grids());
        assert_eq!(graph.node(NodeId(0)), None);
    }
}
