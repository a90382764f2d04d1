use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Index of a corner node in a [`PerspectiveGridGraph`](crate::PerspectiveGridGraph).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Index of a cell in a [`PerspectiveGridGraph`](crate::PerspectiveGridGraph), in insertion order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellId(pub(crate) usize);

impl CellId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Which edge of a cell a neighbour is attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Left, Side::Right, Side::Top, Side::Bottom];

    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
            Side::Top => Side::Bottom,
            Side::Bottom => Side::Top,
        }
    }

    fn slot(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
            Side::Top => 2,
            Side::Bottom => 3,
        }
    }
}

static NEXT_CELL_INDEX: AtomicUsize = AtomicUsize::new(0);

/// One quadrilateral of the perspective mesh.
///
/// Corners are fixed at construction. Each neighbour slot can be written
/// once; the graph fills the reverse slot when a linked cell is inserted.
/// Not `Clone`, so a cell cannot be inserted twice.
#[derive(Debug)]
pub struct SubGridCell {
    top_left: NodeId,
    top_right: NodeId,
    bottom_left: NodeId,
    bottom_right: NodeId,
    neighbors: [Option<CellId>; 4],
    subdivisions: u32,
    index: usize,
}

impl SubGridCell {
    pub fn new(
        top_left: NodeId,
        top_right: NodeId,
        bottom_left: NodeId,
        bottom_right: NodeId,
    ) -> Self {
        Self {
            top_left,
            top_right,
            bottom_left,
            bottom_right,
            neighbors: [None; 4],
            subdivisions: 0,
            index: NEXT_CELL_INDEX.fetch_add(1, Ordering::Relaxed),
        }
    }

    pub fn top_left(&self) -> NodeId {
        self.top_left
    }

    pub fn top_right(&self) -> NodeId {
        self.top_right
    }

    pub fn bottom_left(&self) -> NodeId {
        self.bottom_left
    }

    pub fn bottom_right(&self) -> NodeId {
        self.bottom_right
    }

    /// Corners as `[top_left, top_right, bottom_left, bottom_right]`.
    pub fn corners(&self) -> [NodeId; 4] {
        [
            self.top_left,
            self.top_right,
            self.bottom_left,
            self.bottom_right,
        ]
    }

    /// The two corners bounding `side`, top-to-bottom or left-to-right.
    ///
    /// A cell's right edge equals its right neighbour's left edge, and so on.
    pub fn edge(&self, side: Side) -> [NodeId; 2] {
        match side {
            Side::Left => [self.top_left, self.bottom_left],
            Side::Right => [self.top_right, self.bottom_right],
            Side::Top => [self.top_left, self.top_right],
            Side::Bottom => [self.bottom_left, self.bottom_right],
        }
    }

    pub fn neighbor(&self, side: Side) -> Option<CellId> {
        self.neighbors[side.slot()]
    }

    /// Every populated neighbour slot.
    pub fn links(&self) -> impl Iterator<Item = (Side, CellId)> + '_ {
        Side::ALL
            .into_iter()
            .filter_map(|side| self.neighbor(side).map(|id| (side, id)))
    }

    /// Attach `cell` on `side`.
    ///
    /// # Panics
    ///
    /// If the slot is already populated. Neighbour links are write-once.
    pub fn set_neighbor(&mut self, side: Side, cell: CellId) {
        let slot = &mut self.neighbors[side.slot()];
        assert!(
            slot.is_none(),
            "sub-grid {} already has a {:?} neighbour ({:?})",
            self.index,
            side,
            slot
        );
        *slot = Some(cell);
    }

    pub(crate) fn clear_neighbors(&mut self) {
        self.neighbors = [None; 4];
    }

    /// Number of interior guide lines drawn parallel to each side.
    pub fn subdivisions(&self) -> u32 {
        self.subdivisions
    }

    pub fn set_subdivisions(&mut self, subdivisions: u32) {
        self.subdivisions = subdivisions;
    }

    /// Process-wide creation order; never reused.
    pub fn index(&self) -> usize {
        self.index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell() -> SubGridCell {
        SubGridCell::new(NodeId(0), NodeId(1), NodeId(2), NodeId(3))
    }

    #[test]
    fn indices_increase() {
        let a = cell();
        let b = cell();
        assert!(b.index() > a.index());
    }

    #[test]
    fn edges_name_shared_corners() {
        let c = cell();
        assert_eq!(c.edge(Side::Left), [NodeId(0), NodeId(2)]);
        assert_eq!(c.edge(Side::Right), [NodeId(1), NodeId(3)]);
        assert_eq!(c.edge(Side::Top), [NodeId(0), NodeId(1)]);
        assert_eq!(c.edge(Side::Bottom), [NodeId(2), NodeId(3)]);
    }

    #[test]
    fn links_lists_set_slots() {
        let mut c = cell();
        assert_eq!(c.links().count(), 0);
        c.set_neighbor(Side::Bottom, CellId(4));
        assert_eq!(c.links().collect::<Vec<_>>(), vec![(Side::Bottom, CellId(4))]);
        assert_eq!(c.neighbor(Side::Top), None);
    }

    #[test]
    #[should_panic(expected = "already has a Left neighbour")]
    fn neighbor_is_write_once() {
        let mut c = cell();
        c.set_neighbor(Side::Left, CellId(0));
        c.set_neighbor(Side::Left, CellId(1));
    }

    #[test]
    fn opposite_sides_pair_up() {
        for side in Side::ALL {
            assert_eq!(side.opposite().opposite(), side);
            assert_ne!(side.opposite(), side);
        }
    }
}
