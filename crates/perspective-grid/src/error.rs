use crate::{CellId, NodeId, Side};

/// Reasons [`PerspectiveGridGraph`](crate::PerspectiveGridGraph) refuses an edit.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("sub-grid is not attached to any existing sub-grid")]
    Detached,
    #[error("unknown sub-grid {0:?}")]
    UnknownCell(CellId),
    #[error("unknown grid node {0:?}")]
    UnknownNode(NodeId),
    #[error("{side:?} neighbour does not share that edge's corner nodes")]
    EdgeMismatch { side: Side },
    #[error("{side:?} neighbour already has a different sub-grid on the facing edge")]
    BackLinkOccupied { side: Side },
}
