//! Perspective grid graph: linked quadrilateral cells over shared corners.
//!
//! ## Quickstart
//!
//! ```
//! use nalgebra::Point2;
//! use perspective_grid::{PerspectiveGridGraph, Side, SubGridCell};
//!
//! let mut graph = PerspectiveGridGraph::new();
//! let tl = graph.add_node(Point2::new(0.0, 0.0));
//! let tr = graph.add_node(Point2::new(100.0, 10.0));
//! let bl = graph.add_node(Point2::new(0.0, 100.0));
//! let br = graph.add_node(Point2::new(100.0, 90.0));
//! let first = graph.add_sub_grid(SubGridCell::new(tl, tr, bl, br)).unwrap();
//!
//! // Grow to the right, sharing the first cell's right edge.
//! let far = [Point2::new(200.0, 20.0), Point2::new(200.0, 80.0)];
//! graph.extend(first, Side::Right, far).unwrap();
//!
//! let vp = graph.vanishing_points(first).unwrap();
//! println!("horizon point: {:?}", vp.top_bottom);
//! ```
//!
//! Each cell's vanishing points are recomputed from the current corner
//! positions on every query; nothing is cached per cell.

mod cell;
mod error;
mod graph;
mod params;

pub use cell::{CellId, NodeId, Side, SubGridCell};
pub use error::GridError;
pub use graph::{GridNode, PerspectiveGridGraph, VanishingPoints};
pub use params::GridDrawParams;
