//! Geometric primitives shared by the perspective grid and the drawing
//! assistants.
//!
//! Everything works on `nalgebra::Point2<f64>` in document coordinates.
//! The host's device-to-widget transform is passed around as a
//! [`Homography`]; an affine map is just a homography whose bottom row is
//! `[0, 0, 1]`.

mod geom;
mod homography;
mod logger;
mod path;
mod polygon;

pub use geom::{
    compute_intersection, cross, midpoint, segments_cross, sign, Line, LineEquation, EPSILON,
};
pub use homography::{homography_from_4pt, square_to_quad, Homography, UNIT_SQUARE};
pub use path::{DrawPath, Segment};
pub use polygon::{bounds, contains_even_odd};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;
