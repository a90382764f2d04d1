//! Classification of a four-handle polygon and the square-to-quad fit.
//!
//! The turn direction at each vertex is the sign of the perp-dot of the two
//! edges meeting there. Summed over the four vertices:
//!
//! - `+-4`: convex, fit the homography;
//! - `0`: self-intersecting; swap one adjacent pair once and retry;
//! - `+-2`: concave (one reflex vertex) or a triangle; the odd vertex is
//!   dropped and the remaining triangle is kept for feedback only;
//! - anything else: degenerate.

use nalgebra::Point2;
use perspective_core::{contains_even_odd, cross, sign, square_to_quad, Homography};

/// Outcome of [`classify_quad`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuadShape {
    /// Convex as given.
    Convex,
    /// Self-intersecting, made convex by swapping two adjacent handles.
    Uncrossed,
    /// One reflex vertex (or one collinear vertex); reduced to a triangle.
    Concave,
    /// Collinear or otherwise unusable.
    Degenerate,
}

impl QuadShape {
    pub fn is_convex(self) -> bool {
        matches!(self, QuadShape::Convex | QuadShape::Uncrossed)
    }
}

/// Up to four vertices, in drawing order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuadPolygon {
    points: [Point2<f64>; 4],
    len: usize,
}

impl QuadPolygon {
    fn quad(points: [Point2<f64>; 4]) -> Self {
        Self { points, len: 4 }
    }

    fn triangle(points: [Point2<f64>; 3]) -> Self {
        Self {
            points: [points[0], points[1], points[2], points[2]],
            len: 3,
        }
    }

    pub fn as_slice(&self) -> &[Point2<f64>] {
        &self.points[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Even-odd containment.
    pub fn contains(&self, p: Point2<f64>) -> bool {
        contains_even_odd(self.as_slice(), p)
    }

    /// The four corners, when this is a quad.
    pub fn corners(&self) -> Option<[Point2<f64>; 4]> {
        (self.len == 4).then_some(self.points)
    }
}

/// Cached result of classifying four handles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuadGeometry {
    pub shape: QuadShape,
    pub polygon: QuadPolygon,
    /// Unit square onto `polygon`; present only for a convex shape whose
    /// fit succeeded.
    pub transform: Option<Homography>,
}

impl QuadGeometry {
    pub fn is_valid(&self) -> bool {
        self.transform.is_some()
    }

    /// Convex, yet the homography could not be fitted.
    pub fn fit_failed(&self) -> bool {
        self.shape.is_convex() && self.transform.is_none()
    }
}

/// `signs[i]` is the turn direction at vertex `i + 1`.
fn turn_signs(p: &[Point2<f64>; 4]) -> [i32; 4] {
    std::array::from_fn(|i| {
        let a = p[i];
        let b = p[(i + 1) % 4];
        let c = p[(i + 2) % 4];
        sign(cross(b - a, c - b))
    })
}

fn fitted(points: [Point2<f64>; 4], shape: QuadShape) -> QuadGeometry {
    QuadGeometry {
        shape,
        polygon: QuadPolygon::quad(points),
        transform: square_to_quad(&points),
    }
}

fn rejected(points: [Point2<f64>; 4], shape: QuadShape) -> QuadGeometry {
    QuadGeometry {
        shape,
        polygon: QuadPolygon::quad(points),
        transform: None,
    }
}

/// Classify four handles (in handle order) and fit the transform when convex.
pub fn classify_quad(handles: [Point2<f64>; 4]) -> QuadGeometry {
    let signs = turn_signs(&handles);
    let sum: i32 = signs.iter().sum();

    match sum {
        4 | -4 => fitted(handles, QuadShape::Convex),
        0 => {
            // Opposite turns at vertices i+1 and i+2 mean edge (i+1, i+2)
            // is one of the crossing pair; moving vertex i+1 back by one
            // unties the bow.
            let Some(i) = (0..4).find(|&i| signs[i] * signs[(i + 1) % 4] < 0) else {
                return rejected(handles, QuadShape::Degenerate);
            };
            let mut points = handles;
            points.swap(i, (i + 1) % 4);
            let repaired: i32 = turn_signs(&points).iter().sum();
            if repaired.abs() == 4 {
                fitted(points, QuadShape::Uncrossed)
            } else {
                rejected(handles, QuadShape::Degenerate)
            }
        }
        2 | -2 => {
            let majority = sum.signum();
            let odd = (0..4)
                .find(|&i| signs[i] != majority)
                .map_or(0, |i| (i + 1) % 4);
            let kept: Vec<Point2<f64>> = (0..4)
                .filter(|&k| k != odd)
                .map(|k| handles[k])
                .collect();
            QuadGeometry {
                shape: QuadShape::Concave,
                polygon: QuadPolygon::triangle([kept[0], kept[1], kept[2]]),
                transform: None,
            }
        }
        _ => rejected(handles, QuadShape::Degenerate),
    }
}
