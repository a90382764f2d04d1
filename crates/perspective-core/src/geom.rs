use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

/// Tolerance below which two x coordinates (or two slopes) are treated as equal.
pub const EPSILON: f64 = 1e-6;

/// Offset applied to break a vertical line or a parallel pair.
const PERTURBATION: f64 = 1e-5;

/// Line in slope-intercept form `y = a * x + b`.
///
/// Vertical lines have no such form. [`LineEquation::through`] nudges the
/// first x coordinate by `1e-5` instead, so a vertical line becomes a very
/// steep one. The error this introduces is far below a pixel for any
/// on-canvas geometry.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineEquation {
    pub a: f64,
    pub b: f64,
}

impl LineEquation {
    pub fn new(a: f64, b: f64) -> Self {
        Self { a, b }
    }

    /// Line through two points.
    pub fn through(p1: Point2<f64>, p2: Point2<f64>) -> Self {
        let mut x1 = p1.x;
        if (x1 - p2.x).abs() < EPSILON {
            x1 += PERTURBATION;
        }
        let a = (p2.y - p1.y) / (p2.x - x1);
        let b = -a * x1 + p1.y;
        Self { a, b }
    }

    #[inline]
    pub fn y_at(&self, x: f64) -> f64 {
        self.a * x + self.b
    }

    /// Intersection with `other`.
    ///
    /// Near-parallel pairs get one slope nudged so the result is a finite
    /// point far away instead of a division by zero.
    pub fn intersection(&self, other: &LineEquation) -> Point2<f64> {
        let mut a1 = self.a;
        if (a1 - other.a).abs() < EPSILON {
            a1 += PERTURBATION;
        }
        let x = (self.b - other.b) / (other.a - a1);
        let y = other.a * x + other.b;
        Point2::new(x, y)
    }
}

/// Intersection of the infinite lines `(p1, p2)` and `(q1, q2)`.
pub fn compute_intersection(
    p1: Point2<f64>,
    p2: Point2<f64>,
    q1: Point2<f64>,
    q2: Point2<f64>,
) -> Point2<f64> {
    LineEquation::through(p1, p2).intersection(&LineEquation::through(q1, q2))
}

/// `-1`, `0` or `+1`.
#[inline]
pub fn sign(v: f64) -> i32 {
    if v > 0.0 {
        1
    } else if v < 0.0 {
        -1
    } else {
        0
    }
}

/// Perp-dot product `a.x * b.y - a.y * b.x`.
#[inline]
pub fn cross(a: Vector2<f64>, b: Vector2<f64>) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Infinite line through two points.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub p1: Point2<f64>,
    pub p2: Point2<f64>,
}

impl Line {
    pub fn new(p1: Point2<f64>, p2: Point2<f64>) -> Self {
        Self { p1, p2 }
    }

    #[inline]
    pub fn direction(&self) -> Vector2<f64> {
        self.p2 - self.p1
    }

    /// Squared distance from `q` to the line, without the square root.
    ///
    /// Returns `+inf` when the two defining points coincide.
    pub fn squared_distance(&self, q: Point2<f64>) -> f64 {
        let d = self.direction();
        let len2 = d.norm_squared();
        if len2 == 0.0 {
            return f64::INFINITY;
        }
        let c = cross(d, q - self.p1);
        c * c / len2
    }

    /// Orthogonal projection of `q` onto the line.
    pub fn project(&self, q: Point2<f64>) -> Point2<f64> {
        let d = self.direction();
        let len2 = d.norm_squared();
        if len2 == 0.0 {
            return self.p1;
        }
        let t = (q - self.p1).dot(&d) / len2;
        self.p1 + d * t
    }
}

/// Midpoint of two points.
#[inline]
pub fn midpoint(a: Point2<f64>, b: Point2<f64>) -> Point2<f64> {
    Point2::new((a.x + b.x) * 0.5, (a.y + b.y) * 0.5)
}

/// Whether the closed segments `(a1, a2)` and `(b1, b2)` properly cross.
pub fn segments_cross(
    a1: Point2<f64>,
    a2: Point2<f64>,
    b1: Point2<f64>,
    b2: Point2<f64>,
) -> bool {
    let da = a2 - a1;
    let db = b2 - b1;
    let s1 = sign(cross(da, b1 - a1));
    let s2 = sign(cross(da, b2 - a1));
    let s3 = sign(cross(db, a1 - b1));
    let s4 = sign(cross(db, a2 - b1));
    s1 * s2 < 0 && s3 * s4 < 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn on_line(l: &LineEquation, p: Point2<f64>) -> bool {
        let y = l.y_at(p.x);
        (y - p.y).abs() <= 1e-6 * (1.0 + p.y.abs())
    }

    #[test]
    fn intersection_lies_on_both_lines() {
        let l1 = LineEquation::through(Point2::new(0.0, 0.0), Point2::new(10.0, 5.0));
        let l2 = LineEquation::through(Point2::new(0.0, 8.0), Point2::new(10.0, -2.0));
        let p = l1.intersection(&l2);
        assert!(on_line(&l1, p), "{p:?}");
        assert!(on_line(&l2, p), "{p:?}");
    }

    #[test]
    fn vertical_line_stays_finite() {
        let vertical = LineEquation::through(Point2::new(3.0, 0.0), Point2::new(3.0, 10.0));
        assert!(vertical.a.is_finite() && vertical.b.is_finite());

        let horizontal = LineEquation::through(Point2::new(0.0, 4.0), Point2::new(10.0, 4.0));
        let p = vertical.intersection(&horizontal);
        assert!(p.x.is_finite() && p.y.is_finite());
        assert!((p.x - 3.0).abs() < 1e-3, "{p:?}");
        assert!((p.y - 4.0).abs() < 1e-9, "{p:?}");
    }

    #[test]
    fn parallel_lines_meet_far_away() {
        let p = compute_intersection(
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(0.0, 10.0),
            Point2::new(10.0, 10.0),
        );
        assert!(p.x.is_finite() && p.y.is_finite());
        assert!(p.x.abs() > 1e5, "{p:?}");
    }

    #[test]
    fn sign_and_cross() {
        assert_eq!(sign(-3.0), -1);
        assert_eq!(sign(0.0), 0);
        assert_eq!(sign(0.25), 1);
        assert_eq!(cross(Vector2::new(1.0, 0.0), Vector2::new(0.0, 1.0)), 1.0);
        assert_eq!(cross(Vector2::new(0.0, 1.0), Vector2::new(1.0, 0.0)), -1.0);
    }

    #[test]
    fn squared_distance_and_projection_agree() {
        let line = Line::new(Point2::new(0.0, 0.0), Point2::new(4.0, 4.0));
        let q = Point2::new(0.0, 4.0);
        assert!((line.squared_distance(q) - 8.0).abs() < 1e-12);
        let p = line.project(q);
        assert!((p - Point2::new(2.0, 2.0)).norm() < 1e-12);
        assert!((q - p).norm_squared() - line.squared_distance(q) < 1e-12);
    }

    #[test]
    fn diagonals_cross_but_sides_do_not() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(1.0, 0.0);
        let c = Point2::new(1.0, 1.0);
        let d = Point2::new(0.0, 1.0);
        assert!(segments_cross(a, c, b, d));
        assert!(!segments_cross(a, b, c, d));
    }
}
