use crate::Homography;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// A straight segment in whatever space the owning [`DrawPath`] is in.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub a: Point2<f64>,
    pub b: Point2<f64>,
}

impl Segment {
    pub fn new(a: Point2<f64>, b: Point2<f64>) -> Self {
        Self { a, b }
    }

    pub fn is_finite(&self) -> bool {
        self.a.x.is_finite() && self.a.y.is_finite() && self.b.x.is_finite() && self.b.y.is_finite()
    }
}

/// Drawable output of the grid and assistant hooks.
///
/// The host strokes every segment; nothing here knows about pens or
/// pixels. Segments with a non-finite endpoint are dropped on insertion,
/// so geometry computed from a degenerate quad simply disappears.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DrawPath {
    segments: Vec<Segment>,
}

impl DrawPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn line(&mut self, a: Point2<f64>, b: Point2<f64>) {
        let s = Segment::new(a, b);
        if s.is_finite() {
            self.segments.push(s);
        }
    }

    /// Closed outline through `points`.
    pub fn polygon(&mut self, points: &[Point2<f64>]) {
        if points.len() < 2 {
            return;
        }
        for (i, &a) in points.iter().enumerate() {
            let b = points[(i + 1) % points.len()];
            self.line(a, b);
        }
    }

    /// An X centred on `center`, each arm reaching `half_size` along both axes.
    pub fn cross_marker(&mut self, center: Point2<f64>, half_size: f64) {
        let d = half_size;
        self.line(
            Point2::new(center.x - d, center.y - d),
            Point2::new(center.x + d, center.y + d),
        );
        self.line(
            Point2::new(center.x - d, center.y + d),
            Point2::new(center.x + d, center.y - d),
        );
    }

    pub fn extend(&mut self, other: DrawPath) {
        self.segments.extend(other.segments);
    }

    /// Every endpoint mapped through `transform`.
    pub fn mapped(&self, transform: &Homography) -> DrawPath {
        let mut out = DrawPath::new();
        for s in &self.segments {
            out.line(transform.apply(s.a), transform.apply(s.b));
        }
        out
    }
}
