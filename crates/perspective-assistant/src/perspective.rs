use crate::handles::{self, CornerRoles, SideHandles};
use crate::quad::{classify_quad, QuadGeometry};
use crate::{AssistantError, PerspectiveAssistantParams};
use log::debug;
use nalgebra::{Point2, Vector2};
use perspective_core::{compute_intersection, DrawPath, Homography, Line, UNIT_SQUARE};
use std::cell::Cell;

#[cfg(feature = "tracing")]
use tracing::instrument;

const HANDLE_COUNT: usize = 4;

#[derive(Clone, Copy, Debug)]
struct QuadCache {
    snapshot: [Point2<f64>; 4],
    geometry: QuadGeometry,
}

/// Four-handle assistant that snaps strokes to the two perspective axes of
/// the quad.
///
/// Classification and the homography fit are cached against a snapshot of
/// the handles and recomputed only when a handle has moved.
#[derive(Clone, Debug, Default)]
pub struct PerspectiveAssistant {
    handles: Vec<Point2<f64>>,
    params: PerspectiveAssistantParams,
    cache: Cell<Option<QuadCache>>,
    snap_line: Option<Line>,
}

impl PerspectiveAssistant {
    pub fn new(params: PerspectiveAssistantParams) -> Self {
        Self {
            params,
            ..Self::default()
        }
    }

    /// Build a complete assistant from four handles in drawing order.
    pub fn from_handles(handles: [Point2<f64>; 4], params: PerspectiveAssistantParams) -> Self {
        Self {
            handles: handles.to_vec(),
            params,
            ..Self::default()
        }
    }

    pub fn params(&self) -> &PerspectiveAssistantParams {
        &self.params
    }

    pub fn add_handle(&mut self, p: Point2<f64>) -> Result<usize, AssistantError> {
        if self.handles.len() >= HANDLE_COUNT {
            return Err(AssistantError::TooManyHandles {
                kind: "perspective",
                max: HANDLE_COUNT,
            });
        }
        self.handles.push(p);
        Ok(self.handles.len() - 1)
    }

    pub fn move_handle(&mut self, index: usize, p: Point2<f64>) -> Result<(), AssistantError> {
        let slot = self
            .handles
            .get_mut(index)
            .ok_or(AssistantError::HandleIndex(index))?;
        *slot = p;
        Ok(())
    }

    pub fn handles(&self) -> &[Point2<f64>] {
        &self.handles
    }

    pub fn is_complete(&self) -> bool {
        self.handles.len() == HANDLE_COUNT
    }

    fn handle_array(&self) -> Option<[Point2<f64>; 4]> {
        self.handles.as_slice().try_into().ok()
    }

    /// Classification of the current handles, `None` until all four exist.
    pub fn quad(&self) -> Option<QuadGeometry> {
        let handles = self.handle_array()?;
        if let Some(cache) = self.cache.get() {
            if cache.snapshot == handles {
                return Some(cache.geometry);
            }
        }
        let geometry = self.recompute(handles);
        self.cache.set(Some(QuadCache {
            snapshot: handles,
            geometry,
        }));
        Some(geometry)
    }

    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip(self)))]
    fn recompute(&self, handles: [Point2<f64>; 4]) -> QuadGeometry {
        let geometry = classify_quad(handles);
        debug!(
            "perspective quad recomputed: {:?}, valid = {}",
            geometry.shape,
            geometry.is_valid()
        );
        geometry
    }

    /// Unit square onto the quad, when the quad is convex and the fit held.
    pub fn transform(&self) -> Option<Homography> {
        self.quad().and_then(|q| q.transform)
    }

    pub fn is_valid(&self) -> bool {
        self.transform().is_some()
    }

    /// Even-odd test against the classified polygon (the triangle for a
    /// concave quad).
    pub fn contains(&self, p: Point2<f64>) -> bool {
        self.quad().is_some_and(|q| q.polygon.contains(p))
    }

    /// Foreshortening at `p` relative to the least foreshortened corner.
    ///
    /// The local scale of the square-to-quad map is `sqrt(|det J|)` at the
    /// unit-space image of `p`. `|det J|` falls off as `1 / |w|^3` with `w`
    /// affine in unit space, so its maximum over the unit square sits at a
    /// corner. `1.0` means no foreshortening; points outside the quad on the
    /// near side may exceed it. A point on the line at infinity gives `0.0`.
    /// Without a valid transform every point reports `1.0`.
    pub fn distance(&self, p: Point2<f64>) -> f64 {
        let Some(h) = self.transform() else {
            return 1.0;
        };
        let Some(inverse) = h.inverse() else {
            return 1.0;
        };
        if inverse.denominator(p) == 0.0 {
            return 0.0;
        }
        let local_scale = |u: Point2<f64>| h.jacobian(u).determinant().abs().sqrt();
        let reference = UNIT_SQUARE
            .iter()
            .map(|&c| local_scale(c))
            .fold(0.0_f64, f64::max);
        if !(reference.is_finite() && reference > 0.0) {
            return 1.0;
        }
        local_scale(inverse.apply(p)) / reference
    }

    /// Snap `p` to one perspective axis through `stroke_begin`.
    ///
    /// `None` means "no snap": the quad is not usable or the stroke did not
    /// start inside it. Within the dead zone the stroke start is returned
    /// unchanged. The first sample past the dead zone locks whichever axis
    /// is closer; every later sample is projected onto that axis until
    /// [`end_stroke`](Self::end_stroke).
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn adjust_position(
        &mut self,
        p: Point2<f64>,
        stroke_begin: Point2<f64>,
    ) -> Option<Point2<f64>> {
        if let Some(line) = self.snap_line {
            return Some(line.project(p));
        }

        let geometry = self.quad()?;
        let h = geometry.transform?;
        if !geometry.polygon.contains(stroke_begin) {
            return None;
        }
        let dead_zone = self.params.dead_zone_px;
        if (p - stroke_begin).norm_squared() < dead_zone * dead_zone {
            return Some(stroke_begin);
        }

        let inverse = h.inverse()?;
        let u = inverse.apply(stroke_begin);
        let vertical = Line::new(stroke_begin, h.apply(u + Vector2::new(0.0, 1.0)));
        let horizontal = Line::new(stroke_begin, h.apply(u + Vector2::new(1.0, 0.0)));

        let dv = finite_or_inf(vertical.squared_distance(p));
        let dh = finite_or_inf(horizontal.squared_distance(p));
        let line = if dv <= dh { vertical } else { horizontal };
        if !(line.p2.x.is_finite() && line.p2.y.is_finite()) {
            return None;
        }
        debug!(
            "snap axis locked: {} through {:?}",
            if dv <= dh { "vertical" } else { "horizontal" },
            stroke_begin
        );
        self.snap_line = Some(line);
        Some(line.project(p))
    }

    /// Forget the locked axis; the next stroke chooses again.
    pub fn end_stroke(&mut self) {
        self.snap_line = None;
    }

    pub fn snap_line(&self) -> Option<Line> {
        self.snap_line
    }

    /// `[top_bottom, left_right]` vanishing points of a valid quad.
    ///
    /// The polygon is walked `p0 -> p1 -> p2 -> p3`; the first point is
    /// where edges `p0p1` and `p3p2` meet, the second where `p0p3` and
    /// `p1p2` meet.
    pub fn vanishing_points(&self) -> Option<[Point2<f64>; 2]> {
        let geometry = self.quad()?;
        geometry.transform?;
        let [a, b, c, d] = geometry.polygon.corners()?;
        Some([
            compute_intersection(a, b, d, c),
            compute_intersection(a, d, b, c),
        ])
    }

    pub fn corner_roles(&self) -> Option<CornerRoles> {
        self.handle_array().map(|h| handles::corner_roles(&h))
    }

    pub fn side_handles(&self) -> Option<SideHandles> {
        let h = self.handle_array()?;
        Some(handles::side_handles(&h, &handles::corner_roles(&h)))
    }

    /// Handle index of the corner under `widget_point`, if any.
    pub fn closest_corner_handle(
        &self,
        widget_point: Point2<f64>,
        to_widget: &Homography,
    ) -> Option<usize> {
        let h = self.handle_array()?;
        handles::closest_corner_handle(&h, widget_point, to_widget, self.params.handle_size)
    }

    pub fn bounding_rect(&self) -> Option<(Point2<f64>, Point2<f64>)> {
        handles::bounding_rect(&self.handles)
    }

    /// Outline plus, for a valid quad, the unit-square sampling grid.
    pub fn draw_cache(&self, to_widget: &Homography) -> DrawPath {
        let mut doc = DrawPath::new();
        let Some(geometry) = self.quad() else {
            // Incomplete: connect what exists.
            for pair in self.handles.windows(2) {
                doc.line(pair[0], pair[1]);
            }
            return doc.mapped(to_widget);
        };
        doc.polygon(geometry.polygon.as_slice());

        let n = self.params.grid_density;
        if let (Some(h), true) = (geometry.transform, n > 0) {
            for i in 0..=n {
                let t = f64::from(i) / f64::from(n);
                doc.line(h.apply(Point2::new(t, 0.0)), h.apply(Point2::new(t, 1.0)));
                doc.line(h.apply(Point2::new(0.0, t)), h.apply(Point2::new(1.0, t)));
            }
        }
        doc.mapped(to_widget)
    }

    /// Vanishing-point markers and, when `cursor` is inside a valid quad,
    /// the two axis lines through it.
    pub fn draw_assistant(&self, cursor: Point2<f64>, to_widget: &Homography) -> DrawPath {
        let mut doc = DrawPath::new();
        if let (Some(h), true) = (self.transform(), self.contains(cursor)) {
            if let Some(inverse) = h.inverse() {
                let u = inverse.apply(cursor);
                doc.line(h.apply(Point2::new(u.x, 0.0)), h.apply(Point2::new(u.x, 1.0)));
                doc.line(h.apply(Point2::new(0.0, u.y)), h.apply(Point2::new(1.0, u.y)));
            }
        }

        let mut out = doc.mapped(to_widget);
        for vp in self.vanishing_points().into_iter().flatten() {
            out.cross_marker(to_widget.apply(vp), self.params.marker_size);
        }
        out
    }
}

fn finite_or_inf(v: f64) -> f64 {
    if v.is_nan() {
        f64::INFINITY
    } else {
        v
    }
}
