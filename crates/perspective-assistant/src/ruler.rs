use crate::{AssistantError, RulerAssistantParams};
use nalgebra::{Point2, Vector2};
use perspective_core::{DrawPath, Homography, Line};

const HANDLE_COUNT: usize = 2;

/// Straight-line assistant: strokes are projected onto the infinite line
/// through its two handles.
#[derive(Clone, Debug, Default)]
pub struct RulerAssistant {
    handles: Vec<Point2<f64>>,
    params: RulerAssistantParams,
}

impl RulerAssistant {
    pub fn new(params: RulerAssistantParams) -> Self {
        Self {
            handles: Vec::new(),
            params,
        }
    }

    pub fn from_handles(a: Point2<f64>, b: Point2<f64>, params: RulerAssistantParams) -> Self {
        Self {
            handles: vec![a, b],
            params,
        }
    }

    pub fn params(&self) -> &RulerAssistantParams {
        &self.params
    }

    pub fn add_handle(&mut self, p: Point2<f64>) -> Result<usize, AssistantError> {
        if self.handles.len() >= HANDLE_COUNT {
            return Err(AssistantError::TooManyHandles {
                kind: "ruler",
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

    /// The ruler line, once both handles exist and are distinct.
    pub fn line(&self) -> Option<Line> {
        match self.handles.as_slice() {
            [a, b] if a != b => Some(Line::new(*a, *b)),
            _ => None,
        }
    }

    /// Orthogonal projection of `p`; the stroke start plays no part.
    pub fn adjust_position(
        &mut self,
        p: Point2<f64>,
        _stroke_begin: Point2<f64>,
    ) -> Option<Point2<f64>> {
        self.line().map(|line| line.project(p))
    }

    pub fn end_stroke(&mut self) {}

    pub fn contains(&self, _p: Point2<f64>) -> bool {
        false
    }

    pub fn distance(&self, _p: Point2<f64>) -> f64 {
        1.0
    }

    /// The ruler segment with evenly spaced ticks, ends included.
    ///
    /// Ticks are perpendicular in widget space so their length is in pixels
    /// whatever the zoom.
    pub fn draw_cache(&self, to_widget: &Homography) -> DrawPath {
        let mut out = DrawPath::new();
        let Some(line) = self.line() else {
            return out;
        };
        let a = to_widget.apply(line.p1);
        let b = to_widget.apply(line.p2);
        out.line(a, b);

        let d = b - a;
        let len = d.norm();
        if len == 0.0 || !len.is_finite() {
            return out;
        }
        let half = self.params.tick_length * 0.5;
        let normal = Vector2::new(-d.y, d.x) / len * half;
        let n = self.params.tick_count;
        for i in 0..n {
            let t = if n == 1 {
                0.5
            } else {
                f64::from(i) / f64::from(n - 1)
            };
            let at = a + d * t;
            out.line(at - normal, at + normal);
        }
        out
    }

    /// A marker where `cursor` lands on the ruler.
    pub fn draw_assistant(&self, cursor: Point2<f64>, to_widget: &Homography) -> DrawPath {
        let mut out = DrawPath::new();
        if let Some(line) = self.line() {
            out.cross_marker(to_widget.apply(line.project(cursor)), self.params.tick_length);
        }
        out
    }
}
