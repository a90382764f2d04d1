use serde::{Deserialize, Serialize};

/// What [`PerspectiveGridGraph::draw`](crate::PerspectiveGridGraph::draw) emits.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GridDrawParams {
    /// Half size of the X drawn at each vanishing point, in widget pixels.
    pub marker_size: f64,
    /// Emit each cell's interior guide lines.
    pub draw_subdivisions: bool,
    /// Emit X markers at the vanishing points.
    pub draw_vanishing_points: bool,
}

impl Default for GridDrawParams {
    fn default() -> Self {
        Self {
            marker_size: 8.0,
            draw_subdivisions: true,
            draw_vanishing_points: true,
        }
    }
}
