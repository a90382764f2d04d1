use serde::{Deserialize, Serialize};

/// Configuration for [`PerspectiveAssistant`](crate::PerspectiveAssistant).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerspectiveAssistantParams {
    /// Distance a stroke must travel from its start before an axis is locked.
    ///
    /// Compared squared against the movement, so `2.0` means "fewer than 4
    /// squared pixels leaves the stroke where it began".
    pub dead_zone_px: f64,
    /// Lines per axis in the unit-square sampling grid drawn by `draw_cache`.
    pub grid_density: u32,
    /// Half size of the X drawn at each vanishing point, in widget pixels.
    pub marker_size: f64,
    /// Side of the square pick area around a corner handle, in widget pixels.
    pub handle_size: f64,
}

impl Default for PerspectiveAssistantParams {
    fn default() -> Self {
        Self {
            dead_zone_px: 2.0,
            grid_density: 8,
            marker_size: 8.0,
            handle_size: 16.0,
        }
    }
}

/// Configuration for [`RulerAssistant`](crate::RulerAssistant).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulerAssistantParams {
    /// Tick marks along the ruler, ends included when non-zero.
    pub tick_count: u32,
    /// Length of each tick mark, in widget pixels.
    pub tick_length: f64,
}

impl Default for RulerAssistantParams {
    fn default() -> Self {
        Self {
            tick_count: 10,
            tick_length: 6.0,
        }
    }
}
