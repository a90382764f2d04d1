use crate::{
    AssistantError, PerspectiveAssistant, PerspectiveAssistantParams, RulerAssistant,
    RulerAssistantParams,
};
use nalgebra::Point2;
use perspective_core::{DrawPath, Homography};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The assistant types this crate can build.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssistantKind {
    Perspective,
    Ruler,
}

impl AssistantKind {
    pub const ALL: [AssistantKind; 2] = [AssistantKind::Perspective, AssistantKind::Ruler];

    /// Stable identifier used by the factory.
    pub fn id(self) -> &'static str {
        match self {
            AssistantKind::Perspective => "perspective",
            AssistantKind::Ruler => "ruler",
        }
    }

    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            AssistantKind::Perspective => "Perspective",
            AssistantKind::Ruler => "Ruler",
        }
    }

    pub fn handle_count(self) -> usize {
        match self {
            AssistantKind::Perspective => 4,
            AssistantKind::Ruler => 2,
        }
    }

    pub fn from_id(id: &str) -> Result<Self, AssistantError> {
        Self::ALL
            .into_iter()
            .find(|k| k.id() == id)
            .ok_or_else(|| AssistantError::UnknownKind(id.to_owned()))
    }

    /// An empty assistant of this kind with default parameters.
    pub fn create(self) -> Assistant {
        match self {
            AssistantKind::Perspective => {
                Assistant::Perspective(PerspectiveAssistant::new(PerspectiveAssistantParams::default()))
            }
            AssistantKind::Ruler => {
                Assistant::Ruler(RulerAssistant::new(RulerAssistantParams::default()))
            }
        }
    }
}

impl FromStr for AssistantKind {
    type Err = AssistantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_id(s)
    }
}

/// Any assistant, dispatched by `match`.
#[derive(Clone, Debug)]
pub enum Assistant {
    Perspective(PerspectiveAssistant),
    Ruler(RulerAssistant),
}

impl From<PerspectiveAssistant> for Assistant {
    fn from(a: PerspectiveAssistant) -> Self {
        Assistant::Perspective(a)
    }
}

impl From<RulerAssistant> for Assistant {
    fn from(a: RulerAssistant) -> Self {
        Assistant::Ruler(a)
    }
}

impl Assistant {
    pub fn kind(&self) -> AssistantKind {
        match self {
            Assistant::Perspective(_) => AssistantKind::Perspective,
            Assistant::Ruler(_) => AssistantKind::Ruler,
        }
    }

    pub fn id(&self) -> &'static str {
        self.kind().id()
    }

    pub fn name(&self) -> &'static str {
        self.kind().name()
    }

    pub fn add_handle(&mut self, p: Point2<f64>) -> Result<usize, AssistantError> {
        match self {
            Assistant::Perspective(a) => a.add_handle(p),
            Assistant::Ruler(a) => a.add_handle(p),
        }
    }

    pub fn move_handle(&mut self, index: usize, p: Point2<f64>) -> Result<(), AssistantError> {
        match self {
            Assistant::Perspective(a) => a.move_handle(index, p),
            Assistant::Ruler(a) => a.move_handle(index, p),
        }
    }

    pub fn handles(&self) -> &[Point2<f64>] {
        match self {
            Assistant::Perspective(a) => a.handles(),
            Assistant::Ruler(a) => a.handles(),
        }
    }

    pub fn is_complete(&self) -> bool {
        match self {
            Assistant::Perspective(a) => a.is_complete(),
            Assistant::Ruler(a) => a.is_complete(),
        }
    }

    pub fn adjust_position(
        &mut self,
        p: Point2<f64>,
        stroke_begin: Point2<f64>,
    ) -> Option<Point2<f64>> {
        match self {
            Assistant::Perspective(a) => a.adjust_position(p, stroke_begin),
            Assistant::Ruler(a) => a.adjust_position(p, stroke_begin),
        }
    }

    pub fn end_stroke(&mut self) {
        match self {
            Assistant::Perspective(a) => a.end_stroke(),
            Assistant::Ruler(a) => a.end_stroke(),
        }
    }

    pub fn contains(&self, p: Point2<f64>) -> bool {
        match self {
            Assistant::Perspective(a) => a.contains(p),
            Assistant::Ruler(a) => a.contains(p),
        }
    }

    pub fn distance(&self, p: Point2<f64>) -> f64 {
        match self {
            Assistant::Perspective(a) => a.distance(p),
            Assistant::Ruler(a) => a.distance(p),
        }
    }

    pub fn draw_cache(&self, to_widget: &Homography) -> DrawPath {
        match self {
            Assistant::Perspective(a) => a.draw_cache(to_widget),
            Assistant::Ruler(a) => a.draw_cache(to_widget),
        }
    }

    pub fn draw_assistant(&self, cursor: Point2<f64>, to_widget: &Homography) -> DrawPath {
        match self {
            Assistant::Perspective(a) => a.draw_assistant(cursor, to_widget),
            Assistant::Ruler(a) => a.draw_assistant(cursor, to_widget),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factory_round_trips_ids() {
        for kind in AssistantKind::ALL {
            assert_eq!(AssistantKind::from_id(kind.id()), Ok(kind));
            let a = kind.create();
            assert_eq!(a.kind(), kind);
            assert!(a.handles().is_empty());
        }
        assert_eq!(
            "spline".parse::<AssistantKind>(),
            Err(AssistantError::UnknownKind("spline".to_owned()))
        );
    }

    #[test]
    fn handle_count_matches_completion() {
        for kind in AssistantKind::ALL {
            let mut a = kind.create();
            for i in 0..kind.handle_count() {
                assert!(!a.is_complete());
                a.add_handle(Point2::new(i as f64 * 10.0, (i * i) as f64))
                    .expect("room for handle");
            }
            assert!(a.is_complete());
            assert!(a.add_handle(Point2::origin()).is_err());
        }
    }
}
