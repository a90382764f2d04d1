//! Drawing assistants that constrain a stroke while it is being drawn.
//!
//! ## Quickstart
//!
//! ```
//! use nalgebra::Point2;
//! use perspective_assistant::{AssistantKind, Assistant};
//!
//! let mut assistant: Assistant = AssistantKind::Perspective.create();
//! for (x, y) in [(0.0, 0.0), (100.0, 10.0), (100.0, 90.0), (0.0, 100.0)] {
//!     assistant.add_handle(Point2::new(x, y)).unwrap();
//! }
//!
//! let begin = Point2::new(50.0, 50.0);
//! if let Some(p) = assistant.adjust_position(Point2::new(70.0, 52.0), begin) {
//!     println!("snapped to {p:?}");
//! }
//! assistant.end_stroke();
//! ```

mod assistant;
mod error;
mod handles;
mod params;
mod perspective;
mod quad;
mod ruler;

pub use assistant::{Assistant, AssistantKind};
pub use error::AssistantError;
pub use handles::{CornerRoles, SideHandles};
pub use params::{PerspectiveAssistantParams, RulerAssistantParams};
pub use perspective::PerspectiveAssistant;
pub use quad::{classify_quad, QuadGeometry, QuadPolygon, QuadShape};
pub use ruler::RulerAssistant;
