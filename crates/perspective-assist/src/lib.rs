//! Facade over the `perspective-*` crates.
//!
//! ## Quickstart
//!
//! ```
//! use perspective_assist::assistant::{AssistantKind, PerspectiveAssistantParams};
//! use perspective_assist::{Homography, PerspectiveAssistant, Point2};
//!
//! let quad = [
//!     Point2::new(0.0, 0.0),
//!     Point2::new(200.0, 20.0),
//!     Point2::new(200.0, 180.0),
//!     Point2::new(0.0, 200.0),
//! ];
//! let mut assistant = PerspectiveAssistant::from_handles(quad, PerspectiveAssistantParams::default());
//! let begin = Point2::new(100.0, 100.0);
//! let snapped = assistant.adjust_position(Point2::new(140.0, 104.0), begin);
//! assert!(snapped.is_some());
//!
//! let lines = assistant.draw_cache(&Homography::identity());
//! assert!(!lines.is_empty());
//! assert_eq!(AssistantKind::from_id("ruler").map(|k| k.handle_count()), Ok(2));
//! ```
//!
//! ## API map
//! - `perspective_assist::core`: lines, homographies, polygons, `DrawPath`, logger.
//! - `perspective_assist::grid`: the linked sub-grid graph and its vanishing points.
//! - `perspective_assist::assistant`: perspective and ruler assistants, quad
//!   classification, the `Assistant` enum and its factory.

pub use perspective_assistant as assistant;
pub use perspective_core as core;
pub use perspective_grid as grid;

pub use nalgebra::Point2;
pub use perspective_assistant::{Assistant, AssistantKind, PerspectiveAssistant, RulerAssistant};
pub use perspective_core::{DrawPath, Homography, Segment};
pub use perspective_grid::{PerspectiveGridGraph, Side, SubGridCell};
