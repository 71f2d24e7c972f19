//! Drawing surface API for spectrum-player
//!
//! Renderers paint through the [`DrawSurface`] trait in canvas coordinates
//! (origin top-left, y growing downwards). [`NannouSurface`] maps those
//! calls onto a `nannou::Draw`; [`RecordingSurface`] captures them for tests.

pub mod draw;
pub mod record;
pub mod rect;

pub use draw::{window_to_canvas, DrawSurface, NannouSurface, Rgb};
pub use record::{DrawCommand, RecordingSurface};
pub use rect::{CanvasRect, CanvasSize};
