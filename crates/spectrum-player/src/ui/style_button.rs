//! Clickable style button pinned to the top-right corner.

use spectrum_draw::{CanvasRect, CanvasSize, DrawSurface, Rgb};

use crate::renderer::RenderStyle;

const WIDTH: f32 = 170.0;
const HEIGHT: f32 = 32.0;
const MARGIN: f32 = 10.0;
const FONT_SIZE: u32 = 16;

const FILL: Rgb = Rgb::hex(0x442244);
const BORDER: Rgb = Rgb::hex(0xaa88aa);
const LABEL: Rgb = Rgb::hex(0xffffcc);

pub struct StyleButton {
    rect: CanvasRect,
}

impl StyleButton {
    /// Button placed against the right edge of `canvas`
    pub fn new(canvas: CanvasSize) -> Self {
        let x = (canvas.width - WIDTH - MARGIN).max(0.0);
        Self {
            rect: CanvasRect::new(x, MARGIN, WIDTH, HEIGHT),
        }
    }

    /// The button only exists once files have been dropped
    pub fn shown(idle: bool, canvas: CanvasSize) -> Option<Self> {
        (!idle).then(|| Self::new(canvas))
    }

    pub fn rect(&self) -> CanvasRect {
        self.rect
    }

    pub fn hit(&self, x: f32, y: f32) -> bool {
        self.rect.contains(x, y)
    }

    pub fn label(style: RenderStyle) -> String {
        format!("Style: {}", style.name())
    }

    pub fn draw<S: DrawSurface>(&self, style: RenderStyle, surface: &S) {
        let r = self.rect;
        surface.fill_rect(r, FILL);
        surface.polyline(
            &[
                (r.left(), r.top()),
                (r.right(), r.top()),
                (r.right(), r.bottom()),
                (r.left(), r.bottom()),
                (r.left(), r.top()),
            ],
            1.0,
            BORDER,
        );
        let baseline = r.top() + (HEIGHT + FONT_SIZE as f32) * 0.5 - 2.0;
        surface.text(&Self::label(style), r.left() + 10.0, baseline, FONT_SIZE, LABEL);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spectrum_draw::{DrawCommand, RecordingSurface};

    #[test]
    fn test_top_right_placement() {
        let button = StyleButton::new(CanvasSize::new(800.0, 600.0));
        let r = button.rect();
        assert_eq!(r.right(), 790.0);
        assert_eq!(r.top(), 10.0);
        assert!(button.hit(700.0, 20.0));
        assert!(!button.hit(100.0, 20.0));
        assert!(!button.hit(700.0, 100.0));
    }

    #[test]
    fn test_hidden_on_idle_screen() {
        let canvas = CanvasSize::new(800.0, 600.0);
        assert!(StyleButton::shown(true, canvas).is_none());

        let button = StyleButton::shown(false, canvas).map(|b| b.rect());
        assert_eq!(button, Some(StyleButton::new(canvas).rect()));
    }

    #[test]
    fn test_narrow_canvas_stays_on_screen() {
        let button = StyleButton::new(CanvasSize::new(100.0, 100.0));
        assert_eq!(button.rect().left(), 0.0);
    }

    #[test]
    fn test_draw_shows_style_name() {
        let surface = RecordingSurface::new();
        let button = StyleButton::new(CanvasSize::new(800.0, 600.0));
        button.draw(RenderStyle::BarGraph, &surface);

        assert_eq!(surface.rects(), vec![button.rect()]);
        assert_eq!(surface.texts(), vec!["Style: Bar Graph".to_string()]);
        assert!(surface
            .commands()
            .iter()
            .any(|c| matches!(c, DrawCommand::Polyline { points, .. } if points.len() == 5)));
    }
}
