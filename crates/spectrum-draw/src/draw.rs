//! Drawing surface trait and its nannou implementation

use nannou::prelude::*;

use crate::rect::{CanvasRect, CanvasSize};

/// 8-bit RGB color, as handed to a canvas 2D context
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build from a `0xRRGGBB` literal
    pub const fn hex(value: u32) -> Self {
        Self {
            r: ((value >> 16) & 0xff) as u8,
            g: ((value >> 8) & 0xff) as u8,
            b: (value & 0xff) as u8,
        }
    }

    /// Clamp arbitrary real channel values into the valid byte range.
    pub fn clamped(r: f32, g: f32, b: f32) -> Self {
        let channel = |v: f32| v.round().clamp(0.0, 255.0) as u8;
        Self::new(channel(r), channel(g), channel(b))
    }

    fn to_srgba(self) -> Srgba<u8> {
        srgba(self.r, self.g, self.b, 255)
    }
}

/// Immediate-mode drawing in canvas coordinates (origin top-left, y down).
pub trait DrawSurface {
    /// Fill an axis-aligned rectangle
    fn fill_rect(&self, rect: CanvasRect, color: Rgb);

    /// Stroke a single line segment
    fn line(&self, from: (f32, f32), to: (f32, f32), weight: f32, color: Rgb);

    /// Stroke a path through the given points
    fn polyline(&self, points: &[(f32, f32)], weight: f32, color: Rgb);

    /// Draw left-aligned text with its baseline at `(x, y)`
    fn text(&self, text: &str, x: f32, y: f32, font_size: u32, color: Rgb);
}

/// Maps canvas-space draw calls onto a `nannou::Draw`.
///
/// nannou puts the origin at the window center with y pointing up; the
/// canvas is anchored to the window's top-left corner and keeps its own size
/// even if the window is later resized.
pub struct NannouSurface<'a> {
    draw: &'a Draw,
    origin: Vec2,
    canvas: CanvasSize,
}

impl<'a> NannouSurface<'a> {
    pub fn new(draw: &'a Draw, window: Rect, canvas: CanvasSize) -> Self {
        Self {
            draw,
            origin: pt2(window.left(), window.top()),
            canvas,
        }
    }

    pub fn canvas(&self) -> CanvasSize {
        self.canvas
    }

    fn to_window(&self, x: f32, y: f32) -> Point2 {
        pt2(self.origin.x + x, self.origin.y - y)
    }
}

/// Convert a point in window space (nannou coordinates) back to canvas space
pub fn window_to_canvas(window: Rect, point: Point2) -> (f32, f32) {
    (point.x - window.left(), window.top() - point.y)
}

impl DrawSurface for NannouSurface<'_> {
    fn fill_rect(&self, rect: CanvasRect, color: Rgb) {
        let (cx, cy) = rect.center();
        self.draw
            .rect()
            .xy(self.to_window(cx, cy))
            .w_h(rect.w, rect.h)
            .color(color.to_srgba());
    }

    fn line(&self, from: (f32, f32), to: (f32, f32), weight: f32, color: Rgb) {
        self.draw
            .line()
            .start(self.to_window(from.0, from.1))
            .end(self.to_window(to.0, to.1))
            .weight(weight)
            .color(color.to_srgba());
    }

    fn polyline(&self, points: &[(f32, f32)], weight: f32, color: Rgb) {
        let pts: Vec<Point2> = points.iter().map(|&(x, y)| self.to_window(x, y)).collect();
        self.draw
            .polyline()
            .weight(weight)
            .points(pts)
            .color(color.to_srgba());
    }

    fn text(&self, text: &str, x: f32, y: f32, font_size: u32, color: Rgb) {
        // nannou lays text out in a box centered on its position
        let box_w = self.canvas.width;
        let box_h = font_size as f32 * 1.5;
        let center = self.to_window(x + box_w * 0.5, y - font_size as f32 * 0.35);
        self.draw
            .text(text)
            .xy(center)
            .wh(pt2(box_w, box_h).into())
            .left_justify()
            .no_line_wrap()
            .color(color.to_srgba())
            .font_size(font_size);
    }
}
