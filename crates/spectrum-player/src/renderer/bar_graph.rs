//! Bottom-anchored vertical bars, one per frequency bin.

use spectrum_draw::{CanvasRect, CanvasSize, DrawSurface};

use super::spectrum_color;
use crate::audio::MAX_FREQUENCY_VALUE;

pub fn render<S: DrawSurface>(snapshot: &[u8], canvas: CanvasSize, surface: &S) {
    let len = snapshot.len();
    if len == 0 {
        return;
    }
    let bar_width = canvas.width / len as f32;

    for (i, &magnitude) in snapshot.iter().enumerate() {
        let bar_height = magnitude as f32 * canvas.height / MAX_FREQUENCY_VALUE as f32;
        if bar_height <= 0.0 {
            continue;
        }
        let x = i as f32 * bar_width;
        surface.fill_rect(
            CanvasRect::new(x, canvas.height - bar_height, bar_width, bar_height),
            spectrum_color(magnitude, i, len),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spectrum_draw::RecordingSurface;

    const CANVAS: CanvasSize = CanvasSize {
        width: 1024.0,
        height: 600.0,
    };

    #[test]
    fn test_silence_draws_nothing() {
        let surface = RecordingSurface::new();
        render(&[0; 341], CANVAS, &surface);
        assert!(surface.is_empty());
    }

    #[test]
    fn test_full_scale_bars_reach_top() {
        let surface = RecordingSurface::new();
        render(&[255; 341], CANVAS, &surface);

        let rects = surface.rects();
        assert_eq!(rects.len(), 341);
        for rect in rects {
            assert!((rect.h - CANVAS.height).abs() < 1e-3);
            assert!(rect.top().abs() < 1e-3);
            assert!((rect.bottom() - CANVAS.height).abs() < 1e-3);
        }
    }

    #[test]
    fn test_bars_tile_canvas_width() {
        let surface = RecordingSurface::new();
        render(&[128; 100], CANVAS, &surface);

        let rects = surface.rects();
        assert!(rects[0].left().abs() < 1e-3);
        for pair in rects.windows(2) {
            assert!((pair[0].right() - pair[1].left()).abs() < 1e-3);
        }
        let total: f32 = rects.iter().map(|r| r.w).sum();
        assert!((total - CANVAS.width).abs() < 1e-2);
        assert!((rects[99].right() - CANVAS.width).abs() < 1e-2);
    }

    #[test]
    fn test_height_scales_with_magnitude() {
        let surface = RecordingSurface::new();
        render(&[51, 0, 102], CANVAS, &surface);

        let rects = surface.rects();
        assert_eq!(rects.len(), 2);
        assert!((rects[0].h - 120.0).abs() < 1e-3);
        assert!((rects[1].h - 240.0).abs() < 1e-3);
        assert!((rects[1].left() - 2.0 * CANVAS.width / 3.0).abs() < 1e-3);
    }
}
