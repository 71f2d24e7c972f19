//! Horizontal segments chained left to right into a jagged profile.

use spectrum_draw::{CanvasSize, DrawSurface};

use super::spectrum_color;
use crate::audio::MAX_FREQUENCY_VALUE;

const LINE_WEIGHT: f32 = 5.0;

pub fn render<S: DrawSurface>(snapshot: &[u8], canvas: CanvasSize, surface: &S) {
    let len = snapshot.len();
    if len == 0 {
        return;
    }
    let stroke_width = canvas.width / len as f32;
    let mut prev_x = 0.0;

    for (i, &magnitude) in snapshot.iter().enumerate() {
        let x = prev_x + stroke_width;
        let y = canvas.height - magnitude as f32 * canvas.height / MAX_FREQUENCY_VALUE as f32;
        surface.line(
            (prev_x, y),
            (x, y),
            LINE_WEIGHT,
            spectrum_color(magnitude, i, len),
        );
        prev_x = x;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spectrum_draw::{DrawCommand, RecordingSurface};

    fn segments(surface: &RecordingSurface) -> Vec<((f32, f32), (f32, f32), f32)> {
        surface
            .commands()
            .into_iter()
            .filter_map(|c| match c {
                DrawCommand::Line {
                    from, to, weight, ..
                } => Some((from, to, weight)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_segments_chain_across_width() {
        let canvas = CanvasSize::new(900.0, 500.0);
        let surface = RecordingSurface::new();
        render(&[10, 200, 30, 255, 0, 90], canvas, &surface);

        let segs = segments(&surface);
        assert_eq!(segs.len(), 6);
        assert_eq!(segs[0].0 .0, 0.0);
        for pair in segs.windows(2) {
            assert!((pair[0].1 .0 - pair[1].0 .0).abs() < 1e-3);
        }
        assert!((segs[5].1 .0 - canvas.width).abs() < 1e-2);
        assert!(segs.iter().all(|s| s.2 == 5.0));
    }

    #[test]
    fn test_segment_heights() {
        let canvas = CanvasSize::new(300.0, 510.0);
        let surface = RecordingSurface::new();
        render(&[0, 255, 51], canvas, &surface);

        let segs = segments(&surface);
        // each segment is horizontal
        for (from, to, _) in &segs {
            assert_eq!(from.1, to.1);
        }
        assert_eq!(segs[0].0 .1, 510.0);
        assert!(segs[1].0 .1.abs() < 1e-3);
        assert!((segs[2].0 .1 - 408.0).abs() < 1e-3);
    }
}
