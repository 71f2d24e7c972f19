//! Radial wedges around the canvas center, slowly rotated by the ticker.
//!
//! Bin `i` owns the angular slice `[(rot + i) * w, (rot + i + 1) * w]` with
//! `w = 2π / len`. Angles run clockwise from +x because canvas y points down.

use spectrum_draw::{CanvasSize, DrawSurface};
use std::f32::consts::TAU;

use super::rotation::ArcRotation;
use super::spectrum_color;
use crate::audio::MAX_FREQUENCY_VALUE;

const LINE_WEIGHT: f32 = 1.0;
/// Segments used to approximate each wedge's outer arc
const ARC_STEPS: usize = 4;
/// center, the arc's points, back to center
const WEDGE_POINTS: usize = ARC_STEPS + 3;

/// Start and end angle of wedge `i`
pub fn wedge_angles(i: usize, len: usize, rotation: usize) -> (f32, f32) {
    let arc_width = TAU / len as f32;
    (
        (rotation + i) as f32 * arc_width,
        (rotation + i + 1) as f32 * arc_width,
    )
}

pub fn render<S: DrawSurface>(
    snapshot: &[u8],
    canvas: CanvasSize,
    rotation: &ArcRotation,
    surface: &S,
) {
    let len = snapshot.len();
    if len == 0 {
        return;
    }

    let cx = (canvas.width / 2.0).floor();
    let cy = (canvas.height / 2.0).floor();
    let outer_radius = (canvas.min_side() / 2.0).floor();
    let offset = rotation.offset();
    let mut points = [(cx, cy); WEDGE_POINTS];

    for (i, &magnitude) in snapshot.iter().enumerate() {
        let radius = (magnitude as f32 / MAX_FREQUENCY_VALUE as f32 * outer_radius).floor();
        if radius <= 0.0 {
            continue;
        }
        let (start, end) = wedge_angles(i, len, offset);

        // first and last slots stay at the center
        for step in 0..=ARC_STEPS {
            let angle = start + (end - start) * step as f32 / ARC_STEPS as f32;
            points[step + 1] = (cx + radius * angle.cos(), cy + radius * angle.sin());
        }

        surface.polyline(&points, LINE_WEIGHT, spectrum_color(magnitude, i, len));
    }

    rotation.ensure_ticking(len);
}
