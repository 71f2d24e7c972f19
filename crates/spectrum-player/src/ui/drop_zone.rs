//! Idle screen shown until files are dropped.

use spectrum_draw::{CanvasSize, DrawSurface, Rgb};

use crate::renderer::BACKGROUND;

pub const PROMPT: &str = "Drop audio files here";
const HINT: &str = "click: play/pause   space/v: style   q: quit";
const PROMPT_COLOR: Rgb = Rgb::hex(0xffffcc);
const HINT_COLOR: Rgb = Rgb::hex(0x886688);

pub fn draw<S: DrawSurface>(canvas: CanvasSize, surface: &S) {
    surface.fill_rect(canvas.full_rect(), BACKGROUND);

    // rough centering; nannou has no text metrics on this path
    let x = (canvas.width * 0.5 - PROMPT.len() as f32 * 7.0).max(10.0);
    let y = canvas.height * 0.5;
    surface.text(PROMPT, x, y, 28, PROMPT_COLOR);
    surface.text(HINT, x, y + 36.0, 14, HINT_COLOR);
}
