pub mod arcs;
pub mod bar_graph;
pub mod rotation;
pub mod strokes;

use spectrum_draw::{CanvasSize, DrawSurface, Rgb};

pub use rotation::ArcRotation;

/// Canvas background painted before every frame
pub const BACKGROUND: Rgb = Rgb::hex(0x221122);

/// Color for bin `i` of a `len`-bin snapshot. Red can exceed a byte for the
/// lowest bins, so every channel is clamped.
pub fn spectrum_color(magnitude: u8, i: usize, len: usize) -> Rgb {
    let len_f = len as f32;
    let position = i as f32 / len_f;
    let red = magnitude as f32 + len_f / (i as f32 + 1.0);
    let green = 200.0 * position;
    let blue = 10.0 * position + 50.0;
    Rgb::clamped(red, green, blue)
}

/// The interchangeable ways of painting one snapshot
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RenderStyle {
    Arcs,
    Strokes,
    BarGraph,
}

impl RenderStyle {
    pub const ALL: [RenderStyle; 3] = [RenderStyle::Arcs, RenderStyle::Strokes, RenderStyle::BarGraph];

    pub fn name(self) -> &'static str {
        match self {
            RenderStyle::Arcs => "Arcs",
            RenderStyle::Strokes => "Strokes",
            RenderStyle::BarGraph => "Bar Graph",
        }
    }

    pub fn render<S: DrawSurface>(
        self,
        snapshot: &[u8],
        canvas: CanvasSize,
        rotation: &ArcRotation,
        surface: &S,
    ) {
        match self {
            RenderStyle::Arcs => arcs::render(snapshot, canvas, rotation, surface),
            RenderStyle::Strokes => strokes::render(snapshot, canvas, surface),
            RenderStyle::BarGraph => bar_graph::render(snapshot, canvas, surface),
        }
    }
}

/// Current index into [`RenderStyle::ALL`], advanced by the user
#[derive(Default, Debug)]
pub struct StyleSelector {
    index: usize,
}

impl StyleSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> RenderStyle {
        RenderStyle::ALL[self.index]
    }

    pub fn advance(&mut self) {
        self.index = (self.index + 1) % RenderStyle::ALL.len();
    }
}

/// Resolution settings for the window
pub struct Resolution {
    pub width: u32,
    pub height: u32,
    pub fullscreen: bool,
}

impl Resolution {
    pub fn windowed() -> Self {
        Self {
            width: 1024,
            height: 640,
            fullscreen: false,
        }
    }

    pub fn release() -> Self {
        Self {
            width: 1280,
            height: 720,
            fullscreen: true,
        }
    }

    pub fn current(windowed: bool) -> Self {
        if windowed || cfg!(debug_assertions) {
            Self::windowed()
        } else {
            Self::release()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;
    use spectrum_draw::RecordingSurface;
    use std::time::Duration;

    #[test]
    fn test_color_formula() {
        // i = 0: red = m + len, clamped
        assert_eq!(spectrum_color(200, 0, 341), Rgb::new(255, 0, 50));
        // halfway: green 100, blue 55
        let mid = spectrum_color(10, 50, 100);
        assert_eq!(mid, Rgb::new(12, 100, 55));
        // last bin of a short snapshot
        assert_eq!(spectrum_color(0, 3, 4), Rgb::new(1, 150, 58));
    }

    #[test]
    fn test_red_never_overflows() {
        for len in [1usize, 17, 341, 512] {
            for i in 0..len {
                let color = spectrum_color(255, i, len);
                assert!(color.b >= 50 && color.b <= 60);
                assert!(color.g <= 200);
            }
        }
    }

    #[test]
    fn test_three_advances_cycle_back() {
        let mut styles = StyleSelector::new();
        let original = styles.current();
        assert_eq!(original, RenderStyle::Arcs);

        styles.advance();
        assert_eq!(styles.current(), RenderStyle::Strokes);
        styles.advance();
        assert_eq!(styles.current(), RenderStyle::BarGraph);
        styles.advance();
        assert_eq!(styles.current(), original);
    }

    #[test]
    fn test_switching_styles_keeps_rotation() {
        let canvas = CanvasSize::new(640.0, 480.0);
        let rotation = ArcRotation::new(Duration::from_secs(3600));
        let surface = RecordingSurface::new();
        let snapshot = [120u8; 64];
        let mut styles = StyleSelector::new();

        styles.current().render(&snapshot, canvas, &rotation, &surface);
        for _ in 0..10 {
            rotation.advance();
        }
        let before = rotation.offset();

        for _ in 0..3 {
            styles.advance();
            styles.current().render(&snapshot, canvas, &rotation, &surface);
        }
        assert_eq!(styles.current(), RenderStyle::Arcs);
        assert_eq!(rotation.offset(), before);
        rotation.advance();
        assert_eq!(rotation.offset(), before + 1);
        assert_eq!(rotation.ticker_starts(), 1);
    }

    #[test]
    fn test_random_snapshots_span_canvas() {
        let mut rng = rand::rng();
        let canvas = CanvasSize::new(1366.0, 768.0);
        let rotation = ArcRotation::new(Duration::from_secs(3600));

        for _ in 0..20 {
            let len = rng.random_range(1..512);
            let snapshot: Vec<u8> = (0..len).map(|_| rng.random_range(1..=255)).collect();

            let bars = RecordingSurface::new();
            RenderStyle::BarGraph.render(&snapshot, canvas, &rotation, &bars);
            let rects = bars.rects();
            assert_eq!(rects.len(), len);
            let width: f64 = rects.iter().map(|r| r.w as f64).sum();
            assert!((width - canvas.width as f64).abs() < 0.01, "len {} width {}", len, width);

            let strokes = RecordingSurface::new();
            RenderStyle::Strokes.render(&snapshot, canvas, &rotation, &strokes);
            assert_eq!(strokes.len(), len);
        }
    }
}
