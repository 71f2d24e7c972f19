//! Per-frame animation routine, run from the window's refresh callback.

use spectrum_draw::{CanvasSize, DrawSurface, Rgb};

use crate::audio::SpectrumSampler;
use crate::renderer::{ArcRotation, RenderStyle, BACKGROUND};

const NAME_COLOR: Rgb = Rgb::hex(0xffffcc);
const NAME_FONT_SIZE: u32 = 21;
const NAME_POSITION: (f32, f32) = (10.0, 40.0);

/// Everything one frame reads besides the sampler
pub struct FrameContext<'a> {
    pub style: RenderStyle,
    pub rotation: &'a ArcRotation,
    pub canvas: CanvasSize,
    pub track_name: &'a str,
}

/// Cancellable frame loop. The refresh callback keeps calling [`frame`];
/// a stopped driver paints nothing.
///
/// [`frame`]: AnimationDriver::frame
#[derive(Default)]
pub struct AnimationDriver {
    running: bool,
    frames: u64,
}

impl AnimationDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Sample, clear, render, overlay. Returns whether anything was painted.
    pub fn frame<S: DrawSurface>(
        &mut self,
        sampler: &mut SpectrumSampler,
        ctx: &FrameContext<'_>,
        surface: &S,
    ) -> bool {
        if !self.running {
            return false;
        }

        sampler.sample();
        surface.fill_rect(ctx.canvas.full_rect(), BACKGROUND);
        ctx.style
            .render(sampler.snapshot(), ctx.canvas, ctx.rotation, surface);
        surface.text(
            ctx.track_name,
            NAME_POSITION.0,
            NAME_POSITION.1,
            NAME_FONT_SIZE,
            NAME_COLOR,
        );

        self.frames += 1;
        true
    }
}

#[cfg(test)]
impl AnimationDriver {
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::testing::ScriptedTransport;
    use spectrum_draw::{DrawCommand, RecordingSurface};
    use std::time::Duration;

    fn ctx<'a>(style: RenderStyle, rotation: &'a ArcRotation) -> FrameContext<'a> {
        FrameContext {
            style,
            rotation,
            canvas: CanvasSize::new(800.0, 600.0),
            track_name: "intro.mp3",
        }
    }

    #[test]
    fn test_stopped_driver_paints_nothing() {
        let mut driver = AnimationDriver::new();
        let mut sampler = SpectrumSampler::new();
        let rotation = ArcRotation::new(Duration::from_secs(3600));
        let surface = RecordingSurface::new();

        assert!(!driver.frame(&mut sampler, &ctx(RenderStyle::BarGraph, &rotation), &surface));
        assert!(surface.is_empty());
        assert_eq!(driver.frames(), 0);
    }

    #[test]
    fn test_silent_frame_is_background_and_name() {
        let mut transport = ScriptedTransport::default();
        let mut driver = AnimationDriver::new();
        let mut sampler = SpectrumSampler::new();
        sampler.initialize(1024, 4.0 / 6.0, &mut transport);
        let rotation = ArcRotation::new(Duration::from_secs(3600));
        let surface = RecordingSurface::new();

        driver.start();
        assert!(driver.frame(&mut sampler, &ctx(RenderStyle::BarGraph, &rotation), &surface));

        let commands = surface.commands();
        assert_eq!(commands.len(), 2);
        assert_eq!(
            commands[0],
            DrawCommand::FillRect {
                rect: CanvasSize::new(800.0, 600.0).full_rect(),
                color: BACKGROUND,
            }
        );
        assert_eq!(
            commands[1],
            DrawCommand::Text {
                text: "intro.mp3".to_string(),
                x: 10.0,
                y: 40.0,
                font_size: 21,
                color: Rgb::hex(0xffffcc),
            }
        );
    }

    #[test]
    fn test_loud_frame_draws_between_background_and_name() {
        let mut transport = ScriptedTransport::default();
        let mut driver = AnimationDriver::new();
        let mut sampler = SpectrumSampler::new();
        sampler.initialize(256, 1.0, &mut transport);

        // full-scale square wave puts energy across the spectrum
        let tap = transport.tap.clone().expect("tap connected");
        let wave: Vec<f32> = (0..256).map(|n| if n % 8 < 4 { 1.0 } else { -1.0 }).collect();
        tap.push_interleaved(&wave, 1);

        let rotation = ArcRotation::new(Duration::from_secs(3600));
        let surface = RecordingSurface::new();
        driver.start();
        driver.frame(&mut sampler, &ctx(RenderStyle::Strokes, &rotation), &surface);

        let commands = surface.commands();
        assert_eq!(commands.len(), 128 + 2);
        assert!(matches!(commands[0], DrawCommand::FillRect { .. }));
        assert!(matches!(commands[1], DrawCommand::Line { .. }));
        assert!(matches!(commands[129], DrawCommand::Text { .. }));
        assert!(sampler.snapshot().iter().any(|&b| b > 0));

        driver.stop();
        assert!(!driver.frame(&mut sampler, &ctx(RenderStyle::Strokes, &rotation), &surface));
        assert_eq!(driver.frames(), 1);
    }
}
