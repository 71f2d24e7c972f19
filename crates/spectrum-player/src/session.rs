//! Session state: the playlist, the analysis graph, the style selection and
//! the animation driver, owned together so a reset can drop all of it.

use log::{error, info};
use spectrum_draw::{CanvasSize, DrawSurface};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::audio::{PlayerError, SpectrumSampler, Transport};
use crate::driver::{AnimationDriver, FrameContext};
use crate::playlist::{tracks_from_paths, Advance, PlaybackState, TrackController};
use crate::renderer::{ArcRotation, RenderStyle, StyleSelector};
use crate::utils::Config;

pub const BASE_TITLE: &str = "[Audio Player and Visualizer]";

/// Tuning values read once from the config
#[derive(Clone, Debug)]
pub struct SessionSettings {
    pub fft_size: usize,
    pub sample_ratio: f32,
    pub track_advance_delay: Duration,
    pub rotation_interval: Duration,
}

impl SessionSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            fft_size: config.fft_size(),
            sample_ratio: config.sample_ratio(),
            track_advance_delay: config.track_advance_delay(),
            rotation_interval: config.rotation_interval(),
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

pub struct Session<T: Transport> {
    transport: T,
    settings: SessionSettings,
    controller: TrackController,
    styles: StyleSelector,
    sampler: SpectrumSampler,
    rotation: ArcRotation,
    driver: AnimationDriver,
    canvas: CanvasSize,
    title: String,
}

impl<T: Transport> Session<T> {
    pub fn new(transport: T, settings: SessionSettings) -> Self {
        Self {
            transport,
            controller: TrackController::new(settings.track_advance_delay),
            rotation: ArcRotation::new(settings.rotation_interval),
            settings,
            styles: StyleSelector::new(),
            sampler: SpectrumSampler::new(),
            driver: AnimationDriver::new(),
            canvas: CanvasSize::new(0.0, 0.0),
            title: BASE_TITLE.to_string(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn is_idle(&self) -> bool {
        self.controller.state() == PlaybackState::Idle
    }

    pub fn style(&self) -> RenderStyle {
        self.styles.current()
    }

    pub fn canvas(&self) -> CanvasSize {
        self.canvas
    }

    /// Queue dropped files and start the first one. Ignored while a session
    /// is already running. The canvas size is fixed from here on.
    pub fn start(&mut self, paths: &[PathBuf], canvas: CanvasSize) -> bool {
        if !self.is_idle() || !self.controller.start(tracks_from_paths(paths)) {
            return false;
        }
        self.canvas = canvas;
        self.enter_loading(Instant::now());
        true
    }

    /// Collect a finished load, consume end-of-track notifications and run
    /// any due advance.
    pub fn update(&mut self, now: Instant) {
        if self.controller.state() == PlaybackState::Loading {
            self.poll_loading(now);
        }

        if self.transport.take_ended() {
            self.controller.track_ended(now);
        }

        match self.controller.poll(now) {
            Some(Advance::Next(_)) => self.enter_loading(now),
            Some(Advance::Finished) => {
                info!("Playlist finished");
                self.reset_session();
            }
            None => {}
        }
    }

    /// Ignored unless a track is loaded and playing (or paused).
    pub fn toggle_playback(&mut self) {
        if self.controller.state() != PlaybackState::Playing {
            return;
        }
        if self.transport.is_paused() && !self.transport.is_ended() {
            self.transport.play();
        } else {
            self.transport.pause();
        }
    }

    pub fn advance_style(&mut self) {
        self.styles.advance();
        info!("Style: {}", self.styles.current().name());
    }

    /// One animation iteration. Returns whether a frame was painted.
    pub fn render_frame<S: DrawSurface>(&mut self, surface: &S) -> bool {
        let name = self
            .controller
            .current_track()
            .map(|t| t.name.as_str())
            .unwrap_or("");
        let ctx = FrameContext {
            style: self.styles.current(),
            rotation: &self.rotation,
            canvas: self.canvas,
            track_name: name,
        };
        self.driver.frame(&mut self.sampler, &ctx, surface)
    }

    /// Tear everything down; afterwards the session behaves like a new one.
    pub fn reset_session(&mut self) {
        self.driver.stop();
        self.rotation.stop();
        self.rotation = ArcRotation::new(self.settings.rotation_interval);
        self.sampler.teardown(&mut self.transport);
        self.transport.stop();
        self.controller.reset();
        self.styles = StyleSelector::new();
        self.driver = AnimationDriver::new();
        self.canvas = CanvasSize::new(0.0, 0.0);
        self.title = BASE_TITLE.to_string();
    }

    fn enter_loading(&mut self, now: Instant) {
        let Some(track) = self.controller.current_track().cloned() else {
            return;
        };
        info!("Loading [{}] {}", track.index, track.name);

        self.transport.set_source(&track.path);
        self.title = format!("{} - {}", BASE_TITLE, track.name);

        self.sampler.initialize(
            self.settings.fft_size,
            self.settings.sample_ratio,
            &mut self.transport,
        );
        // frames keep coming while the decoder works
        self.driver.start();

        match self.transport.begin_load() {
            Ok(()) => self.poll_loading(now),
            Err(e) => self.finish_loading(Err(e), now),
        }
    }

    fn poll_loading(&mut self, now: Instant) {
        if let Some(result) = self.transport.poll_load() {
            self.finish_loading(result, now);
        }
    }

    /// Loading -> Playing. A failed load skips ahead through the normal
    /// debounced advance.
    fn finish_loading(&mut self, result: Result<(), PlayerError>, now: Instant) {
        self.controller.mark_playing();
        match result {
            Ok(()) => self.transport.play(),
            Err(e) => {
                let name = self
                    .controller
                    .current_track()
                    .map(|t| t.name.as_str())
                    .unwrap_or("");
                error!("Cannot play {}: {}", name, e);
                self.controller.track_ended(now);
            }
        }
    }
}

#[cfg(test)]
impl<T: Transport> Session<T> {
    pub fn state(&self) -> PlaybackState {
        self.controller.state()
    }

    pub fn controller(&self) -> &TrackController {
        &self.controller
    }

    pub fn sampler(&self) -> &SpectrumSampler {
        &self.sampler
    }

    pub fn rotation(&self) -> &ArcRotation {
        &self.rotation
    }

    pub fn driver(&self) -> &AnimationDriver {
        &self.driver
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }
}
